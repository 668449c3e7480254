// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory context used by the unit tests.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::binding::{AttachmentConfig, BufferTarget, FramebufferTarget, Limits, TextureTarget};
use crate::context::{GlContext, StateQuery, StateQueryError};
use crate::gl::{self, GLenum};
use crate::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use crate::state::{Capability, Face, PixelStoreParam, StencilFunc, StencilOp, TrackedState};
use crate::trace::GlCall;

/// A context that behaves like WebGL 2 for every tracked entry point and logs
/// each call it receives.
#[derive(Debug)]
pub(crate) struct MockContext {
    pub(crate) limits: Limits,
    pub(crate) state: TrackedState,
    pub(crate) program: Option<ProgramId>,
    pub(crate) array_buffer: Option<BufferId>,
    pub(crate) uniform_buffer: Option<BufferId>,
    pub(crate) vertex_array: Option<VertexArrayId>,
    /// Element-array binding per vertex array (`None` key is the default VAO).
    pub(crate) element_buffers: BTreeMap<Option<VertexArrayId>, BufferId>,
    pub(crate) draw_framebuffer: Option<FramebufferId>,
    pub(crate) read_framebuffer: Option<FramebufferId>,
    pub(crate) attachments: BTreeMap<Option<FramebufferId>, AttachmentConfig>,
    /// Per unit, per target (indexed like `TextureTarget::ALL`).
    pub(crate) textures: Vec<[Option<TextureId>; 4]>,
    /// Report all-ones stencil write masks as `0x7FFF_FFFF`.
    pub(crate) narrow_stencil_mask: bool,
    pub(crate) lost: bool,
    pub(crate) calls: Vec<GlCall<'static>>,
}

impl MockContext {
    pub(crate) fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub(crate) fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            state: TrackedState::default(),
            program: None,
            array_buffer: None,
            uniform_buffer: None,
            vertex_array: None,
            element_buffers: BTreeMap::new(),
            draw_framebuffer: None,
            read_framebuffer: None,
            attachments: BTreeMap::new(),
            textures: vec![[None; 4]; limits.max_texture_units as usize],
            narrow_stencil_mask: false,
            lost: false,
            calls: Vec::new(),
        }
    }

    pub(crate) fn element_buffer(&self) -> Option<BufferId> {
        self.element_buffers.get(&self.vertex_array).copied()
    }

    pub(crate) fn attachments_of(&self, fb: Option<FramebufferId>) -> AttachmentConfig {
        self.attachments
            .get(&fb)
            .cloned()
            .unwrap_or_else(|| AttachmentConfig::initial(fb, self.limits))
    }

    pub(crate) fn texture(&self, unit: u32, target: TextureTarget) -> Option<TextureId> {
        self.textures[unit as usize][target as usize]
    }

    fn unit(&self) -> usize {
        (self.state.active_texture - gl::TEXTURE0) as usize
    }

    fn log(&mut self, call: GlCall<'_>) {
        self.calls.push(call.into_owned());
    }

    fn faces(&mut self, face: Face, mut f: impl FnMut(&mut crate::state::StencilFace)) {
        if face.front() {
            f(&mut self.state.stencil_front);
        }
        if face.back() {
            f(&mut self.state.stencil_back);
        }
    }

    fn check(&self) -> Result<(), StateQueryError> {
        if self.lost {
            Err(StateQueryError::ContextLost)
        } else {
            Ok(())
        }
    }
}

impl GlContext for MockContext {
    fn enable(&mut self, cap: Capability) {
        self.log(GlCall::Enable(cap));
        *self.state.capabilities.get_mut(cap) = true;
    }

    fn disable(&mut self, cap: Capability) {
        self.log(GlCall::Disable(cap));
        *self.state.capabilities.get_mut(cap) = false;
    }

    fn pixel_store_i(&mut self, param: PixelStoreParam, value: i32) {
        self.log(GlCall::PixelStore(param, value));
        *self.state.pixel_store.get_mut(param) = value;
    }

    fn active_texture(&mut self, texture: GLenum) {
        self.log(GlCall::ActiveTexture(texture));
        self.state.active_texture = texture;
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log(GlCall::Viewport([x, y, width, height]));
        self.state.viewport = [x, y, width, height];
    }

    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.log(GlCall::BlendColor([r, g, b, a]));
        self.state.blend_color = [r, g, b, a];
    }

    fn blend_equation(&mut self, mode: GLenum) {
        self.log(GlCall::BlendEquation(mode));
        self.state.blend_equation = [mode, mode];
    }

    fn blend_equation_separate(&mut self, rgb: GLenum, alpha: GLenum) {
        self.log(GlCall::BlendEquationSeparate(rgb, alpha));
        self.state.blend_equation = [rgb, alpha];
    }

    fn blend_func(&mut self, src: GLenum, dst: GLenum) {
        self.log(GlCall::BlendFunc(src, dst));
        self.state.blend_func = [src, dst, src, dst];
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        let f = [src_rgb, dst_rgb, src_alpha, dst_alpha];
        self.log(GlCall::BlendFuncSeparate(f));
        self.state.blend_func = f;
    }

    fn cull_face(&mut self, mode: GLenum) {
        self.log(GlCall::CullFace(mode));
        self.state.cull_face = mode;
    }

    fn front_face(&mut self, mode: GLenum) {
        self.log(GlCall::FrontFace(mode));
        self.state.front_face = mode;
    }

    fn depth_func(&mut self, func: GLenum) {
        self.log(GlCall::DepthFunc(func));
        self.state.depth_func = func;
    }

    fn line_width(&mut self, width: f32) {
        self.log(GlCall::LineWidth(width));
        self.state.line_width = width;
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.log(GlCall::ClearColor([r, g, b, a]));
        self.state.clear_color = [r, g, b, a];
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.log(GlCall::ColorMask([r, g, b, a]));
        self.state.color_mask = [r, g, b, a];
    }

    fn clear_depth(&mut self, depth: f32) {
        self.log(GlCall::ClearDepth(depth));
        self.state.clear_depth = depth;
    }

    fn depth_mask(&mut self, flag: bool) {
        self.log(GlCall::DepthMask(flag));
        self.state.depth_mask = flag;
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.log(GlCall::DepthRange(near, far));
        self.state.depth_range = [near, far];
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.log(GlCall::PolygonOffset(factor, units));
        self.state.polygon_offset = [factor, units];
    }

    fn sample_coverage(&mut self, value: f32, invert: bool) {
        self.log(GlCall::SampleCoverage(value, invert));
        self.state.sample_coverage.value = value;
        self.state.sample_coverage.invert = invert;
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log(GlCall::Scissor([x, y, width, height]));
        self.state.scissor = [x, y, width, height];
    }

    fn stencil_func(&mut self, func: GLenum, reference: i32, mask: u32) {
        self.stencil_func_separate(Face::FrontAndBack, func, reference, mask);
        let f = StencilFunc {
            func,
            reference,
            mask,
        };
        *self.calls.last_mut().unwrap() = GlCall::StencilFunc(f);
    }

    fn stencil_func_separate(&mut self, face: Face, func: GLenum, reference: i32, mask: u32) {
        let f = StencilFunc {
            func,
            reference,
            mask,
        };
        self.log(GlCall::StencilFuncSeparate(face, f));
        self.faces(face, |s| s.func = f);
    }

    fn stencil_op(&mut self, fail: GLenum, depth_fail: GLenum, depth_pass: GLenum) {
        self.stencil_op_separate(Face::FrontAndBack, fail, depth_fail, depth_pass);
        let o = StencilOp {
            fail,
            depth_fail,
            depth_pass,
        };
        *self.calls.last_mut().unwrap() = GlCall::StencilOp(o);
    }

    fn stencil_op_separate(
        &mut self,
        face: Face,
        fail: GLenum,
        depth_fail: GLenum,
        depth_pass: GLenum,
    ) {
        let o = StencilOp {
            fail,
            depth_fail,
            depth_pass,
        };
        self.log(GlCall::StencilOpSeparate(face, o));
        self.faces(face, |s| s.op = o);
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.stencil_mask_separate(Face::FrontAndBack, mask);
        *self.calls.last_mut().unwrap() = GlCall::StencilMask(mask);
    }

    fn stencil_mask_separate(&mut self, face: Face, mask: u32) {
        self.log(GlCall::StencilMaskSeparate(face, mask));
        self.faces(face, |s| s.write_mask = mask);
    }

    fn clear_stencil(&mut self, s: i32) {
        self.log(GlCall::ClearStencil(s));
        self.state.clear_stencil = s;
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.log(GlCall::UseProgram(program));
        self.program = program;
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        self.log(GlCall::BindBuffer(target, buffer));
        match target {
            BufferTarget::Array => self.array_buffer = buffer,
            BufferTarget::Uniform => self.uniform_buffer = buffer,
            BufferTarget::ElementArray => match buffer {
                Some(b) => {
                    self.element_buffers.insert(self.vertex_array, b);
                }
                None => {
                    self.element_buffers.remove(&self.vertex_array);
                }
            },
        }
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.log(GlCall::BindVertexArray(vao));
        self.vertex_array = vao;
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        self.log(GlCall::BindFramebuffer(target, framebuffer));
        if target.draws() {
            self.draw_framebuffer = framebuffer;
        }
        if target.reads() {
            self.read_framebuffer = framebuffer;
        }
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        self.log(GlCall::DrawBuffers(Cow::Borrowed(buffers)));
        let fb = self.draw_framebuffer;
        let len = self.limits.max_draw_buffers as usize;
        let mut config = self.attachments_of(fb);
        config.set_draw_buffers(buffers, len);
        self.attachments.insert(fb, config);
    }

    fn read_buffer(&mut self, src: GLenum) {
        self.log(GlCall::ReadBuffer(src));
        let fb = self.read_framebuffer;
        let mut config = self.attachments_of(fb);
        config.read_buffer = src;
        self.attachments.insert(fb, config);
    }

    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureId>) {
        self.log(GlCall::BindTexture(target, texture));
        let unit = self.unit();
        if let Some(slot) = self.textures.get_mut(unit) {
            slot[target as usize] = texture;
        }
    }
}

impl StateQuery for MockContext {
    fn is_enabled(&self, cap: Capability) -> Result<bool, StateQueryError> {
        self.check()?;
        Ok(self.state.is_enabled(cap))
    }

    fn get_integer(&self, pname: GLenum) -> Result<i32, StateQueryError> {
        self.check()?;
        if let Some(param) = PixelStoreParam::from_gl(pname) {
            return Ok(self.state.pixel_store.get(param));
        }
        let s = &self.state;
        let value = match pname {
            gl::ACTIVE_TEXTURE => s.active_texture as i32,
            gl::BLEND_EQUATION_RGB => s.blend_equation[0] as i32,
            gl::BLEND_EQUATION_ALPHA => s.blend_equation[1] as i32,
            gl::BLEND_SRC_RGB => s.blend_func[0] as i32,
            gl::BLEND_DST_RGB => s.blend_func[1] as i32,
            gl::BLEND_SRC_ALPHA => s.blend_func[2] as i32,
            gl::BLEND_DST_ALPHA => s.blend_func[3] as i32,
            gl::CULL_FACE_MODE => s.cull_face as i32,
            gl::FRONT_FACE => s.front_face as i32,
            gl::DEPTH_FUNC => s.depth_func as i32,
            gl::STENCIL_FUNC => s.stencil_front.func.func as i32,
            gl::STENCIL_REF => s.stencil_front.func.reference,
            gl::STENCIL_FAIL => s.stencil_front.op.fail as i32,
            gl::STENCIL_PASS_DEPTH_FAIL => s.stencil_front.op.depth_fail as i32,
            gl::STENCIL_PASS_DEPTH_PASS => s.stencil_front.op.depth_pass as i32,
            gl::STENCIL_BACK_FUNC => s.stencil_back.func.func as i32,
            gl::STENCIL_BACK_REF => s.stencil_back.func.reference,
            gl::STENCIL_BACK_FAIL => s.stencil_back.op.fail as i32,
            gl::STENCIL_BACK_PASS_DEPTH_FAIL => s.stencil_back.op.depth_fail as i32,
            gl::STENCIL_BACK_PASS_DEPTH_PASS => s.stencil_back.op.depth_pass as i32,
            gl::STENCIL_CLEAR_VALUE => s.clear_stencil,
            gl::MAX_DRAW_BUFFERS => self.limits.max_draw_buffers as i32,
            gl::MAX_TEXTURE_IMAGE_UNITS => self.limits.max_texture_units as i32,
            gl::READ_BUFFER => self.attachments_of(self.read_framebuffer).read_buffer as i32,
            p if (gl::DRAW_BUFFER0..gl::DRAW_BUFFER0 + self.limits.max_draw_buffers)
                .contains(&p) =>
            {
                let config = self.attachments_of(self.draw_framebuffer);
                config.draw_buffers[(p - gl::DRAW_BUFFER0) as usize] as i32
            }
            _ => return Err(StateQueryError::QueryFailed { pname }),
        };
        Ok(value)
    }

    fn get_unsigned(&self, pname: GLenum) -> Result<u32, StateQueryError> {
        self.check()?;
        let narrow = |mask: u32| {
            if self.narrow_stencil_mask && mask == u32::MAX {
                0x7FFF_FFFF
            } else {
                mask
            }
        };
        match pname {
            gl::STENCIL_VALUE_MASK => Ok(self.state.stencil_front.func.mask),
            gl::STENCIL_BACK_VALUE_MASK => Ok(self.state.stencil_back.func.mask),
            gl::STENCIL_WRITEMASK => Ok(narrow(self.state.stencil_front.write_mask)),
            gl::STENCIL_BACK_WRITEMASK => Ok(narrow(self.state.stencil_back.write_mask)),
            _ => Err(StateQueryError::QueryFailed { pname }),
        }
    }

    fn get_integer_v(&self, pname: GLenum, out: &mut [i32]) -> Result<(), StateQueryError> {
        self.check()?;
        let src = match pname {
            gl::VIEWPORT => self.state.viewport,
            gl::SCISSOR_BOX => self.state.scissor,
            _ => return Err(StateQueryError::QueryFailed { pname }),
        };
        if out.len() != src.len() {
            return Err(StateQueryError::UnexpectedValue { pname });
        }
        out.copy_from_slice(&src);
        Ok(())
    }

    fn get_float(&self, pname: GLenum) -> Result<f32, StateQueryError> {
        self.check()?;
        let s = &self.state;
        match pname {
            gl::LINE_WIDTH => Ok(s.line_width),
            gl::DEPTH_CLEAR_VALUE => Ok(s.clear_depth),
            gl::POLYGON_OFFSET_FACTOR => Ok(s.polygon_offset[0]),
            gl::POLYGON_OFFSET_UNITS => Ok(s.polygon_offset[1]),
            gl::SAMPLE_COVERAGE_VALUE => Ok(s.sample_coverage.value),
            _ => Err(StateQueryError::QueryFailed { pname }),
        }
    }

    fn get_float_v(&self, pname: GLenum, out: &mut [f32]) -> Result<(), StateQueryError> {
        self.check()?;
        let s = &self.state;
        let src: &[f32] = match pname {
            gl::BLEND_COLOR => &s.blend_color,
            gl::COLOR_CLEAR_VALUE => &s.clear_color,
            gl::DEPTH_RANGE => &s.depth_range,
            _ => return Err(StateQueryError::QueryFailed { pname }),
        };
        if out.len() != src.len() {
            return Err(StateQueryError::UnexpectedValue { pname });
        }
        out.copy_from_slice(src);
        Ok(())
    }

    fn get_boolean(&self, pname: GLenum) -> Result<bool, StateQueryError> {
        self.check()?;
        let s = &self.state;
        match pname {
            gl::DEPTH_WRITEMASK => Ok(s.depth_mask),
            gl::SAMPLE_COVERAGE_INVERT => Ok(s.sample_coverage.invert),
            gl::UNPACK_FLIP_Y_WEBGL => Ok(s.pixel_store.unpack_flip_y != 0),
            gl::UNPACK_PREMULTIPLY_ALPHA_WEBGL => Ok(s.pixel_store.unpack_premultiply_alpha != 0),
            _ => Err(StateQueryError::QueryFailed { pname }),
        }
    }

    fn get_boolean_v(&self, pname: GLenum, out: &mut [bool]) -> Result<(), StateQueryError> {
        self.check()?;
        if pname != gl::COLOR_WRITEMASK {
            return Err(StateQueryError::QueryFailed { pname });
        }
        if out.len() != 4 {
            return Err(StateQueryError::UnexpectedValue { pname });
        }
        out.copy_from_slice(&self.state.color_mask);
        Ok(())
    }

    fn get_program_binding(&self) -> Result<Option<ProgramId>, StateQueryError> {
        self.check()?;
        Ok(self.program)
    }

    fn get_buffer_binding(&self, target: BufferTarget) -> Result<Option<BufferId>, StateQueryError> {
        self.check()?;
        Ok(match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.element_buffer(),
            BufferTarget::Uniform => self.uniform_buffer,
        })
    }

    fn get_vertex_array_binding(&self) -> Result<Option<VertexArrayId>, StateQueryError> {
        self.check()?;
        Ok(self.vertex_array)
    }

    fn get_framebuffer_binding(
        &self,
        target: FramebufferTarget,
    ) -> Result<Option<FramebufferId>, StateQueryError> {
        self.check()?;
        Ok(match target {
            FramebufferTarget::Combined | FramebufferTarget::Draw => self.draw_framebuffer,
            FramebufferTarget::Read => self.read_framebuffer,
        })
    }

    fn get_texture_binding(
        &self,
        target: TextureTarget,
    ) -> Result<Option<TextureId>, StateQueryError> {
        self.check()?;
        Ok(self
            .textures
            .get(self.unit())
            .and_then(|slot| slot[target as usize]))
    }
}
