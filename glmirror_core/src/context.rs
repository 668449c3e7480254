// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits implemented by context backends.
//!
//! [`GlContext`] has one method per tracked state-mutating entry point.
//! [`StateQuery`] is the bulk-read side, used once at bootstrap and again by
//! [`slow_refetch`](crate::StateCache::slow_refetch).
//!
//! Setters return nothing: errors the context signals for invalid arguments
//! stay in the context (e.g. its error flag) and are not interpreted here.

use crate::binding::{BufferTarget, FramebufferTarget, TextureTarget};
use crate::gl::GLenum;
use crate::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use crate::state::{Capability, Face, PixelStoreParam};

/// A stateful rasterization context.
///
/// [`StateCache`](crate::StateCache) implements this trait too, so it can be
/// dropped in wherever the raw context was used.
pub trait GlContext {
    /// `enable(cap)`.
    fn enable(&mut self, cap: Capability);
    /// `disable(cap)`.
    fn disable(&mut self, cap: Capability);
    /// `pixelStorei(param, value)`.
    fn pixel_store_i(&mut self, param: PixelStoreParam, value: i32);
    /// `activeTexture(texture)`; `texture` is `TEXTURE0 + unit`.
    fn active_texture(&mut self, texture: GLenum);
    /// `viewport(x, y, width, height)`.
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    /// `blendColor(r, g, b, a)`.
    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// `blendEquation(mode)`.
    fn blend_equation(&mut self, mode: GLenum);
    /// `blendEquationSeparate(rgb, alpha)`.
    fn blend_equation_separate(&mut self, rgb: GLenum, alpha: GLenum);
    /// `blendFunc(src, dst)`.
    fn blend_func(&mut self, src: GLenum, dst: GLenum);
    /// `blendFuncSeparate(src_rgb, dst_rgb, src_alpha, dst_alpha)`.
    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    );
    /// `cullFace(mode)`.
    fn cull_face(&mut self, mode: GLenum);
    /// `frontFace(mode)`.
    fn front_face(&mut self, mode: GLenum);
    /// `depthFunc(func)`.
    fn depth_func(&mut self, func: GLenum);
    /// `lineWidth(width)`.
    fn line_width(&mut self, width: f32);
    /// `clearColor(r, g, b, a)`.
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// `colorMask(r, g, b, a)`.
    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool);
    /// `clearDepth(depth)`.
    fn clear_depth(&mut self, depth: f32);
    /// `depthMask(flag)`.
    fn depth_mask(&mut self, flag: bool);
    /// `depthRange(near, far)`.
    fn depth_range(&mut self, near: f32, far: f32);
    /// `polygonOffset(factor, units)`.
    fn polygon_offset(&mut self, factor: f32, units: f32);
    /// `sampleCoverage(value, invert)`.
    fn sample_coverage(&mut self, value: f32, invert: bool);
    /// `scissor(x, y, width, height)`.
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    /// `stencilFunc(func, ref, mask)` for both faces.
    fn stencil_func(&mut self, func: GLenum, reference: i32, mask: u32);
    /// `stencilFuncSeparate(face, func, ref, mask)`.
    fn stencil_func_separate(&mut self, face: Face, func: GLenum, reference: i32, mask: u32);
    /// `stencilOp(fail, zfail, zpass)` for both faces.
    fn stencil_op(&mut self, fail: GLenum, depth_fail: GLenum, depth_pass: GLenum);
    /// `stencilOpSeparate(face, fail, zfail, zpass)`.
    fn stencil_op_separate(
        &mut self,
        face: Face,
        fail: GLenum,
        depth_fail: GLenum,
        depth_pass: GLenum,
    );
    /// `stencilMask(mask)` for both faces.
    fn stencil_mask(&mut self, mask: u32);
    /// `stencilMaskSeparate(face, mask)`.
    fn stencil_mask_separate(&mut self, face: Face, mask: u32);
    /// `clearStencil(s)`.
    fn clear_stencil(&mut self, s: i32);
    /// `useProgram(program)`.
    fn use_program(&mut self, program: Option<ProgramId>);
    /// `bindBuffer(target, buffer)`.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    /// `bindVertexArray(vao)`.
    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    /// `bindFramebuffer(target, framebuffer)`.
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>);
    /// `drawBuffers(buffers)` on the bound draw framebuffer.
    fn draw_buffers(&mut self, buffers: &[GLenum]);
    /// `readBuffer(src)` on the bound read framebuffer.
    fn read_buffer(&mut self, src: GLenum);
    /// `bindTexture(target, texture)` on the active unit.
    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureId>);
}

/// Failure of a state query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateQueryError {
    /// The context did not answer the query.
    #[error("query of parameter {pname:#06x} failed")]
    QueryFailed {
        /// Queried parameter.
        pname: GLenum,
    },
    /// The context answered with a value of the wrong type or length.
    #[error("parameter {pname:#06x} returned a value of unexpected type or length")]
    UnexpectedValue {
        /// Queried parameter.
        pname: GLenum,
    },
    /// The context is lost; nothing can be queried.
    #[error("the context is lost")]
    ContextLost,
}

/// Bulk-read access to a context's current state.
///
/// Vector queries fill `out` completely or fail with
/// [`StateQueryError::UnexpectedValue`].
pub trait StateQuery {
    /// `isEnabled(cap)`.
    fn is_enabled(&self, cap: Capability) -> Result<bool, StateQueryError>;
    /// An integer parameter.
    fn get_integer(&self, pname: GLenum) -> Result<i32, StateQueryError>;
    /// An unsigned parameter such as a stencil mask.
    fn get_unsigned(&self, pname: GLenum) -> Result<u32, StateQueryError>;
    /// An integer vector parameter.
    fn get_integer_v(&self, pname: GLenum, out: &mut [i32]) -> Result<(), StateQueryError>;
    /// A float parameter.
    fn get_float(&self, pname: GLenum) -> Result<f32, StateQueryError>;
    /// A float vector parameter.
    fn get_float_v(&self, pname: GLenum, out: &mut [f32]) -> Result<(), StateQueryError>;
    /// A boolean parameter.
    fn get_boolean(&self, pname: GLenum) -> Result<bool, StateQueryError>;
    /// A boolean vector parameter.
    fn get_boolean_v(&self, pname: GLenum, out: &mut [bool]) -> Result<(), StateQueryError>;
    /// `CURRENT_PROGRAM`.
    fn get_program_binding(&self) -> Result<Option<ProgramId>, StateQueryError>;
    /// Buffer bound to `target`.
    fn get_buffer_binding(&self, target: BufferTarget) -> Result<Option<BufferId>, StateQueryError>;
    /// `VERTEX_ARRAY_BINDING`.
    fn get_vertex_array_binding(&self) -> Result<Option<VertexArrayId>, StateQueryError>;
    /// Framebuffer bound to `target`. `Combined` reports the draw binding.
    fn get_framebuffer_binding(
        &self,
        target: FramebufferTarget,
    ) -> Result<Option<FramebufferId>, StateQueryError>;
    /// Texture bound to `target` on the active unit.
    fn get_texture_binding(
        &self,
        target: TextureTarget,
    ) -> Result<Option<TextureId>, StateQueryError>;
}
