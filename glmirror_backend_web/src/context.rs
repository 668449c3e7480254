// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`GlContext`] and [`StateQuery`] over a `WebGl2RenderingContext`.

use alloc::vec::Vec;
use core::cell::RefCell;

use glmirror_core::binding::{BufferTarget, FramebufferTarget, TextureTarget};
use glmirror_core::gl::{self, GLenum};
use glmirror_core::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use glmirror_core::state::{Capability, Face, PixelStoreParam};
use glmirror_core::{GlContext, StateQuery, StateQueryError};
use js_sys::{Array, Float32Array, Int32Array};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlTexture,
    WebGlVertexArrayObject,
};

use crate::registry::Registry;

/// A WebGL 2 context addressed through glmirror handles.
///
/// Objects are created and deleted with [`gl`](Self::gl) as usual and
/// registered here to obtain a handle. Objects found bound during a state
/// query are registered on the fly, so a cache can be bootstrapped over a
/// context that other code already configured.
///
/// Binding a handle this context does not know binds null and logs a warning.
pub struct WebGlContext {
    gl: WebGl2RenderingContext,
    programs: RefCell<Registry<WebGlProgram>>,
    buffers: RefCell<Registry<WebGlBuffer>>,
    vertex_arrays: RefCell<Registry<WebGlVertexArrayObject>>,
    framebuffers: RefCell<Registry<WebGlFramebuffer>>,
    textures: RefCell<Registry<WebGlTexture>>,
}

impl core::fmt::Debug for WebGlContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebGlContext")
            .field("gl", &"WebGl2RenderingContext")
            .field("programs", &self.programs.borrow().len())
            .field("buffers", &self.buffers.borrow().len())
            .field("vertex_arrays", &self.vertex_arrays.borrow().len())
            .field("framebuffers", &self.framebuffers.borrow().len())
            .field("textures", &self.textures.borrow().len())
            .finish()
    }
}

macro_rules! object_kind {
    (
        $field:ident: $object:ty => $id:ident,
        $register:ident, $get:ident, $unregister:ident, $what:literal
    ) => {
        #[doc = concat!("Returns the handle for ", $what, ", registering it if needed.")]
        pub fn $register(&self, object: &$object) -> $id {
            $id(self.$field.borrow_mut().register(object))
        }

        #[doc = concat!("Returns the ", $what, " behind `id`.")]
        #[must_use]
        pub fn $get(&self, id: $id) -> Option<$object> {
            self.$field.borrow().get(id.0).cloned()
        }

        #[doc = concat!("Forgets the ", $what, " behind `id` and returns it.")]
        ///
        /// Call this after deleting the object. The handle is never reused.
        pub fn $unregister(&self, id: $id) -> Option<$object> {
            self.$field.borrow_mut().remove(id.0)
        }
    };
}

impl WebGlContext {
    /// Wraps `gl`. No calls are made.
    #[must_use]
    pub fn new(gl: WebGl2RenderingContext) -> Self {
        Self {
            gl,
            programs: RefCell::default(),
            buffers: RefCell::default(),
            vertex_arrays: RefCell::default(),
            framebuffers: RefCell::default(),
            textures: RefCell::default(),
        }
    }

    /// Returns the underlying context.
    #[must_use]
    pub fn gl(&self) -> &WebGl2RenderingContext {
        &self.gl
    }

    object_kind!(programs: WebGlProgram => ProgramId,
        register_program, program, unregister_program, "a program");
    object_kind!(buffers: WebGlBuffer => BufferId,
        register_buffer, buffer, unregister_buffer, "a buffer");
    object_kind!(vertex_arrays: WebGlVertexArrayObject => VertexArrayId,
        register_vertex_array, vertex_array, unregister_vertex_array, "a vertex array object");
    object_kind!(framebuffers: WebGlFramebuffer => FramebufferId,
        register_framebuffer, framebuffer, unregister_framebuffer, "a framebuffer");
    object_kind!(textures: WebGlTexture => TextureId,
        register_texture, texture, unregister_texture, "a texture");

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn parameter(&self, pname: GLenum) -> Result<JsValue, StateQueryError> {
        if self.gl.is_context_lost() {
            return Err(StateQueryError::ContextLost);
        }
        self.gl.get_parameter(pname).map_err(|err| {
            log::debug!("getParameter({pname:#06x}) threw: {err:?}");
            StateQueryError::QueryFailed { pname }
        })
    }

    fn number(&self, pname: GLenum) -> Result<f64, StateQueryError> {
        self.parameter(pname)?
            .as_f64()
            .ok_or(StateQueryError::UnexpectedValue { pname })
    }

    /// Registers whatever object is bound at `pname`.
    fn bound<T>(&self, registry: &RefCell<Registry<T>>, pname: GLenum) -> Result<Option<u32>, StateQueryError>
    where
        T: wasm_bindgen::JsCast + PartialEq + Clone,
    {
        let value = self.parameter(pname)?;
        if value.is_null() {
            return Ok(None);
        }
        let object = value
            .dyn_into::<T>()
            .map_err(|_| StateQueryError::UnexpectedValue { pname })?;
        Ok(Some(registry.borrow_mut().register(&object)))
    }
}

/// Looks up the object for a handle, warning when it is unknown.
fn resolve<T: PartialEq + Clone>(
    registry: &RefCell<Registry<T>>,
    id: Option<u32>,
    kind: &str,
) -> Option<T> {
    let id = id?;
    let object = registry.borrow().get(id).cloned();
    if object.is_none() {
        log::warn!("unknown {kind} handle {id}, binding null");
    }
    object
}

/// Copies a typed-array result into `out`, checking the length.
fn fill<T: Copy>(values: Vec<T>, out: &mut [T], pname: GLenum) -> Result<(), StateQueryError> {
    if values.len() != out.len() {
        return Err(StateQueryError::UnexpectedValue { pname });
    }
    out.copy_from_slice(&values);
    Ok(())
}

// ----------------------------------------------------------------------------
// GlContext
// ----------------------------------------------------------------------------

impl GlContext for WebGlContext {
    fn enable(&mut self, cap: Capability) {
        self.gl.enable(cap.to_gl());
    }

    fn disable(&mut self, cap: Capability) {
        self.gl.disable(cap.to_gl());
    }

    fn pixel_store_i(&mut self, param: PixelStoreParam, value: i32) {
        self.gl.pixel_storei(param.to_gl(), value);
    }

    fn active_texture(&mut self, texture: GLenum) {
        self.gl.active_texture(texture);
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }

    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.blend_color(r, g, b, a);
    }

    fn blend_equation(&mut self, mode: GLenum) {
        self.gl.blend_equation(mode);
    }

    fn blend_equation_separate(&mut self, rgb: GLenum, alpha: GLenum) {
        self.gl.blend_equation_separate(rgb, alpha);
    }

    fn blend_func(&mut self, src: GLenum, dst: GLenum) {
        self.gl.blend_func(src, dst);
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        self.gl
            .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    }

    fn cull_face(&mut self, mode: GLenum) {
        self.gl.cull_face(mode);
    }

    fn front_face(&mut self, mode: GLenum) {
        self.gl.front_face(mode);
    }

    fn depth_func(&mut self, func: GLenum) {
        self.gl.depth_func(func);
    }

    fn line_width(&mut self, width: f32) {
        self.gl.line_width(width);
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.gl.color_mask(r, g, b, a);
    }

    fn clear_depth(&mut self, depth: f32) {
        self.gl.clear_depth(depth);
    }

    fn depth_mask(&mut self, flag: bool) {
        self.gl.depth_mask(flag);
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.gl.depth_range(near, far);
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.gl.polygon_offset(factor, units);
    }

    fn sample_coverage(&mut self, value: f32, invert: bool) {
        self.gl.sample_coverage(value, invert);
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.scissor(x, y, width, height);
    }

    fn stencil_func(&mut self, func: GLenum, reference: i32, mask: u32) {
        self.gl.stencil_func(func, reference, mask);
    }

    fn stencil_func_separate(&mut self, face: Face, func: GLenum, reference: i32, mask: u32) {
        self.gl
            .stencil_func_separate(face.to_gl(), func, reference, mask);
    }

    fn stencil_op(&mut self, fail: GLenum, depth_fail: GLenum, depth_pass: GLenum) {
        self.gl.stencil_op(fail, depth_fail, depth_pass);
    }

    fn stencil_op_separate(
        &mut self,
        face: Face,
        fail: GLenum,
        depth_fail: GLenum,
        depth_pass: GLenum,
    ) {
        self.gl
            .stencil_op_separate(face.to_gl(), fail, depth_fail, depth_pass);
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.gl.stencil_mask(mask);
    }

    fn stencil_mask_separate(&mut self, face: Face, mask: u32) {
        self.gl.stencil_mask_separate(face.to_gl(), mask);
    }

    fn clear_stencil(&mut self, s: i32) {
        self.gl.clear_stencil(s);
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        let program = resolve(&self.programs, program.map(|id| id.0), "program");
        self.gl.use_program(program.as_ref());
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        let buffer = resolve(&self.buffers, buffer.map(|id| id.0), "buffer");
        self.gl.bind_buffer(target.to_gl(), buffer.as_ref());
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        let vao = resolve(&self.vertex_arrays, vao.map(|id| id.0), "vertex array");
        self.gl.bind_vertex_array(vao.as_ref());
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        let framebuffer = resolve(&self.framebuffers, framebuffer.map(|id| id.0), "framebuffer");
        self.gl.bind_framebuffer(target.to_gl(), framebuffer.as_ref());
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        let list: Array = buffers.iter().map(|&b| JsValue::from(b)).collect();
        self.gl.draw_buffers(&list);
    }

    fn read_buffer(&mut self, src: GLenum) {
        self.gl.read_buffer(src);
    }

    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureId>) {
        let texture = resolve(&self.textures, texture.map(|id| id.0), "texture");
        self.gl.bind_texture(target.to_gl(), texture.as_ref());
    }
}

// ----------------------------------------------------------------------------
// StateQuery
// ----------------------------------------------------------------------------

impl StateQuery for WebGlContext {
    fn is_enabled(&self, cap: Capability) -> Result<bool, StateQueryError> {
        if self.gl.is_context_lost() {
            return Err(StateQueryError::ContextLost);
        }
        Ok(self.gl.is_enabled(cap.to_gl()))
    }

    fn get_integer(&self, pname: GLenum) -> Result<i32, StateQueryError> {
        let value = self.number(pname)?;
        if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return Err(StateQueryError::UnexpectedValue { pname });
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "range and integrality checked above"
        )]
        let value = value as i32;
        Ok(value)
    }

    fn get_unsigned(&self, pname: GLenum) -> Result<u32, StateQueryError> {
        let value = self.number(pname)?;
        if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
            return Err(StateQueryError::UnexpectedValue { pname });
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "range and integrality checked above"
        )]
        let value = value as u32;
        Ok(value)
    }

    fn get_integer_v(&self, pname: GLenum, out: &mut [i32]) -> Result<(), StateQueryError> {
        let array = self
            .parameter(pname)?
            .dyn_into::<Int32Array>()
            .map_err(|_| StateQueryError::UnexpectedValue { pname })?;
        fill(array.to_vec(), out, pname)
    }

    fn get_float(&self, pname: GLenum) -> Result<f32, StateQueryError> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "WebGL float state is single precision"
        )]
        let value = self.number(pname)? as f32;
        Ok(value)
    }

    fn get_float_v(&self, pname: GLenum, out: &mut [f32]) -> Result<(), StateQueryError> {
        let array = self
            .parameter(pname)?
            .dyn_into::<Float32Array>()
            .map_err(|_| StateQueryError::UnexpectedValue { pname })?;
        fill(array.to_vec(), out, pname)
    }

    fn get_boolean(&self, pname: GLenum) -> Result<bool, StateQueryError> {
        self.parameter(pname)?
            .as_bool()
            .ok_or(StateQueryError::UnexpectedValue { pname })
    }

    fn get_boolean_v(&self, pname: GLenum, out: &mut [bool]) -> Result<(), StateQueryError> {
        let array = self
            .parameter(pname)?
            .dyn_into::<Array>()
            .map_err(|_| StateQueryError::UnexpectedValue { pname })?;
        let values = array
            .iter()
            .map(|item| item.as_bool())
            .collect::<Option<Vec<bool>>>()
            .ok_or(StateQueryError::UnexpectedValue { pname })?;
        fill(values, out, pname)
    }

    fn get_program_binding(&self) -> Result<Option<ProgramId>, StateQueryError> {
        Ok(self
            .bound(&self.programs, gl::CURRENT_PROGRAM)?
            .map(ProgramId))
    }

    fn get_buffer_binding(&self, target: BufferTarget) -> Result<Option<BufferId>, StateQueryError> {
        Ok(self
            .bound(&self.buffers, target.binding_pname())?
            .map(BufferId))
    }

    fn get_vertex_array_binding(&self) -> Result<Option<VertexArrayId>, StateQueryError> {
        Ok(self
            .bound(&self.vertex_arrays, gl::VERTEX_ARRAY_BINDING)?
            .map(VertexArrayId))
    }

    fn get_framebuffer_binding(
        &self,
        target: FramebufferTarget,
    ) -> Result<Option<FramebufferId>, StateQueryError> {
        let pname = match target {
            FramebufferTarget::Combined | FramebufferTarget::Draw => gl::DRAW_FRAMEBUFFER_BINDING,
            FramebufferTarget::Read => gl::READ_FRAMEBUFFER_BINDING,
        };
        Ok(self.bound(&self.framebuffers, pname)?.map(FramebufferId))
    }

    fn get_texture_binding(
        &self,
        target: TextureTarget,
    ) -> Result<Option<TextureId>, StateQueryError> {
        Ok(self
            .bound(&self.textures, target.binding_pname())?
            .map(TextureId))
    }
}
