// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse state deltas.
//!
//! A [`StatePatch`] names only the fields it wants to change. Applying it with
//! [`StateCache::apply_partial`] leaves every absent field as the context
//! currently has it, which makes patches suitable for layering a
//! configuration on top of whatever state a caller left behind.
//!
//! With the `serde` feature the plain-state part of a patch (everything but
//! [`bindings`](StatePatch::bindings)) serializes, so deltas can live in
//! configuration files:
//!
//! ```json
//! { "capabilities": { "blend": true }, "blend_func": [770, 771, 1, 771] }
//! ```

use alloc::collections::BTreeMap;

use crate::binding::{BufferTarget, FramebufferSlot, FramebufferTarget, TextureBinding};
use crate::cache::StateCache;
use crate::context::GlContext;
use crate::gl::{self, GLenum};
use crate::handle::{BufferId, ProgramId, VertexArrayId};
use crate::snapshot::Snapshot;
use crate::state::{Capability, Face, PixelStoreParam, SampleCoverage, StencilFace};
use crate::trace::CallSink;

/// Handle bindings to change.
///
/// `Some(None)` unbinds; `None` leaves the binding alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingPatch {
    /// `useProgram`.
    pub program: Option<Option<ProgramId>>,
    /// `bindVertexArray`.
    pub vertex_array: Option<Option<VertexArrayId>>,
    /// `ELEMENT_ARRAY_BUFFER`, bound after the vertex array.
    ///
    /// The element binding is part of the vertex array object, so this is
    /// only applied when [`vertex_array`](Self::vertex_array) is present too.
    pub element_array_buffer: Option<Option<BufferId>>,
    /// `ARRAY_BUFFER`.
    pub array_buffer: Option<Option<BufferId>>,
    /// `UNIFORM_BUFFER`.
    pub uniform_buffer: Option<Option<BufferId>>,
    /// Texture binding per unit index.
    pub textures: BTreeMap<u32, Option<TextureBinding>>,
    /// `FRAMEBUFFER`, with its attachment selection.
    pub combined_framebuffer: Option<FramebufferSlot>,
    /// `DRAW_FRAMEBUFFER`, applied after the combined slot.
    pub draw_framebuffer: Option<FramebufferSlot>,
    /// `READ_FRAMEBUFFER`, applied after the combined slot.
    pub read_framebuffer: Option<FramebufferSlot>,
}

/// A sparse set of state changes.
///
/// Every field is optional; capability and pixel-store maps hold only the
/// keys to change.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct StatePatch {
    /// Capabilities to enable (`true`) or disable (`false`).
    pub capabilities: BTreeMap<Capability, bool>,
    /// Pixel-store parameters to set.
    pub pixel_store: BTreeMap<PixelStoreParam, i32>,
    /// Active texture unit as `TEXTURE0 + unit`.
    pub active_texture: Option<GLenum>,
    /// `viewport(x, y, width, height)`.
    pub viewport: Option<[i32; 4]>,
    /// `blendColor(r, g, b, a)`.
    pub blend_color: Option<[f32; 4]>,
    /// Rgb, alpha.
    pub blend_equation: Option<[GLenum; 2]>,
    /// Src rgb, dst rgb, src alpha, dst alpha.
    pub blend_func: Option<[GLenum; 4]>,
    /// `cullFace(mode)`.
    pub cull_face: Option<GLenum>,
    /// `frontFace(mode)`.
    pub front_face: Option<GLenum>,
    /// `depthFunc(func)`.
    pub depth_func: Option<GLenum>,
    /// `lineWidth(width)`.
    pub line_width: Option<f32>,
    /// `clearColor(r, g, b, a)`.
    pub clear_color: Option<[f32; 4]>,
    /// `colorMask(r, g, b, a)`.
    pub color_mask: Option<[bool; 4]>,
    /// `clearDepth(depth)`.
    pub clear_depth: Option<f32>,
    /// `depthMask(flag)`.
    pub depth_mask: Option<bool>,
    /// Near, far.
    pub depth_range: Option<[f32; 2]>,
    /// Factor, units.
    pub polygon_offset: Option<[f32; 2]>,
    /// `sampleCoverage(value, invert)`.
    pub sample_coverage: Option<SampleCoverage>,
    /// `scissor(x, y, width, height)`.
    pub scissor: Option<[i32; 4]>,
    /// Front-face stencil state.
    pub stencil_front: Option<StencilFace>,
    /// Back-face stencil state.
    pub stencil_back: Option<StencilFace>,
    /// `clearStencil(s)`.
    pub clear_stencil: Option<i32>,
    /// Handle bindings. Never serialized: handles are only meaningful to the
    /// context that created them.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub bindings: BindingPatch,
}

macro_rules! diff_fields {
    ($patch:ident, $from:expr, $to:expr; $($field:ident),* $(,)?) => {
        $(
            if $from.$field != $to.$field {
                $patch.$field = Some($to.$field);
            }
        )*
    };
}

impl StatePatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the patch that turns `from` into `to`.
    ///
    /// Contains exactly the fields of `to` that differ from `from`, plus the
    /// vertex array whenever the element binding differs. Applying it
    /// to a cache whose mirror equals `from` leaves the mirror equal to `to`.
    /// Framebuffer slots are included as a group: if any slot differs, the
    /// combined slot and every side slot bound after it are present.
    #[must_use]
    pub fn diff(from: &Snapshot, to: &Snapshot) -> Self {
        let mut patch = Self::default();
        let (f, t) = (&from.state, &to.state);

        for ((cap, was), (_, now)) in f.capabilities.iter().zip(t.capabilities.iter()) {
            if was != now {
                patch.capabilities.insert(cap, now);
            }
        }
        for ((param, was), (_, now)) in f.pixel_store.iter().zip(t.pixel_store.iter()) {
            if was != now {
                patch.pixel_store.insert(param, now);
            }
        }
        diff_fields!(patch, f, t;
            active_texture, viewport, blend_color, blend_equation, blend_func,
            cull_face, front_face, depth_func, line_width, clear_color,
            color_mask, clear_depth, depth_mask, depth_range, polygon_offset,
            sample_coverage, scissor, stencil_front, stencil_back, clear_stencil,
        );

        let (fb, tb) = (&from.bindings, &to.bindings);
        let bindings = &mut patch.bindings;
        diff_fields!(bindings, fb, tb;
            program, vertex_array, element_array_buffer, array_buffer, uniform_buffer,
        );
        // The element binding only applies together with its vertex array.
        if bindings.element_array_buffer.is_some() {
            bindings.vertex_array = Some(tb.vertex_array);
        }
        for (unit, (was, now)) in (0_u32..).zip(fb.textures.iter().zip(&tb.textures)) {
            if was != now {
                bindings.textures.insert(unit, *now);
            }
        }
        let (ff, tf) = (&fb.framebuffers, &tb.framebuffers);
        if ff != tf {
            bindings.combined_framebuffer = Some(tf.combined.clone());
            bindings.draw_framebuffer = tf.draw_rebound().then(|| tf.draw.clone());
            bindings.read_framebuffer = tf.read_rebound().then(|| tf.read.clone());
        }
        patch
    }
}

impl<C: GlContext, S: CallSink> StateCache<C, S> {
    /// Applies only the fields present in `patch`.
    ///
    /// Order: program, vertex array, element array (only when the patch binds
    /// a vertex array), array and uniform buffers; then textures, bracketed by the patch's active texture (or the
    /// current one); then capabilities, pixel store and scalars; then
    /// framebuffers, combined before the sides.
    pub fn apply_partial(&mut self, patch: &StatePatch) {
        let b = &patch.bindings;
        if let Some(program) = b.program {
            self.use_program(program);
        }
        if let Some(vao) = b.vertex_array {
            self.bind_vertex_array(vao);
        }
        let element = b.vertex_array.and(b.element_array_buffer);
        for (target, buffer) in [
            (BufferTarget::ElementArray, element),
            (BufferTarget::Array, b.array_buffer),
            (BufferTarget::Uniform, b.uniform_buffer),
        ] {
            if let Some(buffer) = buffer {
                self.bind_buffer(target, buffer);
            }
        }

        if !b.textures.is_empty() {
            let exit = patch.active_texture.unwrap_or(self.live.state.active_texture);
            for (&unit, &want) in &b.textures {
                if unit >= self.limits.max_texture_units {
                    log::warn!(
                        "patch names texture unit {unit}, beyond the {} units of the context; skipped",
                        self.limits.max_texture_units
                    );
                    continue;
                }
                match want {
                    Some(t) => {
                        self.active_texture(gl::TEXTURE0 + unit);
                        self.bind_texture(t.target, Some(t.texture));
                    }
                    None => {
                        if let Some(bound) = self.live.bindings.texture(unit) {
                            self.active_texture(gl::TEXTURE0 + unit);
                            self.bind_texture(bound.target, None);
                        }
                    }
                }
            }
            self.active_texture(exit);
        }

        for (&cap, &on) in &patch.capabilities {
            if on {
                self.enable(cap);
            } else {
                self.disable(cap);
            }
        }
        for (&param, &value) in &patch.pixel_store {
            self.pixel_store_i(param, value);
        }
        self.apply_scalars(patch);

        let combined = b.combined_framebuffer.as_ref();
        if let Some(slot) = combined {
            self.restore_slot(FramebufferTarget::Combined, slot);
        }
        let bound_after = |slot: &FramebufferSlot| {
            combined.is_none_or(|c| c.framebuffer != slot.framebuffer)
        };
        if let Some(slot) = b.draw_framebuffer.as_ref().filter(|s| bound_after(s)) {
            self.restore_slot(FramebufferTarget::Draw, slot);
        }
        if let Some(slot) = b.read_framebuffer.as_ref().filter(|s| bound_after(s)) {
            self.restore_slot(FramebufferTarget::Read, slot);
        }
    }

    fn apply_scalars(&mut self, p: &StatePatch) {
        if let Some(unit) = p.active_texture {
            self.active_texture(unit);
        }
        if let Some([x, y, w, h]) = p.viewport {
            self.viewport(x, y, w, h);
        }
        if let Some([r, g, b, a]) = p.blend_color {
            self.blend_color(r, g, b, a);
        }
        if let Some(eq) = p.blend_equation {
            self.set_blend_equation(eq);
        }
        if let Some(func) = p.blend_func {
            self.set_blend_func(func);
        }
        if let Some(mode) = p.cull_face {
            self.cull_face(mode);
        }
        if let Some(mode) = p.front_face {
            self.front_face(mode);
        }
        if let Some(func) = p.depth_func {
            self.depth_func(func);
        }
        if let Some(width) = p.line_width {
            self.line_width(width);
        }
        if let Some([r, g, b, a]) = p.clear_color {
            self.clear_color(r, g, b, a);
        }
        if let Some([r, g, b, a]) = p.color_mask {
            self.color_mask(r, g, b, a);
        }
        if let Some(depth) = p.clear_depth {
            self.clear_depth(depth);
        }
        if let Some(flag) = p.depth_mask {
            self.depth_mask(flag);
        }
        if let Some([near, far]) = p.depth_range {
            self.depth_range(near, far);
        }
        if let Some([factor, units]) = p.polygon_offset {
            self.polygon_offset(factor, units);
        }
        if let Some(sc) = p.sample_coverage {
            self.sample_coverage(sc.value, sc.invert);
        }
        if let Some([x, y, w, h]) = p.scissor {
            self.scissor(x, y, w, h);
        }
        match (&p.stencil_front, &p.stencil_back) {
            (Some(front), Some(back)) => self.restore_stencil(front, back),
            (Some(front), None) => self.apply_stencil_face(Face::Front, front),
            (None, Some(back)) => self.apply_stencil_face(Face::Back, back),
            (None, None) => {}
        }
        if let Some(s) = p.clear_stencil {
            self.clear_stencil(s);
        }
    }

    fn apply_stencil_face(&mut self, face: Face, s: &StencilFace) {
        self.stencil_func_separate(face, s.func.func, s.func.reference, s.func.mask);
        self.stencil_op_separate(face, s.op.fail, s.op.depth_fail, s.op.depth_pass);
        self.stencil_mask_separate(face, s.write_mask);
    }
}
