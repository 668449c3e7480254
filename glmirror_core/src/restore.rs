// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Restore engine.
//!
//! Every restore path issues its calls through the intercept layer, so only
//! the fields that actually differ from the mirror reach the context.

use crate::binding::{
    BufferTarget, FramebufferBindings, FramebufferSlot, FramebufferTarget, TextureBinding,
};
use crate::cache::StateCache;
use crate::context::GlContext;
use crate::gl::{self, GLenum};
use crate::snapshot::Snapshot;
use crate::state::{Capability, Face, PixelStore, PixelStoreParam, StencilFace, TrackedState};
use crate::trace::CallSink;

impl<C: GlContext, S: CallSink> StateCache<C, S> {
    /// Brings the context to the state captured in `target`.
    ///
    /// Bindings come first, then plain state, then framebuffers, then
    /// textures. Restoring a snapshot of the current mirror forwards nothing.
    ///
    /// The element-array binding is not rebound. It is part of the vertex
    /// array object, so binding it here would overwrite the index buffer of
    /// whichever vertex array the snapshot restores.
    pub fn restore(&mut self, target: &Snapshot) {
        let b = &target.bindings;
        log::trace!("restore: buffer and program bindings");
        self.use_program(b.program);
        self.bind_vertex_array(b.vertex_array);
        self.bind_buffer(BufferTarget::Array, b.array_buffer);
        self.bind_buffer(BufferTarget::Uniform, b.uniform_buffer);

        log::trace!("restore: plain state");
        self.restore_state(&target.state);

        log::trace!("restore: framebuffers");
        self.restore_framebuffers(&b.framebuffers);

        log::trace!("restore: textures");
        self.restore_textures(&b.textures);
    }

    /// Returns the fixed-function state to the documented defaults.
    ///
    /// Disables every capability (dithering included), unbinds the vertex
    /// array and resets every scalar setter. Viewport and scissor depend on
    /// the drawing surface and are left alone, as are pixel store, active
    /// texture and the other bindings.
    ///
    /// The values are the GL-documented initial state, so stencil write and
    /// compare masks become all ones rather than `0xFF`, the stencil
    /// reference becomes 0, and the blend function becomes `ONE, ZERO`. This
    /// is the same state [`TrackedState::default`] describes.
    pub fn reset_to_defaults(&mut self) {
        log::trace!("reset to defaults");
        for cap in Capability::ALL {
            self.disable(cap);
        }
        self.bind_vertex_array(None);
        self.restore_scalars(&TrackedState::default());
    }

    /// Resets the pixel-unpacking parameters that image uploads depend on.
    ///
    /// Flip-Y, premultiplied alpha, colorspace conversion and both alignments
    /// return to their defaults. Row lengths and skips are untouched.
    pub fn default_pixel_store(&mut self) {
        let defaults = PixelStore::default();
        for param in [
            PixelStoreParam::UnpackFlipY,
            PixelStoreParam::UnpackPremultiplyAlpha,
            PixelStoreParam::UnpackColorspaceConversion,
            PixelStoreParam::UnpackAlignment,
            PixelStoreParam::PackAlignment,
        ] {
            self.pixel_store_i(param, defaults.get(param));
        }
    }

    // -- phases --------------------------------------------------------------

    fn restore_state(&mut self, s: &TrackedState) {
        for (cap, on) in s.capabilities.iter() {
            if on {
                self.enable(cap);
            } else {
                self.disable(cap);
            }
        }
        for (param, value) in s.pixel_store.iter() {
            self.pixel_store_i(param, value);
        }
        self.active_texture(s.active_texture);
        let [x, y, w, h] = s.viewport;
        self.viewport(x, y, w, h);
        let [x, y, w, h] = s.scissor;
        self.scissor(x, y, w, h);
        self.restore_scalars(s);
    }

    /// Everything in `s` that has a documented default.
    fn restore_scalars(&mut self, s: &TrackedState) {
        let [r, g, b, a] = s.blend_color;
        self.blend_color(r, g, b, a);
        self.set_blend_equation(s.blend_equation);
        self.set_blend_func(s.blend_func);
        self.cull_face(s.cull_face);
        self.front_face(s.front_face);
        self.depth_func(s.depth_func);
        self.line_width(s.line_width);
        let [r, g, b, a] = s.clear_color;
        self.clear_color(r, g, b, a);
        let [r, g, b, a] = s.color_mask;
        self.color_mask(r, g, b, a);
        self.clear_depth(s.clear_depth);
        self.depth_mask(s.depth_mask);
        self.depth_range(s.depth_range[0], s.depth_range[1]);
        self.polygon_offset(s.polygon_offset[0], s.polygon_offset[1]);
        self.sample_coverage(s.sample_coverage.value, s.sample_coverage.invert);
        self.restore_stencil(&s.stencil_front, &s.stencil_back);
        self.clear_stencil(s.clear_stencil);
    }

    pub(crate) fn set_blend_equation(&mut self, [rgb, alpha]: [GLenum; 2]) {
        if rgb == alpha {
            self.blend_equation(rgb);
        } else {
            self.blend_equation_separate(rgb, alpha);
        }
    }

    pub(crate) fn set_blend_func(&mut self, [sr, dr, sa, da]: [GLenum; 4]) {
        if sr == sa && dr == da {
            self.blend_func(sr, dr);
        } else {
            self.blend_func_separate(sr, dr, sa, da);
        }
    }

    /// Uses the combined setter for each group both faces agree on.
    pub(crate) fn restore_stencil(&mut self, front: &StencilFace, back: &StencilFace) {
        if front.func == back.func {
            let f = front.func;
            self.stencil_func(f.func, f.reference, f.mask);
        } else {
            for (face, f) in [(Face::Front, front.func), (Face::Back, back.func)] {
                self.stencil_func_separate(face, f.func, f.reference, f.mask);
            }
        }
        if front.op == back.op {
            let o = front.op;
            self.stencil_op(o.fail, o.depth_fail, o.depth_pass);
        } else {
            for (face, o) in [(Face::Front, front.op), (Face::Back, back.op)] {
                self.stencil_op_separate(face, o.fail, o.depth_fail, o.depth_pass);
            }
        }
        if front.write_mask == back.write_mask {
            self.stencil_mask(front.write_mask);
        } else {
            self.stencil_mask_separate(Face::Front, front.write_mask);
            self.stencil_mask_separate(Face::Back, back.write_mask);
        }
    }

    /// Rebinds the combined slot, then any side bound after it.
    ///
    /// A side slot that names a different framebuffer than the combined slot
    /// can only have been bound after the combined target, so replaying the
    /// combined bind first and the side binds second reproduces both sides.
    fn restore_framebuffers(&mut self, target: &FramebufferBindings) {
        if self.live.bindings.framebuffers == *target {
            return;
        }
        self.restore_slot(FramebufferTarget::Combined, &target.combined);
        if target.draw_rebound() {
            self.restore_slot(FramebufferTarget::Draw, &target.draw);
        }
        if target.read_rebound() {
            self.restore_slot(FramebufferTarget::Read, &target.read);
        }
    }

    /// Binds `slot` to `target` and replays the attachment selection for the
    /// sides that `target` covers.
    pub(crate) fn restore_slot(&mut self, target: FramebufferTarget, slot: &FramebufferSlot) {
        self.bind_framebuffer(target, slot.framebuffer);
        if target.draws() {
            self.draw_buffers(slot.attachments.active_draw_buffers());
        }
        if target.reads() {
            self.read_buffer(slot.attachments.read_buffer);
        }
    }

    /// Rebinds each unit that differs, then reselects the unit active on entry.
    fn restore_textures(&mut self, target: &[Option<TextureBinding>]) {
        let entry = self.live.state.active_texture;
        for (unit, &want) in (0_u32..).zip(target) {
            let Some(&have) = self.live.bindings.textures.get(unit as usize) else {
                break;
            };
            if have == want {
                continue;
            }
            self.active_texture(gl::TEXTURE0 + unit);
            match (want, have) {
                (Some(b), _) => self.bind_texture(b.target, Some(b.texture)),
                (None, Some(bound)) => self.bind_texture(bound.target, None),
                (None, None) => {}
            }
        }
        self.active_texture(entry);
    }
}
