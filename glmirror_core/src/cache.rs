// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The intercept layer.
//!
//! [`StateCache`] owns a context and a mirror of its state. It implements
//! [`GlContext`] itself: each entry point compares the request with the mirror,
//! drops it when nothing would change, and otherwise updates the mirror and
//! forwards the call.
//!
//! Most entry points go through one generic dispatcher that takes a field
//! accessor, the new value and the call to forward. The exceptions are spelled
//! out explicitly:
//!
//! - **Combined setters** (`blend_func`, `blend_equation`, `stencil_*`) compare
//!   every field they write and forward the combined call on any difference.
//! - **Face-separate stencil setters** touch only the selected faces and
//!   forward if any selected face changed.
//! - **Vertex arrays** own the element-array binding. The cache remembers the
//!   element buffer of every vertex array it has seen bound, and rebinding one
//!   recalls it. Switching to a vertex array it has not seen makes the
//!   mirrored element-array binding unknown until the next element-array
//!   bind, which is always forwarded.
//! - **Framebuffers** track three slots (see [`binding`](crate::binding)) and
//!   remember the attachment configuration per framebuffer object.
//! - **Textures** are tracked per unit for the first
//!   [`max_texture_units`](Limits::max_texture_units) units; binds on other
//!   units are forwarded untracked.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;

use crate::binding::{
    AttachmentConfig, BindingState, BufferTarget, FramebufferTarget, Limits, TextureBinding,
    TextureTarget,
};
use crate::context::{GlContext, StateQuery, StateQueryError};
use crate::fetch;
use crate::gl::{self, GLenum};
use crate::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use crate::snapshot::Snapshot;
use crate::state::{
    Capability, Face, PixelStoreParam, SampleCoverage, StencilFace, StencilFunc, StencilOp,
    TrackedState,
};
use crate::trace::{CallSink, GlCall, NoopSink};

/// Element-array binding per vertex array (`None` is the default one).
type ElementBuffers = BTreeMap<Option<VertexArrayId>, Option<BufferId>>;

fn element_buffers_of(snapshot: &Snapshot) -> ElementBuffers {
    let b = &snapshot.bindings;
    BTreeMap::from([(b.vertex_array, b.element_array_buffer)])
}

/// A context wrapped with a redundant-call filter and snapshot support.
///
/// One `StateCache` per native context. All state changes must go through it:
/// calls made on the native context by other means (another wrapper, a
/// library holding its own handle, [`context_mut`](Self::context_mut)) are
/// invisible to the mirror. Use [`slow_refetch`](Self::slow_refetch) to
/// resynchronize after such a change.
///
/// Save and restore must happen within one uninterrupted turn: if control
/// yields in between and something else drives the same native context, the
/// restore is computed against a stale mirror.
pub struct StateCache<C, S = NoopSink> {
    ctx: C,
    sink: S,
    pub(crate) limits: Limits,
    pub(crate) live: Snapshot,
    /// Attachment configuration per framebuffer object (`None` is the
    /// default framebuffer).
    attachments: BTreeMap<Option<FramebufferId>, AttachmentConfig>,
    element_buffers: ElementBuffers,
    /// Set when a vertex array bind made the element-array binding unknown.
    element_array_stale: bool,
    saved: Snapshot,
}

impl<C, S> core::fmt::Debug for StateCache<C, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateCache")
            .field("limits", &self.limits)
            .field("live", &self.live)
            .field("tracked_framebuffers", &self.attachments.len())
            .field("tracked_vertex_arrays", &self.element_buffers.len())
            .field("element_array_stale", &self.element_array_stale)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<C: GlContext + StateQuery> StateCache<C> {
    /// Wraps `ctx`, reading its current state.
    ///
    /// # Errors
    ///
    /// Returns the first failed state query.
    pub fn new(ctx: C) -> Result<Self, StateQueryError> {
        Self::with_sink(ctx, NoopSink)
    }
}

impl<C: GlContext + StateQuery, S: CallSink> StateCache<C, S> {
    /// Wraps `ctx`, reading its current state, and reports calls to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first failed state query.
    pub fn with_sink(mut ctx: C, sink: S) -> Result<Self, StateQueryError> {
        let fetched = fetch::fetch(&mut ctx)?;
        Ok(Self {
            ctx,
            sink,
            limits: fetched.limits,
            element_buffers: element_buffers_of(&fetched.snapshot),
            saved: fetched.snapshot.clone(),
            live: fetched.snapshot,
            attachments: fetched.attachments,
            element_array_stale: false,
        })
    }

    /// Replaces the mirror with a fresh read of the context.
    ///
    /// This bypasses the mirror entirely and is slow; use it to recover from
    /// suspected desynchronization. The saved slot is left alone. On error the
    /// mirror is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first failed state query.
    pub fn slow_refetch(&mut self) -> Result<(), StateQueryError> {
        let fetched = fetch::fetch(&mut self.ctx)?;
        if fetched.snapshot != self.live {
            log::debug!("slow refetch found the mirror out of sync");
        }
        self.limits = fetched.limits;
        self.element_buffers = element_buffers_of(&fetched.snapshot);
        self.live = fetched.snapshot;
        self.attachments = fetched.attachments;
        self.element_array_stale = false;
        Ok(())
    }
}

impl<C: GlContext, S: CallSink> StateCache<C, S> {
    /// Wraps `ctx` whose state is already known to be `snapshot`.
    ///
    /// Nothing is queried. If `snapshot` does not describe the context, the
    /// mirror starts out desynchronized.
    #[must_use]
    pub fn from_snapshot(ctx: C, sink: S, limits: Limits, snapshot: Snapshot) -> Self {
        let mut attachments = BTreeMap::new();
        let fbs = &snapshot.bindings.framebuffers;
        for slot in [&fbs.combined, &fbs.draw, &fbs.read] {
            attachments
                .entry(slot.framebuffer)
                .or_insert_with(|| slot.attachments.clone());
        }
        Self {
            ctx,
            sink,
            limits,
            element_buffers: element_buffers_of(&snapshot),
            saved: snapshot.clone(),
            live: snapshot,
            attachments,
            element_array_stale: false,
        }
    }

    // -- accessors -----------------------------------------------------------

    /// Returns the mirrored plain state.
    #[must_use]
    pub fn state(&self) -> &TrackedState {
        &self.live.state
    }

    /// Returns the mirrored bindings.
    #[must_use]
    pub fn bindings(&self) -> &BindingState {
        &self.live.bindings
    }

    /// Returns `true` if `cap` is enabled according to the mirror.
    #[must_use]
    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.live.state.is_enabled(cap)
    }

    /// Returns the limits read at bootstrap.
    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Returns the contents of the default save slot.
    #[must_use]
    pub fn saved(&self) -> &Snapshot {
        &self.saved
    }

    /// Returns the wrapped context.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Returns the wrapped context mutably.
    ///
    /// State changes made through this reference bypass the mirror.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Returns the call sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the call sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unwraps the context and the sink.
    pub fn into_inner(self) -> (C, S) {
        (self.ctx, self.sink)
    }

    // -- snapshots -----------------------------------------------------------

    /// Returns a new snapshot of the mirror.
    #[must_use]
    pub fn create_state(&self) -> Snapshot {
        self.live.clone()
    }

    /// Copies the mirror into `target`, reusing its allocations.
    pub fn save_into(&self, target: &mut Snapshot) {
        target.copy_from(&self.live);
    }

    /// Copies the mirror into the default save slot.
    pub fn save(&mut self) {
        self.saved.copy_from(&self.live);
    }

    /// Restores the default save slot.
    pub fn restore_saved(&mut self) {
        let saved = core::mem::take(&mut self.saved);
        self.restore(&saved);
        self.saved = saved;
    }

    /// Drops the remembered attachment configuration of a deleted framebuffer.
    ///
    /// Call this when the framebuffer object is deleted so a new object that
    /// reuses the handle starts from the initial configuration.
    pub fn forget_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.attachments.remove(&Some(framebuffer));
    }

    /// Drops the remembered element-array binding of a deleted vertex array.
    ///
    /// The next time a vertex array with this handle is bound, its element
    /// binding is treated as unknown.
    pub fn forget_vertex_array(&mut self, vao: VertexArrayId) {
        self.element_buffers.remove(&Some(vao));
    }

    // -- dispatch ------------------------------------------------------------

    pub(crate) fn forward(&mut self, call: &GlCall<'_>) {
        call.apply(&mut self.ctx);
        self.sink.on_applied(call);
    }

    fn dispatch<T, F>(&mut self, field: F, value: T, call: GlCall<'_>)
    where
        T: PartialEq,
        F: FnOnce(&mut Snapshot) -> &mut T,
    {
        let slot = field(&mut self.live);
        if *slot == value {
            self.sink.on_suppressed(&call);
            return;
        }
        *slot = value;
        self.forward(&call);
    }

    fn dispatch_faces<T, F>(&mut self, face: Face, field: F, value: T, call: GlCall<'_>)
    where
        T: PartialEq + Copy,
        F: Fn(&mut StencilFace) -> &mut T,
    {
        let mut changed = false;
        let state = &mut self.live.state;
        for (selected, stencil) in [
            (face.front(), &mut state.stencil_front),
            (face.back(), &mut state.stencil_back),
        ] {
            let slot = field(stencil);
            if selected && *slot != value {
                *slot = value;
                changed = true;
            }
        }
        if changed {
            self.forward(&call);
        } else {
            self.sink.on_suppressed(&call);
        }
    }

    /// Points the framebuffer slots affected by `target` at `framebuffer`.
    fn write_framebuffer_slots(
        &mut self,
        target: FramebufferTarget,
        framebuffer: Option<FramebufferId>,
    ) {
        let limits = self.limits;
        let config = self
            .attachments
            .entry(framebuffer)
            .or_insert_with(|| AttachmentConfig::initial(framebuffer, limits));
        let fbs = &mut self.live.bindings.framebuffers;
        let slots = match target {
            FramebufferTarget::Combined => [
                Some(&mut fbs.combined),
                Some(&mut fbs.draw),
                Some(&mut fbs.read),
            ],
            FramebufferTarget::Draw => [None, Some(&mut fbs.draw), None],
            FramebufferTarget::Read => [None, None, Some(&mut fbs.read)],
        };
        for slot in slots.into_iter().flatten() {
            slot.framebuffer = framebuffer;
            slot.attachments.copy_from(config);
        }
    }

    /// Binds `framebuffer` even if the mirror says it is already bound.
    fn force_bind_framebuffer(
        &mut self,
        target: FramebufferTarget,
        framebuffer: Option<FramebufferId>,
    ) {
        self.write_framebuffer_slots(target, framebuffer);
        self.forward(&GlCall::BindFramebuffer(target, framebuffer));
    }

    /// Updates the remembered configuration of `framebuffer` and every slot
    /// that names it. Returns `false` if nothing changed.
    fn update_attachments(
        &mut self,
        framebuffer: Option<FramebufferId>,
        update: impl FnOnce(&mut AttachmentConfig, usize) -> bool,
    ) -> bool {
        let limits = self.limits;
        let config = self
            .attachments
            .entry(framebuffer)
            .or_insert_with(|| AttachmentConfig::initial(framebuffer, limits));
        if !update(config, limits.max_draw_buffers as usize) {
            return false;
        }
        let fbs = &mut self.live.bindings.framebuffers;
        for slot in [&mut fbs.combined, &mut fbs.draw, &mut fbs.read] {
            if slot.framebuffer == framebuffer {
                slot.attachments.copy_from(config);
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Intercept layer
// ---------------------------------------------------------------------------

impl<C: GlContext, S: CallSink> GlContext for StateCache<C, S> {
    fn enable(&mut self, cap: Capability) {
        self.dispatch(|s| s.state.capabilities.get_mut(cap), true, GlCall::Enable(cap));
    }

    fn disable(&mut self, cap: Capability) {
        self.dispatch(|s| s.state.capabilities.get_mut(cap), false, GlCall::Disable(cap));
    }

    fn pixel_store_i(&mut self, param: PixelStoreParam, value: i32) {
        self.dispatch(
            |s| s.state.pixel_store.get_mut(param),
            value,
            GlCall::PixelStore(param, value),
        );
    }

    fn active_texture(&mut self, texture: GLenum) {
        debug_assert!(
            texture >= gl::TEXTURE0,
            "active_texture: {texture:#x} is below TEXTURE0"
        );
        self.dispatch(
            |s| &mut s.state.active_texture,
            texture,
            GlCall::ActiveTexture(texture),
        );
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let v = [x, y, width, height];
        self.dispatch(|s| &mut s.state.viewport, v, GlCall::Viewport(v));
    }

    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let c = [r, g, b, a];
        self.dispatch(|s| &mut s.state.blend_color, c, GlCall::BlendColor(c));
    }

    fn blend_equation(&mut self, mode: GLenum) {
        self.dispatch(
            |s| &mut s.state.blend_equation,
            [mode, mode],
            GlCall::BlendEquation(mode),
        );
    }

    fn blend_equation_separate(&mut self, rgb: GLenum, alpha: GLenum) {
        self.dispatch(
            |s| &mut s.state.blend_equation,
            [rgb, alpha],
            GlCall::BlendEquationSeparate(rgb, alpha),
        );
    }

    fn blend_func(&mut self, src: GLenum, dst: GLenum) {
        self.dispatch(
            |s| &mut s.state.blend_func,
            [src, dst, src, dst],
            GlCall::BlendFunc(src, dst),
        );
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        let f = [src_rgb, dst_rgb, src_alpha, dst_alpha];
        self.dispatch(|s| &mut s.state.blend_func, f, GlCall::BlendFuncSeparate(f));
    }

    fn cull_face(&mut self, mode: GLenum) {
        self.dispatch(|s| &mut s.state.cull_face, mode, GlCall::CullFace(mode));
    }

    fn front_face(&mut self, mode: GLenum) {
        self.dispatch(|s| &mut s.state.front_face, mode, GlCall::FrontFace(mode));
    }

    fn depth_func(&mut self, func: GLenum) {
        self.dispatch(|s| &mut s.state.depth_func, func, GlCall::DepthFunc(func));
    }

    fn line_width(&mut self, width: f32) {
        debug_assert!(width > 0.0, "line_width: {width} is not positive");
        self.dispatch(|s| &mut s.state.line_width, width, GlCall::LineWidth(width));
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let c = [r, g, b, a];
        self.dispatch(|s| &mut s.state.clear_color, c, GlCall::ClearColor(c));
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        let m = [r, g, b, a];
        self.dispatch(|s| &mut s.state.color_mask, m, GlCall::ColorMask(m));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.dispatch(|s| &mut s.state.clear_depth, depth, GlCall::ClearDepth(depth));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.dispatch(|s| &mut s.state.depth_mask, flag, GlCall::DepthMask(flag));
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.dispatch(
            |s| &mut s.state.depth_range,
            [near, far],
            GlCall::DepthRange(near, far),
        );
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.dispatch(
            |s| &mut s.state.polygon_offset,
            [factor, units],
            GlCall::PolygonOffset(factor, units),
        );
    }

    fn sample_coverage(&mut self, value: f32, invert: bool) {
        self.dispatch(
            |s| &mut s.state.sample_coverage,
            SampleCoverage { value, invert },
            GlCall::SampleCoverage(value, invert),
        );
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let v = [x, y, width, height];
        self.dispatch(|s| &mut s.state.scissor, v, GlCall::Scissor(v));
    }

    fn stencil_func(&mut self, func: GLenum, reference: i32, mask: u32) {
        let f = StencilFunc {
            func,
            reference,
            mask,
        };
        self.dispatch_faces(Face::FrontAndBack, |s| &mut s.func, f, GlCall::StencilFunc(f));
    }

    fn stencil_func_separate(&mut self, face: Face, func: GLenum, reference: i32, mask: u32) {
        let f = StencilFunc {
            func,
            reference,
            mask,
        };
        self.dispatch_faces(face, |s| &mut s.func, f, GlCall::StencilFuncSeparate(face, f));
    }

    fn stencil_op(&mut self, fail: GLenum, depth_fail: GLenum, depth_pass: GLenum) {
        let o = StencilOp {
            fail,
            depth_fail,
            depth_pass,
        };
        self.dispatch_faces(Face::FrontAndBack, |s| &mut s.op, o, GlCall::StencilOp(o));
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
        self.dispatch_faces(face, |s| &mut s.op, o, GlCall::StencilOpSeparate(face, o));
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.dispatch_faces(
            Face::FrontAndBack,
            |s| &mut s.write_mask,
            mask,
            GlCall::StencilMask(mask),
        );
    }

    fn stencil_mask_separate(&mut self, face: Face, mask: u32) {
        self.dispatch_faces(
            face,
            |s| &mut s.write_mask,
            mask,
            GlCall::StencilMaskSeparate(face, mask),
        );
    }

    fn clear_stencil(&mut self, s: i32) {
        self.dispatch(|snap| &mut snap.state.clear_stencil, s, GlCall::ClearStencil(s));
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.dispatch(
            |s| &mut s.bindings.program,
            program,
            GlCall::UseProgram(program),
        );
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        if target == BufferTarget::ElementArray {
            self.element_buffers
                .insert(self.live.bindings.vertex_array, buffer);
            if self.element_array_stale {
                self.element_array_stale = false;
                self.live.bindings.element_array_buffer = buffer;
                self.forward(&GlCall::BindBuffer(target, buffer));
                return;
            }
        }
        self.dispatch(
            |s| s.bindings.buffer_mut(target),
            buffer,
            GlCall::BindBuffer(target, buffer),
        );
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        if self.live.bindings.vertex_array != vao {
            match self.element_buffers.get(&vao) {
                Some(&element) => {
                    self.live.bindings.element_array_buffer = element;
                    self.element_array_stale = false;
                }
                None => self.element_array_stale = true,
            }
        }
        self.dispatch(
            |s| &mut s.bindings.vertex_array,
            vao,
            GlCall::BindVertexArray(vao),
        );
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        let fbs = &self.live.bindings.framebuffers;
        let unchanged = match target {
            FramebufferTarget::Combined => fbs.handles().iter().all(|&h| h == framebuffer),
            FramebufferTarget::Draw => fbs.draw.framebuffer == framebuffer,
            FramebufferTarget::Read => fbs.read.framebuffer == framebuffer,
        };
        if unchanged {
            self.sink
                .on_suppressed(&GlCall::BindFramebuffer(target, framebuffer));
            return;
        }
        self.force_bind_framebuffer(target, framebuffer);
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        debug_assert!(
            buffers.len() <= self.limits.max_draw_buffers as usize,
            "draw_buffers: {} buffers exceed MAX_DRAW_BUFFERS ({})",
            buffers.len(),
            self.limits.max_draw_buffers
        );
        let framebuffer = self.live.bindings.framebuffers.draw.framebuffer;
        let changed = self.update_attachments(framebuffer, |config, len| {
            if config.draw_buffers_match(buffers) {
                return false;
            }
            config.set_draw_buffers(buffers, len);
            true
        });
        let call = GlCall::DrawBuffers(Cow::Borrowed(buffers));
        if changed {
            self.forward(&call);
        } else {
            self.sink.on_suppressed(&call);
        }
    }

    fn read_buffer(&mut self, src: GLenum) {
        let framebuffer = self.live.bindings.framebuffers.read.framebuffer;
        let changed = self.update_attachments(framebuffer, |config, _| {
            if config.read_buffer == src {
                return false;
            }
            config.read_buffer = src;
            true
        });
        let call = GlCall::ReadBuffer(src);
        if changed {
            self.forward(&call);
        } else {
            self.sink.on_suppressed(&call);
        }
    }

    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureId>) {
        let call = GlCall::BindTexture(target, texture);
        let unit = self.live.state.active_unit();
        let Some(slot) = self.live.bindings.textures.get_mut(unit as usize) else {
            log::warn!(
                "texture unit {unit} is beyond the {} tracked units; binding is not mirrored",
                self.limits.max_texture_units
            );
            self.forward(&call);
            return;
        };
        let next = match (texture, *slot) {
            (Some(texture), _) => Some(TextureBinding { target, texture }),
            (None, Some(bound)) if bound.target == target => None,
            // Unbinding a target the mirror does not track as bound on this
            // unit; the tracked binding stays.
            (None, Some(_)) => {
                self.forward(&call);
                return;
            }
            (None, None) => None,
        };
        if *slot == next {
            self.sink.on_suppressed(&call);
            return;
        }
        *slot = next;
        self.forward(&call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockContext;
    use alloc::vec::Vec;

    fn cache() -> StateCache<MockContext> {
        StateCache::new(MockContext::new()).unwrap()
    }

    fn calls(cache: &mut StateCache<MockContext>) -> Vec<GlCall<'static>> {
        core::mem::take(&mut cache.context_mut().calls)
    }

    #[derive(Debug, Default)]
    struct Counts {
        applied: usize,
        suppressed: usize,
    }

    impl CallSink for Counts {
        fn on_applied(&mut self, _call: &GlCall<'_>) {
            self.applied += 1;
        }

        fn on_suppressed(&mut self, _call: &GlCall<'_>) {
            self.suppressed += 1;
        }
    }

    #[test]
    fn bootstrap_mirrors_context() {
        let mut ctx = MockContext::new();
        ctx.state.viewport = [0, 0, 800, 600];
        ctx.state.capabilities.depth_test = true;
        let mut c = StateCache::new(ctx).unwrap();
        assert_eq!(c.state().viewport, [0, 0, 800, 600]);
        assert!(c.is_enabled(Capability::DepthTest));
        calls(&mut c);
        c.viewport(0, 0, 800, 600);
        assert!(c.context().calls.is_empty());
    }

    #[test]
    fn identical_setter_forwards_once() {
        let mut c = StateCache::with_sink(MockContext::new(), Counts::default()).unwrap();
        c.context_mut().calls.clear();
        c.viewport(1, 2, 3, 4);
        c.viewport(1, 2, 3, 4);
        c.enable(Capability::Blend);
        c.enable(Capability::Blend);
        assert_eq!(c.context().calls.len(), 2);
        assert_eq!(c.sink().applied, 2);
        assert_eq!(c.sink().suppressed, 2);
    }

    #[test]
    fn mirror_tracks_last_value() {
        let mut c = cache();
        c.depth_func(gl::EQUAL);
        c.depth_func(gl::ALWAYS);
        c.clear_color(0.1, 0.2, 0.3, 1.0);
        c.pixel_store_i(PixelStoreParam::UnpackAlignment, 1);
        assert_eq!(c.state().depth_func, gl::ALWAYS);
        assert_eq!(c.state().clear_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(c.state().pixel_store.unpack_alignment, 1);
        assert_eq!(c.context().state, *c.state());
    }

    #[test]
    fn combined_blend_func_compares_all_factors() {
        let mut c = cache();
        c.blend_func_separate(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA, gl::ONE, gl::ZERO);
        calls(&mut c);

        // rgb factors match, alpha factors do not: the full call goes through.
        c.blend_func(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        assert_eq!(
            calls(&mut c),
            [GlCall::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA)]
        );
        assert_eq!(
            c.state().blend_func,
            [gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA, gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA]
        );

        c.blend_func_separate(
            gl::SRC_ALPHA,
            gl::ONE_MINUS_SRC_ALPHA,
            gl::SRC_ALPHA,
            gl::ONE_MINUS_SRC_ALPHA,
        );
        assert!(calls(&mut c).is_empty());
    }

    #[test]
    fn blend_equation_sets_both_channels() {
        let mut c = cache();
        calls(&mut c);
        c.blend_equation(gl::FUNC_ADD);
        assert!(calls(&mut c).is_empty());
        c.blend_equation_separate(gl::FUNC_ADD, 0x800B);
        c.blend_equation(gl::FUNC_ADD);
        assert_eq!(calls(&mut c).len(), 2);
    }

    #[test]
    fn separate_stencil_updates_selected_face_only() {
        let mut c = cache();
        calls(&mut c);
        c.stencil_func_separate(Face::Back, gl::EQUAL, 1, 0xFF);
        assert_eq!(c.state().stencil_front.func.func, gl::ALWAYS);
        assert_eq!(c.state().stencil_back.func.func, gl::EQUAL);

        c.stencil_func_separate(Face::Back, gl::EQUAL, 1, 0xFF);
        assert_eq!(calls(&mut c).len(), 1);

        // Front differs, back already matches: still one forwarded call.
        c.stencil_func(gl::EQUAL, 1, 0xFF);
        assert_eq!(calls(&mut c), [GlCall::StencilFunc(c.state().stencil_front.func)]);
        c.stencil_func_separate(Face::FrontAndBack, gl::EQUAL, 1, 0xFF);
        assert!(calls(&mut c).is_empty());
    }

    #[test]
    fn stencil_mask_faces() {
        let mut c = cache();
        calls(&mut c);
        c.stencil_mask_separate(Face::Front, 0x0F);
        c.stencil_mask(0x0F);
        c.stencil_mask_separate(Face::Back, 0x0F);
        assert_eq!(calls(&mut c).len(), 2);
        assert_eq!(c.context().state.stencil_back.write_mask, 0x0F);
    }

    #[test]
    fn nan_is_never_suppressed() {
        let mut c = cache();
        calls(&mut c);
        c.clear_depth(f32::NAN);
        c.clear_depth(f32::NAN);
        assert_eq!(calls(&mut c).len(), 2);
    }

    #[test]
    fn buffer_bindings_compare_handles() {
        let mut c = cache();
        calls(&mut c);
        c.bind_buffer(BufferTarget::Array, Some(BufferId(1)));
        c.bind_buffer(BufferTarget::Array, Some(BufferId(1)));
        c.bind_buffer(BufferTarget::Uniform, Some(BufferId(1)));
        assert_eq!(calls(&mut c).len(), 2);
        assert_eq!(c.bindings().array_buffer, Some(BufferId(1)));
    }

    #[test]
    fn vertex_array_change_forces_next_element_bind() {
        let mut c = cache();
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(5)));
        c.bind_vertex_array(Some(VertexArrayId(1)));
        calls(&mut c);

        // The new vertex array has its own element binding, so this must not
        // be dropped even though the mirror still says 5.
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(5)));
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(5)));
        assert_eq!(calls(&mut c).len(), 1);
        assert_eq!(c.context().element_buffer(), Some(BufferId(5)));
    }

    #[test]
    fn known_vertex_array_recalls_its_element_buffer() {
        let mut c = cache();
        c.bind_vertex_array(Some(VertexArrayId(1)));
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(7)));
        c.bind_vertex_array(None);
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(5)));
        c.bind_vertex_array(Some(VertexArrayId(1)));
        assert_eq!(c.bindings().element_array_buffer, Some(BufferId(7)));
        calls(&mut c);

        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(7)));
        assert!(calls(&mut c).is_empty());

        c.forget_vertex_array(VertexArrayId(1));
        c.bind_vertex_array(None);
        c.bind_vertex_array(Some(VertexArrayId(1)));
        calls(&mut c);
        c.bind_buffer(BufferTarget::ElementArray, Some(BufferId(7)));
        assert_eq!(calls(&mut c).len(), 1);
    }

    #[test]
    fn combined_framebuffer_overwrites_all_slots() {
        let mut c = cache();
        c.bind_framebuffer(FramebufferTarget::Draw, Some(FramebufferId(1)));
        c.bind_framebuffer(FramebufferTarget::Combined, Some(FramebufferId(2)));
        assert_eq!(c.bindings().framebuffers.handles(), [Some(FramebufferId(2)); 3]);
        calls(&mut c);

        c.bind_framebuffer(FramebufferTarget::Combined, Some(FramebufferId(2)));
        c.bind_framebuffer(FramebufferTarget::Draw, Some(FramebufferId(2)));
        assert!(calls(&mut c).is_empty());

        c.bind_framebuffer(FramebufferTarget::Read, Some(FramebufferId(3)));
        assert_eq!(
            c.bindings().framebuffers.handles(),
            [Some(FramebufferId(2)), Some(FramebufferId(2)), Some(FramebufferId(3))]
        );
        // Combined slot matches but read does not: forwarded.
        c.bind_framebuffer(FramebufferTarget::Combined, Some(FramebufferId(2)));
        assert_eq!(calls(&mut c).len(), 2);
        assert_eq!(c.context().read_framebuffer, Some(FramebufferId(2)));
    }

    #[test]
    fn attachments_follow_the_framebuffer_object() {
        let mut c = cache();
        let fb = Some(FramebufferId(1));
        c.bind_framebuffer(FramebufferTarget::Combined, fb);
        c.draw_buffers(&[gl::COLOR_ATTACHMENT0, gl::COLOR_ATTACHMENT0 + 1]);
        c.read_buffer(gl::COLOR_ATTACHMENT0 + 1);
        assert_eq!(
            c.bindings().framebuffers.read.attachments.draw_buffers[..2],
            [gl::COLOR_ATTACHMENT0, gl::COLOR_ATTACHMENT0 + 1]
        );

        c.bind_framebuffer(FramebufferTarget::Combined, None);
        c.bind_framebuffer(FramebufferTarget::Draw, fb);
        calls(&mut c);

        // Rebinding recalls the configuration, so repeating it is a no-op.
        c.draw_buffers(&[gl::COLOR_ATTACHMENT0, gl::COLOR_ATTACHMENT0 + 1, gl::NONE]);
        assert!(calls(&mut c).is_empty());
        assert_eq!(
            c.bindings().framebuffers.draw.attachments.read_buffer,
            gl::COLOR_ATTACHMENT0 + 1
        );
    }

    #[test]
    fn forgotten_framebuffer_starts_fresh() {
        let mut c = cache();
        let fb = Some(FramebufferId(1));
        c.bind_framebuffer(FramebufferTarget::Combined, fb);
        c.read_buffer(gl::NONE);
        c.bind_framebuffer(FramebufferTarget::Combined, None);
        c.forget_framebuffer(FramebufferId(1));
        c.bind_framebuffer(FramebufferTarget::Combined, fb);
        assert_eq!(
            c.bindings().framebuffers.read.attachments.read_buffer,
            gl::COLOR_ATTACHMENT0
        );
    }

    #[test]
    fn texture_unit_isolation() {
        let mut c = cache();
        c.active_texture(gl::TEXTURE0 + 3);
        c.bind_texture(TextureTarget::Texture2d, Some(TextureId(9)));
        let textures = &c.bindings().textures;
        for (unit, binding) in textures.iter().enumerate() {
            if unit == 3 {
                assert_eq!(binding.map(|b| b.texture), Some(TextureId(9)));
            } else {
                assert_eq!(*binding, None);
            }
        }
    }

    #[test]
    fn texture_rebind_is_suppressed() {
        let mut c = cache();
        c.bind_texture(TextureTarget::CubeMap, Some(TextureId(1)));
        calls(&mut c);
        c.bind_texture(TextureTarget::CubeMap, Some(TextureId(1)));
        c.bind_texture(TextureTarget::Texture2d, None);
        assert_eq!(calls(&mut c), [GlCall::BindTexture(TextureTarget::Texture2d, None)]);
        assert!(c.bindings().texture(0).is_some());

        c.bind_texture(TextureTarget::CubeMap, None);
        c.bind_texture(TextureTarget::CubeMap, None);
        assert_eq!(calls(&mut c).len(), 1);
        assert_eq!(c.bindings().texture(0), None);
    }

    #[test]
    fn untracked_texture_unit_is_forwarded() {
        let mut c = cache();
        c.active_texture(gl::TEXTURE0 + 20);
        calls(&mut c);
        c.bind_texture(TextureTarget::Texture2d, Some(TextureId(1)));
        c.bind_texture(TextureTarget::Texture2d, Some(TextureId(1)));
        assert_eq!(calls(&mut c).len(), 2);
    }

    #[test]
    #[should_panic(expected = "below TEXTURE0")]
    #[cfg(debug_assertions)]
    fn active_texture_below_base_panics() {
        let mut c = cache();
        c.active_texture(0);
    }

    #[test]
    #[should_panic(expected = "not positive")]
    #[cfg(debug_assertions)]
    fn negative_line_width_panics() {
        let mut c = cache();
        c.line_width(-1.0);
    }

    #[test]
    fn slow_refetch_recovers_from_out_of_band_change() {
        let mut c = cache();
        calls(&mut c);
        c.context_mut().state.depth_func = gl::ALWAYS;
        c.depth_func(gl::LESS);
        assert!(calls(&mut c).is_empty());

        c.slow_refetch().unwrap();
        assert_eq!(c.state().depth_func, gl::ALWAYS);
        calls(&mut c);
        c.depth_func(gl::LESS);
        assert_eq!(calls(&mut c).len(), 1);
    }

    #[test]
    fn failed_refetch_keeps_mirror() {
        let mut c = cache();
        c.viewport(0, 0, 10, 10);
        c.context_mut().lost = true;
        assert_eq!(c.slow_refetch(), Err(StateQueryError::ContextLost));
        assert_eq!(c.state().viewport, [0, 0, 10, 10]);
    }

    #[test]
    fn narrowed_stencil_mask_is_widened_at_bootstrap() {
        let mut ctx = MockContext::new();
        ctx.narrow_stencil_mask = true;
        let mut c = StateCache::new(ctx).unwrap();
        assert_eq!(c.state().stencil_front.write_mask, u32::MAX);
        assert_eq!(c.state().stencil_back.write_mask, u32::MAX);
        calls(&mut c);
        c.stencil_mask(u32::MAX);
        assert!(calls(&mut c).is_empty());
    }

    #[test]
    fn from_snapshot_skips_queries() {
        let mut snap = Snapshot::default();
        snap.state.cull_face = gl::FRONT;
        let mut c = StateCache::from_snapshot(MockContext::new(), NoopSink, Limits::default(), snap);
        assert!(c.context().calls.is_empty());
        c.cull_face(gl::FRONT);
        assert!(c.context().calls.is_empty());
    }
}
