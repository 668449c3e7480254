// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call events and the observer that receives them.
//!
//! Every request that reaches the intercept layer is described by a
//! [`GlCall`]. The cache hands it to a [`CallSink`]: `on_applied` when the call
//! was forwarded to the context, `on_suppressed` when it was dropped as
//! redundant. All sink methods default to no-ops, and [`NoopSink`] is the
//! default sink type, so an unobserved cache pays nothing for this.
//!
//! A `GlCall` can also be replayed onto any [`GlContext`] with
//! [`apply`](GlCall::apply).

use alloc::borrow::Cow;

use crate::binding::{BufferTarget, FramebufferTarget, TextureTarget};
use crate::context::GlContext;
use crate::gl::GLenum;
use crate::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use crate::state::{Capability, Face, PixelStoreParam, StencilFunc, StencilOp};

// ---------------------------------------------------------------------------
// GlCall
// ---------------------------------------------------------------------------

/// One state-mutating request, with its arguments.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GlCall<'a> {
    /// `enable`
    Enable(Capability),
    /// `disable`
    Disable(Capability),
    /// `pixelStorei`
    PixelStore(PixelStoreParam, i32),
    /// `activeTexture`
    ActiveTexture(GLenum),
    /// `viewport`
    Viewport([i32; 4]),
    /// `blendColor`
    BlendColor([f32; 4]),
    /// `blendEquation`
    BlendEquation(GLenum),
    /// `blendEquationSeparate`
    BlendEquationSeparate(GLenum, GLenum),
    /// `blendFunc`
    BlendFunc(GLenum, GLenum),
    /// `blendFuncSeparate`
    BlendFuncSeparate([GLenum; 4]),
    /// `cullFace`
    CullFace(GLenum),
    /// `frontFace`
    FrontFace(GLenum),
    /// `depthFunc`
    DepthFunc(GLenum),
    /// `lineWidth`
    LineWidth(f32),
    /// `clearColor`
    ClearColor([f32; 4]),
    /// `colorMask`
    ColorMask([bool; 4]),
    /// `clearDepth`
    ClearDepth(f32),
    /// `depthMask`
    DepthMask(bool),
    /// `depthRange`
    DepthRange(f32, f32),
    /// `polygonOffset`
    PolygonOffset(f32, f32),
    /// `sampleCoverage`
    SampleCoverage(f32, bool),
    /// `scissor`
    Scissor([i32; 4]),
    /// `stencilFunc`
    StencilFunc(StencilFunc),
    /// `stencilFuncSeparate`
    StencilFuncSeparate(Face, StencilFunc),
    /// `stencilOp`
    StencilOp(StencilOp),
    /// `stencilOpSeparate`
    StencilOpSeparate(Face, StencilOp),
    /// `stencilMask`
    StencilMask(u32),
    /// `stencilMaskSeparate`
    StencilMaskSeparate(Face, u32),
    /// `clearStencil`
    ClearStencil(i32),
    /// `useProgram`
    UseProgram(Option<ProgramId>),
    /// `bindBuffer`
    BindBuffer(BufferTarget, Option<BufferId>),
    /// `bindVertexArray`
    BindVertexArray(Option<VertexArrayId>),
    /// `bindFramebuffer`
    BindFramebuffer(FramebufferTarget, Option<FramebufferId>),
    /// `drawBuffers`
    DrawBuffers(Cow<'a, [GLenum]>),
    /// `readBuffer`
    ReadBuffer(GLenum),
    /// `bindTexture`
    BindTexture(TextureTarget, Option<TextureId>),
}

impl GlCall<'_> {
    /// Returns the WebGL entry point name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enable(_) => "enable",
            Self::Disable(_) => "disable",
            Self::PixelStore(..) => "pixelStorei",
            Self::ActiveTexture(_) => "activeTexture",
            Self::Viewport(_) => "viewport",
            Self::BlendColor(_) => "blendColor",
            Self::BlendEquation(_) => "blendEquation",
            Self::BlendEquationSeparate(..) => "blendEquationSeparate",
            Self::BlendFunc(..) => "blendFunc",
            Self::BlendFuncSeparate(_) => "blendFuncSeparate",
            Self::CullFace(_) => "cullFace",
            Self::FrontFace(_) => "frontFace",
            Self::DepthFunc(_) => "depthFunc",
            Self::LineWidth(_) => "lineWidth",
            Self::ClearColor(_) => "clearColor",
            Self::ColorMask(_) => "colorMask",
            Self::ClearDepth(_) => "clearDepth",
            Self::DepthMask(_) => "depthMask",
            Self::DepthRange(..) => "depthRange",
            Self::PolygonOffset(..) => "polygonOffset",
            Self::SampleCoverage(..) => "sampleCoverage",
            Self::Scissor(_) => "scissor",
            Self::StencilFunc(_) => "stencilFunc",
            Self::StencilFuncSeparate(..) => "stencilFuncSeparate",
            Self::StencilOp(_) => "stencilOp",
            Self::StencilOpSeparate(..) => "stencilOpSeparate",
            Self::StencilMask(_) => "stencilMask",
            Self::StencilMaskSeparate(..) => "stencilMaskSeparate",
            Self::ClearStencil(_) => "clearStencil",
            Self::UseProgram(_) => "useProgram",
            Self::BindBuffer(..) => "bindBuffer",
            Self::BindVertexArray(_) => "bindVertexArray",
            Self::BindFramebuffer(..) => "bindFramebuffer",
            Self::DrawBuffers(_) => "drawBuffers",
            Self::ReadBuffer(_) => "readBuffer",
            Self::BindTexture(..) => "bindTexture",
        }
    }

    /// Detaches the event from any borrowed argument.
    #[must_use]
    pub fn into_owned(self) -> GlCall<'static> {
        match self {
            Self::DrawBuffers(list) => GlCall::DrawBuffers(Cow::Owned(list.into_owned())),
            Self::Enable(c) => GlCall::Enable(c),
            Self::Disable(c) => GlCall::Disable(c),
            Self::PixelStore(p, v) => GlCall::PixelStore(p, v),
            Self::ActiveTexture(t) => GlCall::ActiveTexture(t),
            Self::Viewport(v) => GlCall::Viewport(v),
            Self::BlendColor(c) => GlCall::BlendColor(c),
            Self::BlendEquation(m) => GlCall::BlendEquation(m),
            Self::BlendEquationSeparate(rgb, alpha) => GlCall::BlendEquationSeparate(rgb, alpha),
            Self::BlendFunc(s, d) => GlCall::BlendFunc(s, d),
            Self::BlendFuncSeparate(f) => GlCall::BlendFuncSeparate(f),
            Self::CullFace(m) => GlCall::CullFace(m),
            Self::FrontFace(m) => GlCall::FrontFace(m),
            Self::DepthFunc(f) => GlCall::DepthFunc(f),
            Self::LineWidth(w) => GlCall::LineWidth(w),
            Self::ClearColor(c) => GlCall::ClearColor(c),
            Self::ColorMask(m) => GlCall::ColorMask(m),
            Self::ClearDepth(d) => GlCall::ClearDepth(d),
            Self::DepthMask(m) => GlCall::DepthMask(m),
            Self::DepthRange(n, f) => GlCall::DepthRange(n, f),
            Self::PolygonOffset(f, u) => GlCall::PolygonOffset(f, u),
            Self::SampleCoverage(v, i) => GlCall::SampleCoverage(v, i),
            Self::Scissor(s) => GlCall::Scissor(s),
            Self::StencilFunc(f) => GlCall::StencilFunc(f),
            Self::StencilFuncSeparate(face, f) => GlCall::StencilFuncSeparate(face, f),
            Self::StencilOp(o) => GlCall::StencilOp(o),
            Self::StencilOpSeparate(face, o) => GlCall::StencilOpSeparate(face, o),
            Self::StencilMask(m) => GlCall::StencilMask(m),
            Self::StencilMaskSeparate(face, m) => GlCall::StencilMaskSeparate(face, m),
            Self::ClearStencil(s) => GlCall::ClearStencil(s),
            Self::UseProgram(p) => GlCall::UseProgram(p),
            Self::BindBuffer(t, b) => GlCall::BindBuffer(t, b),
            Self::BindVertexArray(v) => GlCall::BindVertexArray(v),
            Self::BindFramebuffer(t, f) => GlCall::BindFramebuffer(t, f),
            Self::ReadBuffer(src) => GlCall::ReadBuffer(src),
            Self::BindTexture(t, tex) => GlCall::BindTexture(t, tex),
        }
    }

    /// Issues the call on `ctx`.
    pub fn apply<C: GlContext + ?Sized>(&self, ctx: &mut C) {
        match self {
            Self::Enable(c) => ctx.enable(*c),
            Self::Disable(c) => ctx.disable(*c),
            Self::PixelStore(p, v) => ctx.pixel_store_i(*p, *v),
            Self::ActiveTexture(t) => ctx.active_texture(*t),
            Self::Viewport([x, y, w, h]) => ctx.viewport(*x, *y, *w, *h),
            Self::BlendColor([r, g, b, a]) => ctx.blend_color(*r, *g, *b, *a),
            Self::BlendEquation(m) => ctx.blend_equation(*m),
            Self::BlendEquationSeparate(rgb, alpha) => ctx.blend_equation_separate(*rgb, *alpha),
            Self::BlendFunc(s, d) => ctx.blend_func(*s, *d),
            Self::BlendFuncSeparate([sr, dr, sa, da]) => ctx.blend_func_separate(*sr, *dr, *sa, *da),
            Self::CullFace(m) => ctx.cull_face(*m),
            Self::FrontFace(m) => ctx.front_face(*m),
            Self::DepthFunc(f) => ctx.depth_func(*f),
            Self::LineWidth(w) => ctx.line_width(*w),
            Self::ClearColor([r, g, b, a]) => ctx.clear_color(*r, *g, *b, *a),
            Self::ColorMask([r, g, b, a]) => ctx.color_mask(*r, *g, *b, *a),
            Self::ClearDepth(d) => ctx.clear_depth(*d),
            Self::DepthMask(m) => ctx.depth_mask(*m),
            Self::DepthRange(n, f) => ctx.depth_range(*n, *f),
            Self::PolygonOffset(f, u) => ctx.polygon_offset(*f, *u),
            Self::SampleCoverage(v, i) => ctx.sample_coverage(*v, *i),
            Self::Scissor([x, y, w, h]) => ctx.scissor(*x, *y, *w, *h),
            Self::StencilFunc(f) => ctx.stencil_func(f.func, f.reference, f.mask),
            Self::StencilFuncSeparate(face, f) => {
                ctx.stencil_func_separate(*face, f.func, f.reference, f.mask);
            }
            Self::StencilOp(o) => ctx.stencil_op(o.fail, o.depth_fail, o.depth_pass),
            Self::StencilOpSeparate(face, o) => {
                ctx.stencil_op_separate(*face, o.fail, o.depth_fail, o.depth_pass);
            }
            Self::StencilMask(m) => ctx.stencil_mask(*m),
            Self::StencilMaskSeparate(face, m) => ctx.stencil_mask_separate(*face, *m),
            Self::ClearStencil(s) => ctx.clear_stencil(*s),
            Self::UseProgram(p) => ctx.use_program(*p),
            Self::BindBuffer(t, b) => ctx.bind_buffer(*t, *b),
            Self::BindVertexArray(v) => ctx.bind_vertex_array(*v),
            Self::BindFramebuffer(t, f) => ctx.bind_framebuffer(*t, *f),
            Self::DrawBuffers(list) => ctx.draw_buffers(list),
            Self::ReadBuffer(src) => ctx.read_buffer(*src),
            Self::BindTexture(t, tex) => ctx.bind_texture(*t, *tex),
        }
    }
}

// ---------------------------------------------------------------------------
// CallSink trait
// ---------------------------------------------------------------------------

/// Receives call events from the intercept layer.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait CallSink {
    /// Called after a call was forwarded to the context.
    fn on_applied(&mut self, call: &GlCall<'_>) {
        _ = call;
    }

    /// Called when a call was dropped because it would not change anything.
    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        _ = call;
    }
}

impl<S: CallSink + ?Sized> CallSink for &mut S {
    fn on_applied(&mut self, call: &GlCall<'_>) {
        (**self).on_applied(call);
    }

    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        (**self).on_suppressed(call);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`CallSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl CallSink for NoopSink {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl;
    use crate::test_util::MockContext;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn apply_reaches_the_context() {
        let mut ctx = MockContext::new();
        GlCall::Viewport([1, 2, 3, 4]).apply(&mut ctx);
        GlCall::BindFramebuffer(FramebufferTarget::Draw, Some(FramebufferId(2))).apply(&mut ctx);
        GlCall::DrawBuffers(Cow::Owned(vec![gl::COLOR_ATTACHMENT0])).apply(&mut ctx);

        assert_eq!(ctx.state.viewport, [1, 2, 3, 4]);
        assert_eq!(ctx.draw_framebuffer, Some(FramebufferId(2)));
        assert_eq!(ctx.calls.len(), 3);
    }

    #[test]
    fn into_owned_keeps_arguments() {
        let list = [gl::COLOR_ATTACHMENT0, gl::NONE];
        let owned = GlCall::DrawBuffers(Cow::Borrowed(&list)).into_owned();
        assert_eq!(owned, GlCall::DrawBuffers(Cow::Owned(list.to_vec())));
        assert_eq!(owned.name(), "drawBuffers");
    }

    #[test]
    fn borrowed_sink_forwards() {
        #[derive(Default)]
        struct Names(Vec<&'static str>);
        impl CallSink for Names {
            fn on_applied(&mut self, call: &GlCall<'_>) {
                self.0.push(call.name());
            }
        }

        fn feed<S: CallSink>(mut sink: S) {
            sink.on_applied(&GlCall::DepthMask(false));
            sink.on_suppressed(&GlCall::DepthMask(false));
        }

        let mut names = Names::default();
        feed(&mut names);
        assert_eq!(names.0, ["depthMask"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_snake_case_tags() {
        let call = GlCall::BindTexture(TextureTarget::CubeMap, Some(TextureId(5)));
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, r#"{"bind_texture":["cube_map",5]}"#);
    }
}
