// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk read of a live context into a fresh mirror.
//!
//! Used once when a [`StateCache`](crate::StateCache) is created and again by
//! [`slow_refetch`](crate::StateCache::slow_refetch). Plain state only needs
//! [`StateQuery`]; texture units and framebuffer attachments can only be read
//! for the current unit and binding, so the fetch briefly rebinds through the
//! raw context and puts everything back before returning.

use alloc::collections::BTreeMap;

use crate::binding::{
    AttachmentConfig, BindingState, BufferTarget, FramebufferTarget, Limits, TextureBinding,
    TextureTarget,
};
use crate::context::{GlContext, StateQuery, StateQueryError};
use crate::gl::{self, GLenum};
use crate::handle::FramebufferId;
use crate::snapshot::Snapshot;
use crate::state::{Capability, PixelStoreParam, StencilFace, StencilFunc, StencilOp, TrackedState};

/// Value some drivers report for an all-ones stencil write mask.
const NARROW_STENCIL_MASK: u32 = 0x7FFF_FFFF;

/// Everything a bulk read produces.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub(crate) limits: Limits,
    pub(crate) snapshot: Snapshot,
    pub(crate) attachments: BTreeMap<Option<FramebufferId>, AttachmentConfig>,
}

/// Reads limits, plain state and bindings from `ctx`.
pub(crate) fn fetch<C>(ctx: &mut C) -> Result<Fetched, StateQueryError>
where
    C: GlContext + StateQuery + ?Sized,
{
    let limits = fetch_limits(ctx)?;
    let state = fetch_state(ctx)?;
    let (bindings, attachments) = fetch_bindings(ctx, limits, state.active_texture)?;
    log::debug!(
        "fetched context state: {} texture units, {} draw buffers, draw framebuffer {:?}",
        limits.max_texture_units,
        limits.max_draw_buffers,
        bindings.framebuffers.draw.framebuffer,
    );
    Ok(Fetched {
        limits,
        snapshot: Snapshot { state, bindings },
        attachments,
    })
}

/// Widens the narrow stencil write mask some drivers report.
///
/// These drivers store a 31-bit mask internally; the effective mask is all
/// ones.
pub(crate) fn widen_stencil_mask(mask: u32) -> u32 {
    if mask == NARROW_STENCIL_MASK {
        log::warn!("context reported stencil write mask {mask:#x}; treating it as {:#x}", u32::MAX);
        u32::MAX
    } else {
        mask
    }
}

fn get_enum<Q: StateQuery + ?Sized>(q: &Q, pname: GLenum) -> Result<GLenum, StateQueryError> {
    Ok(q.get_integer(pname)? as GLenum)
}

fn get_count<Q: StateQuery + ?Sized>(q: &Q, pname: GLenum) -> Result<u32, StateQueryError> {
    let value = q.get_integer(pname)?;
    u32::try_from(value).map_err(|_| StateQueryError::UnexpectedValue { pname })
}

fn fetch_limits<Q: StateQuery + ?Sized>(q: &Q) -> Result<Limits, StateQueryError> {
    Ok(Limits {
        max_draw_buffers: get_count(q, gl::MAX_DRAW_BUFFERS)?.max(1),
        max_texture_units: get_count(q, gl::MAX_TEXTURE_IMAGE_UNITS)?,
    })
}

fn fetch_stencil_face<Q: StateQuery + ?Sized>(
    q: &Q,
    names: [GLenum; 7],
) -> Result<StencilFace, StateQueryError> {
    let [func, reference, mask, fail, depth_fail, depth_pass, write_mask] = names;
    Ok(StencilFace {
        func: StencilFunc {
            func: get_enum(q, func)?,
            reference: q.get_integer(reference)?,
            mask: q.get_unsigned(mask)?,
        },
        op: StencilOp {
            fail: get_enum(q, fail)?,
            depth_fail: get_enum(q, depth_fail)?,
            depth_pass: get_enum(q, depth_pass)?,
        },
        write_mask: widen_stencil_mask(q.get_unsigned(write_mask)?),
    })
}

pub(crate) fn fetch_state<Q: StateQuery + ?Sized>(q: &Q) -> Result<TrackedState, StateQueryError> {
    let mut s = TrackedState::default();

    for cap in Capability::ALL {
        *s.capabilities.get_mut(cap) = q.is_enabled(cap)?;
    }
    for param in PixelStoreParam::ALL {
        *s.pixel_store.get_mut(param) = if param.is_boolean() {
            i32::from(q.get_boolean(param.to_gl())?)
        } else {
            q.get_integer(param.to_gl())?
        };
    }

    // Some implementations answer 0 before the first activeTexture call.
    s.active_texture = match get_enum(q, gl::ACTIVE_TEXTURE)? {
        0 => gl::TEXTURE0,
        unit => unit,
    };

    q.get_integer_v(gl::VIEWPORT, &mut s.viewport)?;
    q.get_float_v(gl::BLEND_COLOR, &mut s.blend_color)?;
    s.blend_equation = [
        get_enum(q, gl::BLEND_EQUATION_RGB)?,
        get_enum(q, gl::BLEND_EQUATION_ALPHA)?,
    ];
    s.blend_func = [
        get_enum(q, gl::BLEND_SRC_RGB)?,
        get_enum(q, gl::BLEND_DST_RGB)?,
        get_enum(q, gl::BLEND_SRC_ALPHA)?,
        get_enum(q, gl::BLEND_DST_ALPHA)?,
    ];
    s.cull_face = get_enum(q, gl::CULL_FACE_MODE)?;
    s.front_face = get_enum(q, gl::FRONT_FACE)?;
    s.depth_func = get_enum(q, gl::DEPTH_FUNC)?;
    s.line_width = q.get_float(gl::LINE_WIDTH)?;
    q.get_float_v(gl::COLOR_CLEAR_VALUE, &mut s.clear_color)?;
    q.get_boolean_v(gl::COLOR_WRITEMASK, &mut s.color_mask)?;
    s.clear_depth = q.get_float(gl::DEPTH_CLEAR_VALUE)?;
    s.depth_mask = q.get_boolean(gl::DEPTH_WRITEMASK)?;
    q.get_float_v(gl::DEPTH_RANGE, &mut s.depth_range)?;
    s.polygon_offset = [
        q.get_float(gl::POLYGON_OFFSET_FACTOR)?,
        q.get_float(gl::POLYGON_OFFSET_UNITS)?,
    ];
    s.sample_coverage.value = q.get_float(gl::SAMPLE_COVERAGE_VALUE)?;
    s.sample_coverage.invert = q.get_boolean(gl::SAMPLE_COVERAGE_INVERT)?;
    q.get_integer_v(gl::SCISSOR_BOX, &mut s.scissor)?;

    s.stencil_front = fetch_stencil_face(
        q,
        [
            gl::STENCIL_FUNC,
            gl::STENCIL_REF,
            gl::STENCIL_VALUE_MASK,
            gl::STENCIL_FAIL,
            gl::STENCIL_PASS_DEPTH_FAIL,
            gl::STENCIL_PASS_DEPTH_PASS,
            gl::STENCIL_WRITEMASK,
        ],
    )?;
    s.stencil_back = fetch_stencil_face(
        q,
        [
            gl::STENCIL_BACK_FUNC,
            gl::STENCIL_BACK_REF,
            gl::STENCIL_BACK_VALUE_MASK,
            gl::STENCIL_BACK_FAIL,
            gl::STENCIL_BACK_PASS_DEPTH_FAIL,
            gl::STENCIL_BACK_PASS_DEPTH_PASS,
            gl::STENCIL_BACK_WRITEMASK,
        ],
    )?;
    s.clear_stencil = q.get_integer(gl::STENCIL_CLEAR_VALUE)?;

    Ok(s)
}

fn read_draw_buffers<Q: StateQuery + ?Sized>(
    q: &Q,
    config: &mut AttachmentConfig,
    limits: Limits,
) -> Result<(), StateQueryError> {
    config.draw_buffers.clear();
    for i in 0..limits.max_draw_buffers {
        config.draw_buffers.push(get_enum(q, gl::DRAW_BUFFER0 + i)?);
    }
    Ok(())
}

/// Reads the attachment configuration of the bound draw and read framebuffers.
///
/// Only the draw side can report draw buffers and only the read side can
/// report the read source, so when the two differ each one is briefly bound on
/// the other side as well.
fn fetch_attachments<C>(
    ctx: &mut C,
    limits: Limits,
    draw: Option<FramebufferId>,
    read: Option<FramebufferId>,
) -> Result<BTreeMap<Option<FramebufferId>, AttachmentConfig>, StateQueryError>
where
    C: GlContext + StateQuery + ?Sized,
{
    let mut draw_config = AttachmentConfig::initial(draw, limits);
    read_draw_buffers(ctx, &mut draw_config, limits)?;
    let mut read_config = AttachmentConfig::initial(read, limits);
    read_config.read_buffer = get_enum(ctx, gl::READ_BUFFER)?;

    let mut attachments = BTreeMap::new();
    if draw == read {
        draw_config.read_buffer = read_config.read_buffer;
        attachments.insert(draw, draw_config);
        return Ok(attachments);
    }

    ctx.bind_framebuffer(FramebufferTarget::Read, draw);
    let draw_read_buffer = get_enum(ctx, gl::READ_BUFFER);
    ctx.bind_framebuffer(FramebufferTarget::Read, read);
    draw_config.read_buffer = draw_read_buffer?;

    ctx.bind_framebuffer(FramebufferTarget::Draw, read);
    let read_draw = read_draw_buffers(ctx, &mut read_config, limits);
    ctx.bind_framebuffer(FramebufferTarget::Draw, draw);
    read_draw?;

    attachments.insert(draw, draw_config);
    attachments.insert(read, read_config);
    Ok(attachments)
}

/// Returns the first target with a texture bound on the active unit.
fn fetch_unit<Q: StateQuery + ?Sized>(q: &Q) -> Result<Option<TextureBinding>, StateQueryError> {
    for target in TextureTarget::ALL {
        if let Some(texture) = q.get_texture_binding(target)? {
            return Ok(Some(TextureBinding { target, texture }));
        }
    }
    Ok(None)
}

pub(crate) fn fetch_bindings<C>(
    ctx: &mut C,
    limits: Limits,
    active_texture: GLenum,
) -> Result<(BindingState, BTreeMap<Option<FramebufferId>, AttachmentConfig>), StateQueryError>
where
    C: GlContext + StateQuery + ?Sized,
{
    let mut b = BindingState::new(limits);
    b.program = ctx.get_program_binding()?;
    b.array_buffer = ctx.get_buffer_binding(BufferTarget::Array)?;
    b.element_array_buffer = ctx.get_buffer_binding(BufferTarget::ElementArray)?;
    b.uniform_buffer = ctx.get_buffer_binding(BufferTarget::Uniform)?;
    b.vertex_array = ctx.get_vertex_array_binding()?;

    // The combined binding reads back as the draw binding.
    let draw = ctx.get_framebuffer_binding(FramebufferTarget::Draw)?;
    let read = ctx.get_framebuffer_binding(FramebufferTarget::Read)?;
    let attachments = fetch_attachments(ctx, limits, draw, read)?;
    let fbs = &mut b.framebuffers;
    fbs.combined.framebuffer = draw;
    fbs.draw.framebuffer = draw;
    fbs.read.framebuffer = read;
    for slot in [&mut fbs.combined, &mut fbs.draw, &mut fbs.read] {
        if let Some(config) = attachments.get(&slot.framebuffer) {
            slot.attachments.copy_from(config);
        }
    }

    let mut units = Ok(());
    for (unit, slot) in (0_u32..).zip(b.textures.iter_mut()) {
        ctx.active_texture(gl::TEXTURE0 + unit);
        match fetch_unit(ctx) {
            Ok(binding) => *slot = binding,
            Err(e) => {
                units = Err(e);
                break;
            }
        }
    }
    ctx.active_texture(active_texture);
    units?;

    Ok((b, attachments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{ProgramId, TextureId};
    use crate::test_util::MockContext;

    #[test]
    fn narrow_stencil_mask_is_widened() {
        assert_eq!(widen_stencil_mask(0x7FFF_FFFF), 0xFFFF_FFFF);
        assert_eq!(widen_stencil_mask(0xFF), 0xFF);
        assert_eq!(widen_stencil_mask(0xFFFF_FFFF), 0xFFFF_FFFF);
    }

    #[test]
    fn fetch_widens_both_faces() {
        let mut ctx = MockContext::new();
        ctx.narrow_stencil_mask = true;
        let fetched = fetch(&mut ctx).unwrap();
        assert_eq!(fetched.snapshot.state.stencil_front.write_mask, u32::MAX);
        assert_eq!(fetched.snapshot.state.stencil_back.write_mask, u32::MAX);
    }

    #[test]
    fn fetch_reads_plain_state() {
        let mut ctx = MockContext::new();
        ctx.state.viewport = [0, 0, 640, 480];
        ctx.state.capabilities.blend = true;
        ctx.state.pixel_store.unpack_flip_y = 1;
        ctx.state.blend_func = [gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA, gl::ONE, gl::ZERO];
        ctx.state.stencil_back.func.reference = 3;

        let state = fetch_state(&ctx).unwrap();
        assert_eq!(state, ctx.state);
    }

    #[test]
    fn zero_active_texture_reads_as_unit_zero() {
        let mut ctx = MockContext::new();
        ctx.state.active_texture = 0;
        let state = fetch_state(&ctx).unwrap();
        assert_eq!(state.active_texture, gl::TEXTURE0);
    }

    #[test]
    fn fetch_reads_bindings_and_restores_context() {
        let mut ctx = MockContext::new();
        ctx.program = Some(ProgramId(1));
        ctx.state.active_texture = gl::TEXTURE0 + 2;
        ctx.textures[1][TextureTarget::CubeMap as usize] = Some(TextureId(7));
        ctx.draw_framebuffer = Some(FramebufferId(3));
        ctx.read_framebuffer = Some(FramebufferId(4));
        let mut draw_cfg = AttachmentConfig::initial(Some(FramebufferId(3)), ctx.limits);
        draw_cfg.read_buffer = gl::COLOR_ATTACHMENT0 + 1;
        ctx.attachments.insert(Some(FramebufferId(3)), draw_cfg);

        let fetched = fetch(&mut ctx).unwrap();
        let b = &fetched.snapshot.bindings;
        assert_eq!(b.program, Some(ProgramId(1)));
        assert_eq!(
            b.texture(1),
            Some(TextureBinding {
                target: TextureTarget::CubeMap,
                texture: TextureId(7),
            })
        );
        assert_eq!(b.framebuffers.combined.framebuffer, Some(FramebufferId(3)));
        assert_eq!(b.framebuffers.read.framebuffer, Some(FramebufferId(4)));
        assert_eq!(
            b.framebuffers.draw.attachments.read_buffer,
            gl::COLOR_ATTACHMENT0 + 1
        );

        // The probe left the real context as it found it.
        assert_eq!(ctx.state.active_texture, gl::TEXTURE0 + 2);
        assert_eq!(ctx.draw_framebuffer, Some(FramebufferId(3)));
        assert_eq!(ctx.read_framebuffer, Some(FramebufferId(4)));
    }

    #[test]
    fn lost_context_fails() {
        let mut ctx = MockContext::new();
        ctx.lost = true;
        assert_eq!(fetch(&mut ctx).unwrap_err(), StateQueryError::ContextLost);
    }
}
