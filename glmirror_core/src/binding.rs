// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle half of the state mirror.
//!
//! [`BindingState`] records which context-owned objects are bound where. It
//! holds handles, so it is cloned by identity and is not serialized.
//!
//! # Framebuffer slots
//!
//! Three slots are tracked: the handle last bound to the combined
//! `FRAMEBUFFER` target, and the effective draw and read bindings. Binding the
//! combined target overwrites all three; binding `DRAW_FRAMEBUFFER` or
//! `READ_FRAMEBUFFER` overwrites only its own slot. A side slot whose handle
//! differs from the combined slot was therefore bound after it, which is what
//! restore uses to pick a safe rebinding order.
//!
//! The read source and draw-buffer list are state of the framebuffer object.
//! Each slot carries a copy of the [`AttachmentConfig`] of the framebuffer it
//! names.

use alloc::vec;
use alloc::vec::Vec;

use crate::gl::{self, GLenum};
use crate::handle::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Buffer binding points tracked by the mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BufferTarget {
    /// `ARRAY_BUFFER`
    Array,
    /// `ELEMENT_ARRAY_BUFFER`, owned by the bound vertex array.
    ElementArray,
    /// `UNIFORM_BUFFER` (generic binding point only).
    Uniform,
}

impl BufferTarget {
    /// Returns the raw `GLenum`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::Array => gl::ARRAY_BUFFER,
            Self::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
            Self::Uniform => gl::UNIFORM_BUFFER,
        }
    }

    /// Returns the `getParameter` name that reports this binding.
    #[must_use]
    pub const fn binding_pname(self) -> GLenum {
        match self {
            Self::Array => gl::ARRAY_BUFFER_BINDING,
            Self::ElementArray => gl::ELEMENT_ARRAY_BUFFER_BINDING,
            Self::Uniform => gl::UNIFORM_BUFFER_BINDING,
        }
    }
}

/// Framebuffer binding points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FramebufferTarget {
    /// `FRAMEBUFFER`: binds both the draw and the read side.
    Combined,
    /// `DRAW_FRAMEBUFFER`
    Draw,
    /// `READ_FRAMEBUFFER`
    Read,
}

impl FramebufferTarget {
    /// Returns the raw `GLenum`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::Combined => gl::FRAMEBUFFER,
            Self::Draw => gl::DRAW_FRAMEBUFFER,
            Self::Read => gl::READ_FRAMEBUFFER,
        }
    }

    /// Whether binding this target changes the draw side.
    #[must_use]
    pub const fn draws(self) -> bool {
        matches!(self, Self::Combined | Self::Draw)
    }

    /// Whether binding this target changes the read side.
    #[must_use]
    pub const fn reads(self) -> bool {
        matches!(self, Self::Combined | Self::Read)
    }
}

/// Texture binding points tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TextureTarget {
    /// `TEXTURE_2D`
    Texture2d,
    /// `TEXTURE_CUBE_MAP`
    CubeMap,
    /// `TEXTURE_3D`
    Texture3d,
    /// `TEXTURE_2D_ARRAY`
    Texture2dArray,
}

impl TextureTarget {
    /// Every target, in the order bootstrap probes them.
    pub const ALL: [Self; 4] = [
        Self::Texture2d,
        Self::CubeMap,
        Self::Texture3d,
        Self::Texture2dArray,
    ];

    /// Returns the raw `GLenum`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::Texture2d => gl::TEXTURE_2D,
            Self::CubeMap => gl::TEXTURE_CUBE_MAP,
            Self::Texture3d => gl::TEXTURE_3D,
            Self::Texture2dArray => gl::TEXTURE_2D_ARRAY,
        }
    }

    /// Returns the `getParameter` name that reports this binding.
    #[must_use]
    pub const fn binding_pname(self) -> GLenum {
        match self {
            Self::Texture2d => gl::TEXTURE_BINDING_2D,
            Self::CubeMap => gl::TEXTURE_BINDING_CUBE_MAP,
            Self::Texture3d => gl::TEXTURE_BINDING_3D,
            Self::Texture2dArray => gl::TEXTURE_BINDING_2D_ARRAY,
        }
    }
}

/// A texture bound to one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    /// Target the texture is bound to.
    pub target: TextureTarget,
    /// The bound texture.
    pub texture: TextureId,
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Implementation limits that size the binding state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// `MAX_DRAW_BUFFERS`
    pub max_draw_buffers: u32,
    /// `MAX_TEXTURE_IMAGE_UNITS`
    pub max_texture_units: u32,
}

impl Default for Limits {
    /// The minimums every WebGL 2 implementation guarantees.
    fn default() -> Self {
        Self {
            max_draw_buffers: 4,
            max_texture_units: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Framebuffers
// ---------------------------------------------------------------------------

/// Read source and draw-buffer list of one framebuffer object.
///
/// `draw_buffers` always holds `max_draw_buffers` entries, padded with `NONE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentConfig {
    /// `readBuffer(src)`.
    pub read_buffer: GLenum,
    /// `drawBuffers(list)`, padded.
    pub draw_buffers: Vec<GLenum>,
}

impl AttachmentConfig {
    /// Returns the configuration a framebuffer starts with.
    ///
    /// The default framebuffer reads from and draws to `BACK`; framebuffer
    /// objects use `COLOR_ATTACHMENT0`.
    #[must_use]
    pub fn initial(framebuffer: Option<FramebufferId>, limits: Limits) -> Self {
        let first = if framebuffer.is_some() {
            gl::COLOR_ATTACHMENT0
        } else {
            gl::BACK
        };
        let mut draw_buffers = vec![gl::NONE; limits.max_draw_buffers.max(1) as usize];
        draw_buffers[0] = first;
        Self {
            read_buffer: first,
            draw_buffers,
        }
    }

    /// Returns `true` if `list`, padded with `NONE`, equals the stored list.
    #[must_use]
    pub fn draw_buffers_match(&self, list: &[GLenum]) -> bool {
        list.len() <= self.draw_buffers.len()
            && self.draw_buffers[..list.len()] == *list
            && self.draw_buffers[list.len()..].iter().all(|&b| b == gl::NONE)
    }

    /// Stores `list`, padded with `NONE` to at least `len` entries.
    pub fn set_draw_buffers(&mut self, list: &[GLenum], len: usize) {
        self.draw_buffers.clear();
        self.draw_buffers.extend_from_slice(list);
        if self.draw_buffers.len() < len {
            self.draw_buffers.resize(len, gl::NONE);
        }
    }

    /// Returns the meaningful prefix of the draw-buffer list.
    ///
    /// Trailing `NONE` entries are dropped, keeping at least one entry.
    #[must_use]
    pub fn active_draw_buffers(&self) -> &[GLenum] {
        let len = self
            .draw_buffers
            .iter()
            .rposition(|&b| b != gl::NONE)
            .map_or(1, |i| i + 1)
            .min(self.draw_buffers.len());
        &self.draw_buffers[..len]
    }

    /// Copies `other` into `self`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.read_buffer = other.read_buffer;
        self.draw_buffers.clone_from(&other.draw_buffers);
    }
}

/// One framebuffer binding point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramebufferSlot {
    /// Bound framebuffer; `None` is the default framebuffer.
    pub framebuffer: Option<FramebufferId>,
    /// Attachment configuration of `framebuffer`.
    pub attachments: AttachmentConfig,
}

impl FramebufferSlot {
    /// A slot holding the default framebuffer with its initial configuration.
    #[must_use]
    pub fn default_framebuffer(limits: Limits) -> Self {
        Self {
            framebuffer: None,
            attachments: AttachmentConfig::initial(None, limits),
        }
    }

    /// Copies `other` into `self`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.framebuffer = other.framebuffer;
        self.attachments.copy_from(&other.attachments);
    }
}

/// The three framebuffer slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramebufferBindings {
    /// Last handle bound to `FRAMEBUFFER`.
    pub combined: FramebufferSlot,
    /// Effective `DRAW_FRAMEBUFFER` binding.
    pub draw: FramebufferSlot,
    /// Effective `READ_FRAMEBUFFER` binding.
    pub read: FramebufferSlot,
}

impl FramebufferBindings {
    /// All slots on the default framebuffer.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        let slot = FramebufferSlot::default_framebuffer(limits);
        Self {
            combined: slot.clone(),
            draw: slot.clone(),
            read: slot,
        }
    }

    /// Returns the slot for `target`.
    #[must_use]
    pub fn slot(&self, target: FramebufferTarget) -> &FramebufferSlot {
        match target {
            FramebufferTarget::Combined => &self.combined,
            FramebufferTarget::Draw => &self.draw,
            FramebufferTarget::Read => &self.read,
        }
    }

    /// Returns the mutable slot for `target`.
    pub fn slot_mut(&mut self, target: FramebufferTarget) -> &mut FramebufferSlot {
        match target {
            FramebufferTarget::Combined => &mut self.combined,
            FramebufferTarget::Draw => &mut self.draw,
            FramebufferTarget::Read => &mut self.read,
        }
    }

    /// Returns the three handles: combined, draw, read.
    #[must_use]
    pub fn handles(&self) -> [Option<FramebufferId>; 3] {
        [
            self.combined.framebuffer,
            self.draw.framebuffer,
            self.read.framebuffer,
        ]
    }

    /// Whether the draw side was bound after the combined target.
    #[must_use]
    pub fn draw_rebound(&self) -> bool {
        self.draw.framebuffer != self.combined.framebuffer
    }

    /// Whether the read side was bound after the combined target.
    #[must_use]
    pub fn read_rebound(&self) -> bool {
        self.read.framebuffer != self.combined.framebuffer
    }

    /// Copies `other` into `self`, reusing allocations.
    pub fn copy_from(&mut self, other: &Self) {
        self.combined.copy_from(&other.combined);
        self.draw.copy_from(&other.draw);
        self.read.copy_from(&other.read);
    }
}

// ---------------------------------------------------------------------------
// BindingState
// ---------------------------------------------------------------------------

/// Every tracked handle binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingState {
    /// `useProgram`.
    pub program: Option<ProgramId>,
    /// `ARRAY_BUFFER`.
    pub array_buffer: Option<BufferId>,
    /// `ELEMENT_ARRAY_BUFFER` of the bound vertex array.
    pub element_array_buffer: Option<BufferId>,
    /// Generic `UNIFORM_BUFFER` binding.
    pub uniform_buffer: Option<BufferId>,
    /// `bindVertexArray`.
    pub vertex_array: Option<VertexArrayId>,
    /// Framebuffer slots.
    pub framebuffers: FramebufferBindings,
    /// Bound texture per unit; length is `max_texture_units`.
    pub textures: Vec<Option<TextureBinding>>,
}

impl BindingState {
    /// Nothing bound, sized for `limits`.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            program: None,
            array_buffer: None,
            element_array_buffer: None,
            uniform_buffer: None,
            vertex_array: None,
            framebuffers: FramebufferBindings::new(limits),
            textures: vec![None; limits.max_texture_units as usize],
        }
    }

    /// Returns the buffer bound to `target`.
    #[must_use]
    pub fn buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.element_array_buffer,
            BufferTarget::Uniform => self.uniform_buffer,
        }
    }

    /// Returns the mutable buffer binding for `target`.
    pub fn buffer_mut(&mut self, target: BufferTarget) -> &mut Option<BufferId> {
        match target {
            BufferTarget::Array => &mut self.array_buffer,
            BufferTarget::ElementArray => &mut self.element_array_buffer,
            BufferTarget::Uniform => &mut self.uniform_buffer,
        }
    }

    /// Returns the texture bound to `unit`, or `None` if nothing is bound or
    /// the unit is not tracked.
    #[must_use]
    pub fn texture(&self, unit: u32) -> Option<TextureBinding> {
        self.textures.get(unit as usize).copied().flatten()
    }

    /// Copies `other` into `self`, reusing allocations.
    pub fn copy_from(&mut self, other: &Self) {
        self.program = other.program;
        self.array_buffer = other.array_buffer;
        self.element_array_buffer = other.element_array_buffer;
        self.uniform_buffer = other.uniform_buffer;
        self.vertex_array = other.vertex_array;
        self.framebuffers.copy_from(&other.framebuffers);
        self.textures.clone_from(&other.textures);
    }
}

impl Default for BindingState {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
