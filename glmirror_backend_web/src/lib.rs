// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebGL 2 backend for glmirror.
//!
//! [`WebGlContext`] wraps a `web_sys::WebGl2RenderingContext` and implements
//! both [`GlContext`] and [`StateQuery`], so it can sit under a
//! [`StateCache`]:
//!
//! ```ignore
//! let ctx = WebGlContext::new(gl);
//! let fb = ctx.register_framebuffer(&gl_framebuffer);
//! let mut cache = StateCache::new(ctx)?;
//! cache.bind_framebuffer(FramebufferTarget::Combined, Some(fb));
//! ```
//!
//! WebGL objects have no numeric identity, so the context keeps one registry
//! per object kind and hands out handles from it.
//!
//! [`StateCache`]: glmirror_core::StateCache

#![no_std]

extern crate alloc;

mod context;
mod registry;

pub use context::WebGlContext;
pub use glmirror_core::{GlContext, StateQuery};
