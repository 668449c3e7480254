// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State mirror and snapshot/restore engine for WebGL 2 style contexts.
//!
//! `glmirror_core` sits between an application and a stateful rasterization
//! context. Every state-mutating call goes through a [`StateCache`], which
//! compares the request against a local mirror of what the context currently
//! holds. Requests that would not change anything are dropped; everything else
//! is forwarded and recorded. The crate is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   application
//!       │  GlContext calls
//!       ▼
//!   StateCache ──(redundant)──► CallSink::on_suppressed
//!       │
//!       │ (changed) mirror write
//!       ▼
//!   wrapped GlContext ──► CallSink::on_applied
//!
//!   Snapshot ◄── save / create_state ── StateCache
//!   Snapshot ──► restore ──► StateCache (re-enters the intercept layer)
//!   StatePatch ──► apply_partial ──► StateCache
//! ```
//!
//! **[`gl`]**: WebGL 2 enum values used by the mirror.
//!
//! **[`handle`]**: Opaque identity handles for context-owned objects.
//!
//! **[`state`]**: [`TrackedState`](state::TrackedState), the plain-data half
//! of the mirror (capabilities, pixel store, fixed-function parameters).
//!
//! **[`binding`]**: [`BindingState`](binding::BindingState), the handle half
//! of the mirror (program, buffers, vertex array, framebuffer slots, texture
//! units).
//!
//! **[`snapshot`]**: [`Snapshot`](snapshot::Snapshot), a complete value copy
//! of the mirror.
//!
//! **[`context`]**: The [`GlContext`](context::GlContext) and
//! [`StateQuery`](context::StateQuery) traits that backends implement.
//!
//! **[`cache`]**: [`StateCache`], the intercept layer and public surface.
//!
//! **[`patch`]**: [`StatePatch`](patch::StatePatch), sparse deltas for
//! partial restore.
//!
//! **[`trace`]**: [`CallSink`](trace::CallSink) observer trait and
//! [`GlCall`](trace::GlCall) events.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Derives `Serialize`/`Deserialize` for
//!   [`TrackedState`](state::TrackedState) and
//!   [`StatePatch`](patch::StatePatch), [`GlCall`](trace::GlCall) and the
//!   key enums.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod binding;
pub mod cache;
pub mod context;
mod fetch;
pub mod gl;
pub mod handle;
pub mod patch;
mod restore;
pub mod snapshot;
pub mod state;
pub mod trace;

#[cfg(test)]
mod test_util;

pub use cache::StateCache;
pub use context::{GlContext, StateQuery, StateQueryError};
pub use patch::StatePatch;
pub use snapshot::Snapshot;
