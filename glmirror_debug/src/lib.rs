// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, statistics and JSON export for glmirror
//! diagnostics.
//!
//! This crate provides [`CallSink`](glmirror_core::trace::CallSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`recorder::RecorderSink`]: start/stop recording of forwarded calls.
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-call output.
//! - [`stats::CallStats`]: applied and suppressed counters per entry point.
//! - [`json`]: writes recorded calls as JSON and reads them back.
//! - [`tee::Tee`]: forwards every event to two sinks.

pub mod json;
pub mod pretty;
pub mod recorder;
pub mod stats;
pub mod tee;
