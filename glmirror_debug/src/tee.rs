// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out to two sinks.

use glmirror_core::trace::{CallSink, GlCall};

/// A [`CallSink`] that forwards every event to `A`, then to `B`.
///
/// Nest tees to reach more than two sinks.
#[derive(Clone, Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: CallSink, B: CallSink> CallSink for Tee<A, B> {
    fn on_applied(&mut self, call: &GlCall<'_>) {
        self.0.on_applied(call);
        self.1.on_applied(call);
    }

    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        self.0.on_suppressed(call);
        self.1.on_suppressed(call);
    }
}
