// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call history recording.
//!
//! [`RecorderSink`] implements [`CallSink`] and keeps an owned copy of every
//! call it sees while recording is on. Recording starts off; [`start`]
//! clears the history and begins a new one, [`stop`] ends it.
//!
//! By default only forwarded calls are kept. [`with_suppressed`] also keeps
//! the dropped ones, flagged as such.
//!
//! [`start`]: RecorderSink::start
//! [`stop`]: RecorderSink::stop
//! [`with_suppressed`]: RecorderSink::with_suppressed

use glmirror_core::trace::{CallSink, GlCall};

/// One entry of the call history.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    /// The call and its arguments.
    pub call: GlCall<'static>,
    /// `true` if the cache dropped the call as redundant.
    pub suppressed: bool,
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`CallSink`] that records call history between [`start`](Self::start)
/// and [`stop`](Self::stop).
#[derive(Debug, Default)]
pub struct RecorderSink {
    history: Vec<RecordedCall>,
    recording: bool,
    keep_suppressed: bool,
}

impl RecorderSink {
    /// Creates an idle recorder that keeps forwarded calls only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle recorder that also keeps suppressed calls.
    #[must_use]
    pub fn with_suppressed() -> Self {
        Self {
            keep_suppressed: true,
            ..Self::default()
        }
    }

    /// Clears the history and starts recording.
    pub fn start(&mut self) {
        self.history.clear();
        self.recording = true;
    }

    /// Stops recording and returns the history.
    pub fn stop(&mut self) -> &[RecordedCall] {
        self.recording = false;
        log::debug!("recorded {} calls", self.history.len());
        &self.history
    }

    /// Returns `true` between [`start`](Self::start) and
    /// [`stop`](Self::stop).
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Returns the history recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[RecordedCall] {
        &self.history
    }

    /// Takes the history, leaving it empty. Recording state is unchanged.
    pub fn take(&mut self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.history)
    }

    fn push(&mut self, call: &GlCall<'_>, suppressed: bool) {
        self.history.push(RecordedCall {
            call: call.clone().into_owned(),
            suppressed,
        });
    }
}

impl CallSink for RecorderSink {
    fn on_applied(&mut self, call: &GlCall<'_>) {
        if self.recording {
            self.push(call, false);
        }
    }

    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        if self.recording && self.keep_suppressed {
            self.push(call, true);
        }
    }
}
