// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable call output.
//!
//! [`PrettyPrintSink`] implements [`CallSink`] and writes one line per call to
//! a [`Write`](std::io::Write) destination (default: stderr). Arguments are
//! printed in their JSON form, so handles show up as plain numbers and enums
//! as snake-case names:
//!
//! ```text
//! [applied] bindFramebuffer ["draw",2]
//! [suppressed] enable "blend"
//! ```

use std::io::Write;

use serde_json::Value;

use glmirror_core::trace::{CallSink, GlCall};

/// Writes human-readable call lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    show_suppressed: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("show_suppressed", &self.show_suppressed)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Suppressed calls are printed too; see
    /// [`show_suppressed`](Self::show_suppressed).
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            show_suppressed: true,
        }
    }

    /// Sets whether suppressed calls are printed.
    #[must_use]
    pub fn show_suppressed(mut self, show: bool) -> Self {
        self.show_suppressed = show;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, tag: &str, call: &GlCall<'_>) {
        let _ = writeln!(self.writer, "[{tag}] {} {}", call.name(), args(call));
    }
}

/// Renders the arguments of `call` as compact JSON.
fn args(call: &GlCall<'_>) -> String {
    match serde_json::to_value(call) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .next()
            .map(|(_, v)| v.to_string())
            .unwrap_or_default(),
        Ok(other) => other.to_string(),
        Err(err) => format!("<{err}>"),
    }
}

impl<W: Write> CallSink for PrettyPrintSink<W> {
    fn on_applied(&mut self, call: &GlCall<'_>) {
        self.line("applied", call);
    }

    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        if self.show_suppressed {
            self.line("suppressed", call);
        }
    }
}
