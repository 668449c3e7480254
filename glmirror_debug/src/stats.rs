// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Suppression statistics.

use std::collections::BTreeMap;

use glmirror_core::trace::{CallSink, GlCall};

/// Forwarded and suppressed counts for one entry point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    /// Calls forwarded to the context.
    pub applied: u64,
    /// Calls dropped as redundant.
    pub suppressed: u64,
}

impl Counts {
    /// Returns the total number of calls seen.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.applied + self.suppressed
    }
}

/// A [`CallSink`] that counts calls per entry point.
#[derive(Clone, Debug, Default)]
pub struct CallStats {
    per_call: BTreeMap<&'static str, Counts>,
    totals: Counts,
}

impl CallStats {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counts over all entry points.
    #[must_use]
    pub fn totals(&self) -> Counts {
        self.totals
    }

    /// Returns the counts for one entry point, by its WebGL name.
    #[must_use]
    pub fn get(&self, name: &str) -> Counts {
        self.per_call.get(name).copied().unwrap_or_default()
    }

    /// Iterates over entry points that were called, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Counts)> + '_ {
        self.per_call.iter().map(|(&name, &counts)| (name, counts))
    }

    /// Returns the fraction of calls that were suppressed, or `None` if no
    /// calls were seen.
    #[must_use]
    pub fn suppression_ratio(&self) -> Option<f64> {
        let total = self.totals.total();
        (total > 0).then(|| self.totals.suppressed as f64 / total as f64)
    }

    /// Clears all counters.
    pub fn reset(&mut self) {
        self.per_call.clear();
        self.totals = Counts::default();
    }

    /// Logs a one-line summary at `info` level.
    pub fn log_summary(&self) {
        log::info!(
            "{} calls, {} forwarded, {} suppressed ({:.1}%)",
            self.totals.total(),
            self.totals.applied,
            self.totals.suppressed,
            self.suppression_ratio().unwrap_or(0.0) * 100.0,
        );
    }
}

impl CallSink for CallStats {
    fn on_applied(&mut self, call: &GlCall<'_>) {
        self.per_call.entry(call.name()).or_default().applied += 1;
        self.totals.applied += 1;
    }

    fn on_suppressed(&mut self, call: &GlCall<'_>) {
        self.per_call.entry(call.name()).or_default().suppressed += 1;
        self.totals.suppressed += 1;
    }
}
