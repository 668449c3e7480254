// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded call history.
//!
//! [`export`] writes the history held by a
//! [`RecorderSink`](crate::recorder::RecorderSink) as a JSON array, one object
//! per call:
//!
//! ```json
//! [
//!   { "index": 0, "name": "viewport", "suppressed": false,
//!     "call": { "viewport": [0, 0, 640, 480] } }
//! ]
//! ```
//!
//! [`load`] reads such a document back. `name` and `index` are informational
//! and ignored on load.

use std::io::{self, Read, Write};

use serde_json::{Value, json};

use glmirror_core::trace::GlCall;

use crate::recorder::RecordedCall;

/// Writes `calls` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns any error from `writer` or from serialization.
pub fn export(calls: &[RecordedCall], writer: &mut dyn Write) -> io::Result<()> {
    let mut entries: Vec<Value> = Vec::with_capacity(calls.len());
    for (index, entry) in calls.iter().enumerate() {
        entries.push(json!({
            "index": index,
            "name": entry.call.name(),
            "suppressed": entry.suppressed,
            "call": serde_json::to_value(&entry.call)?,
        }));
    }
    serde_json::to_writer_pretty(writer, &entries)?;
    Ok(())
}

/// Reads a history written by [`export`].
///
/// # Errors
///
/// Returns an error if the input is not valid JSON, is not an array, or
/// contains an entry without a valid `call`.
pub fn load(reader: impl Read) -> io::Result<Vec<RecordedCall>> {
    let entries: Vec<Value> = serde_json::from_reader(reader)?;
    entries
        .into_iter()
        .map(|mut entry| -> io::Result<RecordedCall> {
            let suppressed = entry
                .get("suppressed")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let call = entry.get_mut("call").map(Value::take).unwrap_or_default();
            let call: GlCall<'static> = serde_json::from_value(call)?;
            Ok(RecordedCall { call, suppressed })
        })
        .collect()
}
