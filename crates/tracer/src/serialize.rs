//! Chrome trace JSON output
//!
//! The written document is a single object, `{"traceEvents":[...]}`, which
//! chrome://tracing and Perfetto both load directly.

use crate::error::{TraceError, TraceResult};
use crate::event::TraceEvent;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Top-level trace document borrowing a slice of events.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TraceDocument<'a> {
    #[serde(rename = "traceEvents")]
    pub trace_events: &'a [TraceEvent],
}

impl<'a> TraceDocument<'a> {
    pub fn new(trace_events: &'a [TraceEvent]) -> Self {
        Self { trace_events }
    }

    /// Encode the whole document into memory.
    pub fn to_vec(&self, pretty: bool) -> TraceResult<Vec<u8>> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        Ok(bytes)
    }
}

/// Render events as a compact trace document.
pub fn to_json_string(events: &[TraceEvent]) -> TraceResult<String> {
    Ok(serde_json::to_string(&TraceDocument::new(events))?)
}

/// Write events as a trace document to any writer.
pub fn write_trace<W: Write>(writer: W, events: &[TraceEvent], pretty: bool) -> TraceResult<()> {
    let document = TraceDocument::new(events);
    if pretty {
        serde_json::to_writer_pretty(writer, &document)?;
    } else {
        serde_json::to_writer(writer, &document)?;
    }
    Ok(())
}

/// Write an already encoded document to `path` in one call.
///
/// Encoding happens before the file is touched, so a failure never leaves a
/// half-written document behind.
pub(crate) fn persist(path: &Path, bytes: &[u8], create_parent_dirs: bool) -> TraceResult<()> {
    if create_parent_dirs {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TraceError::io(parent, e))?;
        }
    }
    std::fs::write(path, bytes).map_err(|e| TraceError::io(path, e))
}
