//! Trace event types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Process id written on every event. Traces describe a single process.
pub const PROCESS_ID: u32 = 0;

/// Category used when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "function";

/// Phase of a trace event.
///
/// Serialized as the single-character code trace viewers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start of a manually paired duration
    #[serde(rename = "B")]
    Begin,
    /// End of a manually paired duration
    #[serde(rename = "E")]
    End,
    /// Self-contained span carrying its own duration
    #[serde(rename = "X")]
    Complete,
    /// Zero-duration point in time
    #[serde(rename = "I")]
    Instant,
}

impl Phase {
    /// The phase character written to the `ph` field.
    pub fn as_char(self) -> char {
        match self {
            Phase::Begin => 'B',
            Phase::End => 'E',
            Phase::Complete => 'X',
            Phase::Instant => 'I',
        }
    }

    /// Whether events of this phase carry a `dur` field.
    #[inline]
    pub fn has_duration(self) -> bool {
        matches!(self, Phase::Complete)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single recorded event.
///
/// Field order matches the order keys are written in the trace file. The
/// duration is only present on [`Phase::Complete`] events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    name: Cow<'static, str>,
    #[serde(rename = "cat")]
    category: Cow<'static, str>,
    #[serde(rename = "ph")]
    phase: Phase,
    /// Microseconds since the session epoch
    #[serde(rename = "ts")]
    timestamp_us: f64,
    pid: u32,
    #[serde(rename = "tid")]
    thread_id: u64,
    #[serde(rename = "dur", default, skip_serializing_if = "Option::is_none")]
    duration_us: Option<f64>,
}

impl TraceEvent {
    /// Create a complete event spanning `duration_us` from `timestamp_us`.
    pub fn complete(
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
        timestamp_us: f64,
        duration_us: f64,
        thread_id: u64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            phase: Phase::Complete,
            timestamp_us,
            pid: PROCESS_ID,
            thread_id,
            duration_us: Some(duration_us),
        }
    }

    /// Create a point event of the given phase.
    ///
    /// Passing [`Phase::Complete`] produces a zero-length complete event so the
    /// `dur` field is never missing from an `X` event.
    pub fn at(
        phase: Phase,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
        timestamp_us: f64,
        thread_id: u64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            phase,
            timestamp_us,
            pid: PROCESS_ID,
            thread_id,
            duration_us: phase.has_duration().then_some(0.0),
        }
    }

    /// Get the event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the event category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get the event phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Microseconds between the session start and this event.
    pub fn timestamp_us(&self) -> f64 {
        self.timestamp_us
    }

    /// Duration in microseconds, `None` unless this is a complete event.
    pub fn duration_us(&self) -> Option<f64> {
        self.duration_us
    }

    /// Get the id of the thread that recorded this event.
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// Get the process id, always [`PROCESS_ID`].
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_chars() {
        assert_eq!(Phase::Begin.as_char(), 'B');
        assert_eq!(Phase::End.as_char(), 'E');
        assert_eq!(Phase::Complete.as_char(), 'X');
        assert_eq!(Phase::Instant.as_char(), 'I');
        assert_eq!(Phase::Complete.to_string(), "X");
    }

    #[test]
    fn test_phase_serialization() {
        assert_eq!(serde_json::to_string(&Phase::Begin).unwrap(), "\"B\"");
        assert_eq!(serde_json::to_string(&Phase::End).unwrap(), "\"E\"");
        assert_eq!(serde_json::to_string(&Phase::Complete).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Phase::Instant).unwrap(), "\"I\"");
    }

    #[test]
    fn test_instant_event_json() {
        let event = TraceEvent::at(Phase::Instant, "Start", "x", 12.5, 3);
        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"name":"Start","cat":"x","ph":"I","ts":12.5,"pid":0,"tid":3}"#
        );
    }

    #[test]
    fn test_complete_event_json() {
        let event = TraceEvent::complete("Work", DEFAULT_CATEGORY, 100.0, 250.25, 7);
        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"name":"Work","cat":"function","ph":"X","ts":100.0,"pid":0,"tid":7,"dur":250.25}"#
        );
    }

    #[test]
    fn test_begin_end_have_no_duration() {
        let begin = TraceEvent::at(Phase::Begin, "load", "io", 1.0, 1);
        let end = TraceEvent::at(Phase::End, "load", "io", 2.0, 1);

        assert_eq!(begin.duration_us(), None);
        assert_eq!(end.duration_us(), None);
        assert!(!serde_json::to_string(&begin).unwrap().contains("dur"));
    }

    #[test]
    fn test_point_complete_event_keeps_duration() {
        let event = TraceEvent::at(Phase::Complete, "tick", "loop", 5.0, 1);
        assert_eq!(event.duration_us(), Some(0.0));
    }

    #[test]
    fn test_event_escapes_names() {
        let event = TraceEvent::at(Phase::Instant, "say \"hi\"\n", "a\\b", 0.0, 1);
        let json = serde_json::to_string(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "say \"hi\"\n");
        assert_eq!(value["cat"], "a\\b");
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"name":"Work","cat":"c","ph":"X","ts":1.5,"pid":0,"tid":2,"dur":3.0}"#;
        let event: TraceEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.name(), "Work");
        assert_eq!(event.phase(), Phase::Complete);
        assert_eq!(event.duration_us(), Some(3.0));
        assert_eq!(event.thread_id(), 2);
        assert_eq!(event.pid(), PROCESS_ID);
    }
}
