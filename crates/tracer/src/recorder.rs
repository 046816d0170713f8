//! Session-scoped event recorder
//!
//! A [`Tracer`] is the single sink for every event in a trace. Handles are
//! cheap to clone and share one synchronized event buffer, so threads record
//! into the same session without coordinating with each other.
//!
//! Events are stored in the order their recording calls acquire the lock.
//! Under contention that is not necessarily timestamp order; trace viewers
//! sort on load, and [`TracerConfig::sort_by_timestamp`] sorts at write time
//! for consumers that need it.

use crate::clock;
use crate::config::TracerConfig;
use crate::error::TraceResult;
use crate::event::{Phase, TraceEvent, DEFAULT_CATEGORY};
use crate::serialize::{self, TraceDocument};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a session that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Where the trace was written
    pub path: PathBuf,
    /// Number of events in the trace
    pub event_count: usize,
    /// Size of the written document
    pub bytes_written: usize,
    /// Time between session begin and end
    pub duration: Duration,
}

#[derive(Debug)]
struct Session {
    events: Vec<TraceEvent>,
    epoch: Instant,
    output_path: PathBuf,
    active: bool,
    dropped: u64,
}

impl Session {
    /// Close the session and write its events.
    ///
    /// Events are discarded whether or not the write succeeds.
    fn finish(&mut self, config: &TracerConfig) -> TraceResult<Option<SessionSummary>> {
        if !self.active {
            return Ok(None);
        }
        self.active = false;

        let mut events = std::mem::take(&mut self.events);
        if config.sort_by_timestamp {
            events.sort_by(|a, b| a.timestamp_us().total_cmp(&b.timestamp_us()));
        }

        let bytes = TraceDocument::new(&events).to_vec(config.pretty)?;
        serialize::persist(&self.output_path, &bytes, config.create_parent_dirs)?;

        let summary = SessionSummary {
            path: self.output_path.clone(),
            event_count: events.len(),
            bytes_written: bytes.len(),
            duration: self.epoch.elapsed(),
        };
        tracing::debug!(
            path = %summary.path.display(),
            events = summary.event_count,
            bytes = summary.bytes_written,
            "trace session written"
        );
        Ok(Some(summary))
    }
}

#[derive(Debug)]
struct Shared {
    config: TracerConfig,
    default_category: Cow<'static, str>,
    session: Mutex<Session>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let session = self
            .session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = session.finish(&self.config) {
            tracing::error!(error = %e, "failed to write trace session on shutdown");
        }
    }
}

/// Thread-safe event recorder with explicit session control.
///
/// Clone the handle to share it; all clones record into the same session.
/// When the last handle is dropped, a still-active session is written out.
///
/// # Example
///
/// ```rust
/// use tracer::Tracer;
///
/// let dir = std::env::temp_dir().join("tracer-doc-recorder");
/// let tracer = Tracer::new();
///
/// tracer.begin_session(dir.join("trace.json"));
/// tracer.record_instant("startup", "app");
/// let start = Tracer::now();
/// // ... work ...
/// tracer.record_complete("work", "app", start, Tracer::now());
///
/// let summary = tracer.end_session().unwrap().unwrap();
/// assert_eq!(summary.event_count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Tracer {
    shared: Arc<Shared>,
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracer {
    /// Create a tracer with the default configuration.
    pub fn new() -> Self {
        Self::build(TracerConfig::default())
    }

    /// Create a tracer with a validated configuration.
    pub fn with_config(config: TracerConfig) -> TraceResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TracerConfig) -> Self {
        let default_category = if config.default_category == DEFAULT_CATEGORY {
            Cow::Borrowed(DEFAULT_CATEGORY)
        } else {
            Cow::Owned(config.default_category.clone())
        };
        let session = Session {
            events: Vec::new(),
            epoch: clock::now(),
            output_path: config.default_path.clone(),
            active: false,
            dropped: 0,
        };

        Self {
            shared: Arc::new(Shared {
                config,
                default_category,
                session: Mutex::new(session),
            }),
        }
    }

    /// Current time from the monotonic clock, for use with [`record_complete`](Self::record_complete).
    #[inline]
    pub fn now() -> Instant {
        clock::now()
    }

    /// Get the configuration this tracer was built with.
    pub fn config(&self) -> &TracerConfig {
        &self.shared.config
    }

    /// Category applied when a scope guard doesn't name one.
    pub fn default_category(&self) -> &str {
        &self.shared.default_category
    }

    pub(crate) fn default_category_cow(&self) -> Cow<'static, str> {
        self.shared.default_category.clone()
    }

    // Recording must never take the host program down, so a lock poisoned by a
    // panicking recorder is used as-is.
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new session writing to `path`.
    ///
    /// Always resets: events from any earlier session, written or not, are
    /// discarded and the epoch is re-captured.
    pub fn begin_session(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut session = self.lock();

        if session.active && !session.events.is_empty() {
            tracing::debug!(
                discarded = session.events.len(),
                path = %session.output_path.display(),
                "restarting active trace session"
            );
        }
        if session.dropped > 0 {
            tracing::warn!(
                dropped = session.dropped,
                "events were recorded outside a session and discarded"
            );
        }

        session.events.clear();
        session.events.reserve(self.shared.config.initial_capacity);
        session.output_path = path;
        session.dropped = 0;
        session.active = true;
        session.epoch = clock::now();

        tracing::debug!(path = %session.output_path.display(), "trace session started");
    }

    /// Start a new session writing to the configured default path.
    pub fn begin_default_session(&self) {
        self.begin_session(self.shared.config.default_path.clone());
    }

    /// End the session and write the trace file.
    ///
    /// Returns `Ok(None)` if no session was active. The file is written while
    /// the recorder lock is held, so concurrent recording calls wait for it.
    pub fn end_session(&self) -> TraceResult<Option<SessionSummary>> {
        let mut session = self.lock();
        session.finish(&self.shared.config)
    }

    /// Record a complete event spanning `start..end`.
    ///
    /// `start` and `end` should come from [`Tracer::now`].
    pub fn record_complete(
        &self,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
        start: Instant,
        end: Instant,
    ) {
        let thread_id = clock::current_thread_id();
        let duration_us = clock::micros_between(start, end);
        self.append(start, |timestamp_us| {
            TraceEvent::complete(name, category, timestamp_us, duration_us, thread_id)
        });
    }

    /// Record the start of a manually paired duration.
    ///
    /// Nothing checks that a matching [`record_end`](Self::record_end) follows.
    pub fn record_begin(
        &self,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
    ) {
        self.record_phase(Phase::Begin, name, category);
    }

    /// Record the end of a manually paired duration.
    pub fn record_end(
        &self,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
    ) {
        self.record_phase(Phase::End, name, category);
    }

    /// Record a zero-duration event.
    pub fn record_instant(
        &self,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
    ) {
        self.record_phase(Phase::Instant, name, category);
    }

    /// Record a begin marker in the default category.
    pub fn record_begin_default(&self, name: impl Into<Cow<'static, str>>) {
        self.record_phase(Phase::Begin, name, self.default_category_cow());
    }

    /// Record an end marker in the default category.
    pub fn record_end_default(&self, name: impl Into<Cow<'static, str>>) {
        self.record_phase(Phase::End, name, self.default_category_cow());
    }

    /// Record an instant event in the default category.
    pub fn record_instant_default(&self, name: impl Into<Cow<'static, str>>) {
        self.record_phase(Phase::Instant, name, self.default_category_cow());
    }

    fn record_phase(
        &self,
        phase: Phase,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
    ) {
        let at = clock::now();
        let thread_id = clock::current_thread_id();
        self.append(at, |timestamp_us| {
            TraceEvent::at(phase, name, category, timestamp_us, thread_id)
        });
    }

    /// Append the event built for `at`, or drop it when no session is active.
    fn append(&self, at: Instant, build: impl FnOnce(f64) -> TraceEvent) {
        let mut session = self.lock();
        if !session.active {
            session.dropped += 1;
            drop(session);
            tracing::trace!(target: "tracer::drop", "no active session, event dropped");
            return;
        }

        let timestamp_us = clock::micros_between(session.epoch, at);
        session.events.push(build(timestamp_us));
    }

    /// Check whether a session is currently accepting events.
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Number of events recorded in the current session.
    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    /// Number of events dropped because no session was active, since the
    /// last [`begin_session`](Self::begin_session).
    pub fn dropped_count(&self) -> u64 {
        self.lock().dropped
    }

    /// Path the current (or most recent) session writes to.
    pub fn output_path(&self) -> PathBuf {
        self.lock().output_path.clone()
    }

    /// Microseconds elapsed since the current session began.
    pub fn elapsed_us(&self) -> f64 {
        let epoch = self.lock().epoch;
        clock::micros_between(epoch, clock::now())
    }

    /// Copy of the events recorded so far in the current session.
    pub fn snapshot(&self) -> Vec<TraceEvent> {
        self.lock().events.clone()
    }

    /// Write the current session's events to `writer` without ending it.
    pub fn write_snapshot<W: std::io::Write>(&self, writer: W) -> TraceResult<()> {
        let session = self.lock();
        serialize::write_trace(writer, &session.events, self.shared.config.pretty)
    }

    /// Whether two handles refer to the same recorder.
    pub fn same_recorder(&self, other: &Tracer) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
