//! Monotonic time source and thread identity

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Current time from the monotonic clock.
///
/// Values returned here are what [`Tracer::record_complete`](crate::Tracer::record_complete)
/// expects for its `start` and `end` arguments.
#[inline]
pub fn now() -> Instant {
    Instant::now()
}

/// Small integer identifying the calling thread.
///
/// Ids are handed out from a process-wide counter the first time a thread asks,
/// so they stay stable for the thread's lifetime and are never shared between
/// two live threads. Returns `0` if called while the thread's locals are being
/// torn down.
pub fn current_thread_id() -> u64 {
    THREAD_ID.try_with(|id| *id).unwrap_or(0)
}

/// Microseconds from `earlier` to `later`, clamped at zero.
#[inline]
pub fn micros_between(earlier: Instant, later: Instant) -> f64 {
    later.saturating_duration_since(earlier).as_secs_f64() * 1_000_000.0
}
