//! Scoped Event Tracing
//!
//! This crate records timed events from any number of threads and writes them
//! as a Chrome trace JSON file, loadable in chrome://tracing or
//! <https://ui.perfetto.dev>:
//! - A thread-safe [`Tracer`] with explicit session begin/end
//! - Begin, end, complete and instant events
//! - RAII scope guards that record a complete event on every exit path
//! - A serializer producing `{"traceEvents":[...]}` documents
//!
//! # Feature Flags
//!
//! - `enabled` (default): the `trace_*!` macros record events. Without it they
//!   expand to nothing and never evaluate their name or category arguments,
//!   while the [`Tracer`] API stays available.
//!
//! # Example
//!
//! ```rust
//! use tracer::{trace_function, trace_instant, trace_scope, Tracer};
//!
//! fn simulate(tracer: &Tracer) {
//!     trace_function!(tracer);
//!     for step in 0..3 {
//!         trace_scope!(tracer, format!("step {step}"), "physics");
//!     }
//! }
//!
//! let path = std::env::temp_dir().join("tracer-doc-lib").join("trace.json");
//! let tracer = Tracer::new();
//! tracer.begin_session(&path);
//!
//! trace_instant!(tracer, "start", "app");
//! simulate(&tracer);
//!
//! let summary = tracer.end_session().unwrap().unwrap();
//! assert_eq!(summary.path, path);
//! ```
//!
//! # Modules
//!
//! - [`clock`] - Monotonic time and thread ids
//! - [`config`] - Tracer configuration
//! - [`event`] - Event and phase types
//! - [`serialize`] - Trace document output

pub mod clock;
pub mod config;
mod error;
pub mod event;
mod recorder;
mod scope;
pub mod serialize;

pub use clock::now;
pub use config::{TracerConfig, DEFAULT_OUTPUT_PATH};
pub use error::{TraceError, TraceResult};
pub use event::{Phase, TraceEvent, DEFAULT_CATEGORY, PROCESS_ID};
pub use recorder::{SessionSummary, Tracer};
pub use scope::ScopeTrace;
pub use serialize::{to_json_string, write_trace, TraceDocument};
