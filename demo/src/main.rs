//! Tracer demo
//!
//! Runs a few worker threads with nested scopes and explicit markers, then
//! writes the trace to the path given as the first argument (`trace.json` by
//! default). Set `TRACER_CONFIG` to load a tracer config file.

use std::thread;
use std::time::Duration;
use tracer::{trace_begin, trace_end, trace_function, trace_instant, trace_scope, Tracer, TracerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WORKERS: usize = 4;
const FRAMES: usize = 5;

fn load_assets(tracer: &Tracer) {
    trace_function!(tracer, "io");
    for asset in ["mesh", "texture", "audio"] {
        trace_scope!(tracer, format!("load {asset}"), "io");
        thread::sleep(Duration::from_millis(2));
    }
}

fn simulate_frame(tracer: &Tracer, worker: usize, frame: usize) {
    trace_scope!(tracer, format!("frame {frame}"), "physics");
    {
        trace_scope!(tracer, "integrate", "physics");
        thread::sleep(Duration::from_micros(500 * (worker as u64 + 1)));
    }
    if frame % 2 == 0 {
        trace_instant!(tracer, "checkpoint", "physics");
        trace_instant!(tracer, "step done");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::var_os("TRACER_CONFIG") {
        Some(path) => TracerConfig::load(path)?,
        None => TracerConfig::default(),
    };
    let tracer = Tracer::with_config(config)?;

    match std::env::args_os().nth(1) {
        Some(path) => tracer.begin_session(path),
        None => tracer.begin_default_session(),
    }
    tracing::info!(path = %tracer.output_path().display(), "recording trace");

    load_assets(&tracer);

    trace_begin!(tracer, "simulation", "app");
    thread::scope(|s| {
        for worker in 0..WORKERS {
            let tracer = &tracer;
            s.spawn(move || {
                for frame in 0..FRAMES {
                    simulate_frame(tracer, worker, frame);
                }
            });
        }
    });
    trace_end!(tracer, "simulation", "app");

    if let Some(summary) = tracer.end_session()? {
        tracing::info!(
            path = %summary.path.display(),
            events = summary.event_count,
            bytes = summary.bytes_written,
            "trace written"
        );
    }
    Ok(())
}
