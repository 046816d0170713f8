//! Error types for the tracer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring a tracer or writing a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Failed to read or write a file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode or decode JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration value is not usable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TraceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for tracer operations.
pub type TraceResult<T> = Result<T, TraceError>;
