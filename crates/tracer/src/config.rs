//! Tracer configuration

use crate::error::{TraceError, TraceResult};
use crate::event::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output file used when a session does not name one.
pub const DEFAULT_OUTPUT_PATH: &str = "trace.json";

/// Configuration for a [`Tracer`](crate::Tracer).
///
/// Every field has a default, so a settings file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TracerConfig {
    /// Output path for [`Tracer::begin_default_session`](crate::Tracer::begin_default_session)
    pub default_path: PathBuf,
    /// Category given to scope guards that don't name one
    pub default_category: String,
    /// Sort events by timestamp before writing instead of keeping record order
    pub sort_by_timestamp: bool,
    /// Pretty-print the trace file
    pub pretty: bool,
    /// Create missing parent directories of the output path
    pub create_parent_dirs: bool,
    /// Number of events to reserve room for at session start
    pub initial_capacity: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            default_category: DEFAULT_CATEGORY.to_string(),
            sort_by_timestamp: false,
            pretty: false,
            create_parent_dirs: true,
            initial_capacity: 1024,
        }
    }
}

impl TracerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output path used by default sessions.
    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = path.into();
        self
    }

    /// Set the category used when none is given.
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    /// Sort events by timestamp before writing.
    pub fn with_sort_by_timestamp(mut self, sort: bool) -> Self {
        self.sort_by_timestamp = sort;
        self
    }

    /// Pretty-print the trace file.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Create missing parent directories of the output path.
    pub fn with_create_parent_dirs(mut self, create: bool) -> Self {
        self.create_parent_dirs = create;
        self
    }

    /// Set how many events to reserve room for at session start.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> TraceResult<()> {
        if self.default_path.as_os_str().is_empty() {
            return Err(TraceError::Config(
                "default_path must not be empty".to_string(),
            ));
        }
        if self.default_category.is_empty() {
            return Err(TraceError::Config(
                "default_category must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// parsed is an error rather than a silent fallback.
    pub fn load(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no tracer config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> TraceResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TraceError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| TraceError::io(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TracerConfig::default();

        assert_eq!(config.default_path, PathBuf::from("trace.json"));
        assert_eq!(config.default_category, "function");
        assert!(!config.sort_by_timestamp);
        assert!(!config.pretty);
        assert!(config.create_parent_dirs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TracerConfig::new()
            .with_default_path("out/run.json")
            .with_default_category("frame")
            .with_sort_by_timestamp(true)
            .with_pretty(true)
            .with_create_parent_dirs(false)
            .with_initial_capacity(16);

        assert_eq!(config.default_path, PathBuf::from("out/run.json"));
        assert_eq!(config.default_category, "frame");
        assert!(config.sort_by_timestamp);
        assert!(config.pretty);
        assert!(!config.create_parent_dirs);
        assert_eq!(config.initial_capacity, 16);
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let err = TracerConfig::new().with_default_path("").validate().unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));

        let err = TracerConfig::new()
            .with_default_category("")
            .validate()
            .unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = TracerConfig::load(temp_dir.path().join("tracer.json")).unwrap();

        assert_eq!(config, TracerConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracer.json");
        std::fs::write(&path, r#"{"pretty": true, "default_category": "render"}"#).unwrap();

        let config = TracerConfig::load(&path).unwrap();

        assert!(config.pretty);
        assert_eq!(config.default_category, "render");
        assert_eq!(config.default_path, PathBuf::from("trace.json"));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracer.json");
        std::fs::write(&path, "{ pretty: yes").unwrap();

        let err = TracerConfig::load(&path).unwrap_err();
        assert!(matches!(err, TraceError::Serialization(_)));
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracer.json");
        std::fs::write(&path, r#"{"default_category": ""}"#).unwrap();

        let err = TracerConfig::load(&path).unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tracer.json");
        let config = TracerConfig::new()
            .with_default_path("traces/app.json")
            .with_sort_by_timestamp(true);

        config.save(&path).unwrap();
        let loaded = TracerConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
