//! Runtime configuration
//!
//! Read from an optional JSON file. Every field has a default, so an empty
//! object `{}` is a complete configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::schema::DEFAULT_SAMPLE_LINES;
use crate::storage::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SorerConfig {
    /// Rows per sealed page (default 100000)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Line cap for schema inference (default 500)
    #[serde(default = "default_sample_lines")]
    pub sample_lines: usize,

    /// Spill directory for sealed pages; a fresh temp dir when unset
    #[serde(default)]
    pub page_dir: Option<PathBuf>,

    /// Keep the temp spill directory after the run
    #[serde(default)]
    pub keep_pages: bool,

    /// Minimum log severity written to stderr (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_sample_lines() -> usize {
    DEFAULT_SAMPLE_LINES
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SorerConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            sample_lines: default_sample_lines(),
            page_dir: None,
            keep_pages: false,
            log_level: default_log_level(),
        }
    }
}

impl SorerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config: {}", e)))?;

        let config: SorerConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::new("chunk_size must be > 0"));
        }

        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::new(format!(
                "chunk_size must be <= {}",
                MAX_CHUNK_SIZE
            )));
        }

        if self.sample_lines == 0 {
            return Err(ConfigError::new("sample_lines must be > 0"));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::new(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Log threshold named by `log_level`, `Warn` if unrecognized
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Warn)
    }
}

/// Unreadable, malformed or invalid configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Create a config error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        "SOR_CONFIG_ERROR"
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("sorer.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = SorerConfig::load(&write_config(&tmp, "{}")).unwrap();
        assert_eq!(config, SorerConfig::default());
        assert_eq!(config.chunk_size, 100_000);
        assert_eq!(config.sample_lines, 500);
        assert_eq!(config.log_severity(), Severity::Warn);
    }

    #[test]
    fn test_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"{"chunk_size": 4, "page_dir": "/tmp/pages", "keep_pages": true, "log_level": "TRACE"}"#,
        );
        let config = SorerConfig::load(&path).unwrap();
        assert_eq!(config.chunk_size, 4);
        assert_eq!(config.page_dir, Some(PathBuf::from("/tmp/pages")));
        assert!(config.keep_pages);
        assert_eq!(config.log_severity(), Severity::Trace);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = SorerConfig::load(&write_config(&tmp, r#"{"chunk_size": 0}"#)).unwrap_err();
        assert!(err.message().contains("chunk_size"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_chunk_size_rejected() {
        let config = SorerConfig {
            chunk_size: MAX_CHUNK_SIZE + 1,
            ..SorerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("chunk_size"));

        let largest = SorerConfig {
            chunk_size: MAX_CHUNK_SIZE,
            ..SorerConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_zero_sample_lines_rejected() {
        let config = SorerConfig {
            sample_lines: 0,
            ..SorerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = SorerConfig::load(&write_config(&tmp, r#"{"log_level": "loud"}"#)).unwrap_err();
        assert!(err.to_string().starts_with("SOR_CONFIG_ERROR"));
    }

    #[test]
    fn test_bad_json_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = SorerConfig::load(&write_config(&tmp, "{chunk_size")).unwrap_err();
        assert!(err.message().starts_with("Invalid config JSON"));
    }

    #[test]
    fn test_missing_file_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = SorerConfig::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(err.message().starts_with("Failed to read config"));
    }
}
