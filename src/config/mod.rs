//! Configuration management
//!
//! Settings come from a TOML file, environment variables and command-line
//! flags. Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values
//!
//! The file lives at `<config dir>/statement-export/config.toml` unless
//! `STATEMENT_EXPORT_CONFIG` points elsewhere. A missing file means defaults.

pub mod paths;

pub use paths::OutputPaths;

use crate::core::{DEFAULT_FORMAT, DEFAULT_MAX_CONCURRENT};
use crate::types::ExportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
pub const APP_NAME: &str = "statement-export";

pub const CONFIG_ENV: &str = "STATEMENT_EXPORT_CONFIG";
pub const OUTPUT_DIR_ENV: &str = "STATEMENT_EXPORT_OUTPUT_DIR";
pub const SERVICE_DIR_ENV: &str = "STATEMENT_EXPORT_SERVICE_DIR";

/// Settings file contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Base directory exports are written under
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Directory the local account service reads from
    #[serde(default)]
    pub service_directory: Option<PathBuf>,

    /// Default export format tag
    #[serde(default = "default_format")]
    pub export_format: String,

    /// Number of statements fetched at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_exports: usize,

    /// Per-request timeout in seconds (unset waits indefinitely)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Log level used when no verbosity flag is given
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_directory: None,
            service_directory: None,
            export_format: default_format(),
            max_concurrent_exports: default_max_concurrent(),
            request_timeout_secs: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Default settings file location
    ///
    /// `STATEMENT_EXPORT_CONFIG` overrides the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(custom) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(custom));
        }
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load settings from `path`, or from the default location when `None`
    ///
    /// A missing file yields default settings.
    ///
    /// # Errors
    ///
    /// `ExportError::Config` if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ExportError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).map_err(|e| {
                ExportError::config(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ExportError::config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, ExportError> {
        toml::from_str(content).map_err(|e| ExportError::config(e.message()))
    }

    /// Service directory after applying the environment override
    pub fn service_directory(&self) -> Option<PathBuf> {
        std::env::var(SERVICE_DIR_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| self.service_directory.clone())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.export_format, "qfx");
        assert_eq!(settings.max_concurrent_exports, 3);
    }

    #[test]
    fn test_parse_full() {
        let settings = Settings::parse(
            r#"
            output_directory = "/tmp/exports"
            service_directory = "/srv/accounts"
            export_format = "csv"
            max_concurrent_exports = 5
            request_timeout_secs = 30
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(settings.output_directory, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(settings.service_directory, Some(PathBuf::from("/srv/accounts")));
        assert_eq!(settings.export_format, "csv");
        assert_eq!(settings.max_concurrent_exports, 5);
        assert_eq!(settings.request_timeout_secs, Some(30));
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_parse_invalid() {
        let result = Settings::parse("max_concurrent_exports = \"many\"");
        assert!(matches!(result, Err(ExportError::Config { .. })));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = 3").unwrap();

        let error = Settings::load(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("config.toml"));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
