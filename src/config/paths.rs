//! Output path resolution
//!
//! ## Base Directory Resolution Order
//!
//! 1. `--output` flag (if given)
//! 2. `STATEMENT_EXPORT_OUTPUT_DIR` environment variable (if set)
//! 3. `output_directory` in the settings file
//! 4. `<Documents>/StatementExport`, falling back to `~/Documents/StatementExport`
//!
//! Runs write below the base directory:
//! - auto-export: `<base>/<timestamp>/<account>/...`
//! - single account: `<base>/<account>/<timestamp>/...`

use super::{Settings, OUTPUT_DIR_ENV};
use crate::core::account_dir;
use crate::types::ExportError;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Fixed application folder under the documents directory
pub const APP_FOLDER: &str = "StatementExport";

/// Run timestamp format; contains no characters invalid in file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S %z";

/// Resolved output locations for export runs
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    base_dir: PathBuf,
}

impl OutputPaths {
    /// Resolve the base directory from the CLI override, environment and settings
    pub fn resolve(settings: &Settings, cli_override: Option<&Path>) -> Self {
        let base_dir = cli_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(OUTPUT_DIR_ENV).ok().map(PathBuf::from))
            .or_else(|| settings.output_directory.clone())
            .unwrap_or_else(default_base_dir);

        Self { base_dir }
    }

    /// Use a fixed base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for an auto-export run started at `now`
    ///
    /// Every account of the run writes to its own subdirectory of this one.
    pub fn auto_export_dir<Tz>(&self, now: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.base_dir.join(timestamp(now))
    }

    /// Directory for a single-account export started at `now`
    ///
    /// # Errors
    ///
    /// `ExportError::OutputDirectory` if `account` is not a plain directory name.
    pub fn account_export_dir<Tz>(
        &self,
        account: &str,
        now: &DateTime<Tz>,
    ) -> Result<PathBuf, ExportError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Ok(account_dir(&self.base_dir, account)?.join(timestamp(now)))
    }
}

fn timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

fn default_base_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("Documents"))
        .join(APP_FOLDER)
}
