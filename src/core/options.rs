//! Export options
//!
//! `ExportOptions` is the immutable configuration of one export run: which
//! statements qualify, which format and time zone the service is asked for,
//! and how the session's fetches are bounded.

use crate::types::{ExportError, Statement};
use chrono::{FixedOffset, Local, NaiveDate};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default export format tag
pub const DEFAULT_FORMAT: &str = "qfx";

/// Default number of statements fetched at the same time
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Options for an export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Only statements opening on or after this date are exported
    pub start_from: Option<NaiveDate>,

    /// Format tag passed to the account service
    pub export_format: String,

    /// Time zone the service interprets statement boundaries in
    pub time_zone: FixedOffset,

    /// Upper bound on in-flight fetches per session
    pub max_concurrent: usize,

    /// Per-call timeout for account service requests (None waits forever)
    pub request_timeout: Option<Duration>,

    /// Cancels every pending account service request of the run
    pub cancel: CancellationToken,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            start_from: None,
            export_format: DEFAULT_FORMAT.to_string(),
            time_zone: *Local::now().offset(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl ExportOptions {
    /// Whether a statement qualifies for export
    ///
    /// A statement is excluded only when `start_from` is set and falls
    /// strictly after the statement's opening date.
    pub fn include(&self, statement: &Statement) -> bool {
        match self.start_from {
            Some(start_from) => start_from <= statement.opening_date,
            None => true,
        }
    }

    pub fn with_start_from(mut self, start_from: Option<NaiveDate>) -> Self {
        self.start_from = start_from;
        self
    }

    /// Start from the opening date of `statement`, keeping that statement included
    pub fn after_statement(self, statement: &Statement) -> Self {
        self.with_start_from(Some(statement.opening_date))
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.export_format = format.into();
        self
    }

    pub fn with_time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Set the fetch concurrency; zero falls back to the default with a warning
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = if max_concurrent == 0 {
            tracing::warn!(
                "Invalid max_concurrent ({}), using default ({})",
                max_concurrent,
                DEFAULT_MAX_CONCURRENT
            );
            DEFAULT_MAX_CONCURRENT
        } else {
            max_concurrent
        };
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Parse a UTC offset such as `+02:00`, `-0500`, `Z` or `UTC`
///
/// # Errors
///
/// Returns `ExportError::InvalidOption` for anything else.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, ExportError> {
    let trimmed = value.trim();
    let invalid = || ExportError::invalid_option("time zone", value);

    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };

    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
