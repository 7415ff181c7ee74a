//! Account service abstraction
//!
//! This module defines the boundary between the exporter and the external
//! account service. Every call is asynchronous; the exporter awaits each one
//! inside its own unit of work and never assumes anything about how the
//! service completes it.

use crate::types::{Account, AccountId, ExportError, ExportPayload, Statement};
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};

/// Parameters of one transaction data export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// The account to export from
    pub account: AccountId,

    /// Export format tag, e.g. `qfx`
    pub format: String,

    /// First day of the range (inclusive)
    pub begin: NaiveDate,

    /// Last day of the range (inclusive)
    pub end: NaiveDate,

    /// Time zone the range boundaries are interpreted in
    pub time_zone: FixedOffset,
}

/// Trait for the external account service
///
/// Implementations must be shareable across tasks; the export session holds
/// one behind an `Arc` and calls it from several in-flight fetches at once.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// List every account known to the service
    async fn list_accounts(&self) -> Result<Vec<Account>, ExportError>;

    /// List the statements of one account
    async fn list_statements(&self, account: &str) -> Result<Vec<Statement>, ExportError>;

    /// Export transaction data for a date range
    ///
    /// `Ok(None)` means the service completed without producing any data.
    async fn export_transaction_data(
        &self,
        request: ExportRequest,
    ) -> Result<Option<ExportPayload>, ExportError>;
}
