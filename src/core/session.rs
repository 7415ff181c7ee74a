//! Export session: concurrent statement export for one account
//!
//! An `ExportSession` owns one account's export run. `export` fans out one
//! fetch per statement with a bounded number in flight, writes each payload
//! to the output directory as soon as its fetch completes, and returns a
//! report with exactly one outcome per statement.
//!
//! # Failure isolation
//!
//! Only a failure to create the output directory aborts the run. A fetch or
//! write failure is recorded against its statement and the other statements
//! carry on.
//!
//! # Concurrency
//!
//! ```text
//! export(output)
//!     ├── run lock (one export per session at a time)
//!     ├── create_dir_all(output)            fatal on error
//!     ├── buffer_unordered(max_concurrent)  fetch -> write -> outcome
//!     └── join -> ExportReport              one log line per statement
//! ```
//!
//! Each fetch returns its outcome as a value; outcomes are gathered at the
//! join point, so no map is shared between in-flight fetches.

use super::call::bounded_call;
use super::options::ExportOptions;
use super::statement_loader::load_statements;
use super::traits::{AccountService, ExportRequest};
use crate::types::{
    Account, AccountId, ExportError, ExportPayload, Statement, StatementId, StatementSet,
};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Terminal result of exporting one statement
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The service returned data and it was written to `path`
    Written {
        /// Where the payload was written
        path: PathBuf,
        /// Number of bytes written
        bytes: usize,
    },

    /// The service completed without producing any data
    NoPayload,

    /// The fetch or the write failed
    Failed(ExportError),
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExportOutcome::Failed(_))
    }
}

/// Outcomes of one `export` call
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// The exported account
    pub account: AccountId,

    /// Directory payloads were written to
    pub output_dir: PathBuf,

    /// One outcome per statement of the session
    pub outcomes: HashMap<StatementId, ExportOutcome>,
}

impl ExportReport {
    /// Number of statements whose payload was written
    pub fn written(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_written()).count()
    }

    /// Number of statements the service had no data for
    pub fn empty(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, ExportOutcome::NoPayload))
            .count()
    }

    /// Number of statements that failed
    pub fn failed(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_failed()).count()
    }

    /// Whether no statement failed
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Emit one log line per statement
    fn log_summary(&self) {
        for (statement, outcome) in &self.outcomes {
            match outcome {
                ExportOutcome::Written { path, bytes } => tracing::info!(
                    account = %self.account,
                    statement = %statement,
                    path = %path.display(),
                    bytes,
                    "Statement exported"
                ),
                ExportOutcome::NoPayload => tracing::warn!(
                    account = %self.account,
                    statement = %statement,
                    "Export did not fail, but had no result"
                ),
                ExportOutcome::Failed(error) => tracing::error!(
                    account = %self.account,
                    statement = %statement,
                    %error,
                    "Export failed"
                ),
            }
        }
    }
}

/// Export run for one account
///
/// The statement set is resolved once, when the session is created, and
/// never changes afterwards.
pub struct ExportSession {
    service: Arc<dyn AccountService>,
    account: Account,
    options: ExportOptions,
    statements: StatementSet,
    run_lock: Mutex<()>,
}

impl ExportSession {
    /// Create a session, treating a statement listing failure as "no statements"
    ///
    /// The listing error is logged; use [`ExportSession::try_new`] to receive it.
    pub async fn new(
        service: Arc<dyn AccountService>,
        account: Account,
        options: ExportOptions,
    ) -> Self {
        let statements = match load_statements(service.as_ref(), &account.id, &options).await {
            Ok(statements) => statements,
            Err(error) => {
                tracing::error!(account = %account.id, %error, "Failed to list statements");
                StatementSet::new()
            }
        };

        Self::with_statements(service, account, options, statements)
    }

    /// Create a session, returning the listing error if statements cannot be loaded
    pub async fn try_new(
        service: Arc<dyn AccountService>,
        account: Account,
        options: ExportOptions,
    ) -> Result<Self, ExportError> {
        let statements = load_statements(service.as_ref(), &account.id, &options).await?;
        Ok(Self::with_statements(service, account, options, statements))
    }

    /// Create a session over an already resolved statement set
    pub fn with_statements(
        service: Arc<dyn AccountService>,
        account: Account,
        options: ExportOptions,
        statements: StatementSet,
    ) -> Self {
        Self {
            service,
            account,
            options,
            statements,
            run_lock: Mutex::new(()),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn statements(&self) -> &StatementSet {
        &self.statements
    }

    /// Export every statement of the session into `output`
    ///
    /// Concurrent calls on the same session run one after the other.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::OutputDirectory` if `output` cannot be created;
    /// no fetch is started in that case. Per-statement failures are reported
    /// in the returned `ExportReport`, never as an error.
    pub async fn export(&self, output: &Path) -> Result<ExportReport, ExportError> {
        let _guard = self.run_lock.lock().await;

        tracing::info!(
            account = %self.account.id,
            path = %output.display(),
            "Ensuring output directory exists"
        );
        tokio::fs::create_dir_all(output)
            .await
            .map_err(|e| ExportError::output_directory(output, &e))?;

        let outcomes: HashMap<StatementId, ExportOutcome> = stream::iter(self.statements.iter())
            .map(|statement| self.export_statement(statement, output))
            .buffer_unordered(self.options.max_concurrent.max(1))
            .collect()
            .await;

        tracing::info!(
            account = %self.account.id,
            statements = outcomes.len(),
            "All exports finished"
        );

        let report = ExportReport {
            account: self.account.id.clone(),
            output_dir: output.to_path_buf(),
            outcomes,
        };
        report.log_summary();

        Ok(report)
    }

    /// Fetch one statement, write its payload and classify the result
    async fn export_statement(
        &self,
        statement: &Statement,
        output: &Path,
    ) -> (StatementId, ExportOutcome) {
        tracing::info!(
            account = %self.account.id,
            statement = %statement.id,
            from = %statement.opening_date,
            to = %statement.closing_date,
            "Beginning export"
        );

        let request = ExportRequest {
            account: self.account.id.clone(),
            format: self.options.export_format.clone(),
            begin: statement.opening_date,
            end: statement.closing_date,
            time_zone: self.options.time_zone,
        };
        let operation = format!("export {}/{}", self.account.id, statement.id);
        let fetched = bounded_call(
            &self.options,
            &operation,
            self.service.export_transaction_data(request),
        )
        .await;

        tracing::info!(
            account = %self.account.id,
            statement = %statement.id,
            succeeded = matches!(fetched, Ok(Some(_))),
            "Export finished"
        );

        let outcome = match fetched {
            Ok(Some(payload)) => match write_payload(output, &payload).await {
                Ok(path) => ExportOutcome::Written {
                    path,
                    bytes: payload.data.len(),
                },
                Err(error) => {
                    tracing::error!(
                        account = %self.account.id,
                        statement = %statement.id,
                        %error,
                        "Failed to write exported statement"
                    );
                    ExportOutcome::Failed(error)
                }
            },
            Ok(None) => ExportOutcome::NoPayload,
            Err(error) => ExportOutcome::Failed(error),
        };

        (statement.id.clone(), outcome)
    }
}

/// Whether `name` is exactly one plain path component
///
/// Empty names, separators, `.`, `..`, roots and prefixes are all rejected.
pub fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Directory for `account` directly below `parent`
///
/// # Errors
///
/// Returns `ExportError::OutputDirectory` if the account identifier is not a
/// plain path component, since joining it could leave `parent`.
pub fn account_dir(parent: &Path, account: &str) -> Result<PathBuf, ExportError> {
    let path = parent.join(account);
    if is_plain_component(account) {
        Ok(path)
    } else {
        Err(ExportError::unsafe_output_path(
            &path,
            format!("account identifier '{}' is not a plain directory name", account),
        ))
    }
}

/// Write a payload into `output` under the file name the service chose
///
/// Existing files are overwritten. File names that are not a single plain
/// path component are refused so a payload cannot escape the directory.
async fn write_payload(output: &Path, payload: &ExportPayload) -> Result<PathBuf, ExportError> {
    let path = output.join(&payload.filename);
    if !is_plain_component(&payload.filename) {
        return Err(ExportError::write_failed(&path, "unsafe file name"));
    }

    tokio::fs::write(&path, &payload.data)
        .await
        .map_err(|e| ExportError::write_failed(&path, e))?;

    Ok(path)
}
