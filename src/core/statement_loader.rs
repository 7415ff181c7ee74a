//! Statement discovery for one account
//!
//! Resolves the statements of an account through a single account service
//! call and keeps the ones the export options select. Listing failures are
//! returned as errors; whether to treat them as "no statements" is left to
//! the caller.

use super::call::bounded_call;
use super::options::ExportOptions;
use super::traits::AccountService;
use crate::types::{ExportError, StatementSet};

/// Load the statements of `account` that qualify under `options`
///
/// Duplicate statement identifiers reported by the service collapse into one.
///
/// # Errors
///
/// Returns the service's error (or a timeout/cancellation) if listing fails.
pub async fn load_statements(
    service: &dyn AccountService,
    account: &str,
    options: &ExportOptions,
) -> Result<StatementSet, ExportError> {
    let statements = bounded_call(options, "list statements", service.list_statements(account))
        .await?;

    let total = statements.len();
    let selected: StatementSet = statements
        .into_iter()
        .filter(|statement| options.include(statement))
        .collect();

    tracing::debug!(
        account,
        listed = total,
        selected = selected.len(),
        "Loaded statements"
    );

    Ok(selected)
}
