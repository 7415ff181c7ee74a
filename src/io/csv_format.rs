//! CSV format handling for service data files and listing output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserializing the local service's data files
//! - Conversion from rows to domain types
//! - Account and statement listing serialization
//! - CSV rendering of exported transactions
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, ExportError, PostedTransaction, Statement};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Row of `accounts.csv`: account, name, supports_export
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRow {
    pub account: String,
    #[serde(default)]
    pub name: String,
    pub supports_export: Option<String>,
}

/// Row of `statements.csv`: account, statement, opening_date, closing_date
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StatementRow {
    pub account: String,
    pub statement: String,
    pub opening_date: String,
    pub closing_date: String,
}

/// Row of `transactions.csv`: account, id, posted, amount, payee
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransactionRow {
    pub account: String,
    pub id: String,
    pub posted: String,
    pub amount: String,
    #[serde(default)]
    pub payee: String,
}

/// Convert an AccountRow to an Account
///
/// `supports_export` accepts true/false, yes/no and 1/0 (case insensitive).
/// A missing value means the account supports export.
pub fn convert_account_row(row: AccountRow) -> Result<Account, String> {
    let supports_export = match row.supports_export.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(flag) => match flag.to_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => {
                return Err(format!(
                    "Invalid supports_export '{}' for account {}",
                    flag, row.account
                ))
            }
        },
    };

    Ok(Account::new(row.account, row.name, supports_export))
}

/// Convert a StatementRow to a Statement
///
/// Dates must be ISO 8601 calendar dates (`YYYY-MM-DD`).
pub fn convert_statement_row(row: StatementRow) -> Result<Statement, String> {
    let opening_date = parse_date(&row.opening_date, &row.statement)?;
    let closing_date = parse_date(&row.closing_date, &row.statement)?;

    Statement::new(row.account, row.statement, opening_date, closing_date)
        .map_err(|e| e.to_string())
}

/// Convert a TransactionRow to a PostedTransaction
///
/// `posted` must be an RFC 3339 timestamp; `amount` a signed decimal.
pub fn convert_transaction_row(row: TransactionRow) -> Result<PostedTransaction, String> {
    let posted = DateTime::parse_from_rfc3339(row.posted.trim()).map_err(|_| {
        format!(
            "Invalid posted timestamp '{}' for transaction {}",
            row.posted, row.id
        )
    })?;

    let amount = Decimal::from_str(row.amount.trim())
        .map_err(|_| format!("Invalid amount '{}' for transaction {}", row.amount, row.id))?;

    Ok(PostedTransaction {
        account: row.account,
        id: row.id,
        posted,
        amount,
        payee: row.payee,
    })
}

fn parse_date(value: &str, statement: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}' for statement {}", value, statement))
}

/// Write accounts to CSV format
///
/// Writes accounts with columns: account, name, supports_export.
/// Accounts are sorted by identifier for deterministic output.
pub fn write_accounts_csv(
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), ExportError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "name", "supports_export"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record([
            account.id.as_str(),
            account.name.as_str(),
            if account.supports_export { "true" } else { "false" },
        ])?;
    }

    writer.flush()?;

    Ok(())
}

/// Write statements to CSV format
///
/// Writes statements with columns: account, statement, opening_date, closing_date.
/// Statements are sorted by account, then opening date, then identifier.
pub fn write_statements_csv(
    statements: &[Statement],
    output: &mut dyn Write,
) -> Result<(), ExportError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "statement", "opening_date", "closing_date"])?;

    let mut sorted_statements = statements.to_vec();
    sorted_statements.sort_by(|a, b| {
        (&a.account, a.opening_date, &a.id).cmp(&(&b.account, b.opening_date, &b.id))
    });

    for statement in sorted_statements {
        writer.write_record([
            statement.account.clone(),
            statement.id.clone(),
            statement.opening_date.to_string(),
            statement.closing_date.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

/// Render exported transactions as CSV bytes
///
/// Columns: date, id, payee, amount. Dates are the posting date in the
/// time zone the transactions were converted to by the caller.
pub fn render_transactions_csv(
    transactions: &[PostedTransaction],
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["date", "id", "payee", "amount"])?;

    for transaction in transactions {
        writer.write_record([
            transaction.posted.date_naive().to_string(),
            transaction.id.clone(),
            transaction.payee.clone(),
            format!("{:.2}", transaction.amount),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::from(e.into_error()))
}
