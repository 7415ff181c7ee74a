//! Statement records for the statement exporter
//!
//! A statement is one billing cycle of an account, bounded by an opening
//! and a closing date. Statements are compared and hashed by identifier
//! only, so a set of statements collapses duplicates reported by the service.

use super::account::AccountId;
use super::error::ExportError;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Statement identifier, unique within its account
pub type StatementId = String;

/// Unordered set of statements for one account
pub type StatementSet = HashSet<Statement>;

/// Snapshot of a credit account statement
#[derive(Debug, Clone)]
pub struct Statement {
    /// The statement identifier
    pub id: StatementId,

    /// The account this statement belongs to
    pub account: AccountId,

    /// First day of the billing cycle (inclusive)
    pub opening_date: NaiveDate,

    /// Last day of the billing cycle (inclusive)
    pub closing_date: NaiveDate,
}

impl Statement {
    /// Create a statement, checking that it does not close before it opens
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidStatement` if `closing_date < opening_date`.
    pub fn new(
        account: impl Into<AccountId>,
        id: impl Into<StatementId>,
        opening_date: NaiveDate,
        closing_date: NaiveDate,
    ) -> Result<Self, ExportError> {
        let id = id.into();
        if closing_date < opening_date {
            return Err(ExportError::invalid_statement(
                &id,
                &format!("closing date {closing_date} is before opening date {opening_date}"),
            ));
        }

        Ok(Statement {
            id,
            account: account.into(),
            opening_date,
            closing_date,
        })
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Statement {}

impl Hash for Statement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_statement() {
        let statement = Statement::new("A1", "S1", date(2022, 1, 1), date(2022, 1, 31)).unwrap();
        assert_eq!(statement.id, "S1");
        assert_eq!(statement.account, "A1");
    }

    #[test]
    fn test_single_day_statement_is_valid() {
        assert!(Statement::new("A1", "S1", date(2022, 1, 1), date(2022, 1, 1)).is_ok());
    }

    #[test]
    fn test_closing_before_opening_is_rejected() {
        let result = Statement::new("A1", "S1", date(2022, 2, 1), date(2022, 1, 31));
        assert!(matches!(
            result,
            Err(ExportError::InvalidStatement { ref statement, .. }) if statement == "S1"
        ));
    }

    #[test]
    fn test_set_collapses_duplicate_identifiers() {
        let mut set = StatementSet::new();
        set.insert(Statement::new("A1", "S1", date(2022, 1, 1), date(2022, 1, 31)).unwrap());
        set.insert(Statement::new("A1", "S1", date(2022, 3, 1), date(2022, 3, 31)).unwrap());
        set.insert(Statement::new("A1", "S2", date(2022, 2, 1), date(2022, 2, 28)).unwrap());
        assert_eq!(set.len(), 2);
    }
}
