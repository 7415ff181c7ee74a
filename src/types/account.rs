//! Account-related types for the statement exporter
//!
//! Accounts are owned by the external account service. The exporter only
//! ever holds read-only snapshots fetched at the start of a run.

/// Account identifier, unique within the account service
pub type AccountId = String;

/// Snapshot of an account as reported by the account service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account identifier
    pub id: AccountId,

    /// Display name reported by the service (may be empty)
    pub name: String,

    /// Whether the service can export transaction data for this account
    ///
    /// Accounts without this capability are skipped by auto-export.
    pub supports_export: bool,
}

impl Account {
    /// Create a new account snapshot
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, supports_export: bool) -> Self {
        Account {
            id: id.into(),
            name: name.into(),
            supports_export,
        }
    }

    /// Whether transaction data can be exported for this account
    pub fn supports_export_transaction_data(&self) -> bool {
        self.supports_export
    }
}
