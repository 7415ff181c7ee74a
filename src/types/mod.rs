//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account-related types
//! - `statement`: Statement records and their identifiers
//! - `payload`: Export payloads returned by the account service
//! - `transaction`: Posted transactions served by the local account service
//! - `error`: Error types for the exporter

pub mod account;
pub mod error;
pub mod payload;
pub mod statement;
pub mod transaction;

pub use account::{Account, AccountId};
pub use error::ExportError;
pub use payload::ExportPayload;
pub use statement::{Statement, StatementId, StatementSet};
pub use transaction::PostedTransaction;
