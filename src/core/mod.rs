//! Core export logic
//!
//! This module contains the export pipeline components:
//! - `traits` - The account service boundary
//! - `options` - Export options and statement selection
//! - `call` - Timeout and cancellation for account service calls
//! - `statement_loader` - Statement discovery for one account
//! - `session` - Concurrent statement export for one account
//! - `controller` - Account lookups and auto-export across accounts

pub mod call;
pub mod controller;
pub mod options;
pub mod session;
pub mod statement_loader;
pub mod traits;

pub use controller::ExportController;
pub use options::{parse_utc_offset, ExportOptions, DEFAULT_FORMAT, DEFAULT_MAX_CONCURRENT};
pub use session::{
    account_dir, is_plain_component, ExportOutcome, ExportReport, ExportSession,
};
pub use statement_loader::load_statements;
pub use traits::{AccountService, ExportRequest};
