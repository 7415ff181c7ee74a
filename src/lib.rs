//! Statement Export Library
//! # Overview
//!
//! This library exports credit account statements from an account service
//! into files for personal-finance software (QFX by default).
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Statement, errors)
//! - [`cli`] - CLI arguments parsing and command dispatch
//! - [`config`] - Settings file and output path resolution
//! - [`core`] - Export pipeline:
//!   - [`core::traits`] - The account service boundary
//!   - [`core::options`] - Export options and statement selection
//!   - [`core::session`] - Concurrent statement export for one account
//!   - [`core::controller`] - Lookups and auto-export across accounts
//! - [`io`] - CSV handling, QFX rendering and the local account service
//!
//! # Export Flow
//!
//! ```text
//! ExportController
//!     └── for each exportable account (sequentially)
//!         ├── load_statements       (one service call, filtered by options)
//!         └── ExportSession::export (up to N fetches in flight)
//!             └── per statement: fetch -> write file -> outcome
//! ```
//!
//! # Outcomes
//!
//! Each statement of a run ends in exactly one of:
//! - **Written**: the service returned data and it was written to disk
//! - **NoPayload**: the service completed without data
//! - **Failed**: the fetch or the write failed; other statements are unaffected

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod types;

pub use core::{
    AccountService, ExportController, ExportOptions, ExportOutcome, ExportReport, ExportRequest,
    ExportSession,
};
pub use io::LocalAccountService;
pub use types::{Account, ExportError, ExportPayload, Statement, StatementSet};
