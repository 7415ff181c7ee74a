//! I/O module
//!
//! Handles CSV parsing and output and the directory-backed account service.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, listing output)
//! - `async_reader` - Asynchronous CSV reader over tokio files
//! - `qfx` - QFX document rendering
//! - `local_service` - Account service served from CSV files

pub mod async_reader;
pub mod csv_format;
pub mod local_service;
pub mod qfx;

pub use async_reader::AsyncReader;
pub use csv_format::{render_transactions_csv, write_accounts_csv, write_statements_csv};
pub use local_service::LocalAccountService;
pub use qfx::render_qfx;
