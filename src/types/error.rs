//! Error types for the statement exporter
//!
//! This module defines all error types that can occur while discovering
//! accounts and statements and exporting their transaction data.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: Unknown account or statement identifiers
//! - **Service Errors**: The account service failed to list or export
//! - **Output Errors**: The output directory or a payload file could not be written
//! - **Run Control**: Per-call timeouts and cancellation
//! - **Configuration Errors**: Malformed settings or options

use thiserror::Error;

/// Main error type for the statement exporter
///
/// Only `OutputDirectory` aborts an export session. Every other variant that
/// arises while fetching a statement is recorded against that statement and
/// the session carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// No account with this identifier exists in the account service
    #[error("No such account: {account}")]
    AccountNotFound {
        /// The identifier that was looked up
        account: String,
    },

    /// No statement with this identifier exists for the account
    #[error("No such statement {statement} for account {account}")]
    StatementNotFound {
        /// The account that was searched
        account: String,
        /// The statement identifier that was looked up
        statement: String,
    },

    /// The account service reported a failure
    #[error("Account service failed to {operation}: {message}")]
    ServiceError {
        /// The service operation that failed
        operation: String,
        /// Description reported by the service
        message: String,
    },

    /// The output directory could not be created
    ///
    /// This is the only fatal error of an export session.
    #[error("Failed to create output directory {path}: {message}")]
    OutputDirectory {
        /// The directory that could not be created
        path: String,
        /// Description of the I/O error
        message: String,
    },

    /// A payload could not be written to disk
    #[error("Failed to write {path}: {message}")]
    WriteFailed {
        /// The file that could not be written
        path: String,
        /// Description of the I/O error
        message: String,
    },

    /// An account service call did not complete within the configured timeout
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// The service operation that timed out
        operation: String,
        /// The configured timeout in seconds
        seconds: u64,
    },

    /// The run was cancelled before the operation completed
    #[error("{operation} was cancelled")]
    Cancelled {
        /// The operation that was cancelled
        operation: String,
    },

    /// A statement reported by the service is malformed
    #[error("Invalid statement {statement}: {message}")]
    InvalidStatement {
        /// The offending statement identifier
        statement: String,
        /// What is wrong with it
        message: String,
    },

    /// An option value could not be used
    #[error("Invalid value '{value}' for {option}")]
    InvalidOption {
        /// The option name
        option: String,
        /// The rejected value
        value: String,
    },

    /// The settings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Parse error in a service data file
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// I/O error outside the export session's per-statement writes
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },
}

// Conversion from std::io::Error to ExportError
impl From<std::io::Error> for ExportError {
    fn from(error: std::io::Error) -> Self {
        ExportError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ExportError
impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        ExportError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from csv_async::Error to ExportError
impl From<csv_async::Error> for ExportError {
    fn from(error: csv_async::Error) -> Self {
        // csv-async reports the position inside its message
        ExportError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ExportError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        ExportError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create a StatementNotFound error
    pub fn statement_not_found(account: &str, statement: &str) -> Self {
        ExportError::StatementNotFound {
            account: account.to_string(),
            statement: statement.to_string(),
        }
    }

    /// Create a ServiceError
    pub fn service(operation: &str, message: impl ToString) -> Self {
        ExportError::ServiceError {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an OutputDirectory error
    pub fn output_directory(path: &std::path::Path, error: &std::io::Error) -> Self {
        ExportError::OutputDirectory {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create an OutputDirectory error for a path that is refused before any I/O
    pub fn unsafe_output_path(path: &std::path::Path, message: impl ToString) -> Self {
        ExportError::OutputDirectory {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a WriteFailed error
    pub fn write_failed(path: &std::path::Path, message: impl ToString) -> Self {
        ExportError::WriteFailed {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(operation: &str, seconds: u64) -> Self {
        ExportError::Timeout {
            operation: operation.to_string(),
            seconds,
        }
    }

    /// Create a Cancelled error
    pub fn cancelled(operation: &str) -> Self {
        ExportError::Cancelled {
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidStatement error
    pub fn invalid_statement(statement: &str, message: &str) -> Self {
        ExportError::InvalidStatement {
            statement: statement.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an InvalidOption error
    pub fn invalid_option(option: &str, value: &str) -> Self {
        ExportError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl ToString) -> Self {
        ExportError::Config {
            message: message.to_string(),
        }
    }

    /// Whether this error means a lookup found nothing
    ///
    /// The CLI treats these as fatal before any export begins.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExportError::AccountNotFound { .. } | ExportError::StatementNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case::account_not_found(
        ExportError::AccountNotFound { account: "A9".to_string() },
        "No such account: A9"
    )]
    #[case::statement_not_found(
        ExportError::StatementNotFound { account: "A1".to_string(), statement: "S9".to_string() },
        "No such statement S9 for account A1"
    )]
    #[case::service_error(
        ExportError::ServiceError { operation: "list statements".to_string(), message: "offline".to_string() },
        "Account service failed to list statements: offline"
    )]
    #[case::output_directory(
        ExportError::OutputDirectory { path: "/out".to_string(), message: "File exists".to_string() },
        "Failed to create output directory /out: File exists"
    )]
    #[case::write_failed(
        ExportError::WriteFailed { path: "/out/a.qfx".to_string(), message: "Permission denied".to_string() },
        "Failed to write /out/a.qfx: Permission denied"
    )]
    #[case::timeout(
        ExportError::Timeout { operation: "export S1".to_string(), seconds: 30 },
        "export S1 timed out after 30s"
    )]
    #[case::cancelled(
        ExportError::Cancelled { operation: "export S1".to_string() },
        "export S1 was cancelled"
    )]
    #[case::invalid_option(
        ExportError::InvalidOption { option: "--tz".to_string(), value: "mars".to_string() },
        "Invalid value 'mars' for --tz"
    )]
    #[case::parse_error_with_line(
        ExportError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        ExportError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::io_error(
        ExportError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    fn test_error_display(#[case] error: ExportError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::account_not_found(
        ExportError::account_not_found("A9"),
        ExportError::AccountNotFound { account: "A9".to_string() }
    )]
    #[case::statement_not_found(
        ExportError::statement_not_found("A1", "S9"),
        ExportError::StatementNotFound { account: "A1".to_string(), statement: "S9".to_string() }
    )]
    #[case::write_failed(
        ExportError::write_failed(Path::new("/out/a.qfx"), "disk full"),
        ExportError::WriteFailed { path: "/out/a.qfx".to_string(), message: "disk full".to_string() }
    )]
    #[case::timeout(
        ExportError::timeout("export S1", 5),
        ExportError::Timeout { operation: "export S1".to_string(), seconds: 5 }
    )]
    fn test_helper_functions(#[case] result: ExportError, #[case] expected: ExportError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::account(ExportError::account_not_found("A9"), true)]
    #[case::statement(ExportError::statement_not_found("A1", "S9"), true)]
    #[case::service(ExportError::service("list accounts", "offline"), false)]
    fn test_is_not_found(#[case] error: ExportError, #[case] expected: bool) {
        assert_eq!(error.is_not_found(), expected);
    }

    #[test]
    fn test_csv_error_conversion_keeps_line() {
        let mut reader = csv::Reader::from_reader("amount\n1\nnot-a-number\n".as_bytes());
        let csv_error = reader
            .deserialize::<u32>()
            .find_map(Result::err)
            .unwrap();

        let error: ExportError = csv_error.into();
        assert!(matches!(error, ExportError::ParseError { line: Some(3), .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ExportError = io_error.into();
        assert!(matches!(error, ExportError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
