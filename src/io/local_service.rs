//! Directory-backed account service
//!
//! `LocalAccountService` serves accounts, statements and transactions from
//! three CSV files in one directory:
//!
//! ```text
//! <root>/accounts.csv      account,name,supports_export
//! <root>/statements.csv    account,statement,opening_date,closing_date
//! <root>/transactions.csv  account,id,posted,amount,payee
//! ```
//!
//! Files are re-read on every call, matching the exporter's rule that
//! accounts and statements are fetched fresh for each run.

use crate::core::{AccountService, ExportRequest};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{
    convert_account_row, convert_statement_row, convert_transaction_row,
    render_transactions_csv, AccountRow, StatementRow, TransactionRow,
};
use crate::io::qfx::{render_qfx, QfxStatement};
use crate::types::{Account, ExportError, ExportPayload, PostedTransaction, Statement};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const STATEMENTS_FILE: &str = "statements.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";

/// Export formats the local service can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadFormat {
    /// OFX SGML, saved with a `qfx` or `ofx` extension
    Qfx { extension: &'static str },
    Csv,
}

impl PayloadFormat {
    fn parse(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "qfx" => Some(PayloadFormat::Qfx { extension: "qfx" }),
            "ofx" => Some(PayloadFormat::Qfx { extension: "ofx" }),
            "csv" => Some(PayloadFormat::Csv),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            PayloadFormat::Qfx { extension } => *extension,
            PayloadFormat::Csv => "csv",
        }
    }
}

/// Account service reading CSV files from a directory
#[derive(Debug, Clone)]
pub struct LocalAccountService {
    root: PathBuf,
}

impl LocalAccountService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this service reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_accounts(&self) -> Result<Vec<Account>, ExportError> {
        let mut reader = AsyncReader::open(&self.root.join(ACCOUNTS_FILE)).await?;
        Ok(reader.read_all::<AccountRow, _, _>(convert_account_row).await)
    }

    async fn require_account(&self, account: &str, operation: &str) -> Result<(), ExportError> {
        let accounts = self
            .read_accounts()
            .await
            .map_err(|e| ExportError::service(operation, e))?;

        if accounts.iter().any(|a| a.id == account) {
            Ok(())
        } else {
            Err(ExportError::service(
                operation,
                format!("unknown account {}", account),
            ))
        }
    }

    async fn read_transactions(&self) -> Result<Vec<PostedTransaction>, ExportError> {
        let path = self.root.join(TRANSACTIONS_FILE);
        // An account service without any activity yet has no transactions file
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut reader = AsyncReader::open(&path).await?;
        Ok(reader
            .read_all::<TransactionRow, _, _>(convert_transaction_row)
            .await)
    }
}

#[async_trait]
impl AccountService for LocalAccountService {
    async fn list_accounts(&self) -> Result<Vec<Account>, ExportError> {
        self.read_accounts()
            .await
            .map_err(|e| ExportError::service("list accounts", e))
    }

    async fn list_statements(&self, account: &str) -> Result<Vec<Statement>, ExportError> {
        const OPERATION: &str = "list statements";
        self.require_account(account, OPERATION).await?;

        let mut reader = AsyncReader::open(&self.root.join(STATEMENTS_FILE))
            .await
            .map_err(|e| ExportError::service(OPERATION, e))?;
        let statements = reader
            .read_all::<StatementRow, _, _>(convert_statement_row)
            .await;

        Ok(statements
            .into_iter()
            .filter(|statement| statement.account == account)
            .collect())
    }

    async fn export_transaction_data(
        &self,
        request: ExportRequest,
    ) -> Result<Option<ExportPayload>, ExportError> {
        const OPERATION: &str = "export transaction data";
        self.require_account(&request.account, OPERATION).await?;

        let format = PayloadFormat::parse(&request.format).ok_or_else(|| {
            ExportError::service(
                OPERATION,
                format!("unsupported format '{}'", request.format),
            )
        })?;

        let tz = request.time_zone;
        let mut transactions: Vec<PostedTransaction> = self
            .read_transactions()
            .await
            .map_err(|e| ExportError::service(OPERATION, e))?
            .into_iter()
            .filter(|t| t.account == request.account)
            .map(|mut t| {
                t.posted = t.posted.with_timezone(&tz);
                t
            })
            .filter(|t| {
                let day = t.posted.date_naive();
                day >= request.begin && day <= request.end
            })
            .collect();

        if transactions.is_empty() {
            return Ok(None);
        }
        transactions.sort_by(|a, b| a.posted.cmp(&b.posted).then_with(|| a.id.cmp(&b.id)));

        let filename = format!(
            "{}_{}_{}.{}",
            request.account,
            request.begin.format("%Y%m%d"),
            request.end.format("%Y%m%d"),
            format.extension()
        );

        let data = match format {
            PayloadFormat::Qfx { .. } => {
                let statement = QfxStatement {
                    account: &request.account,
                    begin: request.begin,
                    end: request.end,
                    time_zone: tz,
                };
                render_qfx(&statement, &transactions)
            }
            PayloadFormat::Csv => render_transactions_csv(&transactions)
                .map_err(|e| ExportError::service(OPERATION, e))?,
        };

        Ok(Some(ExportPayload::new(filename, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(ACCOUNTS_FILE),
            "account,name,supports_export\nA1,Card,true\nA2,Loan,false\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(STATEMENTS_FILE),
            "account,statement,opening_date,closing_date\n\
             A1,S1,2022-01-01,2022-01-31\n\
             A1,S2,2022-02-01,2022-02-28\n\
             A2,L1,2022-01-01,2022-01-31\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(TRANSACTIONS_FILE),
            "account,id,posted,amount,payee\n\
             A1,T1,2022-01-05T10:00:00Z,-12.50,Coffee\n\
             A1,T2,2022-02-01T03:00:00Z,-40.00,Groceries\n\
             A2,T3,2022-01-10T10:00:00Z,-100.00,Interest\n",
        )
        .unwrap();
        dir
    }

    fn request(format: &str, begin: NaiveDate, end: NaiveDate, offset_hours: i32) -> ExportRequest {
        ExportRequest {
            account: "A1".to_string(),
            format: format.to_string(),
            begin,
            end,
            time_zone: FixedOffset::east_opt(offset_hours * 3600).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let accounts = service.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().any(|a| a.id == "A2" && !a.supports_export));
    }

    #[tokio::test]
    async fn test_list_accounts_missing_directory() {
        let service = LocalAccountService::new("does/not/exist");
        let result = service.list_accounts().await;
        assert!(matches!(result, Err(ExportError::ServiceError { .. })));
    }

    #[tokio::test]
    async fn test_list_statements_filters_by_account() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let statements = service.list_statements("A1").await.unwrap();
        let mut ids: Vec<_> = statements.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["S1", "S2"]);
    }

    #[tokio::test]
    async fn test_list_statements_unknown_account() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let error = service.list_statements("A9").await.unwrap_err();
        assert!(error.to_string().contains("unknown account A9"));
    }

    #[tokio::test]
    async fn test_export_qfx_for_range() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let payload = service
            .export_transaction_data(request("qfx", date(2022, 1, 1), date(2022, 1, 31), 0))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload.filename, "A1_20220101_20220131.qfx");
        let document = String::from_utf8(payload.data).unwrap();
        assert!(document.contains("<FITID>T1"));
        assert!(!document.contains("<FITID>T2"));
    }

    #[tokio::test]
    async fn test_export_uses_time_zone_for_boundaries() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        // T2 posted 2022-02-01 03:00 UTC is still January 31st at UTC-5
        let payload = service
            .export_transaction_data(request("csv", date(2022, 1, 1), date(2022, 1, 31), -5))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload.filename, "A1_20220101_20220131.csv");
        let document = String::from_utf8(payload.data).unwrap();
        assert!(document.contains("T1"));
        assert!(document.contains("2022-01-31,T2,Groceries,-40.00"));
    }

    #[tokio::test]
    async fn test_export_empty_range_has_no_payload() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let payload = service
            .export_transaction_data(request("qfx", date(2023, 1, 1), date(2023, 1, 31), 0))
            .await
            .unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_export_unsupported_format() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let error = service
            .export_transaction_data(request("pdf", date(2022, 1, 1), date(2022, 1, 31), 0))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("unsupported format 'pdf'"));
    }

    #[tokio::test]
    async fn test_export_unsupported_format_on_empty_range() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let result = service
            .export_transaction_data(request("pdf", date(2023, 1, 1), date(2023, 1, 31), 0))
            .await;
        assert!(matches!(result, Err(ExportError::ServiceError { .. })));
    }

    #[tokio::test]
    async fn test_export_ofx_extension() {
        let dir = fixture();
        let service = LocalAccountService::new(dir.path());

        let payload = service
            .export_transaction_data(request("OFX", date(2022, 1, 1), date(2022, 1, 31), 0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.filename, "A1_20220101_20220131.ofx");
    }

    #[tokio::test]
    async fn test_export_without_transactions_file() {
        let dir = fixture();
        fs::remove_file(dir.path().join(TRANSACTIONS_FILE)).unwrap();
        let service = LocalAccountService::new(dir.path());

        let payload = service
            .export_transaction_data(request("qfx", date(2022, 1, 1), date(2022, 1, 31), 0))
            .await
            .unwrap();
        assert!(payload.is_none());
    }
}
