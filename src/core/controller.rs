//! Export controller: account discovery, lookups and auto-export
//!
//! The controller is the explicitly constructed context every export run
//! shares. It owns the account service handle and hands it to the sessions
//! it creates; there is no process-wide instance.

use super::call::bounded_call;
use super::options::ExportOptions;
use super::session::{account_dir, ExportReport, ExportSession};
use super::traits::AccountService;
use crate::types::{Account, ExportError, Statement};
use std::path::Path;
use std::sync::Arc;

/// Entry point for listing and exporting accounts
#[derive(Clone)]
pub struct ExportController {
    service: Arc<dyn AccountService>,
}

impl ExportController {
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        Self { service }
    }

    /// The account service this controller talks to
    pub fn service(&self) -> Arc<dyn AccountService> {
        Arc::clone(&self.service)
    }

    /// Every account known to the service
    pub async fn accounts(&self, options: &ExportOptions) -> Result<Vec<Account>, ExportError> {
        bounded_call(options, "list accounts", self.service.list_accounts()).await
    }

    /// Accounts whose transaction data can be exported
    pub async fn exportable_accounts(
        &self,
        options: &ExportOptions,
    ) -> Result<Vec<Account>, ExportError> {
        Ok(self
            .accounts(options)
            .await?
            .into_iter()
            .filter(Account::supports_export_transaction_data)
            .collect())
    }

    /// Look up an account by identifier
    ///
    /// # Errors
    ///
    /// `ExportError::AccountNotFound` if the service does not know `account`.
    pub async fn find_account(
        &self,
        account: &str,
        options: &ExportOptions,
    ) -> Result<Account, ExportError> {
        self.accounts(options)
            .await?
            .into_iter()
            .find(|a| a.id == account)
            .ok_or_else(|| ExportError::account_not_found(account))
    }

    /// Every statement of an account, unfiltered
    pub async fn statements(
        &self,
        account: &str,
        options: &ExportOptions,
    ) -> Result<Vec<Statement>, ExportError> {
        bounded_call(options, "list statements", self.service.list_statements(account)).await
    }

    /// Look up a statement of an account by identifier
    ///
    /// # Errors
    ///
    /// `ExportError::StatementNotFound` if the account has no such statement.
    pub async fn find_statement(
        &self,
        account: &str,
        statement: &str,
        options: &ExportOptions,
    ) -> Result<Statement, ExportError> {
        self.statements(account, options)
            .await?
            .into_iter()
            .find(|s| s.id == statement)
            .ok_or_else(|| ExportError::statement_not_found(account, statement))
    }

    /// Create an export session for `account`
    pub async fn session(&self, account: Account, options: ExportOptions) -> ExportSession {
        ExportSession::new(self.service(), account, options).await
    }

    /// Export one account into `output`
    pub async fn export_account(
        &self,
        account: Account,
        options: ExportOptions,
        output: &Path,
    ) -> Result<ExportReport, ExportError> {
        self.session(account, options).await.export(output).await
    }

    /// Export every exportable account into `output_root/<account>`
    ///
    /// Accounts are exported one after the other. The first account whose
    /// export fails stops the run and its error is returned; an account
    /// identifier that is not a plain directory name fails before any fetch.
    pub async fn auto_export_all(
        &self,
        output_root: &Path,
        options: &ExportOptions,
    ) -> Result<Vec<ExportReport>, ExportError> {
        let accounts = self.exportable_accounts(options).await?;
        tracing::info!(accounts = accounts.len(), "Starting auto-export");

        let mut reports = Vec::with_capacity(accounts.len());
        for account in accounts {
            let output = account_dir(output_root, &account.id)?;
            let report = self
                .export_account(account, options.clone(), &output)
                .await?;
            reports.push(report);
        }

        Ok(reports)
    }
}
