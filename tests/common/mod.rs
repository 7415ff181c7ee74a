//! In-memory account service for integration tests
//!
//! Behaviour is configured per (account, statement opening date), which is
//! what an export request identifies a statement by. Every export call is
//! counted and the peak number of overlapping calls is recorded.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use statement_export::{Account, AccountService, ExportError, ExportPayload, ExportRequest, Statement};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers an export request
#[derive(Debug, Clone)]
pub enum Behavior {
    Payload { filename: String, data: Vec<u8> },
    NoPayload,
    Fail(String),
    Hang,
}

#[derive(Default)]
pub struct MockService {
    accounts: Vec<Account>,
    statements: HashMap<String, Vec<Statement>>,
    behaviors: HashMap<(String, NaiveDate), Behavior>,
    failing_listings: Vec<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<ExportRequest>>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Statement `S<n>` covering month `n` of 2022 (n = 1..=12) or later years beyond
pub fn monthly_statement(account: &str, n: u32) -> Statement {
    let year = 2022 + ((n - 1) / 12) as i32;
    let month = (n - 1) % 12 + 1;
    let opening = date(year, month, 1);
    let closing = date(year, month, 28);
    Statement::new(account, format!("S{}", n), opening, closing).unwrap()
}

impl MockService {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(30),
            ..Self::default()
        }
    }

    /// Add an account with `count` monthly statements that all return a payload
    pub fn with_account(mut self, id: &str, supports_export: bool, count: u32) -> Self {
        self.accounts.push(Account::new(id, format!("{} card", id), supports_export));
        let statements: Vec<Statement> = (1..=count).map(|n| monthly_statement(id, n)).collect();
        for statement in &statements {
            self.behaviors.insert(
                (id.to_string(), statement.opening_date),
                Behavior::Payload {
                    filename: format!("{}_{}.qfx", id, statement.id),
                    data: format!("data for {}/{}", id, statement.id).into_bytes(),
                },
            );
        }
        self.statements.insert(id.to_string(), statements);
        self
    }

    /// Override the behaviour for statement `S<n>` of `account`
    pub fn with_behavior(mut self, account: &str, n: u32, behavior: Behavior) -> Self {
        let opening = monthly_statement(account, n).opening_date;
        self.behaviors.insert((account.to_string(), opening), behavior);
        self
    }

    pub fn with_failing_listing(mut self, account: &str) -> Self {
        self.failing_listings.push(account.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ExportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountService for MockService {
    async fn list_accounts(&self) -> Result<Vec<Account>, ExportError> {
        Ok(self.accounts.clone())
    }

    async fn list_statements(&self, account: &str) -> Result<Vec<Statement>, ExportError> {
        if self.failing_listings.iter().any(|a| a == account) {
            return Err(ExportError::service("list statements", "service unavailable"));
        }
        Ok(self.statements.get(account).cloned().unwrap_or_default())
    }

    async fn export_transaction_data(
        &self,
        request: ExportRequest,
    ) -> Result<Option<ExportPayload>, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let behavior = self
            .behaviors
            .get(&(request.account.clone(), request.begin))
            .cloned()
            .unwrap_or(Behavior::NoPayload);

        if matches!(behavior, Behavior::Hang) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match behavior {
            Behavior::Payload { filename, data } => Ok(Some(ExportPayload::new(filename, data))),
            Behavior::NoPayload | Behavior::Hang => Ok(None),
            Behavior::Fail(message) => Err(ExportError::service("export transaction data", message)),
        }
    }
}
