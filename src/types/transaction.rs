//! Posted transactions held by the local account service

use super::account::AccountId;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// A single posted card transaction
///
/// Positive amounts are credits to the account (payments, refunds),
/// negative amounts are debits (purchases, fees).
#[derive(Debug, Clone, PartialEq)]
pub struct PostedTransaction {
    /// The account the transaction was posted to
    pub account: AccountId,

    /// Service-assigned transaction identifier
    pub id: String,

    /// Instant the transaction was posted, with the offset it was recorded in
    pub posted: DateTime<FixedOffset>,

    /// Signed amount with up to 4 decimal places
    pub amount: Decimal,

    /// Merchant or counterparty name
    pub payee: String,
}
