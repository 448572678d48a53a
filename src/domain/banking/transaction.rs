//! Transaction input record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Dated, UserId};

/// Direction of money movement relative to the user's accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Inflow,
    Outflow,
}

/// A single posted transaction.
///
/// `amount` is always positive; `direction` carries the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: UserId,
    pub account_id: Uuid,
    pub merchant_name: String,
    pub category: String,
    pub amount: f64,
    pub direction: TransactionDirection,
    pub posted_at: NaiveDate,
}

impl Transaction {
    /// Checks whether this transaction is money leaving the account.
    pub fn is_outflow(&self) -> bool {
        self.direction == TransactionDirection::Outflow
    }

    /// Checks whether this transaction is money entering the account.
    pub fn is_inflow(&self) -> bool {
        self.direction == TransactionDirection::Inflow
    }
}

impl Dated for Transaction {
    fn occurred_on(&self) -> NaiveDate {
        self.posted_at
    }
}
