//! Account input record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::UserId;

/// Account classification used by the detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
}

/// A user account with its balance as of the reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: UserId,
    pub account_type: AccountType,
    pub balance: f64,
}

impl Account {
    /// Checks whether this account counts toward liquid funds
    /// (checking and savings, not credit).
    pub fn is_liquid(&self) -> bool {
        matches!(self.account_type, AccountType::Checking | AccountType::Savings)
    }
}
