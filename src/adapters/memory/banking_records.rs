//! In-Memory Banking Records Adapter
//!
//! Holds raw banking records in memory. Useful for testing and
//! development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::banking::{Account, Liability, Transaction};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::BankingRecordReader;

#[derive(Debug, Default, Clone)]
struct UserRecords {
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    liabilities: Vec<Liability>,
}

/// In-memory store of raw banking records, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBankingRecords {
    records: Arc<RwLock<HashMap<UserId, UserRecords>>>,
}

impl InMemoryBankingRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one user's records wholesale.
    pub async fn seed_user(
        &self,
        user_id: UserId,
        transactions: Vec<Transaction>,
        accounts: Vec<Account>,
        liabilities: Vec<Liability>,
    ) {
        let mut records = self.records.write().await;
        records.insert(
            user_id,
            UserRecords {
                transactions,
                accounts,
                liabilities,
            },
        );
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl BankingRecordReader for InMemoryBankingRecords {
    async fn transactions_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|r| r.transactions.clone())
            .unwrap_or_default())
    }

    async fn accounts_for_user(&self, user_id: &UserId) -> Result<Vec<Account>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|r| r.accounts.clone())
            .unwrap_or_default())
    }

    async fn liabilities_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Liability>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|r| r.liabilities.clone())
            .unwrap_or_default())
    }
}
