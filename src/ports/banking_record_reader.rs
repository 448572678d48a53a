//! Read-side port for raw banking records.

use async_trait::async_trait;

use crate::domain::banking::{Account, Liability, Transaction};
use crate::domain::foundation::{DomainError, UserId};

/// Source of the raw records the detectors consume.
///
/// Implementations must return everything on file for the user; the
/// domain layer applies its own time windowing.
#[async_trait]
pub trait BankingRecordReader: Send + Sync {
    async fn transactions_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, DomainError>;

    async fn accounts_for_user(&self, user_id: &UserId) -> Result<Vec<Account>, DomainError>;

    async fn liabilities_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Liability>, DomainError>;
}
