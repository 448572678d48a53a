//! PostgreSQL adapter for BankingRecordReader

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::banking::{
    Account, AccountType, Liability, Transaction, TransactionDirection,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::BankingRecordReader;

/// PostgreSQL implementation of BankingRecordReader.
///
/// Reads everything on file for the user; time windowing happens in the
/// domain layer.
pub struct PgBankingRecords {
    pool: PgPool,
}

impl PgBankingRecords {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn transaction_from_row(row: &sqlx::postgres::PgRow) -> Result<Transaction, DomainError> {
        let id: Uuid = row.get("id");
        let user_id: String = row.get("user_id");
        let account_id: Uuid = row.get("account_id");
        let merchant_name: String = row.get("merchant_name");
        let category: String = row.get("category");
        let amount: f64 = row.get("amount");
        let direction: String = row.get("direction");
        let posted_at: chrono::NaiveDate = row.get("posted_at");

        let direction = match direction.as_str() {
            "inflow" => TransactionDirection::Inflow,
            "outflow" => TransactionDirection::Outflow,
            other => {
                return Err(DomainError::database(format!(
                    "Invalid transaction direction: {}",
                    other
                )))
            }
        };
        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::database(format!("Invalid user id in row: {}", e)))?;

        Ok(Transaction {
            id,
            user_id,
            account_id,
            merchant_name,
            category,
            amount,
            direction,
            posted_at,
        })
    }

    fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<Account, DomainError> {
        let id: Uuid = row.get("id");
        let user_id: String = row.get("user_id");
        let account_type: String = row.get("account_type");
        let balance: f64 = row.get("balance");

        let account_type = match account_type.as_str() {
            "checking" => AccountType::Checking,
            "savings" => AccountType::Savings,
            "credit" => AccountType::Credit,
            other => {
                return Err(DomainError::database(format!(
                    "Invalid account type: {}",
                    other
                )))
            }
        };
        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::database(format!("Invalid user id in row: {}", e)))?;

        Ok(Account {
            id,
            user_id,
            account_type,
            balance,
        })
    }

    fn liability_from_row(row: &sqlx::postgres::PgRow) -> Result<Liability, DomainError> {
        let account_id: Uuid = row.get("account_id");
        let user_id: String = row.get("user_id");
        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::database(format!("Invalid user id in row: {}", e)))?;

        Ok(Liability {
            account_id,
            user_id,
            credit_limit: row.get("credit_limit"),
            balance: row.get("balance"),
            minimum_payment_due: row.get("minimum_payment_due"),
            last_payment_amount: row.get("last_payment_amount"),
            interest_charged: row.get("interest_charged"),
            is_overdue: row.get("is_overdue"),
        })
    }
}

#[async_trait]
impl BankingRecordReader for PgBankingRecords {
    async fn transactions_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let rows = sqlx::query(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY posted_at",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Database error: {}", e)))?;

        rows.iter().map(Self::transaction_from_row).collect()
    }

    async fn accounts_for_user(&self, user_id: &UserId) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query("SELECT * FROM accounts WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Database error: {}", e)))?;

        rows.iter().map(Self::account_from_row).collect()
    }

    async fn liabilities_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Liability>, DomainError> {
        let rows = sqlx::query("SELECT * FROM liabilities WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Database error: {}", e)))?;

        rows.iter().map(Self::liability_from_row).collect()
    }
}
