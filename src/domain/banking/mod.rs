//! Banking module - Raw input records.
//!
//! Transactions, accounts and liabilities arrive pre-validated from the
//! ingestion pipeline through the `BankingRecordReader` port. The
//! detectors treat them as read-only facts.

mod account;
mod liability;
mod transaction;

pub use account::{Account, AccountType};
pub use liability::Liability;
pub use transaction::{Transaction, TransactionDirection};
