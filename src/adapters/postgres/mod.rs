//! PostgreSQL adapters.

mod assignment_repository;
mod banking_records;

pub use assignment_repository::PgAssignmentRepository;
pub use banking_records::PgBankingRecords;
