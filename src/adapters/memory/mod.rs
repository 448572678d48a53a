//! In-memory adapters, for tests and development.

mod banking_records;
mod assignment_repository;

pub use assignment_repository::InMemoryAssignmentRepository;
pub use banking_records::InMemoryBankingRecords;
