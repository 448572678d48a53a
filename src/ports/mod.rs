//! Ports module - Driven-side interfaces.
//!
//! Traits the application layer depends on; adapters implement them
//! against Postgres or in-memory state.

mod assignment_repository;
mod banking_record_reader;

pub use assignment_repository::AssignmentRepository;
pub use banking_record_reader::BankingRecordReader;
