//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the time window framework, and
//! error types that form the vocabulary of the persona engine domain.

mod errors;
mod ids;
mod time_window;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AssignmentId, UserId};
pub use time_window::{Dated, TimeWindow, WindowDays};
pub use timestamp::Timestamp;
