//! Command and query handlers.

pub mod assignment;
