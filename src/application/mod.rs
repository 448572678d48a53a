//! Application module - Use-case handlers.

pub mod handlers;
