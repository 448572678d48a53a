//! Adapters module - Driven- and driving-side implementations.

pub mod http;
pub mod memory;
pub mod postgres;
