//! Persona Engine - Financial Behavior Persona Assignment
//!
//! This crate turns raw transaction/account/liability records into
//! time-windowed behavioral signals, evaluates declarative persona rule
//! trees against them, and deterministically assigns one of six financial
//! behavior personas with a full audit trail for every persona.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
