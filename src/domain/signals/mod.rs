//! Signals module - Windowed behavioral signal detection.
//!
//! Four detectors derive numeric and boolean signals from raw banking
//! records for a time window; the aggregator merges their outputs into
//! one immutable `BehavioralSummary`. Missing signals are first-class
//! values, never exceptions.

mod credit;
mod income;
mod savings;
mod signal;
mod stats;
mod subscription;
mod summary;

pub use credit::{CreditDetector, CreditSignals};
pub use income::{IncomeDetector, IncomeSignals};
pub use savings::{SavingsDetector, SavingsSignals};
pub use signal::{signal_type, Signal, SignalType, SignalValue, KNOWN_SIGNALS};
pub use subscription::{normalize_merchant, SubscriptionDetector, SubscriptionSignals};
pub use summary::{BehavioralSummary, SummaryAggregator};
