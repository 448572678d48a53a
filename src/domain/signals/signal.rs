//! Signal value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// The value of a derived metric: numeric, boolean, or missing.
///
/// Missing is a first-class state produced by zero-denominator
/// arithmetic and absent source data; it is never represented as
/// infinity, NaN, or an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SignalValue {
    Number(f64),
    Flag(bool),
    Missing,
}

impl SignalValue {
    /// Wraps an optional number, mapping `None` to `Missing`.
    pub fn from_number(value: Option<f64>) -> Self {
        match value {
            Some(v) => SignalValue::Number(v),
            None => SignalValue::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SignalValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SignalValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SignalValue::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Number(v) => write!(f, "{}", v),
            SignalValue::Flag(v) => write!(f, "{}", v),
            SignalValue::Missing => write!(f, "missing"),
        }
    }
}

/// A computed signal: value plus computation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub value: SignalValue,
    pub computed_at: Timestamp,
}

impl Signal {
    pub fn number(value: f64, computed_at: Timestamp) -> Self {
        Self {
            value: SignalValue::Number(value),
            computed_at,
        }
    }

    pub fn flag(value: bool, computed_at: Timestamp) -> Self {
        Self {
            value: SignalValue::Flag(value),
            computed_at,
        }
    }

    pub fn missing(computed_at: Timestamp) -> Self {
        Self {
            value: SignalValue::Missing,
            computed_at,
        }
    }

    /// Wraps an optional number, mapping `None` to a missing signal.
    pub fn from_number(value: Option<f64>, computed_at: Timestamp) -> Self {
        Self {
            value: SignalValue::from_number(value),
            computed_at,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_missing()
    }
}

/// The declared type of a known signal, used to validate rule trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    Number,
    Flag,
}

/// Every signal name a persona rule tree may reference, with its type.
///
/// Names are dotted paths: `<group>.<metric>`, except the summary-level
/// `history_days`.
pub const KNOWN_SIGNALS: &[(&str, SignalType)] = &[
    ("history_days", SignalType::Number),
    ("subscription.monthly_recurring_spend", SignalType::Number),
    ("subscription.subscription_share", SignalType::Number),
    ("subscription.recurring_merchant_count", SignalType::Number),
    ("savings.net_inflow", SignalType::Number),
    ("savings.growth_rate", SignalType::Number),
    ("savings.emergency_fund_coverage", SignalType::Number),
    ("savings.total_balance", SignalType::Number),
    ("credit.max_utilization", SignalType::Number),
    ("credit.aggregate_utilization", SignalType::Number),
    ("credit.utilization_above_30", SignalType::Flag),
    ("credit.utilization_above_50", SignalType::Flag),
    ("credit.utilization_above_80", SignalType::Flag),
    ("credit.minimum_payment_only", SignalType::Flag),
    ("credit.interest_charged", SignalType::Flag),
    ("credit.overdue", SignalType::Flag),
    ("credit.total_limits", SignalType::Number),
    ("income.median_pay_gap", SignalType::Number),
    ("income.cash_flow_buffer", SignalType::Number),
    ("income.income_variability", SignalType::Number),
    ("income.paycheck_count", SignalType::Number),
];

/// Looks up the declared type of a signal name.
pub fn signal_type(name: &str) -> Option<SignalType> {
    KNOWN_SIGNALS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, ty)| *ty)
}
