//! Credit detector - utilization and statement flags.

use serde::{Deserialize, Serialize};

use super::signal::Signal;
use crate::domain::banking::Liability;
use crate::domain::foundation::Timestamp;

/// Utilization thresholds for the boolean flags.
const UTILIZATION_FLAG_30: f64 = 0.30;
const UTILIZATION_FLAG_50: f64 = 0.50;
const UTILIZATION_FLAG_80: f64 = 0.80;

/// Signal group produced by the credit detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSignals {
    pub max_utilization: Signal,
    pub aggregate_utilization: Signal,
    pub utilization_above_30: Signal,
    pub utilization_above_50: Signal,
    pub utilization_above_80: Signal,
    pub minimum_payment_only: Signal,
    pub interest_charged: Signal,
    pub overdue: Signal,
    pub total_limits: Signal,
    pub complete: bool,
}

impl CreditSignals {
    /// All-missing group for users with zero credit accounts.
    ///
    /// Missing here prevents a zero-utilization false positive.
    pub fn missing(computed_at: Timestamp) -> Self {
        Self {
            max_utilization: Signal::missing(computed_at),
            aggregate_utilization: Signal::missing(computed_at),
            utilization_above_30: Signal::missing(computed_at),
            utilization_above_50: Signal::missing(computed_at),
            utilization_above_80: Signal::missing(computed_at),
            minimum_payment_only: Signal::missing(computed_at),
            interest_charged: Signal::missing(computed_at),
            overdue: Signal::missing(computed_at),
            total_limits: Signal::missing(computed_at),
            complete: false,
        }
    }

    /// Looks up a signal by its metric name within this group.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        match name {
            "max_utilization" => Some(&self.max_utilization),
            "aggregate_utilization" => Some(&self.aggregate_utilization),
            "utilization_above_30" => Some(&self.utilization_above_30),
            "utilization_above_50" => Some(&self.utilization_above_50),
            "utilization_above_80" => Some(&self.utilization_above_80),
            "minimum_payment_only" => Some(&self.minimum_payment_only),
            "interest_charged" => Some(&self.interest_charged),
            "overdue" => Some(&self.overdue),
            "total_limits" => Some(&self.total_limits),
            _ => None,
        }
    }
}

/// Computes per-card and aggregate credit metrics from liabilities.
///
/// Statement figures are point-in-time facts, so this detector does not
/// window its inputs; completeness means credit data exists at all.
pub struct CreditDetector;

impl CreditDetector {
    /// Runs the detector for one user.
    pub fn detect(liabilities: &[Liability], computed_at: Timestamp) -> CreditSignals {
        if liabilities.is_empty() {
            return CreditSignals::missing(computed_at);
        }

        let utilizations: Vec<f64> = liabilities
            .iter()
            .filter_map(|l| l.utilization())
            .collect();
        let max_utilization = utilizations
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, u| {
                Some(acc.map_or(u, |m| m.max(u)))
            });

        let total_limits: f64 = liabilities.iter().map(|l| l.credit_limit).sum();
        let total_balances: f64 = liabilities.iter().map(|l| l.balance).sum();
        let aggregate = if total_limits > 0.0 {
            Some(total_balances / total_limits)
        } else {
            None
        };

        let flag_above = |threshold: f64| {
            max_utilization.map(|u| u >= threshold)
        };

        CreditSignals {
            max_utilization: Signal::from_number(max_utilization, computed_at),
            aggregate_utilization: Signal::from_number(aggregate, computed_at),
            utilization_above_30: flag_signal(flag_above(UTILIZATION_FLAG_30), computed_at),
            utilization_above_50: flag_signal(flag_above(UTILIZATION_FLAG_50), computed_at),
            utilization_above_80: flag_signal(flag_above(UTILIZATION_FLAG_80), computed_at),
            minimum_payment_only: Signal::flag(
                liabilities.iter().any(|l| l.paid_minimum_only()),
                computed_at,
            ),
            interest_charged: Signal::flag(
                liabilities.iter().any(|l| l.interest_charged > 0.0),
                computed_at,
            ),
            overdue: Signal::flag(liabilities.iter().any(|l| l.is_overdue), computed_at),
            total_limits: Signal::number(total_limits, computed_at),
            complete: true,
        }
    }
}

fn flag_signal(value: Option<bool>, computed_at: Timestamp) -> Signal {
    match value {
        Some(v) => Signal::flag(v, computed_at),
        None => Signal::missing(computed_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use uuid::Uuid;

    fn card(limit: f64, balance: f64) -> Liability {
        Liability {
            account_id: Uuid::new_v4(),
            user_id: UserId::new("u1").unwrap(),
            credit_limit: limit,
            balance,
            minimum_payment_due: 0.0,
            last_payment_amount: 0.0,
            interest_charged: 0.0,
            is_overdue: false,
        }
    }

    #[test]
    fn per_card_and_aggregate_utilization() {
        let cards = vec![card(1000.0, 680.0), card(3000.0, 300.0)];
        let signals = CreditDetector::detect(&cards, Timestamp::now());
        let max = signals.max_utilization.value.as_number().unwrap();
        assert!((max - 0.68).abs() < 1e-9);
        let aggregate = signals.aggregate_utilization.value.as_number().unwrap();
        assert!((aggregate - 980.0 / 4000.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_flags_follow_max_utilization() {
        let cards = vec![card(1000.0, 680.0)];
        let signals = CreditDetector::detect(&cards, Timestamp::now());
        assert_eq!(signals.utilization_above_30.value.as_flag(), Some(true));
        assert_eq!(signals.utilization_above_50.value.as_flag(), Some(true));
        assert_eq!(signals.utilization_above_80.value.as_flag(), Some(false));
    }

    #[test]
    fn interest_and_overdue_flags_any_card() {
        let mut interest_card = card(1000.0, 400.0);
        interest_card.interest_charged = 12.50;
        let mut overdue_card = card(2000.0, 100.0);
        overdue_card.is_overdue = true;

        let signals =
            CreditDetector::detect(&[interest_card, overdue_card], Timestamp::now());
        assert_eq!(signals.interest_charged.value.as_flag(), Some(true));
        assert_eq!(signals.overdue.value.as_flag(), Some(true));
    }

    #[test]
    fn minimum_payment_only_detected() {
        let mut min_card = card(1000.0, 400.0);
        min_card.minimum_payment_due = 35.0;
        min_card.last_payment_amount = 35.0;
        let signals = CreditDetector::detect(&[min_card], Timestamp::now());
        assert_eq!(signals.minimum_payment_only.value.as_flag(), Some(true));
    }

    #[test]
    fn zero_credit_accounts_yields_all_missing() {
        let signals = CreditDetector::detect(&[], Timestamp::now());
        assert!(signals.max_utilization.is_missing());
        assert!(signals.overdue.is_missing());
        assert!(!signals.complete);
    }

    #[test]
    fn zero_limit_cards_yield_missing_utilization_not_zero() {
        let cards = vec![card(0.0, 250.0)];
        let signals = CreditDetector::detect(&cards, Timestamp::now());
        assert!(signals.max_utilization.is_missing());
        assert!(signals.aggregate_utilization.is_missing());
        assert!(signals.utilization_above_30.is_missing());
        // flags that do not depend on limits still compute
        assert_eq!(signals.overdue.value.as_flag(), Some(false));
    }

    #[test]
    fn total_limits_sums_across_cards() {
        let cards = vec![card(1000.0, 0.0), card(1000.0, 0.0)];
        let signals = CreditDetector::detect(&cards, Timestamp::now());
        assert_eq!(signals.total_limits.value.as_number(), Some(2000.0));
    }
}
