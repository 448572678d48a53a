//! Subscription detector - recurring merchants and recurring spend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::signal::Signal;
use super::stats;
use crate::domain::banking::Transaction;
use crate::domain::foundation::{TimeWindow, Timestamp};

/// Trailing lookback used for recurrence detection, independent of the
/// assignment window length.
pub const RECURRING_LOOKBACK_DAYS: i64 = 90;

/// Minimum occurrences within the lookback for a merchant to qualify.
pub const MIN_OCCURRENCES: usize = 3;

/// Cadence tolerance bands, in days around the median gap.
///
/// A merchant is weekly when its median gap falls in [5, 9] and every
/// gap is within 3 days of the median; monthly when the median falls in
/// [26, 35] and every gap is within 7 days. Amounts must stay within a
/// 20% coefficient of variation. Drift beyond these bands, pauses, and
/// cancellations simply stop the merchant from qualifying.
const WEEKLY_MEDIAN_RANGE: (f64, f64) = (5.0, 9.0);
const WEEKLY_GAP_TOLERANCE: f64 = 3.0;
const MONTHLY_MEDIAN_RANGE: (f64, f64) = (26.0, 35.0);
const MONTHLY_GAP_TOLERANCE: f64 = 7.0;
const AMOUNT_VARIATION_LIMIT: f64 = 0.20;

/// Signal group produced by the subscription detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSignals {
    pub monthly_recurring_spend: Signal,
    pub subscription_share: Signal,
    pub recurring_merchant_count: Signal,
    pub complete: bool,
}

impl SubscriptionSignals {
    /// All-missing group used when a detector has nothing to work with.
    pub fn missing(computed_at: Timestamp) -> Self {
        Self {
            monthly_recurring_spend: Signal::missing(computed_at),
            subscription_share: Signal::missing(computed_at),
            recurring_merchant_count: Signal::missing(computed_at),
            complete: false,
        }
    }

    /// Looks up a signal by its metric name within this group.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        match name {
            "monthly_recurring_spend" => Some(&self.monthly_recurring_spend),
            "subscription_share" => Some(&self.subscription_share),
            "recurring_merchant_count" => Some(&self.recurring_merchant_count),
            _ => None,
        }
    }
}

/// Normalizes a raw merchant string into a grouping identity.
///
/// Lowercases, strips digits and punctuation (store numbers, reference
/// codes), and collapses whitespace.
pub fn normalize_merchant(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detects recurring merchants and computes recurring-spend metrics.
pub struct SubscriptionDetector;

impl SubscriptionDetector {
    /// Runs the detector for one user and window.
    pub fn detect(
        transactions: &[Transaction],
        window: &TimeWindow,
        computed_at: Timestamp,
    ) -> SubscriptionSignals {
        if transactions.is_empty() {
            return SubscriptionSignals::missing(computed_at);
        }

        let lookback = window.with_lookback_days(RECURRING_LOOKBACK_DAYS);
        let mut by_merchant: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| t.is_outflow()) {
            if lookback.contains(txn.posted_at) {
                by_merchant
                    .entry(normalize_merchant(&txn.merchant_name))
                    .or_default()
                    .push(txn);
            }
        }

        let mut recurring_count = 0u32;
        let mut monthly_recurring_spend = 0.0;
        for occurrences in by_merchant.values() {
            if let Some(monthly_amount) = Self::monthly_amount(occurrences) {
                recurring_count += 1;
                monthly_recurring_spend += monthly_amount;
            }
        }

        let total_spend_in_window: f64 = transactions
            .iter()
            .filter(|t| t.is_outflow() && window.contains(t.posted_at))
            .map(|t| t.amount)
            .sum();

        let share = if total_spend_in_window > 0.0 {
            Some(monthly_recurring_spend / total_spend_in_window)
        } else {
            None
        };

        SubscriptionSignals {
            monthly_recurring_spend: Signal::number(monthly_recurring_spend, computed_at),
            subscription_share: Signal::from_number(share, computed_at),
            recurring_merchant_count: Signal::number(recurring_count as f64, computed_at),
            complete: history_covers_window(transactions, window),
        }
    }

    /// Returns the merchant's average monthly amount when it qualifies
    /// as recurring, `None` otherwise.
    fn monthly_amount(occurrences: &[&Transaction]) -> Option<f64> {
        if occurrences.len() < MIN_OCCURRENCES {
            return None;
        }

        let mut dates: Vec<_> = occurrences.iter().map(|t| t.posted_at).collect();
        dates.sort_unstable();
        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .collect();
        let median_gap = stats::median(&gaps)?;

        let tolerance = if median_gap >= WEEKLY_MEDIAN_RANGE.0 && median_gap <= WEEKLY_MEDIAN_RANGE.1
        {
            WEEKLY_GAP_TOLERANCE
        } else if median_gap >= MONTHLY_MEDIAN_RANGE.0 && median_gap <= MONTHLY_MEDIAN_RANGE.1 {
            MONTHLY_GAP_TOLERANCE
        } else {
            return None;
        };
        if gaps
            .iter()
            .any(|g| (*g as f64 - median_gap).abs() > tolerance)
        {
            return None;
        }

        let amounts: Vec<f64> = occurrences.iter().map(|t| t.amount).collect();
        let mean_amount = stats::mean(&amounts)?;
        if mean_amount <= 0.0 {
            return None;
        }
        let variation = stats::stddev(&amounts)? / mean_amount;
        if variation > AMOUNT_VARIATION_LIMIT {
            return None;
        }

        // Weekly charges are scaled to a 30-day month; monthly charges
        // already are one.
        Some(mean_amount * 30.0 / median_gap.max(1.0))
    }
}

/// Checks whether transaction history reaches back to the window start.
pub(crate) fn history_covers_window(transactions: &[Transaction], window: &TimeWindow) -> bool {
    transactions
        .iter()
        .any(|t| t.posted_at <= window.start_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::banking::TransactionDirection;
    use crate::domain::foundation::{UserId, WindowDays};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn outflow(merchant: &str, amount: f64, posted_at: NaiveDate) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: UserId::new("u1").unwrap(),
            account_id: Uuid::new_v4(),
            merchant_name: merchant.to_string(),
            category: "subscription".to_string(),
            amount,
            direction: TransactionDirection::Outflow,
            posted_at,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::resolve(date(2026, 3, 31), WindowDays::Thirty)
    }

    #[test]
    fn normalize_merchant_strips_store_codes() {
        assert_eq!(normalize_merchant("NETFLIX.COM #4821"), "netflix com");
        assert_eq!(normalize_merchant("  Spotify AB  "), "spotify ab");
        assert_eq!(normalize_merchant("GYM-1234"), "gym");
    }

    #[test]
    fn monthly_merchant_qualifies_with_three_occurrences() {
        let txns = vec![
            outflow("Netflix", 15.99, date(2026, 1, 15)),
            outflow("NETFLIX #01", 15.99, date(2026, 2, 15)),
            outflow("Netflix", 15.99, date(2026, 3, 15)),
            // history reaching past the window start
            outflow("Grocer", 80.0, date(2026, 2, 20)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert_eq!(
            signals.recurring_merchant_count.value.as_number(),
            Some(1.0)
        );
        // median gap between Jan 15, Feb 15 and Mar 15 is 29.5 days
        let spend = signals.monthly_recurring_spend.value.as_number().unwrap();
        assert!((spend - 15.99 * 30.0 / 29.5).abs() < 1e-6);
    }

    #[test]
    fn weekly_merchant_scales_to_monthly_amount() {
        let txns = vec![
            outflow("Lunch Club", 12.0, date(2026, 3, 3)),
            outflow("Lunch Club", 12.0, date(2026, 3, 10)),
            outflow("Lunch Club", 12.0, date(2026, 3, 17)),
            outflow("Lunch Club", 12.0, date(2026, 3, 24)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        let spend = signals.monthly_recurring_spend.value.as_number().unwrap();
        assert!((spend - 12.0 * 30.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn two_occurrences_do_not_qualify() {
        let txns = vec![
            outflow("Netflix", 15.99, date(2026, 2, 15)),
            outflow("Netflix", 15.99, date(2026, 3, 15)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert_eq!(
            signals.recurring_merchant_count.value.as_number(),
            Some(0.0)
        );
    }

    #[test]
    fn irregular_cadence_does_not_qualify() {
        let txns = vec![
            outflow("Erratic", 20.0, date(2026, 1, 5)),
            outflow("Erratic", 20.0, date(2026, 1, 9)),
            outflow("Erratic", 20.0, date(2026, 3, 20)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert_eq!(
            signals.recurring_merchant_count.value.as_number(),
            Some(0.0)
        );
    }

    #[test]
    fn large_amount_drift_does_not_qualify() {
        let txns = vec![
            outflow("Utility", 10.0, date(2026, 1, 15)),
            outflow("Utility", 90.0, date(2026, 2, 15)),
            outflow("Utility", 10.0, date(2026, 3, 15)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert_eq!(
            signals.recurring_merchant_count.value.as_number(),
            Some(0.0)
        );
    }

    #[test]
    fn paused_subscription_stops_qualifying() {
        // Only two occurrences remain inside the 90-day lookback.
        let txns = vec![
            outflow("Cancelled TV", 9.99, date(2025, 10, 1)),
            outflow("Cancelled TV", 9.99, date(2026, 2, 1)),
            outflow("Cancelled TV", 9.99, date(2026, 3, 1)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert_eq!(
            signals.recurring_merchant_count.value.as_number(),
            Some(0.0)
        );
    }

    #[test]
    fn share_missing_when_no_spend_in_window() {
        let txns = vec![
            outflow("Netflix", 15.99, date(2025, 11, 15)),
            outflow("Netflix", 15.99, date(2025, 12, 15)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert!(signals.subscription_share.is_missing());
    }

    #[test]
    fn empty_history_yields_missing_group() {
        let signals = SubscriptionDetector::detect(&[], &window(), Timestamp::now());
        assert!(signals.monthly_recurring_spend.is_missing());
        assert!(!signals.complete);
    }

    #[test]
    fn short_history_marks_group_incomplete() {
        let txns = vec![
            outflow("Netflix", 15.99, date(2026, 3, 10)),
            outflow("Netflix", 15.99, date(2026, 3, 17)),
            outflow("Netflix", 15.99, date(2026, 3, 24)),
        ];
        let signals = SubscriptionDetector::detect(&txns, &window(), Timestamp::now());
        assert!(!signals.complete);
    }
}
