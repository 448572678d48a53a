//! Behavioral summary - the merged, versioned signal snapshot.

use serde::{Deserialize, Serialize};

use super::credit::{CreditDetector, CreditSignals};
use super::income::{IncomeDetector, IncomeSignals};
use super::savings::{SavingsDetector, SavingsSignals};
use super::signal::Signal;
use super::subscription::{SubscriptionDetector, SubscriptionSignals};
use crate::domain::banking::{Account, Liability, Transaction};
use crate::domain::foundation::{TimeWindow, Timestamp, UserId};

/// One user's behavioral signals for one time window.
///
/// Immutable once produced: a new reference date or window length yields
/// a new summary, never an in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralSummary {
    pub user_id: UserId,
    pub window: TimeWindow,
    pub history_days: Signal,
    pub subscription: SubscriptionSignals,
    pub savings: SavingsSignals,
    pub credit: CreditSignals,
    pub income: IncomeSignals,
    pub computed_at: Timestamp,
}

impl BehavioralSummary {
    /// Looks up a signal by its dotted name (`group.metric`), or the
    /// summary-level `history_days`.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        if name == "history_days" {
            return Some(&self.history_days);
        }
        match name.split_once('.') {
            Some(("subscription", metric)) => self.subscription.signal(metric),
            Some(("savings", metric)) => self.savings.signal(metric),
            Some(("credit", metric)) => self.credit.signal(metric),
            Some(("income", metric)) => self.income.signal(metric),
            _ => None,
        }
    }

    /// Checks whether every signal group is complete for this window.
    pub fn is_complete(&self) -> bool {
        self.subscription.complete
            && self.savings.complete
            && self.credit.complete
            && self.income.complete
    }
}

/// Assembles the four detectors' outputs into one summary.
///
/// Pure structural merge: no business logic beyond running the
/// detectors and stamping the shared computation timestamp.
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Builds a behavioral summary for one user and window.
    pub fn assemble(
        user_id: UserId,
        window: TimeWindow,
        transactions: &[Transaction],
        accounts: &[Account],
        liabilities: &[Liability],
    ) -> BehavioralSummary {
        let computed_at = Timestamp::now();

        let history_days = transactions
            .iter()
            .map(|t| (window.reference_date - t.posted_at).num_days())
            .max()
            .filter(|days| *days >= 0)
            .map(|days| days as f64);

        BehavioralSummary {
            user_id,
            window,
            history_days: Signal::from_number(history_days, computed_at),
            subscription: SubscriptionDetector::detect(transactions, &window, computed_at),
            savings: SavingsDetector::detect(transactions, accounts, &window, computed_at),
            credit: CreditDetector::detect(liabilities, computed_at),
            income: IncomeDetector::detect(transactions, accounts, &window, computed_at),
            computed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::banking::{AccountType, TransactionDirection};
    use crate::domain::foundation::WindowDays;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(posted_at: NaiveDate) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: UserId::new("u1").unwrap(),
            account_id: Uuid::new_v4(),
            merchant_name: "Grocer".to_string(),
            category: "groceries".to_string(),
            amount: 50.0,
            direction: TransactionDirection::Outflow,
            posted_at,
        }
    }

    fn summary_for(transactions: &[Transaction]) -> BehavioralSummary {
        let window = TimeWindow::resolve(date(2026, 3, 31), WindowDays::Thirty);
        SummaryAggregator::assemble(
            UserId::new("u1").unwrap(),
            window,
            transactions,
            &[],
            &[],
        )
    }

    #[test]
    fn history_days_measures_oldest_transaction() {
        let txns = vec![txn(date(2026, 2, 14)), txn(date(2026, 3, 20))];
        let summary = summary_for(&txns);
        assert_eq!(summary.history_days.value.as_number(), Some(45.0));
    }

    #[test]
    fn history_days_missing_without_transactions() {
        let summary = summary_for(&[]);
        assert!(summary.history_days.is_missing());
    }

    #[test]
    fn signal_lookup_resolves_dotted_names() {
        let summary = summary_for(&[txn(date(2026, 3, 20))]);
        assert!(summary.signal("credit.max_utilization").is_some());
        assert!(summary.signal("subscription.subscription_share").is_some());
        assert!(summary.signal("income.cash_flow_buffer").is_some());
        assert!(summary.signal("savings.growth_rate").is_some());
        assert!(summary.signal("history_days").is_some());
        assert!(summary.signal("credit.unknown_metric").is_none());
        assert!(summary.signal("unknown.max_utilization").is_none());
    }

    #[test]
    fn every_known_signal_resolves() {
        let summary = summary_for(&[txn(date(2026, 3, 20))]);
        for (name, _) in crate::domain::signals::KNOWN_SIGNALS {
            assert!(
                summary.signal(name).is_some(),
                "known signal '{}' did not resolve",
                name
            );
        }
    }

    #[test]
    fn missing_groups_marked_incomplete() {
        let summary = summary_for(&[]);
        assert!(!summary.is_complete());
        assert!(!summary.credit.complete);
        assert!(!summary.savings.complete);
    }

    #[test]
    fn summary_serializes_round_trip() {
        let summary = summary_for(&[txn(date(2026, 3, 20))]);
        let json = serde_json::to_string(&summary).unwrap();
        let back: BehavioralSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }
}
