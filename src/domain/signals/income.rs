//! Income detector - payroll cadence, pay gap, buffer, variability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::savings::average_monthly_expense;
use super::signal::Signal;
use super::stats;
use super::subscription::{history_covers_window, normalize_merchant};
use crate::domain::banking::{Account, Transaction};
use crate::domain::foundation::{TimeWindow, Timestamp};

/// Transaction categories treated as payroll-like income.
const PAYROLL_CATEGORIES: &[&str] = &["payroll", "salary", "income"];

/// Minimum detected paychecks before cadence metrics are computed.
const MIN_PAYCHECKS: usize = 2;

/// Signal group produced by the income detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSignals {
    pub median_pay_gap: Signal,
    pub cash_flow_buffer: Signal,
    pub income_variability: Signal,
    pub paycheck_count: Signal,
    pub complete: bool,
}

impl IncomeSignals {
    /// All-missing group for no-income and brand-new users.
    pub fn missing(computed_at: Timestamp) -> Self {
        Self {
            median_pay_gap: Signal::missing(computed_at),
            cash_flow_buffer: Signal::missing(computed_at),
            income_variability: Signal::missing(computed_at),
            paycheck_count: Signal::missing(computed_at),
            complete: false,
        }
    }

    /// Looks up a signal by its metric name within this group.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        match name {
            "median_pay_gap" => Some(&self.median_pay_gap),
            "cash_flow_buffer" => Some(&self.cash_flow_buffer),
            "income_variability" => Some(&self.income_variability),
            "paycheck_count" => Some(&self.paycheck_count),
            _ => None,
        }
    }
}

/// Detects payroll-like inflows and computes income stability metrics.
///
/// New-job, job-change and no-income histories degrade to missing
/// signals; nothing in this detector raises.
pub struct IncomeDetector;

impl IncomeDetector {
    /// Runs the detector for one user and window.
    pub fn detect(
        transactions: &[Transaction],
        accounts: &[Account],
        window: &TimeWindow,
        computed_at: Timestamp,
    ) -> IncomeSignals {
        if transactions.is_empty() {
            return IncomeSignals::missing(computed_at);
        }

        // Paychecks from the same employer, by normalized merchant.
        let mut by_source: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| {
            t.is_inflow()
                && window.contains(t.posted_at)
                && PAYROLL_CATEGORIES.contains(&t.category.to_lowercase().as_str())
        }) {
            by_source
                .entry(normalize_merchant(&txn.merchant_name))
                .or_default()
                .push(txn);
        }

        // The dominant source is the one with the most paychecks; gap
        // statistics across mixed employers would be meaningless.
        let paychecks = by_source
            .values()
            .max_by_key(|v| v.len())
            .cloned()
            .unwrap_or_default();

        let (median_pay_gap, income_variability) = if paychecks.len() >= MIN_PAYCHECKS {
            let mut dates: Vec<_> = paychecks.iter().map(|t| t.posted_at).collect();
            dates.sort_unstable();
            let gaps: Vec<i64> = dates
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).num_days())
                .collect();
            let amounts: Vec<f64> = paychecks.iter().map(|t| t.amount).collect();
            let variability = match (stats::mean(&amounts), stats::stddev(&amounts)) {
                (Some(mean), Some(sd)) if mean > 0.0 => Some(sd / mean),
                _ => None,
            };
            (stats::median(&gaps), variability)
        } else {
            (None, None)
        };

        let liquid_balance: f64 = accounts
            .iter()
            .filter(|a| a.is_liquid())
            .map(|a| a.balance)
            .sum();
        let buffer = match average_monthly_expense(transactions, window) {
            Some(expense) if expense > 0.0 => Some(liquid_balance / expense),
            _ => None,
        };

        IncomeSignals {
            median_pay_gap: Signal::from_number(median_pay_gap, computed_at),
            cash_flow_buffer: Signal::from_number(buffer, computed_at),
            income_variability: Signal::from_number(income_variability, computed_at),
            paycheck_count: Signal::number(paychecks.len() as f64, computed_at),
            complete: history_covers_window(transactions, window),
        }
    }
}
