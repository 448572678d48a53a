//! Savings detector - net inflow, growth rate, emergency fund coverage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signal::Signal;
use super::subscription::history_covers_window;
use crate::domain::banking::{Account, AccountType, Transaction};
use crate::domain::foundation::{TimeWindow, Timestamp};

/// Signal group produced by the savings detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSignals {
    pub net_inflow: Signal,
    pub growth_rate: Signal,
    pub emergency_fund_coverage: Signal,
    pub total_balance: Signal,
    pub complete: bool,
}

impl SavingsSignals {
    /// All-missing group used when the user has no savings accounts.
    pub fn missing(computed_at: Timestamp) -> Self {
        Self {
            net_inflow: Signal::missing(computed_at),
            growth_rate: Signal::missing(computed_at),
            emergency_fund_coverage: Signal::missing(computed_at),
            total_balance: Signal::missing(computed_at),
            complete: false,
        }
    }

    /// Looks up a signal by its metric name within this group.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        match name {
            "net_inflow" => Some(&self.net_inflow),
            "growth_rate" => Some(&self.growth_rate),
            "emergency_fund_coverage" => Some(&self.emergency_fund_coverage),
            "total_balance" => Some(&self.total_balance),
            _ => None,
        }
    }
}

/// Computes savings metrics across savings-type accounts.
///
/// Account balances are as of the reference date; the window-start
/// balance is reconstructed by subtracting the window's net inflow.
pub struct SavingsDetector;

impl SavingsDetector {
    /// Runs the detector for one user and window.
    pub fn detect(
        transactions: &[Transaction],
        accounts: &[Account],
        window: &TimeWindow,
        computed_at: Timestamp,
    ) -> SavingsSignals {
        let savings_ids: HashSet<Uuid> = accounts
            .iter()
            .filter(|a| a.account_type == AccountType::Savings)
            .map(|a| a.id)
            .collect();
        if savings_ids.is_empty() {
            return SavingsSignals::missing(computed_at);
        }

        let mut net_inflow = 0.0;
        for txn in transactions
            .iter()
            .filter(|t| savings_ids.contains(&t.account_id) && window.contains(t.posted_at))
        {
            if txn.is_inflow() {
                net_inflow += txn.amount;
            } else {
                net_inflow -= txn.amount;
            }
        }

        let end_balance: f64 = accounts
            .iter()
            .filter(|a| savings_ids.contains(&a.id))
            .map(|a| a.balance)
            .sum();
        let start_balance = end_balance - net_inflow;

        let growth_rate = if start_balance > 0.0 {
            Some((end_balance - start_balance) / start_balance)
        } else {
            // A zero or reconstructed-negative start balance makes the
            // ratio meaningless; mark it missing rather than infinite.
            None
        };

        let monthly_expense = average_monthly_expense(transactions, window);
        let coverage = match monthly_expense {
            Some(expense) if expense > 0.0 => Some(end_balance / expense),
            _ => None,
        };

        SavingsSignals {
            net_inflow: Signal::number(net_inflow, computed_at),
            growth_rate: Signal::from_number(growth_rate, computed_at),
            emergency_fund_coverage: Signal::from_number(coverage, computed_at),
            total_balance: Signal::number(end_balance, computed_at),
            complete: history_covers_window(transactions, window),
        }
    }
}

/// Average monthly outflow across all accounts in the window, using
/// 30-day months; `None` when there is no spend.
pub(crate) fn average_monthly_expense(
    transactions: &[Transaction],
    window: &TimeWindow,
) -> Option<f64> {
    let total: f64 = transactions
        .iter()
        .filter(|t| t.is_outflow() && window.contains(t.posted_at))
        .map(|t| t.amount)
        .sum();
    if total > 0.0 {
        Some(total / window.window_days.as_months())
    } else {
        None
    }
}
