//! Credit liability input record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::UserId;

/// A credit-card liability with its most recent statement figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub account_id: Uuid,
    pub user_id: UserId,
    pub credit_limit: f64,
    pub balance: f64,
    pub minimum_payment_due: f64,
    pub last_payment_amount: f64,
    pub interest_charged: f64,
    pub is_overdue: bool,
}

impl Liability {
    /// Per-card utilization, or `None` when the card has no limit.
    pub fn utilization(&self) -> Option<f64> {
        if self.credit_limit > 0.0 {
            Some(self.balance / self.credit_limit)
        } else {
            None
        }
    }

    /// Checks whether the last payment covered exactly the minimum due.
    pub fn paid_minimum_only(&self) -> bool {
        self.minimum_payment_due > 0.0
            && (self.last_payment_amount - self.minimum_payment_due).abs() < 0.005
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liability(limit: f64, balance: f64) -> Liability {
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
    fn utilization_divides_balance_by_limit() {
        let card = liability(1000.0, 680.0);
        assert!((card.utilization().unwrap() - 0.68).abs() < 1e-9);
    }

    #[test]
    fn utilization_missing_when_limit_is_zero() {
        assert!(liability(0.0, 500.0).utilization().is_none());
    }

    #[test]
    fn paid_minimum_only_matches_exact_payment() {
        let mut card = liability(1000.0, 400.0);
        card.minimum_payment_due = 35.0;
        card.last_payment_amount = 35.0;
        assert!(card.paid_minimum_only());

        card.last_payment_amount = 200.0;
        assert!(!card.paid_minimum_only());
    }

    #[test]
    fn paid_minimum_only_false_without_minimum_due() {
        let card = liability(1000.0, 0.0);
        assert!(!card.paid_minimum_only());
    }
}
