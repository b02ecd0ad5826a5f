//! Percentage change of the balance since the start of the calendar month
//!
//! The backend does not report a historical balance, so the opening balance
//! is reconstructed by undoing this month's transactions against the current
//! balance. Transfers are undone as outgoing: the transaction record does not
//! say which side of a transfer the session user was on, so a received
//! transfer is misreported.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Transaction, TransactionType};
use crate::time::start_of_month;

/// Net changes smaller than this are treated as no change
const CHANGE_EPSILON: f64 = 1e-9;

/// Outcome of the estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyChange {
    /// Signed percentage; meaningless when `has_change` is false
    pub percentage: f64,
    /// False means "hide the badge", which is distinct from showing `0.0%`
    pub has_change: bool,
}

/// Which way the balance moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl MonthlyChange {
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage,
            has_change: true,
        }
    }

    pub fn none() -> Self {
        Self {
            percentage: 0.0,
            has_change: false,
        }
    }

    pub fn direction(&self) -> Option<ChangeDirection> {
        if !self.has_change {
            None
        } else if self.percentage > 0.0 {
            Some(ChangeDirection::Up)
        } else {
            Some(ChangeDirection::Down)
        }
    }
}

/// Estimate the change against the current clock
pub fn estimate_monthly_change(
    balance: Option<f64>,
    transactions: Option<&[Transaction]>,
) -> MonthlyChange {
    estimate_monthly_change_at(balance, transactions, Utc::now())
}

/// Estimate the change as seen at `now`.
///
/// Returns "no change" when the balance or the transaction list is absent.
pub fn estimate_monthly_change_at(
    balance: Option<f64>,
    transactions: Option<&[Transaction]>,
    now: DateTime<Utc>,
) -> MonthlyChange {
    // a zero balance counts as absent, like a missing one
    let balance = balance.filter(|b| b.is_finite() && *b != 0.0);
    let (balance, transactions) = match (balance, transactions) {
        (Some(b), Some(t)) => (b, t),
        _ => return MonthlyChange::none(),
    };

    let opening = opening_balance(balance, transactions, start_of_month(now));
    let net_change = balance - opening;

    log::debug!(
        "monthly change: balance={} opening={} net={}",
        balance,
        opening,
        net_change
    );

    if net_change.abs() < CHANGE_EPSILON {
        return MonthlyChange::none();
    }

    if opening <= 0.0 {
        return if net_change > 0.0 {
            MonthlyChange::new(100.0)
        } else {
            MonthlyChange::new(-100.0)
        };
    }

    MonthlyChange::new(net_change / opening * 100.0)
}

/// Undo every transaction stamped at or after `since`.
/// Transactions without a readable timestamp are left out.
pub fn opening_balance(balance: f64, transactions: &[Transaction], since: DateTime<Utc>) -> f64 {
    transactions
        .iter()
        .filter(|t| t.timestamp().map_or(false, |ts| ts >= since))
        .fold(balance, |acc, t| match t.kind {
            TransactionType::Deposit => acc - t.magnitude(),
            TransactionType::Withdraw | TransactionType::Transfer => acc + t.magnitude(),
            TransactionType::Other(_) => acc,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-07-18T12:00:00Z").unwrap()
    }

    fn tx(kind: TransactionType, amount: f64, at: &str) -> Transaction {
        Transaction::new(kind, amount, at)
    }

    #[test]
    fn test_absent_inputs() {
        assert_eq!(estimate_monthly_change_at(None, Some(&[][..]), now()), MonthlyChange::none());
        assert_eq!(estimate_monthly_change_at(Some(100.0), None, now()), MonthlyChange::none());
        assert!(!estimate_monthly_change_at(Some(f64::NAN), Some(&[][..]), now()).has_change);
    }

    #[test]
    fn test_no_transactions_is_no_change() {
        let change = estimate_monthly_change_at(Some(100.0), Some(&[][..]), now());
        assert!(!change.has_change);
        assert_eq!(change.direction(), None);
    }

    #[test]
    fn test_single_deposit() {
        let txs = vec![tx(TransactionType::Deposit, 50.0, "2024-07-02T09:00:00Z")];
        let change = estimate_monthly_change_at(Some(150.0), Some(&txs), now());
        assert!(change.has_change);
        assert!((change.percentage - 50.0).abs() < 1e-9);
        assert_eq!(change.direction(), Some(ChangeDirection::Up));
    }

    #[test]
    fn test_withdraw_and_transfer_reduce() {
        let txs = vec![
            tx(TransactionType::Withdraw, 20.0, "2024-07-03T09:00:00Z"),
            tx(TransactionType::Transfer, 30.0, "2024-07-04T09:00:00Z"),
        ];
        // opening = 50 + 20 + 30 = 100
        let change = estimate_monthly_change_at(Some(50.0), Some(&txs), now());
        assert!((change.percentage + 50.0).abs() < 1e-9);
        assert_eq!(change.direction(), Some(ChangeDirection::Down));
    }

    #[test]
    fn test_previous_month_ignored() {
        let txs = vec![
            tx(TransactionType::Deposit, 500.0, "2024-06-30T23:59:59Z"),
            tx(TransactionType::Deposit, 10.0, "2024-07-01T00:00:00Z"),
            tx(TransactionType::Deposit, 10.0, "garbage"),
        ];
        assert_eq!(opening_balance(110.0, &txs, start_of_month(now())), 100.0);
    }

    #[test]
    fn test_unknown_type_has_no_effect() {
        let txs = vec![tx(TransactionType::Other("fee".to_string()), 10.0, "2024-07-05T00:00:00Z")];
        assert!(!estimate_monthly_change_at(Some(100.0), Some(&txs), now()).has_change);
    }

    #[test]
    fn test_non_positive_opening() {
        let from_zero = vec![tx(TransactionType::Deposit, 80.0, "2024-07-05T00:00:00Z")];
        assert_eq!(
            estimate_monthly_change_at(Some(80.0), Some(&from_zero), now()),
            MonthlyChange::new(100.0)
        );

        // opening = 10 - 40 = -30, net = +40
        let overdrawn = vec![tx(TransactionType::Deposit, 40.0, "2024-07-05T00:00:00Z")];
        assert_eq!(
            estimate_monthly_change_at(Some(10.0), Some(&overdrawn), now()),
            MonthlyChange::new(100.0)
        );
    }

    #[test]
    fn test_drained_account() {
        let txs = vec![tx(TransactionType::Withdraw, 75.0, "2024-07-05T00:00:00Z")];
        let change = estimate_monthly_change_at(Some(0.0), Some(&txs), now());
        assert_eq!(change, MonthlyChange::none());
    }
}
