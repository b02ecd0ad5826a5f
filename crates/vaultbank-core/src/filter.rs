//! Transaction and account filtering
//!
//! Criteria combine with AND; the type set combines with OR. An unset
//! criterion matches everything, so an empty filter is the identity.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::models::{Account, Transaction, TransactionType};
use crate::time::{end_of_day, parse_date_input, start_of_day};
use crate::validation::sanitize_amount_filter;

/// Amounts closer than this are considered equal
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Criteria for the history view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Inclusive lower bound, from the start of that day
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound, through the end of that day
    pub to_date: Option<NaiveDate>,
    /// Exact amount, compared against the absolute amount
    pub amount: Option<f64>,
    /// Accepted types; empty means any type
    pub types: HashSet<TransactionType>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw form input. Blank or unparseable fields are left unset.
    pub fn from_inputs(from: &str, to: &str, amount: &str, types: &[TransactionType]) -> Self {
        Self {
            from_date: parse_date_input(from),
            to_date: parse_date_input(to),
            amount: sanitize_amount_filter(amount),
            types: types.iter().cloned().collect(),
        }
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.types.insert(kind);
        self
    }

    /// Add the type if absent, remove it if present
    pub fn toggle_type(&mut self, kind: TransactionType) {
        if !self.types.remove(&kind) {
            self.types.insert(kind);
        }
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.from_date.is_none() && self.to_date.is_none() && self.amount.is_none() && self.types.is_empty()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_date(tx) && self.matches_amount(tx) && self.matches_type(tx)
    }

    fn matches_date(&self, tx: &Transaction) -> bool {
        if self.from_date.is_none() && self.to_date.is_none() {
            return true;
        }
        // An undated transaction cannot be placed inside any range
        let Some(ts) = tx.timestamp() else {
            return false;
        };
        let after_start = self.from_date.map_or(true, |d| ts >= start_of_day(d));
        let before_end = self.to_date.map_or(true, |d| ts <= end_of_day(d));
        after_start && before_end
    }

    fn matches_amount(&self, tx: &Transaction) -> bool {
        match self.amount {
            Some(wanted) => (tx.magnitude() - wanted.abs()).abs() < AMOUNT_TOLERANCE,
            None => true,
        }
    }

    fn matches_type(&self, tx: &Transaction) -> bool {
        self.types.is_empty() || self.types.contains(&tx.kind)
    }
}

/// Keep the transactions matching every criterion of `filter`, in input order
pub fn filter_transactions(transactions: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    if filter.is_empty() {
        return transactions.to_vec();
    }

    let matched: Vec<Transaction> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect();

    log::debug!(
        "filtered transactions: {} of {} matched",
        matched.len(),
        transactions.len()
    );
    matched
}

/// Case-insensitive username search; a leading `@` in the query is ignored.
/// A blank query, or a bare `@`, returns every account.
pub fn filter_accounts(accounts: &[Account], query: &str) -> Vec<Account> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return accounts.to_vec();
    }
    let bare = vaultbank_utils::strip_mention(&query);

    accounts
        .iter()
        .filter(|a| {
            let username = a.username.to_lowercase();
            username.contains(&query) || username.contains(bare)
        })
        .cloned()
        .collect()
}
