//! Newest-first ordering

use std::cmp::Ordering;

use crate::models::Transaction;

/// Stable sort by `createdAt`, most recent first.
///
/// Transactions without a readable timestamp go last; ties keep input order.
pub fn sort_transactions_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut keyed: Vec<_> = transactions.iter().map(|t| (t.timestamp(), t)).collect();
    let unreadable = keyed
        .iter()
        .filter(|(ts, t)| ts.is_none() && t.created_at.as_deref().is_some_and(|c| !c.is_empty()))
        .count();
    if unreadable > 0 {
        log::warn!("{} transaction(s) with an unparseable createdAt sorted last", unreadable);
    }
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, t)| t.clone()).collect()
}

/// The `count` most recent transactions
pub fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted = sort_transactions_desc(transactions);
    sorted.truncate(count);
    sorted
}
