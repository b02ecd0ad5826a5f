//! Client-side banking logic
//!
//! Everything here works on records that were already fetched from the
//! backend:
//! - filter / sort / pager: list processing for the history and accounts views
//! - estimate: month-to-date balance change
//! - format: amounts and dates for display
//! - session / storage: login state and its persistence

pub mod error;
pub mod estimate;
pub mod filter;
pub mod format;
pub mod models;
pub mod pager;
pub mod session;
pub mod sort;
pub mod storage;
pub mod time;
pub mod validation;
pub mod views;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use estimate::{estimate_monthly_change, estimate_monthly_change_at, MonthlyChange};
pub use filter::{filter_accounts, filter_transactions, TransactionFilter};
pub use format::{format_amount, format_date, format_monthly_change, AmountFormatter};
pub use models::{Account, AmountRequest, AuthToken, Credentials, Transaction, TransactionType};
pub use pager::{page_window, PageWindow, ScrollDirection, WindowedPager};
pub use session::{Session, SessionState};
pub use sort::{recent_transactions, sort_transactions_desc};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use views::{AccountDirectory, TransactionHistory};

/// What the balance screen shows
#[derive(Debug, Clone, Serialize)]
pub struct BalanceOverview {
    pub username: String,
    pub balance: f64,
    pub change: MonthlyChange,
    pub recent: Vec<Transaction>,
}

impl BalanceOverview {
    pub fn build(
        account: &Account,
        transactions: &[Transaction],
        recent_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            username: account.username.clone(),
            balance: account.balance.unwrap_or(0.0),
            change: estimate_monthly_change_at(account.balance, Some(transactions), now),
            recent: recent_transactions(transactions, recent_count),
        }
    }
}

// ==================== Tests ====================
