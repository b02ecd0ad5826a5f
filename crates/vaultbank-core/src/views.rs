//! List state behind the history and accounts screens
//!
//! Each view owns the last fetched collection, the active filter and a
//! [`WindowedPager`]; changing the filter re-runs filter and sort and puts
//! the window back at the top.

use vaultbank_config::PaginationConfig;

use crate::filter::{filter_accounts, filter_transactions, TransactionFilter};
use crate::models::{Account, Transaction};
use crate::pager::{PageWindow, WindowedPager};
use crate::sort::sort_transactions_desc;

/// Transaction history: filter, newest first, windowed
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    all: Vec<Transaction>,
    filter: TransactionFilter,
    visible: Vec<Transaction>,
    pager: WindowedPager,
}

impl TransactionHistory {
    pub fn new(transactions: Vec<Transaction>, pagination: &PaginationConfig) -> Self {
        let mut history = Self {
            all: transactions,
            filter: TransactionFilter::default(),
            visible: Vec::new(),
            pager: WindowedPager::new(pagination.page_size, pagination.scroll_threshold),
        };
        history.refresh();
        history
    }

    /// Swap in a fresh fetch, keeping the filter
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.all = transactions;
        self.refresh();
    }

    pub fn apply_filter(&mut self, filter: TransactionFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn reset_filter(&mut self) {
        self.apply_filter(TransactionFilter::default());
    }

    pub fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    pub fn load_more(&mut self) -> bool {
        self.pager.load_more()
    }

    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.pager.on_scroll(offset)
    }

    /// Number of transactions passing the filter
    pub fn matched(&self) -> usize {
        self.visible.len()
    }

    pub fn window(&self) -> PageWindow {
        self.pager.window()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    /// The rows currently materialized
    pub fn page(&self) -> &[Transaction] {
        self.pager.window().slice(&self.visible)
    }

    fn refresh(&mut self) {
        let filtered = filter_transactions(&self.all, &self.filter);
        self.visible = sort_transactions_desc(&filtered);
        self.pager.reset(self.visible.len());
    }
}

/// Account directory: username search, windowed
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    all: Vec<Account>,
    search: String,
    visible: Vec<Account>,
    pager: WindowedPager,
}

impl AccountDirectory {
    pub fn new(accounts: Vec<Account>, pagination: &PaginationConfig) -> Self {
        let mut directory = Self {
            all: accounts,
            search: String::new(),
            visible: Vec::new(),
            pager: WindowedPager::new(pagination.page_size, pagination.scroll_threshold),
        };
        directory.refresh();
        directory
    }

    pub fn replace_accounts(&mut self, accounts: Vec<Account>) {
        self.all = accounts;
        self.refresh();
    }

    pub fn search(&mut self, query: &str) {
        self.search = query.to_string();
        self.refresh();
    }

    pub fn query(&self) -> &str {
        &self.search
    }

    pub fn load_more(&mut self) -> bool {
        self.pager.load_more()
    }

    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.pager.on_scroll(offset)
    }

    pub fn matched(&self) -> usize {
        self.visible.len()
    }

    pub fn window(&self) -> PageWindow {
        self.pager.window()
    }

    pub fn page(&self) -> &[Account] {
        self.pager.window().slice(&self.visible)
    }

    /// Look up a listed account by `_id` / `id`
    pub fn find(&self, id: &str) -> Option<&Account> {
        self.all.iter().find(|a| a.id() == Some(id))
    }

    fn refresh(&mut self) {
        self.visible = filter_accounts(&self.all, &self.search);
        self.pager.reset(self.visible.len());
    }
}
