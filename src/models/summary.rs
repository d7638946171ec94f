//! Server-computed account summary.

use serde::{Deserialize, Serialize};

/// Totals computed by the backend over the whole ledger.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSummary {
    /// Number of stored transactions.
    pub transaction_count: u64,
    /// Sum of positive amounts.
    pub total_credits: f64,
    /// Sum of absolute negative amounts.
    pub total_debits: f64,
    /// Latest balance.
    pub current_balance: f64,
    /// Mean transaction amount.
    pub average_transaction: f64,
    /// Transactions without a category.
    pub uncategorized_count: u64,
    /// First and last booking dates.
    pub date_range: Option<DateRange>,
    /// Per-category totals.
    pub category_breakdown: Vec<CategoryBreakdown>,
}

/// Inclusive date span, as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    /// Earliest date.
    pub from: String,
    /// Latest date.
    pub to: String,
}

/// Count and total for one category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryBreakdown {
    /// Category label.
    pub category: String,
    /// Number of transactions.
    pub count: u64,
    /// Signed total.
    pub total: f64,
}
