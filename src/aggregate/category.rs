//! Top categories by absolute spend.

use std::collections::HashMap;

use super::percent_of;
use crate::models::Transaction;

/// Number of categories in the full category chart.
pub const CATEGORY_CHART_LIMIT: usize = 12;

/// Number of categories in the compact breakdown.
pub const CATEGORY_COMPACT_LIMIT: usize = 8;

/// Spending total for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Effective category name.
    pub name: String,
    /// Absolute spend.
    pub total: f64,
    /// Number of expense transactions.
    pub count: usize,
    /// Percentage of the returned totals, or 0 when they sum to 0.
    pub share: f64,
}

/// Sums expenses per effective category and returns the top `limit`
/// categories, largest first.
///
/// Ties keep the order in which categories were first encountered.
#[must_use]
pub fn category_totals<'txs, I>(transactions: I, limit: usize) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'txs Transaction>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&'txs str, usize> = HashMap::new();
    for tx in transactions {
        if !tx.is_expense() {
            continue;
        }
        let name = tx.effective_category();
        let slot = *index.entry(name).or_insert_with(|| {
            totals.push(CategoryTotal {
                name: name.to_owned(),
                total: 0.0_f64,
                count: 0,
                share: 0.0_f64,
            });
            totals.len() - 1
        });
        if let Some(entry) = totals.get_mut(slot) {
            entry.total += tx.credit.abs();
            entry.count += 1;
        }
    }

    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(limit);

    let shown: f64 = totals.iter().map(|c| c.total).sum();
    for entry in &mut totals {
        entry.share = percent_of(entry.total, shown);
    }
    totals
}
