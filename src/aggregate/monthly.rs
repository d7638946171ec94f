//! Monthly income, spending and savings.

use std::collections::BTreeMap;

use super::{MonthKey, percent_of};
use crate::filter::TransferDetector;
use crate::models::Transaction;

/// Income and spending for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySavings {
    /// Bucket key.
    pub month: MonthKey,
    /// Sum of positive amounts.
    pub income: f64,
    /// Sum of absolute non-positive amounts.
    pub spending: f64,
    /// `income - spending`.
    pub savings: f64,
    /// `savings / income * 100`, or 0 when there is no income.
    pub savings_rate: f64,
    /// Absolute volume of detected internal transfers that were kept.
    pub internal_transfers: f64,
}

impl MonthlySavings {
    /// Creates an empty bucket.
    const fn empty(month: MonthKey) -> Self {
        Self {
            month,
            income: 0.0_f64,
            spending: 0.0_f64,
            savings: 0.0_f64,
            savings_rate: 0.0_f64,
            internal_transfers: 0.0_f64,
        }
    }

    /// Fills in the derived fields.
    fn finish(mut self) -> Self {
        self.savings = self.income - self.spending;
        self.savings_rate = percent_of(self.savings, self.income);
        self
    }
}

/// Buckets transactions by month, in ascending month order.
///
/// With `exclude_transfers` set, transactions the detector flags are
/// dropped entirely. Otherwise they count as income or spending like any
/// other transaction and their volume is also reported in
/// [`MonthlySavings::internal_transfers`]. Months without transactions are
/// not synthesized.
#[must_use]
pub fn monthly_savings<'txs, I, D>(
    transactions: I,
    detector: &D,
    exclude_transfers: bool,
) -> Vec<MonthlySavings>
where
    I: IntoIterator<Item = &'txs Transaction>,
    D: TransferDetector + ?Sized,
{
    let mut buckets: BTreeMap<MonthKey, MonthlySavings> = BTreeMap::new();
    for tx in transactions {
        let Some(date) = tx.date else {
            continue;
        };
        let is_transfer = detector.is_internal_transfer(tx);
        if is_transfer && exclude_transfers {
            continue;
        }
        let key = MonthKey::from_date(date);
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| MonthlySavings::empty(key));
        if is_transfer {
            bucket.internal_transfers += tx.credit.abs();
        }
        if tx.credit > 0.0_f64 {
            bucket.income += tx.credit;
        } else {
            bucket.spending += tx.credit.abs();
        }
    }
    buckets.into_values().map(MonthlySavings::finish).collect()
}
