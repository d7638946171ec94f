//! Weekday versus weekend spending per ISO week.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Weekday};

use super::WeekKey;
use crate::models::Transaction;

/// Number of recent weeks shown by the spending-pattern chart.
pub const RECENT_WEEKS: usize = 12;

/// Expense totals for one ISO week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklySpending {
    /// Bucket key.
    pub week: WeekKey,
    /// Absolute spending Monday to Friday.
    pub weekday: f64,
    /// Absolute spending on Saturday and Sunday.
    pub weekend: f64,
}

impl WeeklySpending {
    /// Total spending for the week.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weekday + self.weekend
    }
}

/// Splits expenses into weekday and weekend totals per ISO week and
/// returns the most recent `weeks` buckets in ascending order.
#[must_use]
pub fn weekly_spending<'txs, I>(transactions: I, weeks: usize) -> Vec<WeeklySpending>
where
    I: IntoIterator<Item = &'txs Transaction>,
{
    let mut buckets: BTreeMap<WeekKey, WeeklySpending> = BTreeMap::new();
    for tx in transactions {
        let Some(date) = tx.date.filter(|_| tx.is_expense()) else {
            continue;
        };
        let key = WeekKey::from_date(date);
        let bucket = buckets.entry(key).or_insert(WeeklySpending {
            week: key,
            weekday: 0.0_f64,
            weekend: 0.0_f64,
        });
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => bucket.weekend += tx.credit.abs(),
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
                bucket.weekday += tx.credit.abs();
            }
        }
    }
    let mut recent: Vec<WeeklySpending> = buckets.into_values().rev().take(weeks).collect();
    recent.reverse();
    recent
}
