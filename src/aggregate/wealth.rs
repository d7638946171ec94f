//! Cumulative wealth: month-end running total of filtered amounts.

use super::MonthKey;
use crate::models::Transaction;

/// Running total at the end of one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WealthPoint {
    /// Bucket key.
    pub month: MonthKey,
    /// Running sum of amounts after the month's last transaction.
    pub balance: f64,
    /// Transactions that fell in the month.
    pub transactions: usize,
}

/// Sums amounts in date order and reports the running total at each
/// month's end.
///
/// The total is computed from the filtered amounts alone, so it diverges
/// from the stored `balance` field whenever filters hide transactions.
/// Same-day transactions keep their input order. Undated transactions are
/// ordered after every dated one and land in the last month, so the final
/// balance is always the sum of all amounts given; without any dated
/// transaction there is no month to report and the result is empty.
#[must_use]
pub fn cumulative_wealth<'txs, I>(transactions: I) -> Vec<WealthPoint>
where
    I: IntoIterator<Item = &'txs Transaction>,
{
    let mut ordered: Vec<_> = transactions
        .into_iter()
        .map(|tx| (tx.date, tx.credit))
        .collect();
    ordered.sort_by_key(|&(date, _)| (date.is_none(), date));

    let mut points: Vec<WealthPoint> = Vec::new();
    let mut running = 0.0_f64;
    for (date, credit) in ordered {
        running += credit;
        let Some(month) = date
            .map(MonthKey::from_date)
            .or_else(|| points.last().map(|point| point.month))
        else {
            continue;
        };
        match points.last_mut() {
            Some(point) if point.month == month => {
                point.balance = running;
                point.transactions += 1;
            }
            Some(_) | None => points.push(WealthPoint {
                month,
                balance: running,
                transactions: 1,
            }),
        }
    }
    points
}
