//! Chart aggregations over a filtered transaction set.
//!
//! Every aggregator is a pure function over borrowed transactions. None of
//! them fail: missing categories fall back to
//! [`UNCATEGORIZED`](crate::models::UNCATEGORIZED), and transactions
//! without a date are skipped by the monthly and weekly buckets while
//! still counting towards category totals and summaries. Cumulative wealth
//! adds them to its last month so its final balance covers every amount.

mod category;
mod monthly;
mod period;
mod summary;
mod wealth;
mod weekly;

pub use category::{CATEGORY_CHART_LIMIT, CATEGORY_COMPACT_LIMIT, CategoryTotal, category_totals};
pub use monthly::{MonthlySavings, monthly_savings};
pub use period::{MonthKey, WeekKey};
pub use summary::{HealthGrade, LedgerTotals, PeriodSummary, WEEKS_PER_MONTH};
pub use wealth::{WealthPoint, cumulative_wealth};
pub use weekly::{RECENT_WEEKS, WeeklySpending, weekly_spending};

/// Percentage of `part` in `whole`, or 0 when `whole` is not positive.
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0_f64 {
        part / whole * 100.0_f64
    } else {
        0.0_f64
    }
}

/// Converts a record count to `f64` for averaging.
fn count_to_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
