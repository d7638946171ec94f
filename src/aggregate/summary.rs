//! Period and ledger summary metrics.

use core::fmt;

use super::{count_to_f64, percent_of};
use crate::models::Transaction;

/// Average number of weeks in a month, used for weekly spending.
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Headline metrics for the filtered period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodSummary {
    /// Sum of positive amounts.
    pub income: f64,
    /// Sum of absolute negative amounts.
    pub spending: f64,
    /// `income - spending`.
    pub savings: f64,
    /// `savings / income * 100`, or 0 without income.
    pub savings_rate: f64,
    /// Months the averages are spread over (at least 1).
    pub months: u32,
    /// Average income per month.
    pub avg_monthly_income: f64,
    /// Average spending per month.
    pub avg_monthly_spending: f64,
    /// Average savings per month.
    pub avg_monthly_savings: f64,
    /// Average spending per week.
    pub avg_weekly_spending: f64,
    /// Spending divided by the number of transactions (at least 1).
    pub avg_per_transaction: f64,
    /// Number of transactions summarized.
    pub transaction_count: usize,
}

impl PeriodSummary {
    /// Summarizes `transactions`, spreading averages over `months`
    /// (usually the number of monthly buckets; 0 is treated as 1).
    #[must_use]
    pub fn from_transactions<'txs, I>(transactions: I, months: usize) -> Self
    where
        I: IntoIterator<Item = &'txs Transaction>,
    {
        let mut income = 0.0_f64;
        let mut spending = 0.0_f64;
        let mut transaction_count = 0_usize;
        for tx in transactions {
            transaction_count += 1;
            if tx.is_income() {
                income += tx.credit;
            } else if tx.is_expense() {
                spending += tx.credit.abs();
            }
        }
        let savings = income - spending;
        let months_divisor = count_to_f64(months.max(1));
        let avg_monthly_spending = spending / months_divisor;
        Self {
            income,
            spending,
            savings,
            savings_rate: percent_of(savings, income),
            months: u32::try_from(months.max(1)).unwrap_or(u32::MAX),
            avg_monthly_income: income / months_divisor,
            avg_monthly_spending,
            avg_monthly_savings: savings / months_divisor,
            avg_weekly_spending: avg_monthly_spending / WEEKS_PER_MONTH,
            avg_per_transaction: spending / count_to_f64(transaction_count.max(1)),
            transaction_count,
        }
    }

    /// Grades the period by its savings rate.
    #[inline]
    #[must_use]
    pub fn health_grade(&self) -> HealthGrade {
        HealthGrade::from_savings_rate(self.savings_rate)
    }
}

/// Financial health score, graded on the savings rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthGrade {
    /// Savings rate of at least 20%.
    A,
    /// At least 15%.
    B,
    /// At least 10%.
    C,
    /// At least 5%.
    D,
    /// Below 5%, or no income.
    F,
}

impl HealthGrade {
    /// Grades a savings rate given in percent.
    #[must_use]
    pub fn from_savings_rate(rate: f64) -> Self {
        if rate >= 20.0 {
            Self::A
        } else if rate >= 15.0 {
            Self::B
        } else if rate >= 10.0 {
            Self::C
        } else if rate >= 5.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Returns the grade letter.
    #[inline]
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Returns a one-line piece of advice for the grade.
    #[must_use]
    pub const fn advice(self) -> &'static str {
        match self {
            Self::A => "Excellent! You're building wealth effectively.",
            Self::B => "Great job! Keep up the good savings habits.",
            Self::C => "Good progress. Consider increasing savings.",
            Self::D => "Fair. Look for opportunities to reduce spending.",
            Self::F => "Needs improvement. Review your budget and spending habits.",
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Whole-ledger totals, as shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerTotals {
    /// Sum of positive amounts.
    pub total_credits: f64,
    /// Sum of absolute negative amounts.
    pub total_debits: f64,
    /// Stored balance of the last transaction.
    pub current_balance: f64,
    /// Signed mean amount: `(total_credits - total_debits) / transaction_count`.
    pub average_transaction: f64,
    /// Number of transactions.
    pub transaction_count: usize,
}

impl LedgerTotals {
    /// Computes totals; every field is 0 for an empty set.
    #[must_use]
    pub fn from_transactions<'txs, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'txs Transaction>,
    {
        let mut totals = Self::default();
        for tx in transactions {
            totals.transaction_count += 1;
            if tx.is_income() {
                totals.total_credits += tx.credit;
            } else if tx.is_expense() {
                totals.total_debits += tx.credit.abs();
            }
            totals.current_balance = tx.balance;
        }
        if totals.transaction_count > 0 {
            totals.average_transaction = (totals.total_credits - totals.total_debits)
                / count_to_f64(totals.transaction_count);
        }
        totals
    }
}
