//! Filter predicate for the chart views.
//!
//! A [`FilterState`] narrows the resident transaction set by date range,
//! excluded categories and, optionally, internal transfers. What counts as
//! an internal transfer is decided by a pluggable [`TransferDetector`].

use std::collections::BTreeSet;

use chrono::Months;

use crate::models::{NaiveDate, Transaction};

/// Category keywords that mark a transfer between the user's own accounts.
pub const DEFAULT_TRANSFER_KEYWORDS: [&str; 2] = ["transfers", "internal transfer"];

/// Length of the default date window, in calendar months.
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// Decides whether a transaction is a transfer between the user's own
/// accounts.
pub trait TransferDetector {
    /// Returns `true` if `tx` is an internal transfer.
    fn is_internal_transfer(&self, tx: &Transaction) -> bool;
}

/// Detects transfers by case-insensitive keyword match on the category.
///
/// # Examples
///
/// ```
/// use finboard_rs::filter::{CategoryKeywords, TransferDetector};
///
/// let detector = CategoryKeywords::new(["savings sweep"]);
/// assert_eq!(detector.keywords(), ["savings sweep"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeywords {
    /// Lowercased keywords.
    keywords: Vec<String>,
}

impl CategoryKeywords {
    /// Creates a detector from the given keywords.
    ///
    /// Keywords are trimmed; blank ones are dropped since they would match
    /// every category.
    #[inline]
    #[must_use]
    pub fn new<I, K>(keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns the lowercased keywords.
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for CategoryKeywords {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_TRANSFER_KEYWORDS)
    }
}

impl TransferDetector for CategoryKeywords {
    #[inline]
    fn is_internal_transfer(&self, tx: &Transaction) -> bool {
        tx.category.as_deref().is_some_and(|category| {
            let lower = category.to_lowercase();
            self.keywords.iter().any(|k| lower.contains(k.as_str()))
        })
    }
}

impl<D: TransferDetector + ?Sized> TransferDetector for &D {
    #[inline]
    fn is_internal_transfer(&self, tx: &Transaction) -> bool {
        (**self).is_internal_transfer(tx)
    }
}

/// Filter settings for the chart views. Lives only in memory.
///
/// # Examples
///
/// ```
/// use finboard_rs::filter::FilterState;
/// use finboard_rs::models::NaiveDate;
///
/// let filter = FilterState::new()
///     .date_range(
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
///     )
///     .exclude_category("Rent")
///     .exclude_internal_transfers(true);
/// assert_eq!(filter.active_count(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Start date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// End date (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Category names to hide, matched against the effective category.
    pub excluded_categories: BTreeSet<String>,
    /// Whether detected internal transfers are hidden.
    pub exclude_internal_transfers: bool,
}

impl FilterState {
    /// Creates an empty filter that matches all transactions.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_from(mut self, from: NaiveDate) -> Self {
        self.date_from = Some(from);
        self
    }

    /// Sets the end date (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_to(mut self, to: NaiveDate) -> Self {
        self.date_to = Some(to);
        self
    }

    /// Restricts to the given date range (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Hides a category.
    #[inline]
    #[must_use]
    pub fn exclude_category<T: Into<String>>(mut self, name: T) -> Self {
        let _newly_excluded = self.excluded_categories.insert(name.into());
        self
    }

    /// Hides or shows internal transfers.
    #[inline]
    #[must_use]
    pub const fn exclude_internal_transfers(mut self, exclude: bool) -> Self {
        self.exclude_internal_transfers = exclude;
        self
    }

    /// Flips the exclusion of a category. Returns `true` if it is now
    /// excluded.
    #[inline]
    pub fn toggle_category(&mut self, name: &str) -> bool {
        if self.excluded_categories.remove(name) {
            false
        } else {
            self.excluded_categories.insert(name.to_owned())
        }
    }

    /// Returns `true` if the transaction passes every active criterion.
    #[inline]
    #[must_use]
    pub fn matches<D: TransferDetector + ?Sized>(&self, tx: &Transaction, detector: &D) -> bool {
        self.matches_date(tx) && self.matches_category(tx) && self.matches_transfer(tx, detector)
    }

    /// Returns the transactions that pass the filter, in input order.
    #[inline]
    #[must_use]
    pub fn apply<'txs, D: TransferDetector + ?Sized>(
        &self,
        transactions: &'txs [Transaction],
        detector: &D,
    ) -> Vec<&'txs Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx, detector))
            .collect()
    }

    /// Number of active criteria: each excluded category, each date bound
    /// and the transfer flag.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.excluded_categories.len()
            + usize::from(self.date_from.is_some())
            + usize::from(self.date_to.is_some())
            + usize::from(self.exclude_internal_transfers)
    }

    /// Returns `true` when both bounds are set and the start is after the
    /// end. Such a filter matches no dated transaction.
    #[inline]
    #[must_use]
    pub fn is_date_range_inverted(&self) -> bool {
        matches!((self.date_from, self.date_to), (Some(from), Some(to)) if from > to)
    }

    /// Clears category exclusions and the transfer flag and restores the
    /// default date window for `transactions`.
    #[inline]
    pub fn reset(&mut self, transactions: &[Transaction]) {
        *self = Self::new();
        if let Some((from, to)) = default_window(transactions) {
            self.date_from = Some(from);
            self.date_to = Some(to);
        }
    }

    /// Checks date range criteria. Undated transactions always pass.
    fn matches_date(&self, tx: &Transaction) -> bool {
        tx.date.is_none_or(|date| {
            self.date_from.is_none_or(|from| date >= from)
                && self.date_to.is_none_or(|to| date <= to)
        })
    }

    /// Checks category exclusion against the effective category.
    fn matches_category(&self, tx: &Transaction) -> bool {
        !self.excluded_categories.contains(tx.effective_category())
    }

    /// Checks the internal-transfer criterion.
    fn matches_transfer<D: TransferDetector + ?Sized>(&self, tx: &Transaction, detector: &D) -> bool {
        !self.exclude_internal_transfers || !detector.is_internal_transfer(tx)
    }
}

/// Returns the default window: twelve calendar months back from the latest
/// transaction date up to that date.
///
/// Returns `None` when no transaction carries a date.
#[must_use]
pub fn default_window(transactions: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let latest = transactions.iter().filter_map(|tx| tx.date).max()?;
    let start = latest
        .checked_sub_months(Months::new(DEFAULT_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    Some((start, latest))
}
