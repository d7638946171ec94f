//! Canonical period keys used to bucket transactions.

use core::fmt;

use chrono::{Datelike as _, NaiveDate};

/// Calendar month key, rendered as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Returns the month containing `date`.
    #[inline]
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Returns the calendar year.
    #[inline]
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month number (1-12).
    #[inline]
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Returns the first day of the month.
    #[inline]
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Long label, e.g. `Jan 2024`.
    #[inline]
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%b %Y").to_string()
    }

    /// Short label, e.g. `Jan`.
    #[inline]
    #[must_use]
    pub fn short_label(self) -> String {
        self.0.format("%b").to_string()
    }

    /// Compact label with a two-digit year, e.g. `Jan 24`.
    #[inline]
    #[must_use]
    pub fn compact_label(self) -> String {
        self.0.format("%b %y").to_string()
    }
}

impl fmt::Display for MonthKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// ISO-8601 week key, rendered as `YYYY-Www`.
///
/// Weeks start on Monday and week 1 holds the year's first Thursday. The
/// year is the ISO week-numbering year, so `2024-12-30` belongs to
/// `2025-W01`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    /// ISO week-numbering year.
    year: i32,
    /// ISO week number (1-53).
    week: u32,
}

impl WeekKey {
    /// Returns the ISO week containing `date`.
    #[inline]
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Returns the ISO week-numbering year.
    #[inline]
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the ISO week number.
    #[inline]
    #[must_use]
    pub const fn week(self) -> u32 {
        self.week
    }

    /// Chart label, e.g. `W05`.
    #[inline]
    #[must_use]
    pub fn label(self) -> String {
        format!("W{:02}", self.week)
    }
}

impl fmt::Display for WeekKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}
