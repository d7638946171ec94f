//! Transaction model.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::{CategoryId, TransactionId};

/// Label used for transactions that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// An imported bank transaction as served by the backend.
///
/// Only `category` and `category_id` ever change after import, and only
/// through the categorization endpoints; a re-fetch is needed to observe
/// the new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Booking date. `None` when the backend sent something unparseable.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// Bank description line.
    #[serde(default)]
    pub description: String,
    /// Signed amount: positive is income, negative is an expense.
    pub credit: f64,
    /// Account balance snapshot reported by the bank for this row.
    #[serde(default)]
    pub balance: f64,
    /// Category label, if assigned.
    #[serde(default)]
    pub category: Option<String>,
    /// Category foreign key, if assigned.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Import de-duplication hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_hash: Option<String>,
}

impl Transaction {
    /// Returns the category label, or [`UNCATEGORIZED`] when there is none.
    #[inline]
    #[must_use]
    pub fn effective_category(&self) -> &str {
        match self.category.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNCATEGORIZED,
        }
    }

    /// Returns `true` for money leaving the account.
    #[inline]
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.credit < 0.0_f64
    }

    /// Returns `true` for money entering the account.
    #[inline]
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.credit > 0.0_f64
    }

    /// Returns `true` when the transaction still needs a category.
    ///
    /// A row counts as uncategorized if it has no label, carries the
    /// placeholder label, or has no category key.
    #[inline]
    #[must_use]
    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none() || self.effective_category() == UNCATEGORIZED
    }
}

/// Accepts `YYYY-MM-DD`, naive or zoned ISO timestamps, `null`, and
/// anything else as `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_date))
}

/// Parses the date portion of the formats the backend is known to emit.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(stamp.date());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|stamp| stamp.date_naive())
}
