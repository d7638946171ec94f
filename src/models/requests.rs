//! Request and response bodies for listing and categorization endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CategoryId, TransactionId};

/// Column the transaction list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Booking date.
    Date,
    /// Bank description.
    Description,
    /// Signed amount.
    Credit,
    /// Running balance.
    Balance,
    /// Category label.
    Category,
}

impl SortField {
    /// Returns the query-string value understood by the backend.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Credit => "credit",
            Self::Balance => "balance",
            Self::Category => "category",
        }
    }
}

/// Sort direction for the transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the query-string value understood by the backend.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Server-side search/sort/filter options for the transaction list.
///
/// Empty strings are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionQuery {
    /// Free-text search over descriptions.
    pub search: Option<String>,
    /// Sort column.
    pub sort_field: Option<SortField>,
    /// Sort direction.
    pub sort_direction: Option<SortDirection>,
    /// Exact category name.
    pub category: Option<String>,
}

impl TransactionQuery {
    /// Creates an empty query.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, text: T) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Sets the sort column and direction.
    #[inline]
    #[must_use]
    pub const fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = Some(field);
        self.sort_direction = Some(direction);
        self
    }

    /// Restricts to a single category.
    #[inline]
    #[must_use]
    pub fn category<T: Into<String>>(mut self, name: T) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Clicking the same column flips the direction; a new column starts
    /// ascending.
    #[inline]
    #[must_use]
    pub fn toggle_sort(mut self, field: SortField) -> Self {
        let direction = match (self.sort_field, self.sort_direction) {
            (Some(current), Some(dir)) if current == field => dir.reversed(),
            _ => SortDirection::Asc,
        };
        self.sort_field = Some(field);
        self.sort_direction = Some(direction);
        self
    }

    /// Returns the non-empty query parameters in a stable order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_owned()));
        }
        if let Some(field) = self.sort_field {
            params.push(("sortField", field.as_str().to_owned()));
        }
        if let Some(direction) = self.sort_direction {
            params.push(("sortDirection", direction.as_str().to_owned()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            params.push(("category", category.to_owned()));
        }
        params
    }
}

/// Rule-based bulk categorization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeRequest {
    /// Category to assign.
    pub category_id: CategoryId,
    /// Description substring to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_pattern: Option<String>,
    /// Minimum amount (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    /// Maximum amount (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    /// Earliest date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Latest date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl CategorizeRequest {
    /// Creates a request that matches everything and assigns `category_id`.
    #[inline]
    #[must_use]
    pub const fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            description_pattern: None,
            amount_min: None,
            amount_max: None,
            date_from: None,
            date_to: None,
        }
    }
}

/// Asks the backend to derive a description pattern from one transaction
/// and apply the category to every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCategorizeRequest {
    /// Transaction whose description seeds the pattern.
    pub transaction_id: TransactionId,
    /// Category to assign.
    pub category_id: CategoryId,
}

/// Result of a categorization call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategorizeResponse {
    /// Number of transactions updated.
    pub updated_count: u64,
    /// Business name extracted by pattern categorization.
    pub business_name: Option<String>,
    /// Human-readable status message.
    pub message: Option<String>,
}

/// Body for assigning a category to a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssignment {
    /// Category to assign.
    pub category_id: CategoryId,
}

/// Result of a CSV upload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadResponse {
    /// Rows imported.
    pub imported_count: u64,
    /// Rows skipped as duplicates.
    pub duplicate_count: u64,
    /// Human-readable status message.
    pub message: Option<String>,
}
