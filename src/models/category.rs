//! Spending category model.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Color assigned to categories created without an explicit one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// A user-defined spending category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display name, unique within the account.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// RGB hex color (`#RRGGBB`).
    #[serde(default = "default_color")]
    pub color: String,
    /// Creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Number of transactions currently assigned.
    #[serde(default)]
    pub transaction_count: u64,
}

/// Request body for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional RGB hex color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewCategory {
    /// Creates a request with the given name (trimmed) and the default color.
    #[inline]
    #[must_use]
    pub fn new<T: AsRef<str>>(name: T) -> Self {
        Self {
            name: name.as_ref().trim().to_owned(),
            description: None,
            color: Some(DEFAULT_CATEGORY_COLOR.to_owned()),
        }
    }

    /// Sets the color.
    #[inline]
    #[must_use]
    pub fn color<T: Into<String>>(mut self, color: T) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the description.
    #[inline]
    #[must_use]
    pub fn description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Serde default for [`Category::color`].
fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_owned()
}
