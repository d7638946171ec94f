//! Paged list envelope returned by collection endpoints.

use serde::{Deserialize, Serialize};

/// Pagination metadata for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationInfo {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of matching records.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a further page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_previous_page: bool,
}

/// One page of records plus its pagination metadata.
///
/// The default value is an empty last page, which is what a blank
/// response body decodes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page<T> {
    /// Records on this page, in server order.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: PaginationInfo,
}

impl<T> Default for Page<T> {
    #[inline]
    fn default() -> Self {
        Self {
            data: Vec::new(),
            pagination: PaginationInfo::default(),
        }
    }
}

impl<T> Page<T> {
    /// Returns `true` if the server reported a further page.
    #[inline]
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.pagination.has_next_page
    }
}
