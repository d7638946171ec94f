//! Data models for the Finboard API.
//!
//! Strongly-typed representations of the backend's JSON payloads and the
//! newtype ID wrappers used to reference them.

mod category;
mod ids;
mod pagination;
mod requests;
mod summary;
mod transaction;

pub use category::{Category, DEFAULT_CATEGORY_COLOR, NewCategory};
pub use chrono::NaiveDate;
pub use ids::{CategoryId, TransactionId};
pub use pagination::{Page, PaginationInfo};
pub use requests::{
    CategorizeRequest, CategorizeResponse, CategoryAssignment, PatternCategorizeRequest,
    SortDirection, SortField, TransactionQuery, UploadResponse,
};
pub use summary::{CategoryBreakdown, DateRange, TransactionSummary};
pub use transaction::{Transaction, UNCATEGORIZED};
