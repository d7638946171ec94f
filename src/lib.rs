//! Rust client library and chart engine for the Finboard personal finance
//! API.
//!
//! The backend owns CSV import, storage and rule-based categorization. This
//! crate provides a typed HTTP client for it, a paged fetcher that walks the
//! transaction list, and the client-side filters and aggregations behind
//! the dashboard charts.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "blocking")]
//! # fn main() -> finboard_rs::error::Result<()> {
//! use finboard_rs::aggregate::CATEGORY_CHART_LIMIT;
//! use finboard_rs::client::FinboardBlockingClient;
//! use finboard_rs::dashboard::Dashboard;
//!
//! let client = FinboardBlockingClient::builder()
//!     .base_url("http://127.0.0.1:8000")
//!     .build()?;
//! let mut dashboard = Dashboard::new();
//! let _status = dashboard.refresh_blocking(&client)?;
//! let charts = dashboard.charts(CATEGORY_CHART_LIMIT);
//! assert!(charts.shown <= charts.total);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "blocking"))]
//! # fn main() {}
//! ```

pub mod aggregate;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod dashboard;
pub mod error;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod fetch;
pub mod filter;
pub mod models;
