//! Paged fetcher that walks the transaction list endpoint.
//!
//! Pages are requested one at a time in ascending order until the server
//! reports no further page, the configured page cap is reached, or a page
//! request fails. The [`PageSource`] (async) and [`BlockingPageSource`]
//! (blocking) traits and their walks are generated from shared macros,
//! mirroring the client generation pattern in [`crate::client`].

use crate::error::ErrorKind;
use crate::models::Transaction;

/// Records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Page cap for the chart views.
pub const CHART_MAX_PAGES: u32 = 50;

/// Page cap for the uncategorized-transactions walk.
pub const CATEGORIZER_MAX_PAGES: u32 = 1000;

/// Page size and safety cap for one walk.
///
/// The cap guards against a backend that never clears `hasNextPage`; it is
/// always at least one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Records requested per page.
    page_size: u32,
    /// Maximum number of pages requested.
    max_pages: u32,
}

impl FetchConfig {
    /// Creates a config; zero values are raised to one.
    #[inline]
    #[must_use]
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// Config used by the chart views.
    #[inline]
    #[must_use]
    pub const fn charts() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: CHART_MAX_PAGES,
        }
    }

    /// Config used when collecting uncategorized transactions.
    #[inline]
    #[must_use]
    pub const fn categorizer() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: CATEGORIZER_MAX_PAGES,
        }
    }

    /// Returns the page size.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the page cap.
    #[inline]
    #[must_use]
    pub const fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

impl Default for FetchConfig {
    #[inline]
    fn default() -> Self {
        Self::charts()
    }
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The server reported no further page.
    Exhausted,
    /// The page cap was reached while the server still reported more.
    PageCap,
    /// A page request failed.
    Failed,
}

/// Records gathered by a walk, with an explicit completeness signal.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Accumulated records in server page order.
    pub records: Vec<Transaction>,
    /// Number of pages that were received successfully.
    pub pages_fetched: u32,
    /// `true` only when the server reported the last page.
    pub complete: bool,
    /// Why the walk stopped.
    pub stop: StopReason,
    /// Classification of the failure, for [`StopReason::Failed`].
    pub error: Option<ErrorKind>,
}

impl FetchOutcome {
    /// Builds an outcome; `complete` is derived from `stop`.
    #[inline]
    #[must_use]
    pub fn new(
        records: Vec<Transaction>,
        pages_fetched: u32,
        stop: StopReason,
        error: Option<ErrorKind>,
    ) -> Self {
        Self {
            records,
            pages_fetched,
            complete: stop == StopReason::Exhausted,
            stop,
            error,
        }
    }

    /// An empty, complete outcome.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, StopReason::Exhausted, None)
    }
}

/// Bookkeeping shared by the async and blocking walks.
struct Walk {
    /// Accumulated records.
    records: Vec<Transaction>,
    /// Pages received so far.
    pages_fetched: u32,
    /// Page cap.
    max_pages: u32,
}

impl Walk {
    /// Starts a walk bounded by `config`.
    const fn new(config: FetchConfig) -> Self {
        Self {
            records: Vec::new(),
            pages_fetched: 0,
            max_pages: config.max_pages,
        }
    }

    /// Records a received page and returns the next page number to request,
    /// or the reason to stop.
    fn accept<F>(
        &mut self,
        page: u32,
        data: Vec<Transaction>,
        has_next_page: bool,
        keep: &mut F,
    ) -> Result<u32, StopReason>
    where
        F: FnMut(&Transaction) -> bool,
    {
        self.pages_fetched = page;
        let received = data.len();
        self.records.extend(data.into_iter().filter(|tx| keep(tx)));
        tracing::trace!(page, received, total = self.records.len(), has_next_page, "page received");
        if !has_next_page {
            return Err(StopReason::Exhausted);
        }
        if page >= self.max_pages {
            tracing::warn!(max_pages = self.max_pages, "page cap reached, stopping walk");
            return Err(StopReason::PageCap);
        }
        Ok(page.saturating_add(1))
    }

    /// Finishes the walk.
    fn finish(self, stop: StopReason, error: Option<ErrorKind>) -> FetchOutcome {
        tracing::debug!(
            records = self.records.len(),
            pages = self.pages_fetched,
            stop = ?stop,
            "walk finished"
        );
        FetchOutcome::new(self.records, self.pages_fetched, stop, error)
    }
}

/// Generates a page-source trait (async or blocking).
macro_rules! define_page_source {
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: Sync {
            /// Fetches one page; pages are 1-based.
            ///
            /// # Errors
            ///
            /// Returns an error if the page cannot be retrieved.
            fn fetch_page(
                &self,
                page: u32,
                page_size: u32,
            ) -> impl core::future::Future<Output = Result<Page<Transaction>>> + Send;
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name {
            /// Fetches one page; pages are 1-based.
            ///
            /// # Errors
            ///
            /// Returns an error if the page cannot be retrieved.
            fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<Transaction>>;
        }
    };
}

/// Generates the walk functions for one page-source trait.
macro_rules! define_walk {
    (
        source_trait: $source_trait:ident,
        fetch_all: $fetch_all:ident,
        fetch_all_matching: $fetch_all_matching:ident,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        /// Walks every page and returns all records in server order.
        ///
        /// A failed page stops the walk; the records gathered so far are
        /// kept and the outcome is marked incomplete.
        #[inline]
        pub $($async_kw)? fn $fetch_all<S: $source_trait>(source: &S, config: FetchConfig) -> FetchOutcome {
            $fetch_all_matching(source, config, |_| true) $( .$await_ext )?
        }

        /// Walks every page, keeping only records `keep` accepts.
        ///
        /// Filtering happens per page, so memory is bounded by the matches.
        #[tracing::instrument(skip_all, fields(page_size = config.page_size(), max_pages = config.max_pages()))]
        pub $($async_kw)? fn $fetch_all_matching<S, F>(
            source: &S,
            config: FetchConfig,
            mut keep: F,
        ) -> FetchOutcome
        where
            S: $source_trait,
            F: FnMut(&Transaction) -> bool,
        {
            let mut walk = Walk::new(config);
            let mut page = 1_u32;
            loop {
                match source.fetch_page(page, config.page_size()) $( .$await_ext )? {
                    Ok(batch) => {
                        let has_next = batch.has_next_page();
                        match walk.accept(page, batch.data, has_next, &mut keep) {
                            Ok(next) => page = next,
                            Err(stop) => return walk.finish(stop, None),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(page, error = %err, "page request failed, keeping partial results");
                        return walk.finish(StopReason::Failed, Some(err.kind()));
                    }
                }
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_fetch {
    //! Async page source and walks.

    use super::{FetchConfig, FetchOutcome, StopReason, Walk};
    use crate::client::FinboardClient;
    use crate::error::Result;
    use crate::models::{Page, Transaction, TransactionQuery};

    define_page_source! {
        trait_name: PageSource,
        trait_doc: "Async source of transaction pages.",
        mode: async_mode,
    }

    define_walk! {
        source_trait: PageSource,
        fetch_all: fetch_all,
        fetch_all_matching: fetch_all_matching,
        async_kw: async,
        await_kw: await,
    }

    impl PageSource for FinboardClient {
        #[inline]
        fn fetch_page(
            &self,
            page: u32,
            page_size: u32,
        ) -> impl Future<Output = Result<Page<Transaction>>> + Send {
            async move {
                self.list_transactions(page, page_size, &TransactionQuery::new())
                    .await
            }
        }
    }
}

#[cfg(feature = "blocking")]
mod blocking_fetch {
    //! Blocking page source and walks.

    use super::{FetchConfig, FetchOutcome, StopReason, Walk};
    use crate::client::FinboardBlockingClient;
    use crate::error::Result;
    use crate::models::{Page, Transaction, TransactionQuery};

    define_page_source! {
        trait_name: BlockingPageSource,
        trait_doc: "Blocking source of transaction pages.",
        mode: blocking,
    }

    define_walk! {
        source_trait: BlockingPageSource,
        fetch_all: fetch_all_blocking,
        fetch_all_matching: fetch_all_matching_blocking,
    }

    impl BlockingPageSource for FinboardBlockingClient {
        #[inline]
        fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<Transaction>> {
            self.list_transactions(page, page_size, &TransactionQuery::new())
        }
    }
}

#[cfg(feature = "async")]
pub use async_fetch::{PageSource, fetch_all, fetch_all_matching};
#[cfg(feature = "blocking")]
pub use blocking_fetch::{BlockingPageSource, fetch_all_blocking, fetch_all_matching_blocking};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FinboardError, Result};
    use crate::models::{Page, PaginationInfo, TransactionId};

    /// Serves canned pages; `fail_on` makes that page return an API error.
    #[derive(Debug)]
    struct MockSource {
        pages: Vec<(Vec<i64>, bool)>,
        fail_on: Option<u32>,
        requests: std::sync::Mutex<Vec<u32>>,
    }

    impl MockSource {
        fn new(pages: Vec<(Vec<i64>, bool)>) -> Self {
            Self {
                pages,
                fail_on: None,
                requests: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, page: u32) -> Self {
            self.fail_on = Some(page);
            self
        }

        fn serve(&self, page: u32, page_size: u32) -> Result<Page<Transaction>> {
            self.requests.lock().unwrap().push(page);
            if self.fail_on == Some(page) {
                return Err(FinboardError::Api {
                    status: 500,
                    message: "boom".to_owned(),
                });
            }
            let index = usize::try_from(page - 1).unwrap();
            let (ids, has_next) = self.pages.get(index).cloned().unwrap_or_default();
            Ok(Page {
                data: ids.into_iter().map(tx).collect(),
                pagination: PaginationInfo {
                    page,
                    page_size,
                    has_next_page: has_next,
                    ..PaginationInfo::default()
                },
            })
        }

        fn requested(&self) -> Vec<u32> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[cfg(feature = "async")]
    impl PageSource for MockSource {
        fn fetch_page(
            &self,
            page: u32,
            page_size: u32,
        ) -> impl Future<Output = Result<Page<Transaction>>> + Send {
            core::future::ready(self.serve(page, page_size))
        }
    }

    #[cfg(feature = "blocking")]
    impl BlockingPageSource for MockSource {
        fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<Transaction>> {
            self.serve(page, page_size)
        }
    }

    fn tx(id: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            date: None,
            description: format!("tx {id}"),
            credit: -1.0_f64,
            balance: 0.0_f64,
            category: None,
            category_id: None,
            import_hash: None,
        }
    }

    fn ids(outcome: &FetchOutcome) -> Vec<i64> {
        outcome.records.iter().map(|t| t.id.into_inner()).collect()
    }

    fn three_pages() -> MockSource {
        MockSource::new(vec![
            (vec![1, 2], true),
            (vec![3, 4], true),
            (vec![5, 6], false),
        ])
    }

    #[test]
    fn config_clamps_zero_values() {
        let config = FetchConfig::new(0, 0);
        assert_eq!(config.page_size(), 1);
        assert_eq!(config.max_pages(), 1);
    }

    #[test]
    fn named_configs() {
        assert_eq!(FetchConfig::charts().max_pages(), CHART_MAX_PAGES);
        assert_eq!(FetchConfig::categorizer().max_pages(), CATEGORIZER_MAX_PAGES);
        assert_eq!(FetchConfig::default(), FetchConfig::charts());
        assert_eq!(FetchConfig::charts().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn outcome_completeness_follows_stop_reason() {
        assert!(FetchOutcome::empty().complete);
        let capped = FetchOutcome::new(Vec::new(), 3, StopReason::PageCap, None);
        assert!(!capped.complete);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn walks_all_pages_in_order() {
        let source = three_pages();
        let outcome = fetch_all(&source, FetchConfig::new(2, 50)).await;
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4, 5, 6]);
        assert!(outcome.complete);
        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(outcome.pages_fetched, 3);
        assert!(outcome.error.is_none());
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn failed_page_keeps_partial_results() {
        let source = three_pages().failing_on(2);
        let outcome = fetch_all(&source, FetchConfig::new(2, 50)).await;
        assert_eq!(ids(&outcome), vec![1, 2]);
        assert!(!outcome.complete);
        assert_eq!(outcome.stop, StopReason::Failed);
        assert_eq!(outcome.error, Some(ErrorKind::Api { status: 500 }));
        assert_eq!(outcome.pages_fetched, 1);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn page_cap_stops_endless_source() {
        let source = MockSource::new(vec![(vec![1], true); 10]);
        let outcome = fetch_all(&source, FetchConfig::new(1, 4)).await;
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.stop, StopReason::PageCap);
        assert!(!outcome.complete);
        assert_eq!(source.requested(), vec![1, 2, 3, 4]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn last_page_at_cap_is_exhausted() {
        let source = three_pages();
        let outcome = fetch_all(&source, FetchConfig::new(2, 3)).await;
        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert!(outcome.complete);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn matching_walk_filters_per_page() {
        let source = three_pages();
        let outcome =
            fetch_all_matching(&source, FetchConfig::categorizer(), |t| t.id.into_inner() % 2 == 0)
                .await;
        assert_eq!(ids(&outcome), vec![2, 4, 6]);
        assert!(outcome.complete);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn empty_first_page_is_complete() {
        let source = MockSource::new(Vec::new());
        let outcome = fetch_all(&source, FetchConfig::charts()).await;
        assert!(outcome.records.is_empty());
        assert!(outcome.complete);
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_walk_matches_async_semantics() {
        let source = three_pages().failing_on(3);
        let outcome = fetch_all_blocking(&source, FetchConfig::new(2, 50));
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4]);
        assert_eq!(outcome.stop, StopReason::Failed);

        let all = fetch_all_matching_blocking(&three_pages(), FetchConfig::charts(), |t| {
            t.id.into_inner() > 4
        });
        assert_eq!(ids(&all), vec![5, 6]);
        assert!(all.complete);
    }
}
