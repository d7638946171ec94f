//! Chart session state: the resident transaction set, its filter and the
//! refresh lifecycle.
//!
//! The set is always replaced wholesale by a full walk, never patched.
//! Each refresh is tagged with a [`RefreshTicket`]; results that arrive
//! for an outdated ticket are discarded so a slow walk can never
//! overwrite newer data.

use crate::aggregate::{
    CategoryTotal, MonthlySavings, PeriodSummary, RECENT_WEEKS, WealthPoint, WeeklySpending,
    category_totals, cumulative_wealth, monthly_savings, weekly_spending,
};
use crate::error::ErrorKind;
use crate::fetch::{FetchConfig, FetchOutcome};
use crate::filter::{CategoryKeywords, FilterState, TransferDetector, default_window};
use crate::models::{Category, Transaction};

/// Identifies one refresh; only the most recent ticket is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTicket {
    /// Generation this ticket was issued for.
    generation: u64,
}

/// Result of handing a refresh back to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshStatus {
    /// The data was installed.
    Applied,
    /// A newer refresh was started in the meantime; the data was dropped.
    Stale,
}

/// Everything the chart views render, computed from the filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Monthly savings, ascending.
    pub savings: Vec<MonthlySavings>,
    /// Month-end cumulative wealth, ascending.
    pub wealth: Vec<WealthPoint>,
    /// Recent weekly spending patterns, ascending.
    pub weekly: Vec<WeeklySpending>,
    /// Top categories by spend, descending.
    pub categories: Vec<CategoryTotal>,
    /// Period metrics.
    pub summary: PeriodSummary,
    /// Transactions passing the filter.
    pub shown: usize,
    /// Transactions resident in memory.
    pub total: usize,
    /// Whether the last walk reached the final page.
    pub complete: bool,
}

/// Resident transaction set plus filter state for the chart views.
#[derive(Debug, Clone)]
pub struct Dashboard<D = CategoryKeywords> {
    /// Transactions from the last accepted refresh.
    transactions: Vec<Transaction>,
    /// Categories from the last accepted refresh.
    categories: Vec<Category>,
    /// Current filter.
    filter: FilterState,
    /// Internal-transfer strategy.
    detector: D,
    /// Page size and cap for refresh walks.
    fetch_config: FetchConfig,
    /// Whether the last accepted walk was complete.
    complete: bool,
    /// Why the last accepted walk stopped early, if it failed.
    last_error: Option<ErrorKind>,
    /// Generation of the most recently issued ticket.
    generation: u64,
}

impl Default for Dashboard<CategoryKeywords> {
    #[inline]
    fn default() -> Self {
        Self::with_detector(CategoryKeywords::default())
    }
}

impl Dashboard<CategoryKeywords> {
    /// Creates an empty dashboard with the default transfer keywords.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: TransferDetector> Dashboard<D> {
    /// Creates an empty dashboard using `detector` for internal transfers.
    #[inline]
    #[must_use]
    pub const fn with_detector(detector: D) -> Self {
        Self {
            transactions: Vec::new(),
            categories: Vec::new(),
            filter: FilterState {
                date_from: None,
                date_to: None,
                excluded_categories: std::collections::BTreeSet::new(),
                exclude_internal_transfers: false,
            },
            detector,
            fetch_config: FetchConfig::charts(),
            complete: true,
            last_error: None,
            generation: 0,
        }
    }

    /// Overrides the page size and cap used by refreshes.
    #[inline]
    #[must_use]
    pub const fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch_config = config;
        self
    }

    /// Returns the resident transactions in server order.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Returns the known categories.
    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the current filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Returns the current filter for editing.
    #[inline]
    pub const fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Replaces the filter.
    #[inline]
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Clears exclusions and restores the default date window.
    #[inline]
    pub fn reset_filters(&mut self) {
        self.filter.reset(&self.transactions);
    }

    /// Returns the transfer detector.
    #[inline]
    #[must_use]
    pub const fn detector(&self) -> &D {
        &self.detector
    }

    /// Whether the resident set came from a complete walk.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Failure that cut the last walk short, if any.
    #[inline]
    #[must_use]
    pub const fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Starts a refresh, invalidating every earlier ticket.
    #[inline]
    pub const fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation = self.generation.wrapping_add(1);
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Installs the result of a refresh if `ticket` is still current.
    ///
    /// On success the whole transaction set and category list are replaced
    /// and the date filter is reset to the default window for the new data.
    #[inline]
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        outcome: FetchOutcome,
        categories: Vec<Category>,
    ) -> RefreshStatus {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale refresh"
            );
            return RefreshStatus::Stale;
        }
        if !outcome.complete {
            tracing::warn!(
                records = outcome.records.len(),
                stop = ?outcome.stop,
                "installing partial transaction set"
            );
        }
        self.transactions = outcome.records;
        self.categories = categories;
        self.complete = outcome.complete;
        self.last_error = outcome.error;
        if let Some((from, to)) = default_window(&self.transactions) {
            self.filter.date_from = Some(from);
            self.filter.date_to = Some(to);
        }
        RefreshStatus::Applied
    }

    /// Returns the transactions passing the current filter.
    #[inline]
    #[must_use]
    pub fn filtered(&self) -> Vec<&Transaction> {
        self.filter.apply(&self.transactions, &self.detector)
    }

    /// Computes every chart from the filtered set, keeping the top
    /// `category_limit` categories.
    #[must_use]
    pub fn charts(&self, category_limit: usize) -> ChartData {
        let filtered = self.filtered();
        let savings = monthly_savings(
            filtered.iter().copied(),
            &self.detector,
            self.filter.exclude_internal_transfers,
        );
        let summary = PeriodSummary::from_transactions(filtered.iter().copied(), savings.len());
        ChartData {
            wealth: cumulative_wealth(filtered.iter().copied()),
            weekly: weekly_spending(filtered.iter().copied(), RECENT_WEEKS),
            categories: category_totals(filtered.iter().copied(), category_limit),
            summary,
            savings,
            shown: filtered.len(),
            total: self.transactions.len(),
            complete: self.complete,
        }
    }

    /// Fetches every transaction page and the category list, then installs
    /// them.
    ///
    /// A failing page does not fail the refresh: the partial set is
    /// installed and [`Self::is_complete`] reports `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the category list cannot be fetched.
    #[cfg(feature = "async")]
    #[tracing::instrument(skip_all)]
    pub async fn refresh(
        &mut self,
        client: &crate::client::FinboardClient,
    ) -> crate::error::Result<RefreshStatus> {
        let ticket = self.begin_refresh();
        let categories = client.categories().await?;
        let outcome = crate::fetch::fetch_all(client, self.fetch_config).await;
        Ok(self.finish_refresh(ticket, outcome, categories))
    }

    /// Blocking variant of [`Self::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error if the category list cannot be fetched.
    #[cfg(feature = "blocking")]
    #[tracing::instrument(skip_all)]
    pub fn refresh_blocking(
        &mut self,
        client: &crate::client::FinboardBlockingClient,
    ) -> crate::error::Result<RefreshStatus> {
        let ticket = self.begin_refresh();
        let categories = client.categories()?;
        let outcome = crate::fetch::fetch_all_blocking(client, self.fetch_config);
        Ok(self.finish_refresh(ticket, outcome, categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CATEGORY_CHART_LIMIT;
    use crate::fetch::StopReason;
    use crate::models::{NaiveDate, TransactionId};

    fn tx(id: i64, on: (i32, u32, u32), credit: f64, category: Option<&str>) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            date: NaiveDate::from_ymd_opt(on.0, on.1, on.2),
            description: String::new(),
            credit,
            balance: 0.0,
            category: category.map(str::to_owned),
            category_id: None,
            import_hash: None,
        }
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            tx(1, (2024, 1, 5), 1000.0, Some("Salary")),
            tx(2, (2024, 1, 20), -400.0, Some("Rent")),
            tx(3, (2024, 2, 3), 1000.0, Some("Salary")),
            tx(4, (2024, 2, 10), -1200.0, Some("Rent")),
        ]
    }

    fn complete(records: Vec<Transaction>) -> FetchOutcome {
        let pages = u32::from(!records.is_empty());
        FetchOutcome::new(records, pages, StopReason::Exhausted, None)
    }

    #[test]
    fn finish_installs_and_sets_default_window() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let status = dashboard.finish_refresh(ticket, complete(scenario()), Vec::new());
        assert_eq!(status, RefreshStatus::Applied);
        assert_eq!(dashboard.transactions().len(), 4);
        assert!(dashboard.is_complete());
        assert_eq!(dashboard.filter().date_to, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(dashboard.filter().date_from, NaiveDate::from_ymd_opt(2023, 2, 10));
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut dashboard = Dashboard::new();
        let old = dashboard.begin_refresh();
        let new = dashboard.begin_refresh();

        let status = dashboard.finish_refresh(new, complete(scenario()), Vec::new());
        assert_eq!(status, RefreshStatus::Applied);

        let late = complete(vec![tx(9, (2020, 1, 1), 1.0, None)]);
        assert_eq!(dashboard.finish_refresh(old, late, Vec::new()), RefreshStatus::Stale);
        assert_eq!(dashboard.transactions().len(), 4);
    }

    #[test]
    fn refresh_replaces_rather_than_appends() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(first, complete(scenario()), Vec::new());
        let second = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(
            second,
            complete(vec![tx(5, (2024, 3, 1), 10.0, None)]),
            Vec::new(),
        );
        assert_eq!(dashboard.transactions().len(), 1);
    }

    #[test]
    fn partial_outcome_is_reported() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let outcome = FetchOutcome::new(
            scenario(),
            1,
            StopReason::Failed,
            Some(ErrorKind::Api { status: 500 }),
        );
        let _applied = dashboard.finish_refresh(ticket, outcome, Vec::new());
        assert!(!dashboard.is_complete());
        assert_eq!(dashboard.last_error(), Some(ErrorKind::Api { status: 500 }));
        assert!(!dashboard.charts(CATEGORY_CHART_LIMIT).complete);
    }

    #[test]
    fn charts_end_to_end() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(ticket, complete(scenario()), Vec::new());

        let charts = dashboard.charts(CATEGORY_CHART_LIMIT);
        assert_eq!(charts.shown, 4);
        assert_eq!(charts.total, 4);
        assert_eq!(charts.savings.len(), 2);
        assert!((charts.savings[0].savings_rate - 60.0).abs() < 1e-9);
        assert!((charts.savings[1].savings_rate + 20.0).abs() < 1e-9);
        assert!((charts.wealth.last().unwrap().balance - 400.0).abs() < 1e-9);
        assert_eq!(charts.categories.len(), 1);
        assert_eq!(charts.categories[0].name, "Rent");
        assert_eq!(charts.summary.months, 2);
        assert!((charts.summary.avg_monthly_spending - 800.0).abs() < 1e-9);
    }

    #[test]
    fn charts_wealth_matches_filtered_sum_with_undated_record() {
        let mut undated = tx(2, (2024, 1, 1), -250.0, Some("Food"));
        undated.date = None;
        let records = vec![
            tx(1, (2024, 1, 5), 1000.0, Some("Salary")),
            undated,
            tx(3, (2024, 2, 5), -100.0, Some("Food")),
        ];
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(ticket, complete(records), Vec::new());

        let charts = dashboard.charts(CATEGORY_CHART_LIMIT);
        assert_eq!(charts.shown, 3);
        let filtered_sum: f64 = dashboard.filtered().iter().map(|tx| tx.credit).sum();
        let last = charts.wealth.last().unwrap();
        assert!((filtered_sum - 650.0).abs() < 1e-9);
        assert!((last.balance - filtered_sum).abs() < 1e-9);
        assert_eq!(last.transactions, 2);
    }

    #[test]
    fn filters_narrow_charts() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(ticket, complete(scenario()), Vec::new());
        let _excluded = dashboard.filter_mut().toggle_category("Rent");

        let charts = dashboard.charts(CATEGORY_CHART_LIMIT);
        assert_eq!(charts.shown, 2);
        assert!(charts.categories.is_empty());
        assert!(charts.weekly.is_empty());
    }

    #[test]
    fn reset_filters_restores_window() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(ticket, complete(scenario()), Vec::new());
        dashboard.set_filter(FilterState::new().exclude_category("Rent"));
        dashboard.reset_filters();
        assert_eq!(dashboard.filter().active_count(), 2);
    }

    #[test]
    fn custom_detector_drives_transfer_exclusion() {
        let mut dashboard = Dashboard::with_detector(CategoryKeywords::new(["rent"]));
        let ticket = dashboard.begin_refresh();
        let _applied = dashboard.finish_refresh(ticket, complete(scenario()), Vec::new());
        dashboard.filter_mut().exclude_internal_transfers = true;
        assert_eq!(dashboard.filtered().len(), 2);
    }
}
