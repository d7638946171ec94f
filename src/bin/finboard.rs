//! CLI binary for browsing and categorizing Finboard data.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use finboard_rs::aggregate::{
    CATEGORY_CHART_LIMIT, CATEGORY_COMPACT_LIMIT, CategoryTotal, HealthGrade, MonthlySavings,
    PeriodSummary, WealthPoint, WeeklySpending,
};
use finboard_rs::client::{DEFAULT_BASE_URL, FinboardBlockingClient};
use finboard_rs::dashboard::{ChartData, Dashboard, RefreshStatus};
use finboard_rs::error::ErrorKind;
use finboard_rs::fetch::{FetchConfig, FetchOutcome, StopReason, fetch_all_matching_blocking};
use finboard_rs::filter::FilterState;
use finboard_rs::models::{
    CategorizeRequest, CategorizeResponse, Category, CategoryId, NaiveDate, NewCategory,
    PaginationInfo, PatternCategorizeRequest, SortDirection, SortField, Transaction,
    TransactionId, TransactionQuery, TransactionSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Environment variable for the API base URL.
const API_URL_ENV: &str = "FINBOARD_API_URL";

/// Environment variable for the bearer token.
const TOKEN_ENV: &str = "FINBOARD_TOKEN";

/// Finboard CLI: upload statements, categorize and chart your spending.
#[derive(Debug, Parser)]
#[command(name = "finboard", version, about)]
struct Cli {
    /// API base URL (default: $FINBOARD_API_URL or http://127.0.0.1:8000).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Records requested per page.
    #[arg(long, global = true)]
    page_size: Option<u32>,
    /// Maximum number of pages fetched by full walks.
    #[arg(long, global = true)]
    max_pages: Option<u32>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of transactions.
    Transactions(TransactionArgs),
    /// Show the server-computed summary.
    Summary {
        /// Leave internal transfers out of the totals.
        #[arg(long)]
        exclude_transfers: bool,
    },
    /// List all categories.
    Categories,
    /// Create a category.
    CreateCategory {
        /// Category name.
        name: String,
        /// Hex color, e.g. #10B981.
        #[arg(long)]
        color: Option<String>,
        /// Free-text description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Upload a bank statement CSV for import.
    Upload {
        /// Path to a .csv file.
        file: PathBuf,
    },
    /// Assign a category to every transaction matching a rule.
    Categorize(CategorizeArgs),
    /// Categorize a transaction and all transactions with a similar
    /// description.
    CategorizePattern {
        /// Transaction whose description seeds the pattern.
        transaction_id: i64,
        /// Category to assign.
        category_id: i64,
    },
    /// Fetch every transaction and print the dashboard charts.
    Charts(ChartArgs),
    /// List transactions that still need a category.
    Uncategorized,
}

/// Arguments for the `transactions` subcommand.
#[derive(Debug, Args)]
struct TransactionArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Free-text search over descriptions.
    #[arg(long)]
    search: Option<String>,
    /// Sort column.
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Only show this category.
    #[arg(long)]
    category: Option<String>,
}

/// Sort columns accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    /// Booking date.
    Date,
    /// Description.
    Description,
    /// Amount.
    Credit,
    /// Running balance.
    Balance,
    /// Category label.
    Category,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => Self::Date,
            SortArg::Description => Self::Description,
            SortArg::Credit => Self::Credit,
            SortArg::Balance => Self::Balance,
            SortArg::Category => Self::Category,
        }
    }
}

/// Arguments for the `categorize` subcommand.
#[derive(Debug, Args)]
struct CategorizeArgs {
    /// Category to assign.
    category_id: i64,
    /// Description substring to match.
    #[arg(long)]
    pattern: Option<String>,
    /// Minimum amount (inclusive).
    #[arg(long, allow_hyphen_values = true)]
    min_amount: Option<f64>,
    /// Maximum amount (inclusive).
    #[arg(long, allow_hyphen_values = true)]
    max_amount: Option<f64>,
    /// Start date (inclusive, YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

/// Arguments for the `charts` subcommand.
#[derive(Debug, Args)]
struct ChartArgs {
    /// Start date (inclusive, YYYY-MM-DD). Defaults to 12 months before
    /// the latest transaction.
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD). Defaults to the latest
    /// transaction.
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Hide a category (repeatable).
    #[arg(long, value_name = "NAME")]
    exclude_category: Vec<String>,
    /// Hide internal transfers.
    #[arg(long)]
    exclude_transfers: bool,
    /// Which chart to print.
    #[arg(long, value_enum, default_value_t = ChartView::All)]
    view: ChartView,
    /// Show the compact category breakdown.
    #[arg(long)]
    compact: bool,
}

/// Chart selection for the `charts` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartView {
    /// Every chart.
    All,
    /// Monthly savings.
    Savings,
    /// Cumulative wealth.
    Wealth,
    /// Category breakdown.
    Categories,
    /// Weekday and weekend spending.
    Patterns,
}

impl ChartView {
    /// Returns `true` if `self` includes `other`.
    fn shows(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Reads a non-empty environment variable.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|val| !val.trim().is_empty())
}

/// Page size and cap given on the command line.
#[derive(Debug, Clone, Copy, Default)]
struct FetchOverrides {
    /// `--page-size`.
    page_size: Option<u32>,
    /// `--max-pages`.
    max_pages: Option<u32>,
}

impl FetchOverrides {
    /// Applies the overrides on top of `base`.
    fn apply(self, base: FetchConfig) -> FetchConfig {
        FetchConfig::new(
            self.page_size.unwrap_or(base.page_size()),
            self.max_pages.unwrap_or(base.max_pages()),
        )
    }
}

/// Builds the chart filter from CLI arguments; unset dates keep the
/// default window chosen at refresh time.
fn build_chart_filter(mut filter: FilterState, args: &ChartArgs) -> FilterState {
    if let Some(from) = args.from {
        filter = filter.date_from(from);
    }
    if let Some(to) = args.to {
        filter = filter.date_to(to);
    }
    for name in &args.exclude_category {
        filter = filter.exclude_category(name.as_str());
    }
    filter.exclude_internal_transfers(args.exclude_transfers)
}

/// Builds the server-side query for the `transactions` subcommand.
fn build_query(args: &TransactionArgs) -> TransactionQuery {
    let mut query = TransactionQuery::new();
    if let Some(text) = args.search.as_deref() {
        query = query.search(text);
    }
    if let Some(sort) = args.sort {
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        query = query.sort(sort.into(), direction);
    }
    if let Some(name) = args.category.as_deref() {
        query = query.category(name);
    }
    query
}

/// Builds the rule-based categorization request.
fn build_categorize_request(args: &CategorizeArgs) -> CategorizeRequest {
    let mut request = CategorizeRequest::new(CategoryId::new(args.category_id));
    request.description_pattern.clone_from(&args.pattern);
    request.amount_min = args.min_amount;
    request.amount_max = args.max_amount;
    request.date_from = args.from;
    request.date_to = args.to;
    request
}

/// Prints an error line to stderr.
fn report_error(context: &str, err: &dyn core::fmt::Display) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let overrides = FetchOverrides {
        page_size: cli.page_size,
        max_pages: cli.max_pages,
    };

    let base_url = cli
        .api_url
        .or_else(|| read_env(API_URL_ENV))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    let mut builder = FinboardBlockingClient::builder().base_url(base_url);
    if let Some(token) = read_env(TOKEN_ENV) {
        builder = builder.token(token);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(err) => {
            report_error("failed to build client", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&client, cli.command, overrides)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(
    client: &FinboardBlockingClient,
    command: Command,
    overrides: FetchOverrides,
) -> io::Result<ExitCode> {
    match command {
        Command::Transactions(args) => {
            cmd_transactions(client, &args, overrides.apply(FetchConfig::charts()))
        }
        Command::Summary { exclude_transfers } => cmd_summary(client, exclude_transfers),
        Command::Categories => cmd_categories(client),
        Command::CreateCategory {
            name,
            color,
            description,
        } => cmd_create_category(client, &name, color.as_deref(), description.as_deref()),
        Command::Upload { file } => cmd_upload(client, &file),
        Command::Categorize(args) => cmd_categorize(client, &args),
        Command::CategorizePattern {
            transaction_id,
            category_id,
        } => cmd_categorize_pattern(client, transaction_id, category_id),
        Command::Charts(args) => cmd_charts(client, &args, overrides.apply(FetchConfig::charts())),
        Command::Uncategorized => {
            cmd_uncategorized(client, overrides.apply(FetchConfig::categorizer()))
        }
    }
}

/// Executes the `transactions` subcommand: shows one page.
fn cmd_transactions(
    client: &FinboardBlockingClient,
    args: &TransactionArgs,
    config: FetchConfig,
) -> io::Result<ExitCode> {
    let query = build_query(args);
    match client.list_transactions(args.page.max(1), config.page_size(), &query) {
        Ok(page) => {
            print_transactions_table("Transactions", &page.data)?;
            print_page_footer(&page.pagination)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("failed to list transactions", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `summary` subcommand.
fn cmd_summary(client: &FinboardBlockingClient, exclude_transfers: bool) -> io::Result<ExitCode> {
    match client.summary(exclude_transfers) {
        Ok(summary) => {
            print_server_summary(&summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("failed to fetch summary", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `categories` subcommand.
fn cmd_categories(client: &FinboardBlockingClient) -> io::Result<ExitCode> {
    match client.categories() {
        Ok(categories) => {
            print_categories_table(&categories)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("failed to list categories", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `create-category` subcommand.
fn cmd_create_category(
    client: &FinboardBlockingClient,
    name: &str,
    color: Option<&str>,
    description: Option<&str>,
) -> io::Result<ExitCode> {
    let mut category = NewCategory::new(name);
    if let Some(hex) = color {
        category = category.color(hex);
    }
    if let Some(text) = description {
        category = category.description(text);
    }
    match client.create_category(&category) {
        Ok(created) => {
            let mut out = io::stdout().lock();
            let label = created.map_or_else(
                || category.name.clone(),
                |made| format!("{} (#{})", made.name, made.id),
            );
            writeln!(out, "{} {label}", "Created category".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("failed to create category", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `upload` subcommand.
fn cmd_upload(client: &FinboardBlockingClient, file: &Path) -> io::Result<ExitCode> {
    let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
        report_error("invalid file path", &file.display())?;
        return Ok(ExitCode::FAILURE);
    };
    let contents = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(err) => {
            report_error(&format!("failed to read {}", file.display()), &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let spinner = make_spinner(&format!("Uploading {file_name}..."));
    let result = client.upload_csv(file_name, contents);
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "{} {} imported, {} duplicates skipped",
                "Upload complete!".green().bold(),
                response.imported_count,
                response.duplicate_count
            )?;
            if let Some(message) = response.message.as_deref() {
                writeln!(out, "  {}", message.dimmed())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("upload failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `categorize` subcommand.
fn cmd_categorize(client: &FinboardBlockingClient, args: &CategorizeArgs) -> io::Result<ExitCode> {
    match client.categorize(&build_categorize_request(args)) {
        Ok(response) => {
            print_categorize_result(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("categorization failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `categorize-pattern` subcommand.
fn cmd_categorize_pattern(
    client: &FinboardBlockingClient,
    transaction_id: i64,
    category_id: i64,
) -> io::Result<ExitCode> {
    let request = PatternCategorizeRequest {
        transaction_id: TransactionId::new(transaction_id),
        category_id: CategoryId::new(category_id),
    };
    match client.categorize_with_pattern(&request) {
        Ok(response) => {
            print_categorize_result(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("pattern categorization failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `charts` subcommand: full walk, filter, aggregate, print.
fn cmd_charts(
    client: &FinboardBlockingClient,
    args: &ChartArgs,
    config: FetchConfig,
) -> io::Result<ExitCode> {
    let mut dashboard = Dashboard::new().fetch_config(config);
    let spinner = make_spinner("Fetching transactions...");
    let refreshed = dashboard.refresh_blocking(client);
    spinner.finish_and_clear();

    match refreshed {
        Ok(RefreshStatus::Applied) => {}
        Ok(RefreshStatus::Stale) => return Ok(ExitCode::FAILURE),
        Err(err) => {
            report_error("failed to load dashboard", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    }
    if !dashboard.is_complete() {
        print_partial_warning(dashboard.last_error())?;
    }

    let filter = build_chart_filter(dashboard.filter().clone(), args);
    if filter.is_date_range_inverted() {
        writeln!(
            io::stderr().lock(),
            "{} --from is after --to; no dated transactions will match",
            "warning:".yellow().bold()
        )?;
    }
    dashboard.set_filter(filter);

    let limit = if args.compact {
        CATEGORY_COMPACT_LIMIT
    } else {
        CATEGORY_CHART_LIMIT
    };
    let charts = dashboard.charts(limit);
    print_chart_header(&charts, dashboard.filter())?;
    if args.view.shows(ChartView::Savings) {
        print_savings_table(&charts.savings)?;
        print_period_summary(&charts.summary)?;
    }
    if args.view.shows(ChartView::Wealth) {
        print_wealth_table(&charts.wealth)?;
    }
    if args.view.shows(ChartView::Categories) {
        print_category_totals_table(&charts.categories)?;
    }
    if args.view.shows(ChartView::Patterns) {
        print_patterns_table(&charts.weekly)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `uncategorized` subcommand: walks every page and keeps
/// transactions without a category.
fn cmd_uncategorized(client: &FinboardBlockingClient, config: FetchConfig) -> io::Result<ExitCode> {
    let spinner = make_spinner("Collecting uncategorized transactions...");
    let outcome = fetch_all_matching_blocking(client, config, Transaction::is_uncategorized);
    spinner.finish_and_clear();

    if outcome.stop == StopReason::Failed && outcome.records.is_empty() {
        report_error("failed to list transactions", &describe_stop(&outcome))?;
        return Ok(ExitCode::FAILURE);
    }
    if !outcome.complete {
        print_partial_warning(outcome.error)?;
    }
    print_transactions_table("Uncategorized", &outcome.records)?;
    Ok(ExitCode::SUCCESS)
}

/// Describes why a walk stopped.
fn describe_stop(outcome: &FetchOutcome) -> String {
    match outcome.stop {
        StopReason::Exhausted => "all pages fetched".to_owned(),
        StopReason::PageCap => format!("stopped at the {}-page limit", outcome.pages_fetched),
        StopReason::Failed => outcome
            .error
            .map_or_else(|| "request failed".to_owned(), describe_error_kind),
    }
}

/// Human-readable form of an [`ErrorKind`].
fn describe_error_kind(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::Transport => "network error".to_owned(),
        ErrorKind::Api { status } => format!("server returned HTTP {status}"),
        ErrorKind::Decode => "unreadable response".to_owned(),
        ErrorKind::Config => "invalid configuration".to_owned(),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Warns that the data shown is incomplete.
fn print_partial_warning(error: Option<ErrorKind>) -> io::Result<()> {
    let reason = error.map_or_else(|| "page limit reached".to_owned(), describe_error_kind);
    writeln!(
        io::stderr().lock(),
        "{} showing partial data ({reason})",
        "warning:".yellow().bold()
    )
}

/// Formats an amount with two decimals.
fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Colors an amount cell by sign.
fn signed_cell(amount: f64) -> Cell {
    let cell = Cell::new(money(amount));
    if amount < 0.0_f64 {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

/// Color for a health grade cell.
const fn grade_color(grade: HealthGrade) -> Color {
    match grade {
        HealthGrade::A | HealthGrade::B => Color::Green,
        HealthGrade::C => Color::Yellow,
        HealthGrade::D | HealthGrade::F => Color::Red,
    }
}

/// Creates a table with the shared preset and a cyan header.
fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        headers
            .iter()
            .map(|title| Cell::new(title).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Prints transactions in a table.
fn print_transactions_table(title: &str, txs: &[Transaction]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if txs.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["ID", "Date", "Description", "Amount", "Balance", "Category"]);
    for tx in txs {
        let date = tx
            .date
            .map_or_else(|| "\u{2014}".to_owned(), |d| d.to_string());
        let category_cell = if tx.is_uncategorized() {
            Cell::new(tx.effective_category()).fg(Color::DarkGrey)
        } else {
            Cell::new(tx.effective_category())
        };
        _ = table.add_row(vec![
            Cell::new(tx.id),
            Cell::new(date),
            Cell::new(&tx.description),
            signed_cell(tx.credit),
            Cell::new(money(tx.balance)),
            category_cell,
        ]);
    }

    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", txs.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the page position under a transaction table.
fn print_page_footer(pagination: &PaginationInfo) -> io::Result<()> {
    writeln!(
        io::stdout().lock(),
        "{}",
        format_args!(
            "page {} of {} ({} transactions){}",
            pagination.page,
            pagination.total_pages,
            pagination.total_items,
            if pagination.has_next_page { ", more available" } else { "" }
        )
        .dimmed()
    )
}

/// Prints the server-computed summary.
fn print_server_summary(summary: &TransactionSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Summary".green().bold())?;
    writeln!(out)?;

    let mut table = new_table(&["Metric", "Value"]);
    _ = table.add_row(vec![Cell::new("Transactions"), Cell::new(summary.transaction_count)]);
    _ = table.add_row(vec![
        Cell::new("Total credits"),
        Cell::new(money(summary.total_credits)).fg(Color::Green),
    ]);
    _ = table.add_row(vec![
        Cell::new("Total debits"),
        Cell::new(money(summary.total_debits)).fg(Color::Red),
    ]);
    _ = table.add_row(vec![Cell::new("Current balance"), signed_cell(summary.current_balance)]);
    _ = table.add_row(vec![
        Cell::new("Average transaction"),
        Cell::new(money(summary.average_transaction)),
    ]);
    _ = table.add_row(vec![Cell::new("Uncategorized"), Cell::new(summary.uncategorized_count)]);
    if let Some(range) = summary.date_range.as_ref() {
        _ = table.add_row(vec![
            Cell::new("Date range"),
            Cell::new(format!("{} \u{2192} {}", range.from, range.to)),
        ]);
    }
    writeln!(out, "{table}")?;

    if !summary.category_breakdown.is_empty() {
        let mut breakdown = new_table(&["Category", "Count", "Total"]);
        for entry in &summary.category_breakdown {
            _ = breakdown.add_row(vec![
                Cell::new(&entry.category),
                Cell::new(entry.count),
                signed_cell(entry.total),
            ]);
        }
        writeln!(out)?;
        writeln!(out, "{breakdown}")?;
    }
    Ok(())
}

/// Prints categories in a table.
fn print_categories_table(categories: &[Category]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if categories.is_empty() {
        writeln!(out, "{}", "No categories found.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["ID", "Name", "Color", "Transactions", "Description"]);
    for category in categories {
        _ = table.add_row(vec![
            Cell::new(category.id),
            Cell::new(&category.name),
            Cell::new(&category.color),
            Cell::new(category.transaction_count),
            Cell::new(category.description.as_deref().unwrap_or("")),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Categories".green().bold(),
        format_args!("({})", categories.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the result of a categorization call.
fn print_categorize_result(response: &CategorizeResponse) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {} transactions updated",
        "Categorized!".green().bold(),
        response.updated_count
    )?;
    if let Some(business) = response.business_name.as_deref() {
        writeln!(out, "  {} {business}", "Pattern:".bold())?;
    }
    if let Some(message) = response.message.as_deref() {
        writeln!(out, "  {}", message.dimmed())?;
    }
    Ok(())
}

/// Prints the "showing N of M" line and active filters.
fn print_chart_header(charts: &ChartData, filter: &FilterState) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        "Financial Analytics".green().bold(),
        format_args!(
            "(showing {} of {} transactions, {} active filters)",
            charts.shown,
            charts.total,
            filter.active_count()
        )
        .dimmed()
    )?;
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        writeln!(out, "  {} {from} \u{2192} {to}", "Period:".bold())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Prints monthly savings.
fn print_savings_table(savings: &[MonthlySavings]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Savings Analysis".green().bold())?;
    if savings.is_empty() {
        writeln!(out, "{}", "No data for this period.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["Month", "Income", "Spending", "Savings", "Rate", "Transfers"]);
    for month in savings {
        _ = table.add_row(vec![
            Cell::new(month.month.label()),
            Cell::new(money(month.income)).fg(Color::Green),
            Cell::new(money(month.spending)).fg(Color::Red),
            signed_cell(month.savings),
            Cell::new(format!("{:.1}%", month.savings_rate)),
            Cell::new(money(month.internal_transfers)).fg(Color::DarkGrey),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the period metrics under the savings chart.
fn print_period_summary(summary: &PeriodSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let mut table = new_table(&["Metric", "Value"]);
    let rows = [
        ("Income", summary.income),
        ("Spending", summary.spending),
        ("Net savings", summary.savings),
        ("Avg monthly income", summary.avg_monthly_income),
        ("Avg monthly spending", summary.avg_monthly_spending),
        ("Avg monthly savings", summary.avg_monthly_savings),
        ("Avg weekly spending", summary.avg_weekly_spending),
        ("Avg per transaction", summary.avg_per_transaction),
    ];
    for (name, value) in rows {
        _ = table.add_row(vec![Cell::new(name), signed_cell(value)]);
    }
    _ = table.add_row(vec![
        Cell::new("Savings rate"),
        Cell::new(format!("{:.1}%", summary.savings_rate)),
    ]);
    let grade = summary.health_grade();
    _ = table.add_row(vec![
        Cell::new("Health score"),
        Cell::new(grade).fg(grade_color(grade)),
    ]);
    writeln!(out, "{table}")?;
    writeln!(out, "{}", grade.advice().dimmed())?;
    writeln!(out)?;
    Ok(())
}

/// Prints month-end cumulative wealth.
fn print_wealth_table(points: &[WealthPoint]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Cumulative Wealth".green().bold())?;
    if points.is_empty() {
        writeln!(out, "{}", "No data for this period.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["Month", "Balance", "Transactions"]);
    for point in points {
        _ = table.add_row(vec![
            Cell::new(point.month.compact_label()),
            signed_cell(point.balance),
            Cell::new(point.transactions),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints the top categories.
fn print_category_totals_table(totals: &[CategoryTotal]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Spending by Category".green().bold())?;
    if totals.is_empty() {
        writeln!(out, "{}", "No spending in this period.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["Category", "Spent", "Count", "Share"]);
    for entry in totals {
        _ = table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(money(entry.total)).fg(Color::Red),
            Cell::new(entry.count),
            Cell::new(format!("{:.1}%", entry.share)),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(out)?;
    Ok(())
}

/// Prints weekday versus weekend spending.
fn print_patterns_table(weeks: &[WeeklySpending]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Spending Patterns".green().bold())?;
    if weeks.is_empty() {
        writeln!(out, "{}", "No spending in this period.".dimmed())?;
        return Ok(());
    }

    let mut table = new_table(&["Week", "Weekday", "Weekend", "Total"]);
    for week in weeks {
        _ = table.add_row(vec![
            Cell::new(week.week.label()),
            Cell::new(money(week.weekday)),
            Cell::new(money(week.weekend)).fg(Color::Yellow),
            Cell::new(money(week.total())),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself failed; nothing else to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(core::iter::once("finboard").chain(args.iter().copied())).unwrap()
    }

    fn chart_args(parsed: Cli) -> ChartArgs {
        match parsed.command {
            Command::Charts(args) => args,
            other => panic!("expected charts, got {other:?}"),
        }
    }

    // ── health score tests ────────────────────────────────────────────

    #[test]
    fn grade_colors_follow_savings_rate() {
        let empty = PeriodSummary::from_transactions(&Vec::<Transaction>::new(), 1);
        assert_eq!(grade_color(empty.health_grade()), Color::Red);
        assert_eq!(grade_color(HealthGrade::from_savings_rate(20.0)), Color::Green);
        assert_eq!(grade_color(HealthGrade::from_savings_rate(12.5)), Color::Yellow);
        assert_eq!(grade_color(HealthGrade::from_savings_rate(5.0)), Color::Red);
    }

    // ── parse_date tests ──────────────────────────────────────────────

    #[test]
    fn parse_date_valid() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn parse_date_invalid() {
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("15/01/2024").is_err());
    }

    // ── config tests ──────────────────────────────────────────────────

    #[test]
    fn fetch_config_uses_base_without_overrides() {
        assert_eq!(
            FetchOverrides::default().apply(FetchConfig::categorizer()),
            FetchConfig::categorizer()
        );
    }

    #[test]
    fn fetch_config_applies_overrides() {
        let parsed = cli(&["--page-size", "25", "--max-pages", "0", "charts"]);
        let overrides = FetchOverrides {
            page_size: parsed.page_size,
            max_pages: parsed.max_pages,
        };
        let config = overrides.apply(FetchConfig::charts());
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.max_pages(), 1);
    }

    // ── argument mapping tests ────────────────────────────────────────

    #[test]
    fn chart_filter_from_args() {
        let args = chart_args(cli(&[
            "charts",
            "--from",
            "2024-01-01",
            "--exclude-category",
            "Rent",
            "--exclude-category",
            "Fun",
            "--exclude-transfers",
        ]));
        let base = FilterState::new().date_range(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let filter = build_chart_filter(base, &args);
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(filter.excluded_categories.len(), 2);
        assert!(filter.exclude_internal_transfers);
        assert_eq!(filter.active_count(), 5);
    }

    #[test]
    fn chart_view_selection() {
        assert!(ChartView::All.shows(ChartView::Wealth));
        assert!(ChartView::Wealth.shows(ChartView::Wealth));
        assert!(!ChartView::Savings.shows(ChartView::Patterns));
        let args = chart_args(cli(&["charts", "--view", "patterns", "--compact"]));
        assert_eq!(args.view, ChartView::Patterns);
        assert!(args.compact);
    }

    #[test]
    fn query_from_args() {
        let parsed = cli(&["transactions", "--search", "uber", "--sort", "credit", "--desc"]);
        let Command::Transactions(args) = parsed.command else {
            panic!("expected transactions");
        };
        let query = build_query(&args);
        assert_eq!(query.search.as_deref(), Some("uber"));
        assert_eq!(query.sort_field, Some(SortField::Credit));
        assert_eq!(query.sort_direction, Some(SortDirection::Desc));
        assert!(query.category.is_none());
    }

    #[test]
    fn desc_requires_sort() {
        let parsed = Cli::try_parse_from(["finboard", "transactions", "--desc"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn categorize_request_from_args() {
        let parsed = cli(&[
            "categorize",
            "4",
            "--pattern",
            "NETFLIX",
            "--max-amount",
            "-5",
            "--to",
            "2024-12-31",
        ]);
        let Command::Categorize(args) = parsed.command else {
            panic!("expected categorize");
        };
        let request = build_categorize_request(&args);
        assert_eq!(request.category_id, CategoryId::new(4));
        assert_eq!(request.description_pattern.as_deref(), Some("NETFLIX"));
        assert_eq!(request.amount_max, Some(-5.0));
        assert!(request.amount_min.is_none());
        assert_eq!(request.date_to, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    // ── describe tests ────────────────────────────────────────────────

    #[test]
    fn describe_stop_reasons() {
        let capped = FetchOutcome::new(Vec::new(), 50, StopReason::PageCap, None);
        assert_eq!(describe_stop(&capped), "stopped at the 50-page limit");

        let failed = FetchOutcome::new(
            Vec::new(),
            0,
            StopReason::Failed,
            Some(ErrorKind::Api { status: 502 }),
        );
        assert_eq!(describe_stop(&failed), "server returned HTTP 502");
        assert_eq!(describe_stop(&FetchOutcome::empty()), "all pages fetched");
    }

    #[test]
    fn money_formats_two_decimals() {
        assert_eq!(money(12.345), "12.35");
        assert_eq!(money(-3.0), "-3.00");
    }
}
