//! Live check: walk every transaction and print the monthly savings table.
//!
//! Reads `FINBOARD_API_URL` (and optionally `FINBOARD_TOKEN`).
//!
//! Run: `cargo run --example monthly_report --features cli`

use std::process::ExitCode;

use finboard_rs::aggregate::{LedgerTotals, monthly_savings};
use finboard_rs::client::FinboardBlockingClient;
use finboard_rs::fetch::{FetchConfig, fetch_all_blocking};
use finboard_rs::filter::CategoryKeywords;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let base_url = std::env::var("FINBOARD_API_URL")
        .map_err(|_| "FINBOARD_API_URL environment variable not set")?;
    let mut builder = FinboardBlockingClient::builder().base_url(base_url);
    if let Ok(token) = std::env::var("FINBOARD_TOKEN") {
        builder = builder.token(token);
    }
    let client = builder.build()?;

    println!("Fetching transactions...");
    let outcome = fetch_all_blocking(&client, FetchConfig::charts());
    println!(
        "Fetched {} transactions over {} pages{}",
        outcome.records.len(),
        outcome.pages_fetched,
        if outcome.complete { "" } else { " (partial)" }
    );

    let totals = LedgerTotals::from_transactions(&outcome.records);
    println!(
        "Credits {:.2}, debits {:.2}, balance {:.2}",
        totals.total_credits, totals.total_debits, totals.current_balance
    );

    let detector = CategoryKeywords::default();
    for month in monthly_savings(&outcome.records, &detector, true) {
        println!(
            "{:>9}  income {:>10.2}  spending {:>10.2}  saved {:>10.2} ({:.1}%)",
            month.month.label(),
            month.income,
            month.spending,
            month.savings,
            month.savings_rate
        );
    }

    // Cross-check against the server's own totals.
    let server = client.summary(false)?;
    if server.transaction_count != u64::try_from(totals.transaction_count)? {
        println!(
            "Server reports {} transactions; local walk saw {}",
            server.transaction_count, totals.transaction_count
        );
    }
    Ok(())
}
