//! Page walks and dashboard refreshes against a mock backend.
#![cfg(feature = "async")]

use finboard_rs::aggregate::CATEGORY_CHART_LIMIT;
use finboard_rs::client::FinboardClient;
use finboard_rs::dashboard::{Dashboard, RefreshStatus};
use finboard_rs::error::ErrorKind;
use finboard_rs::fetch::{FetchConfig, StopReason, fetch_all, fetch_all_matching};
use finboard_rs::models::{NaiveDate, Transaction, TransactionId};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FinboardClient {
    FinboardClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

/// One row; odd ids are uncategorized.
fn row(id: i64, date: &str, credit: f64, category: &str) -> serde_json::Value {
    if id % 2 == 1 {
        json!({ "id": id, "date": date, "description": "row", "credit": credit, "balance": 0.0 })
    } else {
        json!({
            "id": id,
            "date": date,
            "description": "row",
            "credit": credit,
            "balance": 0.0,
            "category": category,
            "categoryId": 1
        })
    }
}

fn page(page: u32, rows: Vec<serde_json::Value>, has_next_page: bool) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": rows,
        "pagination": {
            "page": page,
            "pageSize": 2,
            "totalItems": 6,
            "totalPages": 3,
            "hasNextPage": has_next_page,
            "hasPreviousPage": page > 1
        }
    }))
}

async fn mount_page(server: &MockServer, number: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/Transaction"))
        .and(query_param("page", number.to_string()))
        .and(query_param("pageSize", "2"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_three_pages(server: &MockServer) {
    mount_page(
        server,
        1,
        page(
            1,
            vec![
                row(1, "2024-01-05", 1000.0, ""),
                row(2, "2024-01-20", -400.0, "Rent"),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        server,
        2,
        page(
            2,
            vec![
                row(3, "2024-02-03", 1000.0, ""),
                row(4, "2024-02-10", -1200.0, "Travel"),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        server,
        3,
        page(
            3,
            vec![
                row(5, "2024-02-11", -20.0, ""),
                row(6, "2024-02-12", -30.0, "Food"),
            ],
            false,
        ),
    )
    .await;
}

fn ids(records: &[Transaction]) -> Vec<i64> {
    records.iter().map(|tx| tx.id.into_inner()).collect()
}

#[tokio::test]
async fn walks_every_page_in_order() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let outcome = fetch_all(&client(&server), FetchConfig::new(2, 50)).await;
    assert_eq!(ids(&outcome.records), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(outcome.pages_fetched, 3);
    assert!(outcome.complete);
    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn server_error_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        page(1, vec![row(1, "2024-01-05", 5.0, ""), row(2, "2024-01-06", -5.0, "Food")], true),
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(500).set_body_string("boom")).await;

    let outcome = fetch_all(&client(&server), FetchConfig::new(2, 50)).await;
    assert_eq!(ids(&outcome.records), vec![1, 2]);
    assert!(!outcome.complete);
    assert_eq!(outcome.stop, StopReason::Failed);
    assert_eq!(outcome.error, Some(ErrorKind::Api { status: 500 }));
}

#[tokio::test]
async fn page_cap_stops_walk() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let outcome = fetch_all(&client(&server), FetchConfig::new(2, 2)).await;
    assert_eq!(ids(&outcome.records), vec![1, 2, 3, 4]);
    assert_eq!(outcome.stop, StopReason::PageCap);
    assert!(!outcome.complete);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn matching_walk_keeps_uncategorized_only() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let outcome = fetch_all_matching(
        &client(&server),
        FetchConfig::new(2, 1000),
        Transaction::is_uncategorized,
    )
    .await;
    assert_eq!(ids(&outcome.records), vec![1, 3, 5]);
    assert!(outcome.complete);
}

#[tokio::test]
async fn dashboard_refresh_installs_data_and_default_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Rent" }
        ])))
        .mount(&server)
        .await;
    mount_three_pages(&server).await;

    let mut dashboard = Dashboard::new().fetch_config(FetchConfig::new(2, 50));
    let status = dashboard.refresh(&client(&server)).await.unwrap();
    assert_eq!(status, RefreshStatus::Applied);
    assert!(dashboard.is_complete());
    assert_eq!(dashboard.transactions().len(), 6);
    assert_eq!(dashboard.categories().len(), 1);
    assert_eq!(dashboard.filter().date_to, NaiveDate::from_ymd_opt(2024, 2, 12));
    assert_eq!(dashboard.filter().date_from, NaiveDate::from_ymd_opt(2023, 2, 12));

    let charts = dashboard.charts(CATEGORY_CHART_LIMIT);
    assert_eq!(charts.shown, 6);
    assert_eq!(charts.total, 6);
    assert_eq!(charts.savings.len(), 2);
    let january = charts.savings.first().unwrap();
    assert!((january.savings - 600.0).abs() < 1e-9);
    let last = charts.wealth.last().unwrap();
    assert!((last.balance - 350.0).abs() < 1e-9);
    assert_eq!(charts.categories.first().unwrap().name, "Travel");
}

#[tokio::test]
async fn dashboard_refresh_marks_partial_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_page(
        &server,
        1,
        page(1, vec![row(2, "2024-01-06", -5.0, "Food")], true),
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(503)).await;

    let mut dashboard = Dashboard::new().fetch_config(FetchConfig::new(2, 50));
    let status = dashboard.refresh(&client(&server)).await.unwrap();
    assert_eq!(status, RefreshStatus::Applied);
    assert!(!dashboard.is_complete());
    assert_eq!(dashboard.last_error(), Some(ErrorKind::Api { status: 503 }));
    assert_eq!(
        dashboard.transactions().first().map(|tx| tx.id),
        Some(TransactionId::new(2))
    );
}

#[tokio::test]
async fn dashboard_refresh_fails_without_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Category"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new();
    let err = dashboard.refresh(&client(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api { status: 500 });
    assert!(dashboard.transactions().is_empty());
}

#[cfg(feature = "blocking")]
#[tokio::test]
async fn blocking_walk_matches_async_walk() {
    use finboard_rs::client::FinboardBlockingClient;
    use finboard_rs::fetch::fetch_all_blocking;

    let server = MockServer::start().await;
    mount_three_pages(&server).await;
    let uri = server.uri();

    let outcome = tokio::task::spawn_blocking(move || {
        let api = FinboardBlockingClient::builder()
            .base_url(uri)
            .build()
            .unwrap();
        fetch_all_blocking(&api, FetchConfig::new(2, 50))
    })
    .await
    .unwrap();
    assert_eq!(ids(&outcome.records), vec![1, 2, 3, 4, 5, 6]);
    assert!(outcome.complete);
}
