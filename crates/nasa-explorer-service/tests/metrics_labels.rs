//! Request metrics are labelled by route template, not by raw path.
//!
//! Lives in its own test binary because it installs the global recorder.

mod common;

use axum::http::StatusCode;

use common::*;
use nasa_explorer_service_shared::{init_metrics, MetricsConfig, UNMATCHED_ROUTE};

#[tokio::test]
async fn request_series_stay_bounded_by_route() {
    init_metrics(&MetricsConfig::default()).unwrap();
    let (server, _) = server(no_upstream);

    for i in 0..5 {
        server.get(&format!("/api/neo/{}", 1000 + i)).await;
        let response = server.get(&format!("/no/such/route/{i}")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    let scrape = server.get("/metrics").await.text();
    let series: Vec<&str> = scrape
        .lines()
        .filter(|line| line.starts_with("http_requests_total{"))
        .collect();

    assert_eq!(series.len(), 2, "{series:#?}");
    assert!(series
        .iter()
        .any(|line| line.contains(r#"path="/api/neo/{asteroid_id}""#)));
    assert!(series
        .iter()
        .any(|line| line.contains(&format!(r#"path="{UNMATCHED_ROUTE}""#))));
    assert!(!scrape.contains("/api/neo/100"));
    assert!(!scrape.contains("/no/such/route"));
}
