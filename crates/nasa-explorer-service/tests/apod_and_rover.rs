mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

fn rover_responder(
    request: &nasa_explorer_lib::UpstreamRequest,
) -> nasa_explorer_lib::Result<serde_json::Value> {
    match request.path() {
        "/mars-photos/api/v1/rovers/curiosity" => Ok(sample_manifest("Curiosity", 4000)),
        "/mars-photos/api/v1/rovers/curiosity/photos" => Ok(sample_rover_photos(8)),
        "/mars-photos/api/v1/rovers/perseverance" => Err(upstream_error(500, "boom")),
        "/mars-photos/api/v1/rovers/opportunity" => Ok(sample_manifest("Opportunity", 5111)),
        "/mars-photos/api/v1/rovers/opportunity/photos" => Ok(sample_rover_photos(0)),
        "/mars-photos/api/v1/rovers/spirit" => Err(upstream_down("/mars-photos/api/v1/rovers/spirit")),
        other => Err(upstream_error(404, other)),
    }
}

#[tokio::test]
async fn apod_single_date() {
    let (server, upstream) = server(|req| Ok(sample_apod(req.get("date").unwrap_or("today"))));

    let response = server
        .get("/api/apod")
        .add_query_param("date", "2024-01-01")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let data = success_data(&response);
    assert_eq!(data["date"], "2024-01-01");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path(), "/planetary/apod");
    assert_eq!(calls[0].get("date"), Some("2024-01-01"));
}

#[tokio::test]
async fn apod_today_sends_no_parameters() {
    let (server, upstream) = server(|_| Ok(sample_apod("2024-06-01")));

    let response = server.get("/api/apod").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(upstream.calls()[0].params().is_empty());
}

#[tokio::test]
async fn apod_rejects_malformed_date_before_upstream() {
    let (server, upstream) = server(no_upstream);

    let response = server
        .get("/api/apod")
        .add_query_param("date", "2024-1-1")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(failure_message(&response), "Date must be in YYYY-MM-DD format");
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn apod_rejects_mixed_modes() {
    let (server, upstream) = server(no_upstream);

    let response = server
        .get("/api/apod")
        .add_query_param("date", "2024-01-01")
        .add_query_param("count", "3")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        failure_message(&response),
        "Use only one of date, count, or start_date/end_date"
    );
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn apod_random_clamps_count() {
    let (server, upstream) = server(|_| Ok(json!([])));

    let response = server
        .get("/api/apod/random")
        .add_query_param("count", "50")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(upstream.calls()[0].get("count"), Some("10"));

    server.get("/api/apod/random").await;
    assert_eq!(upstream.calls()[1].get("count"), Some("5"));
}

#[tokio::test]
async fn apod_range_requires_both_dates() {
    let (server, upstream) = server(|_| Ok(json!([])));

    let response = server
        .get("/api/apod/range")
        .add_query_param("start_date", "2024-01-01")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.call_count(), 0);

    let response = server
        .get("/api/apod/range")
        .add_query_param("start_date", "2024-01-01")
        .add_query_param("end_date", "2024-01-05")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let call = &upstream.calls()[0];
    assert_eq!(call.get("start_date"), Some("2024-01-01"));
    assert_eq!(call.get("end_date"), Some("2024-01-05"));
}

#[tokio::test]
async fn rover_photos_forwards_selector_camera_and_page() {
    let (server, upstream) = server(|_| Ok(sample_rover_photos(2)));

    let response = server
        .get("/api/mars-rover/Curiosity/photos")
        .add_query_param("sol", "1000")
        .add_query_param("camera", "FHAZ")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let call = &upstream.calls()[0];
    assert_eq!(call.path(), "/mars-photos/api/v1/rovers/curiosity/photos");
    assert_eq!(call.get("sol"), Some("1000"));
    assert_eq!(call.get("camera"), Some("fhaz"));
    assert_eq!(call.get("page"), Some("1"));
}

#[tokio::test]
async fn rover_photos_rejects_unknown_rover_listing_options() {
    let (server, upstream) = server(no_upstream);

    let response = server
        .get("/api/mars-rover/sojourner/photos")
        .add_query_param("sol", "1")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        failure_message(&response),
        "Invalid rover. Valid options: curiosity, opportunity, spirit, perseverance, ingenuity"
    );
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn rover_photos_selector_rules() {
    let (server, upstream) = server(no_upstream);

    let response = server.get("/api/mars-rover/spirit/photos").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        failure_message(&response),
        "Either sol or earth_date parameter is required"
    );

    let response = server
        .get("/api/mars-rover/spirit/photos")
        .add_query_param("sol", "10")
        .add_query_param("earth_date", "2004-01-10")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        failure_message(&response),
        "Use either sol or earth_date, not both"
    );

    let response = server
        .get("/api/mars-rover/spirit/photos")
        .add_query_param("sol", "10")
        .add_query_param("page", "zero")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn rover_manifest_and_cameras() {
    let (server, _) = server(rover_responder);

    let response = server.get("/api/mars-rover/curiosity/manifest").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let data = success_data(&response);
    assert_eq!(data["rover"]["max_sol"], 4000);
    assert_eq!(data["rover"]["total_photos"], 695_000);

    let response = server.get("/api/mars-rover/curiosity/cameras").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let data = success_data(&response);
    assert_eq!(data["rover"], "Curiosity");
    assert_eq!(data["cameras"].as_array().unwrap().len(), 2);
    assert_eq!(data["cameras"][0]["name"], "FHAZ");
}

#[tokio::test]
async fn rover_latest_isolates_failures() {
    let (server, upstream) = server(rover_responder);

    let response = server.get("/api/mars-rover/latest").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let data = success_data(&response);

    assert_eq!(data["curiosity"]["photos"].as_array().unwrap().len(), 5);
    assert_eq!(data["curiosity"]["rover"]["name"], "Curiosity");
    assert_eq!(
        data["perseverance"]["error"],
        "Failed to fetch latest photos for perseverance"
    );
    assert_eq!(data["spirit"]["error"], "Failed to fetch latest photos for spirit");
    assert!(data.get("opportunity").is_none());

    let photo_call = upstream
        .calls()
        .into_iter()
        .find(|c| c.path() == "/mars-photos/api/v1/rovers/curiosity/photos")
        .unwrap();
    assert_eq!(photo_call.get("sol"), Some("4000"));
    assert_eq!(photo_call.get("page"), Some("1"));
}
