//! Near-Earth objects: feed, lookup, browse and derived statistics.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use nasa_explorer_lib::neo::{summarize, NeoBrowsePage, STATS_SAMPLE_SIZE};
use nasa_explorer_lib::NeoStatistics;
use nasa_explorer_service_shared::{
    parse_asteroid_id, ApiError, AppState, Envelope, NeoBrowseParams, NeoFeedParams, ValidQuery,
};

use super::ApiResult;

const STATS_UNAVAILABLE: &str = "Failed to fetch NEO data for statistics";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(browse))
        .route("/feed", get(feed))
        .route("/today/feed", get(today))
        .route("/stats/summary", get(stats))
        .route("/{asteroid_id}", get(lookup))
}

/// `GET /api/neo/feed?start_date=&end_date=` (span of at most 7 days)
async fn feed(
    State(state): State<AppState>,
    ValidQuery((start, end)): ValidQuery<NeoFeedParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().neo_feed(start, end).await?))
}

async fn today(State(state): State<AppState>) -> ApiResult<Value> {
    let today = Utc::now().date_naive();
    Ok(Envelope::ok(state.service().neo_feed(today, today).await?))
}

async fn lookup(
    State(state): State<AppState>,
    Path(asteroid_id): Path<String>,
) -> ApiResult<Value> {
    let asteroid_id = parse_asteroid_id(&asteroid_id)?;
    Ok(Envelope::ok(state.service().neo_lookup(asteroid_id).await?))
}

async fn browse(
    State(state): State<AppState>,
    ValidQuery((page, size)): ValidQuery<NeoBrowseParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().neo_browse(page, size).await?))
}

/// `GET /api/neo/stats/summary`
///
/// Summarizes the first browse page of [`STATS_SAMPLE_SIZE`] objects;
/// `total_count` is the catalogue size reported by that page.
async fn stats(State(state): State<AppState>) -> ApiResult<NeoStatistics> {
    let body = state.service().neo_browse(0, STATS_SAMPLE_SIZE).await?;

    let page: NeoBrowsePage = serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, "browse page did not match the expected shape");
        ApiError::internal(STATS_UNAVAILABLE)
    })?;
    let Some(neos) = page.near_earth_objects else {
        return Err(ApiError::internal(STATS_UNAVAILABLE));
    };

    let total = page
        .page
        .map(|info| info.total_elements)
        .unwrap_or(neos.len() as u64);
    Ok(Envelope::ok(summarize(total, &neos)))
}
