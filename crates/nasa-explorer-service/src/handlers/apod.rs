//! Astronomy Picture of the Day.

use axum::{extract::State, routing::get, Router};
use serde_json::Value;

use nasa_explorer_service_shared::{
    ApodParams, ApodRandomParams, ApodRangeParams, AppState, Envelope, ValidQuery,
};

use super::ApiResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(picture))
        .route("/random", get(random))
        .route("/range", get(range))
}

/// `GET /api/apod`: today, one date, a random count, or a range.
async fn picture(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ApodParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().apod(&query).await?))
}

/// `GET /api/apod/random?count=` (default 5, at most 10)
async fn random(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ApodRandomParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().apod(&query).await?))
}

async fn range(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ApodRangeParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().apod(&query).await?))
}
