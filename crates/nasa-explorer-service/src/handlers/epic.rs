//! EPIC full-disc Earth imagery.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use nasa_explorer_lib::epic::{day_metadata, latest_available_date, with_image_urls};
use nasa_explorer_lib::{EpicDayMetadata, EpicVariant, NasaService};
use nasa_explorer_service_shared::{
    parse_date, ApiError, AppState, Envelope, EpicParams, EpicTypeParams, ValidQuery,
    DATE_FORMAT, INTERNAL_MESSAGE,
};

use super::ApiResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(images))
        .route("/available", get(available))
        .route("/latest", get(latest))
        .route("/metadata/{date}", get(metadata))
}

fn add_image_urls(service: &NasaService, variant: EpicVariant, body: Value) -> Value {
    with_image_urls(body, |date, image| {
        service.epic_image_url(variant, date, image)
    })
}

/// `GET /api/epic?date=&type=`: one day's images, or the date listing
/// when no date is given.
async fn images(
    State(state): State<AppState>,
    ValidQuery((date, variant)): ValidQuery<EpicParams>,
) -> ApiResult<Value> {
    let service = state.service();
    let body = service.epic_images(date, variant).await?;
    Ok(Envelope::ok(add_image_urls(service, variant, body)))
}

async fn available(
    State(state): State<AppState>,
    ValidQuery(variant): ValidQuery<EpicTypeParams>,
) -> ApiResult<Value> {
    Ok(Envelope::ok(state.service().epic_images(None, variant).await?))
}

#[derive(Debug, Serialize)]
struct LatestImages {
    date: String,
    #[serde(rename = "type")]
    variant: EpicVariant,
    images: Value,
}

/// `GET /api/epic/latest`: images for the last date in the listing.
async fn latest(
    State(state): State<AppState>,
    ValidQuery(variant): ValidQuery<EpicTypeParams>,
) -> ApiResult<LatestImages> {
    let service = state.service();
    let listing = service.epic_images(None, variant).await?;
    let date = latest_available_date(&listing)
        .ok_or_else(|| ApiError::not_found("No EPIC images available"))?;

    let day = date.get(..10).unwrap_or(date.as_str());
    let day = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
        warn!(date = %date, error = %e, "unparseable date in EPIC listing");
        ApiError::internal(INTERNAL_MESSAGE)
    })?;

    let body = service.epic_images(Some(day), variant).await?;
    Ok(Envelope::ok(LatestImages {
        date,
        variant,
        images: add_image_urls(service, variant, body),
    }))
}

/// `GET /api/epic/metadata/{date}`
async fn metadata(
    State(state): State<AppState>,
    Path(date): Path<String>,
    ValidQuery(variant): ValidQuery<EpicTypeParams>,
) -> ApiResult<EpicDayMetadata> {
    let day = parse_date(&date, DATE_FORMAT)?;
    let body = state.service().epic_images(Some(day), variant).await?;
    day_metadata(&date, variant, &body)
        .map(Envelope::ok)
        .ok_or_else(|| ApiError::not_found(format!("No EPIC images found for date {}", date)))
}
