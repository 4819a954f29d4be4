//! Mars rover photos, manifests and cameras.

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use serde_json::{json, Map, Value};

use nasa_explorer_lib::{
    rover::RoverCamera, NasaService, PhotoSelector, Rover, RoverInfo, RoverManifest,
};
use nasa_explorer_service_shared::{
    settle_all, AppState, Envelope, PathParam, RoverPhotoParams, RoverPhotos, ValidQuery,
};

use super::ApiResult;

/// Photos kept per rover in the latest-photos aggregate.
const LATEST_PHOTO_LIMIT: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/latest", get(latest))
        .route("/{rover}/photos", get(photos))
        .route("/{rover}/manifest", get(manifest))
        .route("/{rover}/cameras", get(cameras))
}

async fn photos(
    State(state): State<AppState>,
    PathParam(rover): PathParam<Rover>,
    ValidQuery(query): ValidQuery<RoverPhotoParams>,
) -> ApiResult<Value> {
    let RoverPhotos {
        selector,
        camera,
        page,
    } = query;
    let body = state
        .service()
        .rover_photos(rover, selector, camera.as_deref(), page)
        .await?;
    Ok(Envelope::ok(body))
}

async fn manifest(
    State(state): State<AppState>,
    PathParam(rover): PathParam<Rover>,
) -> ApiResult<RoverManifest> {
    Ok(Envelope::ok(state.service().rover_manifest(rover).await?))
}

#[derive(Debug, Serialize)]
struct Cameras {
    rover: String,
    cameras: Vec<RoverCamera>,
}

async fn cameras(
    State(state): State<AppState>,
    PathParam(rover): PathParam<Rover>,
) -> ApiResult<Cameras> {
    let RoverInfo { name, cameras, .. } = state.service().rover_manifest(rover).await?.rover;
    Ok(Envelope::ok(Cameras {
        rover: name,
        cameras,
    }))
}

/// `GET /api/mars-rover/latest`
///
/// Keyed by rover name. Rovers without photos on their last sol are left
/// out; a rover whose calls fail gets an `error` entry instead.
async fn latest(State(state): State<AppState>) -> ApiResult<Map<String, Value>> {
    let service = state.service();
    let settled = settle_all("rover_latest", Rover::LATEST_SCAN, |rover| {
        latest_for(service, rover)
    })
    .await;

    let mut latest = Map::new();
    for (rover, outcome) in settled {
        match outcome {
            Ok(Some(entry)) => {
                latest.insert(rover.to_string(), entry);
            }
            Ok(None) => {}
            Err(_) => {
                latest.insert(
                    rover.to_string(),
                    json!({ "error": format!("Failed to fetch latest photos for {}", rover) }),
                );
            }
        }
    }
    Ok(Envelope::ok(latest))
}

/// Manifest, then page 1 of photos from `max_sol`.
async fn latest_for(
    service: &NasaService,
    rover: Rover,
) -> nasa_explorer_lib::Result<Option<Value>> {
    let manifest = service.rover_manifest(rover).await?;
    let body = service
        .rover_photos(rover, PhotoSelector::Sol(manifest.rover.max_sol), None, 1)
        .await?;

    let photos: Vec<Value> = body
        .get("photos")
        .and_then(Value::as_array)
        .map(|photos| photos.iter().take(LATEST_PHOTO_LIMIT).cloned().collect())
        .unwrap_or_default();
    if photos.is_empty() {
        return Ok(None);
    }

    Ok(Some(json!({ "rover": manifest.rover, "photos": photos })))
}
