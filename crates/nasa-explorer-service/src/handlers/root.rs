//! Service descriptor and the catch-all 404.

use axum::Json;
use serde::Serialize;

use nasa_explorer_service_shared::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub apod: &'static str,
    pub mars_rover: &'static str,
    pub neo: &'static str,
    pub image_library: &'static str,
    pub epic: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

pub async fn index() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: "NASA Data Explorer API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            apod: "/api/apod",
            mars_rover: "/api/mars-rover",
            neo: "/api/neo",
            image_library: "/api/image-library",
            epic: "/api/epic",
        },
    })
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
