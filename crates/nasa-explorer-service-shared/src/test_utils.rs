//! Test utilities for handler testing.
//!
//! Builds an [`AppState`] over a [`ScriptedUpstream`] so handlers run
//! against canned NASA payloads, and records every upstream call for
//! assertions.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use nasa_explorer_lib::testing::ScriptedUpstream;
use nasa_explorer_lib::{
    Error, NasaConfig, NasaService, ResponseCache, Result, UpstreamRequest,
};

use crate::state::AppState;

/// Access key used by test state.
pub const TEST_API_KEY: &str = "TEST_KEY";

/// Base URL used by test state; nothing listens there.
pub const TEST_BASE_URL: &str = "https://api.nasa.test";

pub fn test_config() -> NasaConfig {
    NasaConfig::default()
        .with_base_url(TEST_BASE_URL)
        .with_api_key(TEST_API_KEY)
        .with_cache_ttl(Duration::from_secs(3600))
}

/// State whose upstream answers through `responder`.
///
/// The returned handle exposes the recorded calls.
pub fn scripted_state<F>(responder: F) -> (AppState, Arc<ScriptedUpstream>)
where
    F: Fn(&UpstreamRequest) -> Result<Value> + Send + Sync + 'static,
{
    let config = test_config();
    let upstream = Arc::new(ScriptedUpstream::new(responder));
    let cache = Arc::new(ResponseCache::new(config.cache_ttl));
    let service = NasaService::new(upstream.clone(), cache, &config);
    (AppState::from_service(service), upstream)
}

/// A non-2xx upstream answer.
pub fn upstream_error(status: u16, message: &str) -> Error {
    Error::Upstream {
        status,
        message: message.to_string(),
    }
}

/// No response at all.
pub fn upstream_down(endpoint: &str) -> Error {
    Error::UpstreamUnavailable {
        endpoint: endpoint.to_string(),
        reason: "connection refused".to_string(),
    }
}

pub fn sample_apod(date: &str) -> Value {
    json!({
        "date": date,
        "title": format!("Picture for {}", date),
        "media_type": "image",
        "url": format!("https://apod.nasa.gov/apod/image/{}.jpg", date),
        "explanation": "A test picture."
    })
}

pub fn sample_manifest(name: &str, max_sol: u32) -> Value {
    json!({
        "rover": {
            "id": 5,
            "name": name,
            "landing_date": "2012-08-06",
            "launch_date": "2011-11-26",
            "status": "active",
            "max_sol": max_sol,
            "max_date": "2024-01-01",
            "total_photos": 695_000,
            "cameras": [
                {"name": "FHAZ", "full_name": "Front Hazard Avoidance Camera"},
                {"name": "NAVCAM", "full_name": "Navigation Camera"}
            ]
        }
    })
}

pub fn sample_rover_photos(count: usize) -> Value {
    let photos: Vec<Value> = (0..count)
        .map(|i| json!({"id": i, "img_src": format!("https://mars.nasa.gov/{}.jpg", i)}))
        .collect();
    json!({ "photos": photos })
}

/// Image library search body with `count` items and the given total.
pub fn sample_search(topic: &str, count: usize, total_hits: u64) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "href": format!("https://images-api.nasa.gov/asset/{}-{}", topic, i),
                "data": [{"title": format!("{} {}", topic, i), "nasa_id": format!("{}-{}", topic, i)}]
            })
        })
        .collect();
    json!({
        "collection": {
            "items": items,
            "metadata": {"total_hits": total_hits}
        }
    })
}

pub fn sample_epic_images(date: &str) -> Value {
    json!([
        {
            "image": "epic_1b_1",
            "date": format!("{} 00:31:45", date),
            "centroid_coordinates": {"lat": 10.0, "lon": -20.0},
            "dscovr_j2000_position": {"x": 1.0, "y": 2.0, "z": 3.0}
        },
        {
            "image": "epic_1b_2",
            "date": format!("{} 13:05:12", date),
            "centroid_coordinates": {"lat": 11.0, "lon": -120.0},
            "dscovr_j2000_position": {"x": 4.0, "y": 5.0, "z": 6.0}
        }
    ])
}

/// Three objects with hand-checkable statistics:
/// - average diameter 0.4 km (midpoints 0.15, 0.35, 0.7)
/// - largest 1.0 km, smallest 0.1 km
/// - average miss distance 2001 km (1000.0 and 3001.0; the third has no
///   close approach)
pub fn sample_neo_browse() -> Value {
    json!({
        "page": {"size": 3, "total_elements": 34_000, "total_pages": 11_334, "number": 0},
        "near_earth_objects": [
            {
                "id": "1", "name": "A", "is_potentially_hazardous_asteroid": true,
                "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.1, "estimated_diameter_max": 0.2}},
                "close_approach_data": [{"miss_distance": {"kilometers": "1000.0"}}]
            },
            {
                "id": "2", "name": "B", "is_potentially_hazardous_asteroid": false,
                "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.3, "estimated_diameter_max": 0.4}},
                "close_approach_data": [{"miss_distance": {"kilometers": "3001.0"}}]
            },
            {
                "id": "3", "name": "C", "is_potentially_hazardous_asteroid": true,
                "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.4, "estimated_diameter_max": 1.0}},
                "close_approach_data": []
            }
        ]
    })
}
