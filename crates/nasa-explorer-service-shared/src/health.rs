//! Liveness endpoint with uptime and cache counters.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use nasa_explorer_lib::CacheStats;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"OK"` while the process is serving.
    pub status: String,

    /// RFC 3339 time the probe was answered.
    pub timestamp: String,

    /// Seconds since the service state was created.
    pub uptime: f64,

    pub service: String,
    pub version: String,
    pub cache: CacheStats,
}

impl HealthStatus {
    pub fn ok(uptime: f64, cache: CacheStats) -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache,
        }
    }
}

/// `GET /health`
///
/// ```text
/// {"status":"OK","timestamp":"2025-01-01T00:00:00.000Z","uptime":12.5,
///  "service":"nasa-explorer-service-shared","version":"0.1.0",
///  "cache":{"hits":3,"misses":5,"keys":5}}
/// ```
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::ok(
        state.uptime().as_secs_f64(),
        state.service().cache_stats(),
    ))
}
