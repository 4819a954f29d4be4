//! NASA Data Explorer HTTP service.
//!
//! Exposes a small read-only JSON API over the public NASA APIs. Every
//! route under `/api` answers with the `{success, data | error}` envelope.
//!
//! # Endpoints
//!
//! - `GET /` - service descriptor
//! - `GET /health` - liveness, uptime and cache counters
//! - `GET /metrics` - Prometheus metrics (when enabled)
//! - `GET /api/apod`, `/api/apod/random`, `/api/apod/range`
//! - `GET /api/mars-rover/{rover}/photos`, `/{rover}/manifest`,
//!   `/{rover}/cameras`, `/latest`
//! - `GET /api/neo`, `/api/neo/feed`, `/api/neo/today/feed`,
//!   `/api/neo/stats/summary`, `/api/neo/{asteroid_id}`
//! - `GET /api/image-library/search`, `/popular`, `/featured`, `/random`
//! - `GET /api/epic`, `/api/epic/available`, `/api/epic/latest`,
//!   `/api/epic/metadata/{date}`

pub mod handlers;

use std::any::Any;
use std::time::Duration;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error};

use nasa_explorer_service_shared::{
    cors_layer, health, metrics_handler, rate_limit_middleware, record_cache_entries,
    security_headers, ApiError, AppState, MetricsLayer, RateLimitState, ServiceConfig,
    INTERNAL_MESSAGE,
};

use handlers::{apod, epic, image_library, mars_rover, neo, root};

/// Assemble the full application router.
///
/// The rate limiter guards `/api` only; security headers, CORS, panic
/// recovery and request metrics wrap everything, including the 404
/// fallback.
pub fn build_router(state: AppState, rate_limit: RateLimitState, config: &ServiceConfig) -> Router {
    let api = Router::new()
        .nest("/apod", apod::routes())
        .nest("/mars-rover", mars_rover::routes())
        .nest("/neo", neo::routes())
        .nest("/image-library", image_library::routes())
        .nest("/epic", epic::routes())
        .layer(from_fn_with_state(rate_limit, rate_limit_middleware));

    let mut router = Router::new()
        .route("/", get(root::index))
        .route("/health", get(health));
    if config.metrics.enabled {
        router = router.route(&config.metrics.path, get(metrics_handler));
    }

    router
        .nest("/api", api)
        .fallback(root::not_found)
        .layer(from_fn(security_headers))
        .layer(cors_layer())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(MetricsLayer)
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    error!(panic = detail, "handler panicked");
    ApiError::internal(INTERNAL_MESSAGE).into_response()
}

/// Sweep cadence for expired cache entries: a quarter of the TTL, never
/// below one second.
pub fn purge_interval(ttl: Duration) -> Duration {
    (ttl / 4).max(Duration::from_secs(1))
}

/// Periodically drop expired cache entries and idle rate-limit buckets.
pub fn spawn_purge_task(state: AppState, rate_limit: RateLimitState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = state.service().purge_expired();
            let idle = rate_limit.limiter().purge_idle();
            record_cache_entries(state.service().cache_stats().keys);
            debug!(expired, idle, "purge sweep finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_interval_is_quarter_ttl_with_floor() {
        assert_eq!(purge_interval(Duration::from_secs(3600)), Duration::from_secs(900));
        assert_eq!(purge_interval(Duration::from_secs(2)), Duration::from_secs(1));
        assert_eq!(purge_interval(Duration::ZERO), Duration::from_secs(1));
    }

    #[test]
    fn panic_becomes_failure_envelope() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
