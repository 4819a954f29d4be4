//! Shared infrastructure for the NASA Data Explorer HTTP service.
//!
//! This crate holds the HTTP glue that sits between axum and
//! `nasa-explorer-lib`:
//!
//! - [`AppState`]: the cached [`NasaService`](nasa_explorer_lib::NasaService) plus process uptime
//! - [`Envelope`]: the `{success, data, error}` body every API route returns
//! - [`ApiError`]: failure envelope with an HTTP status, built from library errors
//! - Query parameter types with validation for each route, and the
//!   [`ValidQuery`] / [`PathParam`] extractors that apply it
//! - [`settle_all`]: concurrent fan-out with per-key failure capture
//! - [`middleware`]: request tracking, metrics, security headers, CORS
//! - [`rate_limit`]: per-client sliding-window limiter
//! - [`metrics`] and [`logging`] setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse raw query parameters                               │
//! │  - Validate into typed arguments (400 on failure)           │
//! │  - Call NasaService (once, or fanned out per sub-key)       │
//! │  - Wrap the result in an Envelope                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds an [`AppState`] over a scripted upstream
//! and ships sample NASA payloads. Enable the `test-utils` feature to access
//! it from dependent crates.

pub mod config;
mod error;
mod extract;
mod fanout;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod rate_limit;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use error::{from_lib_error, ApiError, INTERNAL_MESSAGE, UNAVAILABLE_MESSAGE};
pub use extract::{PathParam, ValidQuery};
pub use fanout::settle_all;
pub use health::{health, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_cache_entries, record_fanout_subcall,
    record_request_rejected, record_upstream_failure, MetricsConfig, MetricsError,
};
pub use middleware::{
    cors_layer, extract_or_generate_request_id, security_headers, MetricsLayer, RequestId,
    UNMATCHED_ROUTE,
};
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimitState, RateLimiter};
pub use request::{
    parse_asteroid_id, parse_date, ApodParams, ApodRandomParams, ApodRangeParams, EpicParams,
    EpicTypeParams, ImageRandomParams, ImageSearchParams, ImageSearch, NeoBrowseParams,
    NeoFeedParams, RoverPhotoParams, RoverPhotos, Validate, DATE_FORMAT, MAX_NEO_FEED_DAYS,
};
pub use response::Envelope;
pub use state::{AppState, AppStateError};
