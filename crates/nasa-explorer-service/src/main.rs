//! NASA Data Explorer API server.
//!
//! # Configuration
//!
//! - `PORT` - HTTP port (default: 3001)
//! - `NASA_API_KEY` - access key (default: `DEMO_KEY`)
//! - `NASA_API_BASE_URL`, `NASA_API_TIMEOUT_SECS`, `CACHE_TTL`
//! - `RATE_LIMIT_WINDOW_MS`, `RATE_LIMIT_MAX_REQUESTS`
//! - `METRICS_ENABLED`, `METRICS_PATH`
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//!
//! A `.env` file in the working directory is loaded first when present.

use std::net::SocketAddr;

use tracing::{error, info, warn};

use nasa_explorer_service::{build_router, purge_interval, spawn_purge_task};
use nasa_explorer_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, RateLimitState, RateLimiter,
    ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    let logging_config = LoggingConfig::from_env().with_service("nasa-explorer");
    init_logging(&logging_config)?;

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = ServiceConfig::from_env();

    if let Err(e) = init_metrics(&config.metrics) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let state = AppState::from_config(&config.nasa).map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;
    let rate_limit = RateLimitState::new(RateLimiter::new(config.rate_limit));

    spawn_purge_task(
        state.clone(),
        rate_limit.clone(),
        purge_interval(config.nasa.cache_ttl),
    );

    let app = build_router(state, rate_limit, &config);

    let addr = config.bind_addr();
    info!(addr = %addr, "NASA Data Explorer API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
