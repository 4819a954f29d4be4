//! Application state shared by every axum handler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use nasa_explorer_lib::{Error as LibError, NasaConfig, NasaService};

/// Error during application state initialization.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("failed to build NASA client: {0}")]
    Client(#[from] LibError),
}

/// Shared state: the cached NASA service plus process start time.
///
/// Cheap to clone (`Arc` inside); share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{extract::State, routing::get, Router};
/// use nasa_explorer_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let stats = state.service().cache_stats();
/// }
///
/// let state = AppState::from_config(&NasaConfig::from_env())?;
/// let app = Router::new().route("/api/apod", get(handler)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: NasaService,
    started_at: Instant,
}

impl AppState {
    /// Production wiring from upstream configuration.
    pub fn from_config(config: &NasaConfig) -> Result<Self, AppStateError> {
        tracing::info!(
            base_url = %config.base_url,
            demo_key = config.uses_demo_key(),
            cache_ttl_secs = config.cache_ttl.as_secs(),
            "initialising NASA service"
        );
        Ok(Self::from_service(NasaService::from_config(config)?))
    }

    /// Wrap an already-assembled service (tests inject scripted upstreams
    /// this way).
    pub fn from_service(service: NasaService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                service,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn service(&self) -> &NasaService {
        &self.inner.service
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.inner.service)
            .field("uptime", &self.uptime())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_with_defaults() {
        let state = AppState::from_config(&NasaConfig::default()).unwrap();
        assert_eq!(state.service().cache_stats().keys, 0);
    }

    #[test]
    fn clones_share_the_service_cache() {
        let state = AppState::from_config(&NasaConfig::default()).unwrap();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.inner, &clone.inner));
    }

    #[test]
    fn debug_never_shows_the_key() {
        let config = NasaConfig::default().with_api_key("SECRET-KEY-123");
        let state = AppState::from_config(&config).unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("AppState"));
        assert!(!debug.contains("SECRET-KEY-123"));
    }
}
