//! HTTP-side configuration.
//!
//! # Environment Variables
//!
//! - `PORT`: listening port (default `3001`)
//! - `RATE_LIMIT_WINDOW_MS`: sliding window length (default `900000`)
//! - `RATE_LIMIT_MAX_REQUESTS`: requests per client per window (default `100`)
//! - `TRUST_PROXY_HEADERS`: key clients on `X-Forwarded-For` / `X-Real-IP`
//!   instead of the socket address (default `false`)
//! - `METRICS_ENABLED`, `METRICS_PATH` (see [`MetricsConfig`])
//! - everything [`NasaConfig`] reads (`NASA_API_BASE_URL`, `NASA_API_KEY`,
//!   `CACHE_TTL`, `NASA_API_TIMEOUT_SECS`)

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use nasa_explorer_lib::NasaConfig;

use crate::metrics::MetricsConfig;
use crate::rate_limit::{RateLimitConfig, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS};

pub const DEFAULT_PORT: u16 = 3001;

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub nasa: NasaConfig,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            nasa: NasaConfig::default(),
            port: DEFAULT_PORT,
            rate_limit: RateLimitConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unparseable numbers fall
    /// back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let window_ms = parse_or(
            "RATE_LIMIT_WINDOW_MS",
            lookup("RATE_LIMIT_WINDOW_MS"),
            DEFAULT_WINDOW_MS,
        );
        let max_requests = parse_or(
            "RATE_LIMIT_MAX_REQUESTS",
            lookup("RATE_LIMIT_MAX_REQUESTS"),
            DEFAULT_MAX_REQUESTS,
        );
        let trust_proxy_headers = lookup("TRUST_PROXY_HEADERS")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        Self {
            nasa: NasaConfig::from_lookup(&lookup),
            port,
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(window_ms),
                max_requests,
                trust_proxy_headers,
            },
            metrics: MetricsConfig::from_lookup(&lookup),
        }
    }

    /// `0.0.0.0:<port>`
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => default,
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = v, %default, "invalid value, using default");
            default
        }),
    }
}
