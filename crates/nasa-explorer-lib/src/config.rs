//! Upstream-side configuration.
//!
//! Values are read from the environment:
//!
//! - `NASA_API_BASE_URL`: upstream base URL (default `https://api.nasa.gov`)
//! - `NASA_API_KEY`: access key (default: the public `DEMO_KEY`)
//! - `CACHE_TTL`: response cache time-to-live in seconds (default 3600)
//! - `NASA_API_TIMEOUT_SECS`: upstream request deadline (default 10)

use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";

/// Public demo key accepted by api.nasa.gov with low rate limits.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default upstream deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const BASE_URL_ENV: &str = "NASA_API_BASE_URL";
const API_KEY_ENV: &str = "NASA_API_KEY";
const CACHE_TTL_ENV: &str = "CACHE_TTL";
const TIMEOUT_ENV: &str = "NASA_API_TIMEOUT_SECS";

/// Configuration for the upstream client and the response cache.
#[derive(Clone)]
pub struct NasaConfig {
    pub base_url: String,
    pub api_key: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEMO_API_KEY.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl NasaConfig {
    /// Create configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. Numeric values that fail to parse
    /// fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = get(BASE_URL_ENV)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = get(API_KEY_ENV).unwrap_or_else(|| DEMO_API_KEY.to_string());
        let cache_ttl = parse_secs(CACHE_TTL_ENV, get(CACHE_TTL_ENV), DEFAULT_CACHE_TTL_SECS);
        let timeout = parse_secs(TIMEOUT_ENV, get(TIMEOUT_ENV), DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            api_key,
            cache_ttl,
            timeout,
        }
    }

    /// Override the upstream base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the access key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Override the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Override the upstream deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the shared public demo key is in use.
    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }
}

// The key never appears in Debug output.
impl fmt::Debug for NasaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasaConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &if self.uses_demo_key() {
                    "DEMO_KEY"
                } else {
                    "<redacted>"
                },
            )
            .field("cache_ttl", &self.cache_ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_secs(name: &str, raw: Option<String>, default: u64) -> Duration {
    let secs = match raw {
        None => default,
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(variable = name, value = %value, default, "invalid duration, using default");
                default
            }
        },
    };
    Duration::from_secs(secs)
}
