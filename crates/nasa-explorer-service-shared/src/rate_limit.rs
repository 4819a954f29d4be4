//! Per-client sliding-window rate limiting.
//!
//! Each client key (the caller's socket IP, or the first proxy-header hop
//! when `trust_proxy_headers` is set) keeps the timestamps of its accepted
//! requests inside the current window. A request is rejected when
//! the window already holds `max_requests` entries; the rejection carries the
//! time until the oldest entry ages out.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use nasa_explorer_lib::{Clock, SystemClock};

use crate::ApiError;

pub const DEFAULT_WINDOW_MS: u64 = 15 * 60 * 1000;
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Window length and per-client budget. `max_requests == 0` disables
/// limiting.
///
/// `X-Forwarded-For` and `X-Real-IP` are client-controlled, so they only
/// select the client key when `trust_proxy_headers` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    pub trust_proxy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
            max_requests: DEFAULT_MAX_REQUESTS,
            trust_proxy_headers: false,
        }
    }
}

/// Sliding-window counter keyed by client.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    hits: DashMap<String, VecDeque<std::time::Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            hits: DashMap::new(),
            clock,
        }
    }

    /// Record a request for `key`.
    ///
    /// Returns `Err(retry_after)` without recording anything when the
    /// window is full.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        if self.config.max_requests == 0 {
            return Ok(());
        }

        let now = self.clock.now();
        let window = self.config.window;
        let mut entry = self.hits.entry(key.to_string()).or_default();

        while entry
            .front()
            .is_some_and(|first| now.duration_since(*first) >= window)
        {
            entry.pop_front();
        }

        if entry.len() >= self.config.max_requests as usize {
            let oldest = entry.front().copied().unwrap_or(now);
            return Err(window.saturating_sub(now.duration_since(oldest)));
        }

        entry.push_back(now);
        Ok(())
    }

    /// Drop clients whose whole window has aged out. Returns how many were
    /// removed.
    pub fn purge_idle(&self) -> usize {
        let now = self.clock.now();
        let window = self.config.window;
        let before = self.hits.len();
        self.hits.retain(|_, stamps| {
            stamps
                .back()
                .is_some_and(|last| now.duration_since(*last) < window)
        });
        before - self.hits.len()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}

/// Cloneable handle used as middleware state.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    limiter: Arc<RateLimiter>,
}

impl RateLimitState {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter: Arc::new(limiter),
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

/// Client IP for rate limiting.
///
/// The socket address from [`ConnectInfo`] is authoritative. Proxy headers
/// are consulted first only when `trust_proxy` is set.
fn extract_client_ip(request: &Request, trust_proxy: bool) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok())
    };
    let socket_ip = || {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    if trust_proxy {
        header_ip("x-forwarded-for")
            .or_else(|| header_ip("x-real-ip"))
            .or_else(socket_ip)
    } else {
        socket_ip()
    }
}

/// Rate limiting middleware.
///
/// Use with [`axum::middleware::from_fn_with_state`]. Rejected requests get
/// 429 with the failure envelope and a `Retry-After` header.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let key = extract_client_ip(&request, state.limiter.config.trust_proxy_headers)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match state.limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(client = %key, "rate limit exceeded");
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            ApiError::too_many_requests(secs).into_response()
        }
    }
}
