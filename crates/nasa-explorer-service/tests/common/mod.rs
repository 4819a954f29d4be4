//! Router-level test harness over a scripted upstream.
#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use serde_json::Value;

use nasa_explorer_lib::testing::ScriptedUpstream;
use nasa_explorer_lib::{Result, UpstreamRequest};
use nasa_explorer_service::build_router;
use nasa_explorer_service_shared::rate_limit::RateLimitConfig;
use nasa_explorer_service_shared::test_utils::scripted_state;
use nasa_explorer_service_shared::{RateLimitState, RateLimiter, ServiceConfig};

pub use nasa_explorer_service_shared::test_utils::*;

/// Full router over `responder` with the default rate limit.
pub fn server<F>(responder: F) -> (TestServer, Arc<ScriptedUpstream>)
where
    F: Fn(&UpstreamRequest) -> Result<Value> + Send + Sync + 'static,
{
    server_with_rate_limit(responder, RateLimitConfig::default())
}

pub fn server_with_rate_limit<F>(
    responder: F,
    rate_limit: RateLimitConfig,
) -> (TestServer, Arc<ScriptedUpstream>)
where
    F: Fn(&UpstreamRequest) -> Result<Value> + Send + Sync + 'static,
{
    let (state, upstream) = scripted_state(responder);
    let limiter = RateLimitState::new(RateLimiter::new(rate_limit));
    let app = build_router(state, limiter, &ServiceConfig::default());
    (TestServer::new(app).unwrap(), upstream)
}

/// Upstream that is always down; pair with `call_count() == 0` to prove a
/// request was rejected before reaching it.
pub fn no_upstream(request: &UpstreamRequest) -> Result<Value> {
    Err(upstream_down(request.path()))
}

pub fn header(name: &'static str, value: &'static str) -> (HeaderName, HeaderValue) {
    (HeaderName::from_static(name), HeaderValue::from_static(value))
}

pub fn header_str<'a>(response: &'a TestResponse, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// `error` text of a failure envelope, asserting `success:false` and no
/// `data` key.
pub fn failure_message(response: &TestResponse) -> String {
    let body: Value = response.json();
    assert_eq!(body["success"], false, "expected failure envelope: {body}");
    assert!(body.get("data").is_none());
    body["error"].as_str().unwrap_or_default().to_string()
}

/// `data` of a success envelope.
pub fn success_data(response: &TestResponse) -> Value {
    let body: Value = response.json();
    assert_eq!(body["success"], true, "expected success envelope: {body}");
    assert!(body.get("error").is_none());
    body["data"].clone()
}
