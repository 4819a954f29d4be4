//! Outbound calls to the NASA API.
//!
//! [`UpstreamRequest`] describes one GET call (endpoint path plus query
//! parameters). [`Upstream`] is the seam the domain service talks to; the
//! production implementation is [`HttpUpstream`], which injects the access
//! key, applies the request deadline, and folds transport failures into the
//! library [`Error`] taxonomy.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::NasaConfig;
use crate::error::{Error, Result};

/// Query parameter carrying the access key.
pub const API_KEY_PARAM: &str = "api_key";

/// One parameterized GET against the upstream.
///
/// Parameters are held in a sorted map so that two logically identical
/// requests produce the same [`fingerprint`](Self::fingerprint) regardless of
/// the order they were built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    path: String,
    params: BTreeMap<String, String>,
}

impl UpstreamRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter. The access key cannot be set this way.
    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        if key != API_KEY_PARAM {
            self.params.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Add a query parameter only when a value is present.
    pub fn param_opt<T: fmt::Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Look up a single parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deterministic cache key: the path followed by every parameter in key
    /// order, each key and value JSON-quoted so separators inside values
    /// cannot collide with the framing.
    pub fn fingerprint(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", Value::from(k.as_str()), Value::from(v.as_str())))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, params)
    }
}

/// A source of upstream JSON bodies.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue the GET described by `request` and decode the JSON body.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value>;
}

/// reqwest-backed upstream client.
pub struct HttpUpstream {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpUpstream {
    /// Build a client with the configured base URL, key, and deadline.
    pub fn new(config: &NasaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> Error {
        // without_url() keeps the access key out of the message
        let err = err.without_url();
        if err.is_timeout() {
            Error::UpstreamTimeout {
                endpoint: endpoint.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::UpstreamUnavailable {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl fmt::Debug for HttpUpstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpUpstream")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value> {
        let endpoint = request.path();
        let url = format!("{}{}", self.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(request.params().len() + 1);
        query.push((API_KEY_PARAM, self.api_key.as_str()));
        query.extend(request.params().iter().map(|(k, v)| (k.as_str(), v.as_str())));

        debug!(endpoint = %endpoint, params = request.params().len(), "calling NASA API");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            warn!(endpoint = %endpoint, status = status.as_u16(), message = %message, "NASA API returned an error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(endpoint, e)
            } else {
                Error::Decode {
                    endpoint: endpoint.to_string(),
                    message: e.without_url().to_string(),
                }
            }
        })
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// api.nasa.gov uses `{"error":{"message":...}}`; APOD uses `{"msg":...}`;
/// some gateways answer with `{"error":"..."}`.
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("msg").and_then(Value::as_str))
        .or_else(|| value.get("error").and_then(Value::as_str))
        .map(str::to_string)
}

fn user_agent() -> String {
    format!("nasa-explorer-lib/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> HttpUpstream {
        let config = NasaConfig::default()
            .with_base_url(server.uri())
            .with_api_key("test-key")
            .with_timeout(timeout);
        HttpUpstream::new(&config).expect("client builds")
    }

    #[test]
    fn fingerprint_ignores_construction_order() {
        let a = UpstreamRequest::new("/neo/rest/v1/feed")
            .param("start_date", "2024-01-01")
            .param("end_date", "2024-01-03");
        let b = UpstreamRequest::new("/neo/rest/v1/feed")
            .param("end_date", "2024-01-03")
            .param("start_date", "2024-01-01");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_values_and_paths() {
        let a = UpstreamRequest::new("/planetary/apod").param("date", "2023-01-01");
        let b = UpstreamRequest::new("/planetary/apod").param("date", "2023-01-02");
        let c = UpstreamRequest::new("/other").param("date", "2023-01-01");
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn fingerprint_is_not_fooled_by_separators() {
        let a = UpstreamRequest::new("/search").param("q", "a&media_type=b");
        let b = UpstreamRequest::new("/search")
            .param("q", "a")
            .param("media_type", "b");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn api_key_cannot_be_supplied_as_param() {
        let req = UpstreamRequest::new("/planetary/apod").param(API_KEY_PARAM, "stolen");
        assert!(req.get(API_KEY_PARAM).is_none());
        assert!(req.params().is_empty());
    }

    #[test]
    fn param_opt_skips_none() {
        let req = UpstreamRequest::new("/x")
            .param_opt("camera", None::<&str>)
            .param_opt("page", Some(2));
        assert_eq!(req.get("page"), Some("2"));
        assert!(req.get("camera").is_none());
    }

    #[test]
    fn upstream_message_shapes() {
        assert_eq!(
            upstream_message(r#"{"error":{"code":"API_KEY_INVALID","message":"An invalid api_key was supplied"}}"#),
            Some("An invalid api_key was supplied".to_string())
        );
        assert_eq!(
            upstream_message(r#"{"code":400,"msg":"Date must be between Jun 16, 1995 and today."}"#),
            Some("Date must be between Jun 16, 1995 and today.".to_string())
        );
        assert_eq!(upstream_message("<html>bad gateway</html>"), None);
    }

    #[tokio::test]
    async fn fetch_injects_key_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/planetary/apod"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("date", "2023-01-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Galaxy"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let req = UpstreamRequest::new("/planetary/apod").param("date", "2023-01-01");
        let body = client.fetch(&req).await.expect("fetch succeeds");
        assert_eq!(body["title"], "Galaxy");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/neo/rest/v1/neo/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "NOT_FOUND", "message": "Asteroid not found"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .fetch(&UpstreamRequest::new("/neo/rest/v1/neo/404"))
            .await
            .unwrap_err();
        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Asteroid not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn status_without_body_uses_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .fetch(&UpstreamRequest::new("/EPIC/api/natural/available"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "NASA API Error: 503 - Service Unavailable");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let err = client
            .fetch(&UpstreamRequest::new("/planetary/apod"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamTimeout { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable_and_hides_key() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let config = NasaConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_api_key("secret-key")
            .with_timeout(Duration::from_secs(2));
        let client = HttpUpstream::new(&config).expect("client builds");
        let err = client
            .fetch(&UpstreamRequest::new("/planetary/apod"))
            .await
            .unwrap_err();
        match &err {
            Error::UpstreamUnavailable { reason, .. } => assert!(!reason.contains("secret-key")),
            Error::UpstreamTimeout { .. } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .fetch(&UpstreamRequest::new("/search"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
