//! HTTP failure responses.
//!
//! Every handler error becomes an [`ApiError`]: a status code plus the
//! message placed in the failure [`Envelope`](crate::Envelope).

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use nasa_explorer_lib::Error as LibError;

use crate::metrics::{record_request_rejected, record_upstream_failure};
use crate::response::Envelope;

/// Message for failures where no upstream response was received.
pub const UNAVAILABLE_MESSAGE: &str = "NASA API is currently unavailable. Please try again later.";

/// Message for faults that must not leak details.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Message returned with 429 responses.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// A failed request: status plus the envelope's `error` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Seconds for the `Retry-After` header, set on 429 responses.
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    /// 400: caller input is missing, malformed, or out of range.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404: well-formed request with a legitimately empty result.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 429 with a `Retry-After` hint (at least one second).
    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self {
            retry_after: Some(retry_after_secs.max(1)),
            ..Self::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE)
        }
    }

    /// 500 with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.status {
            StatusCode::BAD_REQUEST => record_request_rejected("validation"),
            StatusCode::TOO_MANY_REQUESTS => record_request_rejected("rate_limit"),
            _ => {}
        }

        let mut response = (self.status, Json(Envelope::<()>::failure(self.message))).into_response();
        if let Some(secs) = self.retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Map a library error to its HTTP form, logging and counting upstream
/// failures on the way.
///
/// Upstream messages pass through; transport failures get a generic
/// retry-later message; anything unexpected becomes a bare 500.
pub fn from_lib_error(error: &LibError) -> ApiError {
    match error {
        LibError::InvalidValue { .. } => ApiError::bad_request(error.to_string()),
        LibError::Upstream { status, .. } => {
            tracing::warn!(upstream_status = status, "upstream returned an error");
            record_upstream_failure(error.kind());
            ApiError::internal(error.to_string())
        }
        LibError::UpstreamUnavailable { endpoint, reason } => {
            tracing::error!(%endpoint, %reason, "upstream unreachable");
            record_upstream_failure(error.kind());
            ApiError::internal(UNAVAILABLE_MESSAGE)
        }
        LibError::UpstreamTimeout { endpoint, timeout_secs } => {
            tracing::error!(%endpoint, timeout_secs, "upstream timed out");
            record_upstream_failure(error.kind());
            ApiError::internal(UNAVAILABLE_MESSAGE)
        }
        other => {
            tracing::error!(error = %other, kind = other.kind(), "request failed");
            record_upstream_failure(other.kind());
            ApiError::internal(INTERNAL_MESSAGE)
        }
    }
}

impl From<LibError> for ApiError {
    fn from(error: LibError) -> Self {
        from_lib_error(&error)
    }
}
