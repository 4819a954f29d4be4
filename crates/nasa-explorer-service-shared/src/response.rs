//! The uniform JSON envelope returned by every API route.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{ success, data?, error? }`.
///
/// Exactly one of `data` and `error` is present, dictated by `success`.
/// Construct through [`Envelope::ok`] or [`Envelope::failure`] so the two
/// never drift apart.
///
/// # Example
///
/// ```
/// use nasa_explorer_service_shared::Envelope;
///
/// let body = serde_json::to_value(Envelope::ok(vec![1, 2, 3])).unwrap();
/// assert_eq!(body["success"], true);
/// assert!(body.get("error").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<T> for Envelope<T> {
    fn from(data: T) -> Self {
        Self::ok(data)
    }
}

/// Always 200; failures go through [`ApiError`](crate::ApiError), which sets
/// its own status.
impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
