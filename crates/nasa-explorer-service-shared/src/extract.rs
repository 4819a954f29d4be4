//! Extractors that turn bad path segments and query strings into the
//! failure envelope instead of axum's plain-text rejections.

use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{ApiError, Validate};

/// Query string parsed into `T` and validated into `T::Output`.
///
/// Both failure modes reject with a 400 [`ApiError`], so callers always see
/// the failure envelope.
///
/// ```rust,ignore
/// async fn feed(
///     State(state): State<AppState>,
///     ValidQuery((start, end)): ValidQuery<NeoFeedParams>,
/// ) -> Result<Envelope<Value>, ApiError> {
///     Ok(Envelope::ok(state.service().neo_feed(start, end).await?))
/// }
/// ```
pub struct ValidQuery<T: Validate>(pub T::Output);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        raw.validate().map(ValidQuery)
    }
}

/// A single path segment parsed with [`FromStr`].
///
/// Parse errors convert into [`ApiError`], so an enum whose `FromStr` fails
/// with a library `InvalidValue` becomes a 400 listing the valid options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: FromStr + Send,
    T::Err: Into<ApiError>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        raw.parse::<T>().map(PathParam).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NeoBrowseParams;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::get,
        Router,
    };
    use nasa_explorer_lib::Rover;
    use tower::ServiceExt;

    async fn extract(uri: &str) -> Result<(u32, u32), ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ValidQuery::<NeoBrowseParams>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidQuery(v)| v)
    }

    #[tokio::test]
    async fn validated_output() {
        assert_eq!(extract("/api/neo?page=2&size=50").await.unwrap(), (2, 50));
        assert_eq!(extract("/api/neo").await.unwrap(), (0, 20));
    }

    #[tokio::test]
    async fn validation_failure_is_bad_request() {
        let err = extract("/api/neo?size=0").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Size must be between 1 and 100");
    }

    #[tokio::test]
    async fn malformed_query_is_bad_request() {
        let err = extract("/api/neo?page=1&page=2").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    async fn rover_name(PathParam(rover): PathParam<Rover>) -> String {
        rover.to_string()
    }

    async fn call_rover(uri: &str) -> (StatusCode, String) {
        let app = Router::new().route("/rovers/{rover}", get(rover_name));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn path_param_parses_enum() {
        let (status, body) = call_rover("/rovers/Curiosity").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "curiosity");
    }

    #[tokio::test]
    async fn path_param_rejection_lists_options() {
        let (status, body) = call_rover("/rovers/sojourner").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("curiosity, opportunity, spirit, perseverance, ingenuity"));
    }
}
