//! Response construction helpers.
//!
//! # Responsibilities
//! - Build empty responses for synthesized statuses (404, preflight 200)
//! - Serialize handler payloads as JSON
//! - Map dispatch failures to status codes at the transport boundary

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::error::{DispatchError, DispatchResult, ResolverError};

/// A response with `status` and no body.
pub fn empty(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Replace the body of `response` with `value` serialized as JSON.
pub fn json<T: Serialize>(mut response: Response, value: &T) -> DispatchResult<Response> {
    let body = serde_json::to_vec(value).map_err(|e| DispatchError::Handler(e.to_string()))?;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *response.body_mut() = Body::from(body);
    Ok(response)
}

/// Status used when a dispatch failure reaches the transport.
pub fn error_status(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::Resolver(ResolverError::NotFound(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        DispatchError::Resolver(ResolverError::Container { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        DispatchError::Configuration(_) | DispatchError::InvalidHandler(_) | DispatchError::Handler(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Plain-text error response. Details stay in the logs.
pub fn error_response(error: &DispatchError) -> Response {
    let status = error_status(error);
    let mut response = empty(status);
    *response.body_mut() = Body::from(status.canonical_reason().unwrap_or("Error"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_sets_body_and_content_type() {
        let response = json(empty(StatusCode::CREATED), &serde_json::json!({ "id": 7 })).unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"id":7}"#);
    }

    #[test]
    fn test_error_status_mapping() {
        let unavailable = DispatchError::Resolver(ResolverError::Container {
            id: "db".into(),
            reason: "down".into(),
        });
        assert_eq!(error_status(&unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            error_status(&DispatchError::InvalidHandler("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(error_response(&unavailable).status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
