//! Request identification.
//!
//! # Responsibilities
//! - Keep an incoming `X-Request-ID` or generate a UUID v4
//! - Expose the id to later middlewares and handlers via extensions
//! - Echo the id on the response
//!
//! # Design Decisions
//! - Implemented as a pipeline middleware so it can be registered globally
//!   or per route like any other

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::response::Response;
use futures_util::future::BoxFuture;
use uuid::Uuid;

use crate::error::DispatchResult;
use crate::pipeline::{Middleware, Next};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request id stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Access the request id of a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware tagging requests and responses with `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn process(&self, mut request: Request<Body>, next: Next) -> BoxFuture<'_, DispatchResult<Response>> {
        Box::pin(async move {
            let value = request
                .headers()
                .get(X_REQUEST_ID)
                .filter(|v| !v.is_empty() && v.to_str().is_ok())
                .cloned()
                .unwrap_or_else(generate);

            if let Ok(id) = value.to_str() {
                request.extensions_mut().insert(RequestId(id.to_string()));
            }
            request.headers_mut().insert(X_REQUEST_ID, value.clone());

            let mut response = next.run(request).await?;
            response.headers_mut().insert(X_REQUEST_ID, value);
            Ok(response)
        })
    }
}

fn generate() -> HeaderValue {
    let mut buf = Uuid::encode_buffer();
    HeaderValue::from_str(Uuid::new_v4().hyphenated().encode_lower(&mut buf))
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
