//! Cross-origin resource sharing.
//!
//! # Responsibilities
//! - Decide whether CORS applies to a request (non-empty `Origin`)
//! - Answer preflight `OPTIONS` requests before routing
//! - Add `Access-Control-*` headers to outgoing responses
//!
//! # Design Decisions
//! - Preflight answers come from policy, never echoed from the request
//! - `*` is only sent when wildcard-allowed and credentials are off
//! - Disallowed origins leave the response untouched

use axum::http::{header, HeaderMap, HeaderValue, Method, Request};
use axum::response::Response;
use serde::{Deserialize, Serialize};

/// Wildcard entry in `allowed_origins`.
pub const ANY_ORIGIN: &str = "*";

/// Method, URI and headers of a request, without its body.
pub type RequestHead = Request<()>;

/// Copy the head of a request so it stays available after the body has
/// been handed to the pipeline.
pub fn request_head<B>(request: &Request<B>) -> RequestHead {
    let mut head = Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    head
}

/// CORS capability used by the application.
pub trait CorsHandler: Send + Sync {
    fn should_apply(&self, request: &RequestHead) -> bool;

    fn add_headers(&self, response: Response, request: &RequestHead) -> Response;
}

/// Default CORS policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsPolicy {
    /// Allowed origins, e.g. `["https://app.example.com"]`, or `["*"]`.
    pub allowed_origins: Vec<String>,

    /// Methods announced in preflight responses.
    pub allowed_methods: Vec<String>,

    /// Request headers announced in preflight responses.
    pub allowed_headers: Vec<String>,

    /// Whether cookies and authorization headers are allowed.
    pub allow_credentials: bool,

    /// Preflight cache duration in seconds.
    pub max_age: u64,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: vec![ANY_ORIGIN.to_string()],
            allowed_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            allow_credentials: false,
            max_age: 86_400,
        }
    }
}

impl CorsPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = seconds;
        self
    }

    fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Value for `Access-Control-Allow-Origin`, given an allowed origin.
    fn allow_origin_value(&self, origin: &HeaderValue) -> HeaderValue {
        if self.allows_any_origin() && !self.allow_credentials {
            HeaderValue::from_static(ANY_ORIGIN)
        } else {
            origin.clone()
        }
    }
}

fn origin(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(header::ORIGIN).filter(|value| !value.is_empty())
}

fn joined(values: &[String]) -> Option<HeaderValue> {
    HeaderValue::from_str(&values.join(", ")).ok()
}

impl CorsHandler for CorsPolicy {
    fn should_apply(&self, request: &RequestHead) -> bool {
        origin(request.headers()).is_some()
    }

    fn add_headers(&self, mut response: Response, request: &RequestHead) -> Response {
        let Some(origin) = origin(request.headers()) else {
            return response;
        };
        let allowed = origin
            .to_str()
            .map(|o| self.is_origin_allowed(o))
            .unwrap_or(false);
        if !allowed {
            tracing::debug!(origin = ?origin, "origin not allowed, CORS headers omitted");
            return response;
        }

        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin_value(origin),
        );
        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }

        if request.method() == Method::OPTIONS {
            let requested = request.headers();
            if requested.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD) {
                if let Some(value) = joined(&self.allowed_methods) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
                }
            }
            if requested.contains_key(header::ACCESS_CONTROL_REQUEST_HEADERS) {
                if let Some(value) = joined(&self.allowed_headers) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value);
                }
            }
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age));
        }

        response
    }
}
