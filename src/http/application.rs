//! Request dispatch entry point.
//!
//! # Data Flow
//! ```text
//! Request
//!     → CORS preflight? (OPTIONS + Origin) → 200 + CORS headers, done
//!     → RouteTable::match_route → no match → 404
//!     → global middlewares ++ route middlewares (normalized per request)
//!     → Pipeline::handle (onion walk, terminal handler)
//!     → CORS headers on the way out when the request carried an Origin
//! ```
//!
//! # Design Decisions
//! - `Application` holds only read-only configuration; `run(&self)` can be
//!   called concurrently from any number of tasks
//! - The pipeline and its cursor are created inside `run`
//! - Route middlewares are resolved per request, not cached

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;

use crate::container::Resolver;
use crate::error::DispatchResult;
use crate::http::response::empty;
use crate::pipeline::{HandlerInvoker, Middleware, MiddlewareDescriptor, Pipeline, RouteContext};
use crate::routing::RouteTable;
use crate::security::cors::{request_head, CorsHandler};

/// Router, global middlewares, resolver and optional CORS policy.
pub struct Application {
    routes: RouteTable,
    resolver: Arc<dyn Resolver>,
    middlewares: Vec<Arc<dyn Middleware>>,
    cors: Option<Arc<dyn CorsHandler>>,
}

impl Application {
    pub fn new(routes: RouteTable, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            routes,
            resolver,
            middlewares: Vec::new(),
            cors: None,
        }
    }

    /// Enable CORS handling.
    pub fn with_cors(mut self, cors: impl CorsHandler + 'static) -> Self {
        self.cors = Some(Arc::new(cors));
        self
    }

    /// Normalize and append a global middleware.
    ///
    /// Global middlewares run before any route middleware, in the order
    /// they were added.
    pub fn add_middleware(&mut self, middleware: impl Into<MiddlewareDescriptor>) -> DispatchResult<()> {
        let descriptor = middleware.into();
        let middleware = descriptor.normalize(self.resolver.as_ref())?;
        tracing::debug!(middleware = %descriptor, index = self.middlewares.len(), "global middleware added");
        self.middlewares.push(middleware);
        Ok(())
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Dispatch one request.
    pub async fn run(&self, mut request: Request<Body>) -> DispatchResult<Response> {
        let cors = self
            .cors
            .as_ref()
            .map(|cors| (cors, request_head(&request)))
            .filter(|(cors, head)| cors.should_apply(head));

        if let Some((cors, head)) = &cors {
            if head.method() == Method::OPTIONS {
                tracing::debug!(path = %head.uri().path(), "answering CORS preflight");
                return Ok(cors.add_headers(empty(StatusCode::OK), head));
            }
        }

        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let response = match self.routes.match_route(&method, &path) {
            None => {
                tracing::debug!(method = %method, path = %path, "no route matched");
                empty(StatusCode::NOT_FOUND)
            }
            Some(matched) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    template = %matched.route().template(),
                    "route matched"
                );

                let mut chain = self.middlewares.clone();
                for descriptor in matched.middlewares() {
                    chain.push(descriptor.normalize(self.resolver.as_ref())?);
                }

                request.extensions_mut().insert(RouteContext {
                    handler: matched.handler().clone(),
                    params: matched.into_params(),
                });

                let invoker = HandlerInvoker::new(Arc::clone(&self.resolver));
                Pipeline::new(chain, invoker).handle(request).await?
            }
        };

        Ok(match &cors {
            Some((cors, head)) => cors.add_headers(response, head),
            None => response,
        })
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("routes", &self.routes.len())
            .field("middlewares", &self.middlewares.len())
            .field("cors", &self.cors.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::routing::RouteCollector;

    fn assert_send_sync<T: Send + Sync>() {}

    #[tokio::test]
    async fn test_owns_route_table() {
        assert_send_sync::<Application>();

        let mut routes = RouteCollector::new();
        routes.get("/a", "a", vec![]).unwrap();
        routes.get("/b/{id}", "b", vec![]).unwrap();
        let app = Arc::new(Application::new(routes.build(), Arc::new(Container::new())));

        assert_eq!(app.routes().len(), 2);
        let shared = Arc::clone(&app);
        let matched = tokio::spawn(async move {
            shared
                .routes()
                .match_route(&Method::GET, "/b/7")
                .map(|m| m.params().get("id").map(str::to_string))
        })
        .await
        .unwrap();
        assert_eq!(matched, Some(Some("7".to_string())));
    }
}
