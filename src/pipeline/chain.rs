//! Per-request middleware chain.
//!
//! A [`Pipeline`] is assembled for exactly one request: the global
//! middlewares, then the matched route's middlewares, then the handler
//! invoker. [`Next`] is the continuation handed to each middleware; it owns
//! its own cursor, so nothing about the walk is stored on a shared object.

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::error::DispatchResult;
use crate::pipeline::handler::HandlerInvoker;
use crate::pipeline::middleware::Middleware;

/// Ordered middlewares terminating in the handler invoker.
pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
    invoker: HandlerInvoker,
}

impl Pipeline {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>, invoker: HandlerInvoker) -> Self {
        Self {
            middlewares,
            invoker,
        }
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run the request through the whole chain.
    pub async fn handle(self, request: Request<Body>) -> DispatchResult<Response> {
        Next {
            pipeline: Arc::new(self),
            cursor: 0,
        }
        .run(request)
        .await
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// The rest of the pipeline, including the terminal handler.
///
/// Consumed by [`Next::run`], so a middleware can continue at most once.
pub struct Next {
    pipeline: Arc<Pipeline>,
    cursor: usize,
}

impl Next {
    /// Number of middlewares still ahead of the handler.
    pub fn remaining(&self) -> usize {
        self.pipeline.middlewares.len().saturating_sub(self.cursor)
    }

    pub async fn run(self, request: Request<Body>) -> DispatchResult<Response> {
        let Next { pipeline, cursor } = self;
        match pipeline.middlewares.get(cursor).cloned() {
            Some(middleware) => {
                tracing::trace!(index = cursor, "entering middleware");
                let next = Next {
                    pipeline,
                    cursor: cursor + 1,
                };
                middleware.process(request, next).await
            }
            None => {
                tracing::trace!("middleware chain exhausted, invoking handler");
                pipeline.invoker.invoke(request).await
            }
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::pipeline::handler::{handler_fn, HandlerDescriptor, RouteContext};
    use crate::pipeline::middleware::from_fn;
    use crate::routing::Params;
    use axum::http::{HeaderValue, StatusCode};
    use std::sync::Mutex;

    fn routed_request() -> Request<Body> {
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        request.extensions_mut().insert(RouteContext {
            handler: HandlerDescriptor::from(handler_fn(|_req, mut res: Response, _params| async move {
                res.headers_mut().insert("x-handler", HeaderValue::from_static("ran"));
                Ok(res)
            })),
            params: Params::new(),
        });
        request
    }

    fn invoker() -> HandlerInvoker {
        HandlerInvoker::new(Arc::new(Container::new()))
    }

    #[tokio::test]
    async fn test_empty_chain_invokes_handler() {
        let pipeline = Pipeline::new(Vec::new(), invoker());
        let response = pipeline.handle(routed_request()).await.unwrap();
        assert_eq!(response.headers()["x-handler"], "ran");
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut middlewares: Vec<Arc<dyn Middleware>> = Vec::new();
        for _ in 0..3 {
            let seen = seen.clone();
            middlewares.push(Arc::new(from_fn(move |request, next: Next| {
                seen.lock().unwrap().push(next.remaining());
                next.run(request)
            })));
        }

        Pipeline::new(middlewares, invoker())
            .handle(routed_request())
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let blocker: Arc<dyn Middleware> = Arc::new(from_fn(|_request, _next: Next| async move {
            let mut response = Response::default();
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            Ok(response)
        }));

        let response = Pipeline::new(vec![blocker], invoker())
            .handle(routed_request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("x-handler").is_none());
    }
}
