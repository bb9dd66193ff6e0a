//! Terminal handler invocation.
//!
//! # Handler Shapes
//! - `Service(id)`: resolved to a [`Handler`] and called
//! - `Action { service, action }`: resolved to a [`Controller`], then the
//!   named action is called
//! - `Callable(handler)`: called directly
//!
//! The shape is fixed when the route is registered. Resolving an identifier
//! to the wrong kind of component, or naming an action the controller does
//! not expose, is an `InvalidHandler` error.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::container::{Component, Resolver};
use crate::error::{DispatchError, DispatchResult};
use crate::routing::Params;

/// A terminal request handler: `(request, response, params) -> response`.
pub trait Handler: Send + Sync {
    fn call(
        &self,
        request: Request<Body>,
        response: Response,
        params: Params,
    ) -> BoxFuture<'_, DispatchResult<Response>>;
}

/// An object exposing several named actions.
pub trait Controller: Send + Sync {
    /// Start the named action, or return `None` if there is no such action.
    fn call<'a>(
        &'a self,
        action: &str,
        request: Request<Body>,
        response: Response,
        params: Params,
    ) -> Option<BoxFuture<'a, DispatchResult<Response>>>;
}

/// Handler built from an async closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Body>, Response, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    HandlerFn { f }
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Body>, Response, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    fn call(
        &self,
        request: Request<Body>,
        response: Response,
        params: Params,
    ) -> BoxFuture<'_, DispatchResult<Response>> {
        Box::pin((self.f)(request, response, params))
    }
}

/// Registered description of how to reach the terminal handler.
#[derive(Clone)]
pub enum HandlerDescriptor {
    Service(String),
    Action { service: String, action: String },
    Callable(Arc<dyn Handler>),
}

impl HandlerDescriptor {
    pub fn service(id: impl Into<String>) -> Self {
        Self::Service(id.into())
    }

    pub fn action(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Action {
            service: service.into(),
            action: action.into(),
        }
    }

    pub fn callable(handler: impl Handler + 'static) -> Self {
        Self::Callable(Arc::new(handler))
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(id) => f.debug_tuple("Service").field(id).finish(),
            Self::Action { service, action } => f
                .debug_struct("Action")
                .field("service", service)
                .field("action", action)
                .finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<&str> for HandlerDescriptor {
    fn from(id: &str) -> Self {
        Self::service(id)
    }
}

impl From<String> for HandlerDescriptor {
    fn from(id: String) -> Self {
        Self::Service(id)
    }
}

impl From<(&str, &str)> for HandlerDescriptor {
    fn from((service, action): (&str, &str)) -> Self {
        Self::action(service, action)
    }
}

impl From<Arc<dyn Handler>> for HandlerDescriptor {
    fn from(handler: Arc<dyn Handler>) -> Self {
        Self::Callable(handler)
    }
}

impl<F, Fut> From<HandlerFn<F>> for HandlerDescriptor
where
    F: Fn(Request<Body>, Response, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    fn from(handler: HandlerFn<F>) -> Self {
        Self::callable(handler)
    }
}

/// Matched handler and parameters, carried in the request extensions.
#[derive(Debug, Clone)]
pub struct RouteContext {
    pub handler: HandlerDescriptor,
    pub params: Params,
}

/// Invokes the handler attached to a request.
#[derive(Clone)]
pub struct HandlerInvoker {
    resolver: Arc<dyn Resolver>,
}

impl HandlerInvoker {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    pub async fn invoke(&self, request: Request<Body>) -> DispatchResult<Response> {
        let RouteContext { handler, params } = request
            .extensions()
            .get::<RouteContext>()
            .cloned()
            .ok_or_else(|| DispatchError::InvalidHandler("request carries no matched route".into()))?;
        let response = Response::default();

        match handler {
            HandlerDescriptor::Service(id) => match self.resolver.get(&id)? {
                Component::Handler(handler) => handler.call(request, response, params).await,
                other => Err(DispatchError::InvalidHandler(format!(
                    "`{}` resolved to a {}, expected a handler",
                    id,
                    other.kind()
                ))),
            },
            HandlerDescriptor::Action { service, action } => match self.resolver.get(&service)? {
                Component::Controller(controller) => {
                    match controller.call(&action, request, response, params) {
                        Some(fut) => fut.await,
                        None => Err(DispatchError::InvalidHandler(format!(
                            "`{}` has no action `{}`",
                            service, action
                        ))),
                    }
                }
                other => Err(DispatchError::InvalidHandler(format!(
                    "`{}` resolved to a {}, expected a controller",
                    service,
                    other.kind()
                ))),
            },
            HandlerDescriptor::Callable(handler) => handler.call(request, response, params).await,
        }
    }
}

impl fmt::Debug for HandlerInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInvoker").finish_non_exhaustive()
    }
}
