//! Middleware capability and descriptor normalization.
//!
//! # Responsibilities
//! - Define the `process(request, next)` capability
//! - Adapt async closures into middlewares (`from_fn`)
//! - Normalize descriptors (instance, identifier, factory) through the resolver
//!
//! # Design Decisions
//! - Identifiers are never instantiated here; the resolver owns construction
//! - A descriptor that resolves to anything but a middleware is a
//!   configuration error

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::container::{Component, Resolver};
use crate::error::{DispatchError, DispatchResult, ResolverError};
use crate::pipeline::chain::Next;

/// An interceptor wrapped around the rest of the pipeline.
///
/// Code before `next.run(request)` runs on the way in, code after it on the
/// way out. Returning without calling `next` short-circuits the chain.
pub trait Middleware: Send + Sync {
    fn process(&self, request: Request<Body>, next: Next) -> BoxFuture<'_, DispatchResult<Response>>;
}

/// Middleware built from an async closure. See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

/// Wrap an async closure as a middleware.
///
/// ```rust,ignore
/// let timing = middleware::from_fn(|request, next: Next| async move {
///     let start = Instant::now();
///     let response = next.run(request).await?;
///     tracing::info!(elapsed = ?start.elapsed(), "request served");
///     Ok(response)
/// });
/// ```
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    FromFn { f }
}

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    fn process(&self, request: Request<Body>, next: Next) -> BoxFuture<'_, DispatchResult<Response>> {
        Box::pin((self.f)(request, next))
    }
}

type Factory = Arc<dyn Fn(&dyn Resolver) -> Result<Component, ResolverError> + Send + Sync>;

/// How a middleware is declared before it is normalized.
#[derive(Clone)]
pub enum MiddlewareDescriptor {
    /// Already constructed.
    Instance(Arc<dyn Middleware>),
    /// Resolved through the resolver on use.
    Identifier(String),
    /// Invoked with the resolver on use.
    Factory(Factory),
}

impl MiddlewareDescriptor {
    pub fn instance(middleware: impl Middleware + 'static) -> Self {
        Self::Instance(Arc::new(middleware))
    }

    pub fn identifier(id: impl Into<String>) -> Self {
        Self::Identifier(id.into())
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<Component, ResolverError> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    /// Produce the middleware this descriptor stands for.
    pub fn normalize(&self, resolver: &dyn Resolver) -> DispatchResult<Arc<dyn Middleware>> {
        let component = match self {
            Self::Instance(middleware) => return Ok(Arc::clone(middleware)),
            Self::Identifier(id) => resolver.get(id)?,
            Self::Factory(factory) => factory(resolver)?,
        };

        match component {
            Component::Middleware(middleware) => Ok(middleware),
            other => Err(DispatchError::Configuration(format!(
                "{} resolved to a {}, which does not implement Middleware",
                self,
                other.kind()
            ))),
        }
    }
}

impl fmt::Display for MiddlewareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => write!(f, "middleware instance"),
            Self::Identifier(id) => write!(f, "middleware `{}`", id),
            Self::Factory(_) => write!(f, "middleware factory"),
        }
    }
}

impl fmt::Debug for MiddlewareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Identifier(id) => f.debug_tuple("Identifier").field(id).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<&str> for MiddlewareDescriptor {
    fn from(id: &str) -> Self {
        Self::Identifier(id.to_string())
    }
}

impl From<String> for MiddlewareDescriptor {
    fn from(id: String) -> Self {
        Self::Identifier(id)
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareDescriptor {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self::Instance(middleware)
    }
}

impl<F, Fut> From<FromFn<F>> for MiddlewareDescriptor
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<Response>> + Send + 'static,
{
    fn from(middleware: FromFn<F>) -> Self {
        Self::instance(middleware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::pipeline::handler::handler_fn;

    fn passthrough() -> Arc<dyn Middleware> {
        Arc::new(from_fn(|request: Request<Body>, next: Next| next.run(request)))
    }

    #[test]
    fn test_instance_is_used_as_is() {
        let middleware = passthrough();
        let descriptor = MiddlewareDescriptor::from(Arc::clone(&middleware));
        let normalized = descriptor.normalize(&Container::new()).unwrap();
        assert!(Arc::ptr_eq(&middleware, &normalized));
    }

    #[test]
    fn test_identifier_resolves_through_container() {
        let mut container = Container::new();
        container.instance("auth", Component::Middleware(passthrough()));

        assert!(MiddlewareDescriptor::from("auth").normalize(&container).is_ok());
    }

    #[test]
    fn test_identifier_not_found_propagates() {
        let err = MiddlewareDescriptor::from("missing")
            .normalize(&Container::new())
            .err()
            .unwrap();
        assert!(matches!(err, DispatchError::Resolver(ResolverError::NotFound(id)) if id == "missing"));
    }

    #[test]
    fn test_factory_receives_resolver() {
        let mut container = Container::new();
        container.instance("inner", Component::Middleware(passthrough()));

        let descriptor = MiddlewareDescriptor::factory(|resolver| resolver.get("inner"));
        assert!(descriptor.normalize(&container).is_ok());
    }

    #[test]
    fn test_non_middleware_is_configuration_error() {
        let mut container = Container::new();
        container.instance(
            "home",
            Component::Handler(Arc::new(handler_fn(|_req, res, _params| async move { Ok(res) }))),
        );

        let err = MiddlewareDescriptor::from("home").normalize(&container).err().unwrap();
        assert!(matches!(err, DispatchError::Configuration(_)));

        let factory = MiddlewareDescriptor::factory(|resolver| resolver.get("home"));
        let err = factory.normalize(&container).err().unwrap();
        assert!(matches!(err, DispatchError::Configuration(_)));
    }
}
