//! HTTP routing and middleware dispatch.
//!
//! Routes are compiled from templates such as `/posts[/{id:\d+}]` into a
//! sealed [`RouteTable`]. Each request is matched in declaration order and
//! then walked through global and route middlewares (onion model) before
//! its handler runs. An optional CORS policy answers preflight requests and
//! decorates responses.

pub mod config;
pub mod container;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod routing;
pub mod security;

pub use config::AppConfig;
pub use container::{Component, Container, Resolver};
pub use error::{DispatchError, DispatchResult, ResolverError, RouterError};
pub use http::{Application, HttpServer};
pub use lifecycle::Shutdown;
pub use pipeline::{from_fn, handler_fn, HandlerDescriptor, Middleware, MiddlewareDescriptor, Next};
pub use routing::{Params, RouteCollector, RouteTable};
pub use security::CorsPolicy;
