//! Middleware dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! global middlewares + matched route middlewares
//!     → middleware.rs (normalize descriptors through the resolver)
//!     → chain.rs (fresh Pipeline per request, Next continuation)
//!     → handler.rs (invoke the terminal handler)
//!     → response travels back out through every middleware
//! ```
//!
//! # Design Decisions
//! - Onion model: code before `next.run` runs outside-in, code after runs inside-out
//! - Pipeline state lives only in the request's own `Next` values
//! - Handler shape is a tagged enum decided at registration time

pub mod chain;
pub mod handler;
pub mod middleware;

pub use chain::{Next, Pipeline};
pub use handler::{handler_fn, Controller, Handler, HandlerDescriptor, HandlerInvoker, RouteContext};
pub use middleware::{from_fn, Middleware, MiddlewareDescriptor};
