//! Error types shared by the routing and dispatch subsystems.
//!
//! # Design Decisions
//! - A missing route is not an error; it becomes a 404 response
//! - Configuration-time failures (`RouterError`) are separate from
//!   request-time failures (`DispatchError`)
//! - Resolver failures pass through dispatch untouched

use thiserror::Error;

/// Failure reported by a [`Resolver`](crate::container::Resolver).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    /// No entry is registered under the identifier.
    #[error("no entry found for identifier `{0}`")]
    NotFound(String),

    /// The entry exists but could not be produced.
    #[error("failed to resolve `{id}`: {reason}")]
    Container { id: String, reason: String },
}

/// Errors raised while building the route table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
    /// The route template is structurally malformed.
    #[error("invalid route template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// `name()` was called before any route was registered.
    #[error("cannot name route `{0}`: no route has been registered yet")]
    NoRouteToName(String),

    /// Another route already carries this name.
    #[error("route name `{0}` is already in use")]
    DuplicateName(String),

    /// The method token could not be parsed.
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
}

/// Errors raised while dispatching a single request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A middleware descriptor did not normalize to a middleware.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The terminal handler descriptor could not be invoked.
    #[error("invalid route handler: {0}")]
    InvalidHandler(String),

    /// Propagated verbatim from the resolver.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Failure raised by a handler or middleware body.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Result type for request dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;
