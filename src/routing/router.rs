//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching method and path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order, first match wins
//! - No specificity ranking: route authors control precedence by ordering

use std::collections::HashMap;

use axum::http::Method;

use crate::pipeline::{HandlerDescriptor, MiddlewareDescriptor};
use crate::routing::matcher::RoutePattern;
use crate::routing::params::Params;

/// A route as registered: method, pattern, handler and middlewares.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub(crate) method: Method,
    pub(crate) pattern: RoutePattern,
    pub(crate) handler: HandlerDescriptor,
    pub(crate) middlewares: Vec<MiddlewareDescriptor>,
    pub(crate) name: Option<String>,
}

impl CompiledRoute {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full template including any group prefix.
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerDescriptor {
        &self.handler
    }

    pub fn middlewares(&self) -> &[MiddlewareDescriptor] {
        &self.middlewares
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    route: &'a CompiledRoute,
    params: Params,
}

impl<'a> RouteMatch<'a> {
    pub fn route(&self) -> &'a CompiledRoute {
        self.route
    }

    pub fn method(&self) -> &'a Method {
        &self.route.method
    }

    pub fn handler(&self) -> &'a HandlerDescriptor {
        &self.route.handler
    }

    pub fn middlewares(&self) -> &'a [MiddlewareDescriptor] {
        &self.route.middlewares
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}

/// Sealed, ordered route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    names: HashMap<String, usize>,
}

impl RouteTable {
    pub(crate) fn new(routes: Vec<CompiledRoute>, names: HashMap<String, usize>) -> Self {
        Self { routes, names }
    }

    /// Find the first route whose method equals `method` and whose pattern
    /// accepts `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .pattern
                    .captures(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// Look up a route by its symbolic name.
    pub fn route(&self, name: &str) -> Option<&CompiledRoute> {
        self.names.get(name).and_then(|&index| self.routes.get(index))
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
