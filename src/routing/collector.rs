//! Route registration.
//!
//! # Responsibilities
//! - Compile templates under the current group prefix
//! - Attach group middlewares ahead of route middlewares
//! - Name routes and register routes declared in configuration
//!
//! # Design Decisions
//! - Groups push an immutable scope and pop it on return, even on error
//! - Middleware order: outer group, inner group, route
//! - `build()` seals the table; nothing changes afterwards

use std::collections::HashMap;

use axum::http::Method;

use crate::config::RouteConfig;
use crate::error::RouterError;
use crate::pipeline::{HandlerDescriptor, MiddlewareDescriptor};
use crate::routing::matcher::RoutePattern;
use crate::routing::router::{CompiledRoute, RouteTable};

/// Prefix and middlewares contributed by the enclosing groups.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    middlewares: Vec<MiddlewareDescriptor>,
}

/// Builder for a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteCollector {
    routes: Vec<CompiledRoute>,
    names: HashMap<String, usize>,
    scopes: Vec<Scope>,
}

impl RouteCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under the current group scope.
    pub fn add_route(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        let (prefix, group_middlewares) = match self.scopes.last() {
            Some(scope) => (scope.prefix.as_str(), scope.middlewares.as_slice()),
            None => ("", &[][..]),
        };
        let pattern = RoutePattern::compile(&format!("{}{}", prefix, path))?;
        let middlewares = group_middlewares.iter().cloned().chain(middlewares).collect();

        tracing::debug!(method = %method, template = %pattern.template(), "route registered");

        self.routes.push(CompiledRoute {
            method,
            pattern,
            handler: handler.into(),
            middlewares,
            name: None,
        });
        Ok(self)
    }

    pub fn get(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::GET, path, handler, middlewares)
    }

    pub fn post(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::POST, path, handler, middlewares)
    }

    pub fn put(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::PUT, path, handler, middlewares)
    }

    pub fn patch(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::PATCH, path, handler, middlewares)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::DELETE, path, handler, middlewares)
    }

    pub fn options(
        &mut self,
        path: &str,
        handler: impl Into<HandlerDescriptor>,
        middlewares: Vec<MiddlewareDescriptor>,
    ) -> Result<&mut Self, RouterError> {
        self.add_route(Method::OPTIONS, path, handler, middlewares)
    }

    /// Name the most recently registered route.
    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self, RouterError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RouterError::DuplicateName(name));
        }
        let index = self
            .routes
            .len()
            .checked_sub(1)
            .ok_or_else(|| RouterError::NoRouteToName(name.clone()))?;

        self.routes[index].name = Some(name.clone());
        self.names.insert(name, index);
        Ok(self)
    }

    /// Register the routes in `body` under `prefix`, with `middlewares`
    /// running after those of any enclosing group.
    pub fn group<F>(
        &mut self,
        prefix: &str,
        middlewares: Vec<MiddlewareDescriptor>,
        body: F,
    ) -> Result<&mut Self, RouterError>
    where
        F: FnOnce(&mut Self) -> Result<(), RouterError>,
    {
        let scope = match self.scopes.last() {
            Some(outer) => Scope {
                prefix: format!("{}{}", outer.prefix, prefix),
                middlewares: outer.middlewares.iter().cloned().chain(middlewares).collect(),
            },
            None => Scope {
                prefix: prefix.to_string(),
                middlewares,
            },
        };

        self.scopes.push(scope);
        let result = body(self);
        self.scopes.pop();

        result?;
        Ok(self)
    }

    /// Register routes declared in configuration. Handlers are identifiers
    /// resolved at dispatch time.
    pub fn from_config(&mut self, routes: &[RouteConfig]) -> Result<&mut Self, RouterError> {
        for route in routes {
            let method = parse_method(&route.method)?;
            let handler = match &route.action {
                Some(action) => HandlerDescriptor::action(route.handler.as_str(), action.as_str()),
                None => HandlerDescriptor::service(route.handler.as_str()),
            };
            let middlewares = route
                .middlewares
                .iter()
                .map(|id| MiddlewareDescriptor::identifier(id.as_str()))
                .collect();

            self.add_route(method, &route.path, handler, middlewares)?;
            if let Some(name) = &route.name {
                self.name(name.as_str())?;
            }
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Seal the collected routes.
    pub fn build(self) -> RouteTable {
        RouteTable::new(self.routes, self.names)
    }
}

/// Parse a method token, case-insensitively.
pub fn parse_method(method: &str) -> Result<Method, RouterError> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| RouterError::InvalidMethod(method.to_string()))
}
