//! Identifier-to-instance resolution.
//!
//! The dispatch core never constructs middlewares, handlers or controllers
//! itself. Every identifier goes through a [`Resolver`], which returns a
//! [`Component`] tagged with the capability it provides.
//!
//! [`Container`] is a small in-memory resolver built once at startup. Each
//! lookup calls the registered factory, so nothing is cached between
//! requests unless the factory itself hands out a shared `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ResolverError;
use crate::pipeline::handler::{Controller, Handler};
use crate::pipeline::middleware::Middleware;

/// A resolved instance, tagged by capability.
#[derive(Clone)]
pub enum Component {
    Middleware(Arc<dyn Middleware>),
    Handler(Arc<dyn Handler>),
    Controller(Arc<dyn Controller>),
}

impl Component {
    /// Capability name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Middleware(_) => "middleware",
            Component::Handler(_) => "handler",
            Component::Controller(_) => "controller",
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component::{}", self.kind())
    }
}

/// Lookup-by-identifier service.
pub trait Resolver: Send + Sync {
    fn get(&self, id: &str) -> Result<Component, ResolverError>;
}

type Factory = Arc<dyn Fn() -> Result<Component, ResolverError> + Send + Sync>;

/// In-memory resolver backed by per-identifier factories.
#[derive(Default, Clone)]
pub struct Container {
    factories: HashMap<String, Factory>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory that may fail.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Component, ResolverError> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
        self
    }

    /// Register a shared instance handed out on every lookup.
    pub fn instance(&mut self, id: impl Into<String>, component: Component) -> &mut Self {
        self.register(id, move || Ok(component.clone()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

impl Resolver for Container {
    fn get(&self, id: &str) -> Result<Component, ResolverError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ResolverError::NotFound(id.to_string()))?;
        factory()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("Container").field("ids", &ids).finish()
    }
}
