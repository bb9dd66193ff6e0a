//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (configuration phase):
//!     collector.rs (methods, groups, names, config-declared routes)
//!     → matcher.rs (compile template into anchored regex)
//!     → router.rs (sealed RouteTable)
//!
//! Incoming request (method, path)
//!     → router.rs (linear scan in registration order)
//!     → matcher.rs (anchored match, named captures)
//!     → Return: RouteMatch or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins, no priority ranking

pub mod collector;
pub mod matcher;
pub mod params;
pub mod router;

pub use collector::RouteCollector;
pub use matcher::RoutePattern;
pub use params::Params;
pub use router::{CompiledRoute, RouteMatch, RouteTable};
