//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request with Origin:
//!     → cors.rs (preflight answered before routing)
//!     → routing and pipeline
//!     → cors.rs (Access-Control-* headers on the response)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a disallowed origin gets no CORS headers
//! - Policy is immutable configuration, shared without locks

pub mod cors;

pub use cors::{CorsHandler, CorsPolicy, RequestHead};
