//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout and trace layers)
//!     → application.rs (CORS preflight, routing, pipeline, CORS headers)
//!     → request.rs (request id middleware, optional)
//!     → response.rs (synthesized and error responses)
//!     → Send to client
//! ```

pub mod application;
pub mod request;
pub mod response;
pub mod server;

pub use application::Application;
pub use request::{RequestId, RequestIdExt, RequestIdMiddleware, X_REQUEST_ID};
pub use server::HttpServer;
