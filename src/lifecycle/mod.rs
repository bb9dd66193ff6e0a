//! Lifecycle management.
//!
//! # Design Decisions
//! - A single broadcast channel fans the shutdown signal out to servers
//! - Ctrl+C is treated the same as an explicit trigger

pub mod shutdown;

pub use shutdown::Shutdown;
