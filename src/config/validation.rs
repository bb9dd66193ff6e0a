//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses
//! - Check that every declared route would register
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::collector::parse_method;
use crate::routing::RoutePattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("cors.allowed_origins contains an empty entry")]
    EmptyOrigin,

    #[error("cors.allowed_methods contains invalid method `{0}`")]
    CorsMethod(String),

    #[error("cors.allowed_headers contains invalid header name `{0}`")]
    CorsHeader(String),

    #[error("routes[{index}]: {reason}")]
    Route { index: usize, reason: String },
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Some(cors) = &config.cors {
        if cors.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            errors.push(ValidationError::EmptyOrigin);
        }
        for method in &cors.allowed_methods {
            if parse_method(method).is_err() {
                errors.push(ValidationError::CorsMethod(method.clone()));
            }
        }
        for name in &cors.allowed_headers {
            if HeaderName::from_bytes(name.trim().as_bytes()).is_err() {
                errors.push(ValidationError::CorsHeader(name.clone()));
            }
        }
    }

    for (index, route) in config.routes.iter().enumerate() {
        let mut reject = |reason: String| errors.push(ValidationError::Route { index, reason });

        if let Err(e) = parse_method(&route.method) {
            reject(e.to_string());
        }
        if let Err(e) = RoutePattern::compile(&route.path) {
            reject(e.to_string());
        }
        if route.handler.trim().is_empty() {
            reject("handler identifier is empty".to_string());
        }
        if matches!(&route.action, Some(action) if action.trim().is_empty()) {
            reject("action is empty".to_string());
        }
        if route.middlewares.iter().any(|m| m.trim().is_empty()) {
            reject("middleware identifier is empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use crate::security::cors::CorsPolicy;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.cors = Some(CorsPolicy::default().allowed_origins([""]).allowed_methods(["GET", "B AD"]));
        config.routes.push(RouteConfig {
            name: None,
            method: "GET".into(),
            path: "/users/{id".into(),
            handler: "".into(),
            action: None,
            middlewares: vec![],
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BindAddress("not-an-address".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::EmptyOrigin));
        assert!(errors.contains(&ValidationError::CorsMethod("B AD".into())));
        let route_errors = errors
            .iter()
            .filter(|e| matches!(e, ValidationError::Route { index: 0, .. }))
            .count();
        assert_eq!(route_errors, 2);
    }

    #[test]
    fn test_rejects_invalid_cors_header_names() {
        let mut config = AppConfig::default();
        config.cors = Some(CorsPolicy::default().allowed_headers(["X-Token", "Bad Header", "X-Line\nBreak"]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            [
                ValidationError::CorsHeader("Bad Header".into()),
                ValidationError::CorsHeader("X-Line\nBreak".into()),
            ]
        );

        config.cors = Some(CorsPolicy::default().allowed_headers(["Content-Type", "x-requested-with"]));
        assert!(validate_config(&config).is_ok());
    }
}
