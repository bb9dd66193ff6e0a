//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router that forwards every request to `Application::run`
//! - Wire up transport middleware (timeout, tracing)
//! - Map dispatch failures to 5xx responses
//! - Serve until shutdown is signalled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::application::Application;
use crate::http::response::error_response;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::observability::metrics;

/// State injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

/// HTTP front end for an [`Application`].
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(app: Application, config: AppConfig) -> Self {
        let state = AppState { app: Arc::new(app) };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Every path and method goes to the dispatch handler.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The underlying Axum router, e.g. for `tower::ServiceExt::oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve connections from `listener` until `shutdown` fires or Ctrl+C.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.app.run(request).await {
        Ok(response) => {
            metrics::record_dispatch(method.as_str(), response.status().as_u16(), start);
            response
        }
        Err(error) => {
            tracing::error!(method = %method, path = %path, error = %error, "dispatch failed");
            let response = error_response(&error);
            metrics::record_dispatch(method.as_str(), response.status().as_u16(), start);
            response
        }
    }
}
