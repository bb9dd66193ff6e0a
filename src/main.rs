//! route-dispatch demo server.
//!
//! Serves a few built-in routes plus any routes declared in the config file:
//!
//! ```text
//! GET  /health              → "health" handler
//! GET  /echo[/{message}]    → echo controller, action "show"
//! POST /echo                → echo controller, action "create"
//! ```
//!
//! Config-declared routes name handlers, controllers and middlewares by
//! identifier; the identifiers registered here are `health`, `echo` and
//! `timing`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use clap::Parser;
use futures_util::future::BoxFuture;
use tokio::net::TcpListener;

use route_dispatch::config::{load_config, AppConfig};
use route_dispatch::http::response::json;
use route_dispatch::http::{RequestIdExt, RequestIdMiddleware};
use route_dispatch::observability::{logging, metrics};
use route_dispatch::pipeline::Controller;
use route_dispatch::{
    from_fn, handler_fn, Application, Component, Container, DispatchError, DispatchResult,
    HttpServer, MiddlewareDescriptor, Next, Params, RouteCollector, Shutdown,
};

#[derive(Parser)]
#[command(name = "route-dispatch")]
#[command(about = "Route matching and middleware dispatch server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-dispatch starting");

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let mut routes = RouteCollector::new();
    routes.get("/health", "health", vec![])?.name("health")?;
    routes.group("/echo", vec!["timing".into()], |r| {
        r.get("[/{message}]", ("echo", "show"), vec![])?.name("echo.show")?;
        r.post("", ("echo", "create"), vec![])?;
        Ok(())
    })?;
    routes.from_config(&config.routes)?;
    let routes = routes.build();

    tracing::info!(
        routes = routes.len(),
        cors = config.cors.is_some(),
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    let mut app = Application::new(routes, Arc::new(container()));
    app.add_middleware(MiddlewareDescriptor::instance(RequestIdMiddleware))?;
    if let Some(cors) = config.cors.clone() {
        app = app.with_cors(cors);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    HttpServer::new(app, config).run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn container() -> Container {
    let mut container = Container::new();
    container.instance(
        "health",
        Component::Handler(Arc::new(handler_fn(|_request, response, _params| async move {
            json(response, &serde_json::json!({ "status": "ok" }))
        }))),
    );
    container.instance("echo", Component::Controller(Arc::new(EchoController)));
    container.instance(
        "timing",
        Component::Middleware(Arc::new(from_fn(|request: Request<Body>, next: Next| async move {
            let start = Instant::now();
            let path = request.uri().path().to_string();
            let response = next.run(request).await?;
            tracing::info!(path = %path, status = %response.status(), elapsed = ?start.elapsed(), "echo served");
            Ok(response)
        }))),
    );
    container
}

/// Echoes path parameters and request bodies back as JSON.
struct EchoController;

impl EchoController {
    async fn show(&self, request: Request<Body>, response: Response, params: Params) -> DispatchResult<Response> {
        let request_id = request.request_id().map(|id| id.as_str().to_string());
        json(
            response,
            &serde_json::json!({
                "message": params.get("message").unwrap_or("hello"),
                "request_id": request_id,
            }),
        )
    }

    async fn create(&self, request: Request<Body>, response: Response, _params: Params) -> DispatchResult<Response> {
        let bytes = axum::body::to_bytes(request.into_body(), 64 * 1024)
            .await
            .map_err(|e| DispatchError::Handler(e.to_string()))?;
        json(
            response,
            &serde_json::json!({ "received": String::from_utf8_lossy(&bytes) }),
        )
    }
}

impl Controller for EchoController {
    fn call<'a>(
        &'a self,
        action: &str,
        request: Request<Body>,
        response: Response,
        params: Params,
    ) -> Option<BoxFuture<'a, DispatchResult<Response>>> {
        match action {
            "show" => Some(Box::pin(self.show(request, response, params))),
            "create" => Some(Box::pin(self.create(request, response, params))),
            _ => None,
        }
    }
}
