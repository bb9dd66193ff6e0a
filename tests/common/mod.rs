//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use route_dispatch::http::response::json;
use route_dispatch::{
    from_fn, handler_fn, Application, Container, HandlerDescriptor, Middleware, Next, Params,
    RouteCollector,
};

/// Ordered record of middleware and handler activity.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn request_with_headers(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Middleware appending `label:in` before and `label:out` after the rest of
/// the chain.
pub fn recording(label: &'static str, log: &Log) -> Arc<dyn Middleware> {
    let log = log.clone();
    Arc::new(from_fn(move |request: Request<Body>, next: Next| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(format!("{}:in", label));
            let response = next.run(request).await?;
            log.lock().unwrap().push(format!("{}:out", label));
            Ok(response)
        }
    }))
}

/// Handler recording `handler` and answering with its params as JSON.
pub fn recording_handler(log: &Log) -> HandlerDescriptor {
    let log = log.clone();
    HandlerDescriptor::callable(handler_fn(move |_request, response, params: Params| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push("handler".to_string());
            let body: BTreeMap<String, String> = params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            json(response, &body)
        }
    }))
}

pub fn application(routes: RouteCollector, container: Container) -> Application {
    Application::new(routes.build(), Arc::new(container))
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
