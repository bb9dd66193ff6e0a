//! Route matching through the public API.

use axum::http::{Method, StatusCode};
use route_dispatch::{Container, HandlerDescriptor, RouteCollector, RouterError};

mod common;

#[test]
fn test_optional_segment_matches_with_and_without() {
    let mut routes = RouteCollector::new();
    routes.get("/posts[/{id:\\d+}]", "posts", vec![]).unwrap();
    let table = routes.build();

    let bare = table.match_route(&Method::GET, "/posts").unwrap();
    assert!(bare.params().is_empty());

    let with_id = table.match_route(&Method::GET, "/posts/42").unwrap();
    assert_eq!(with_id.params().get("id"), Some("42"));

    assert!(table.match_route(&Method::GET, "/posts/abc").is_none());
    assert!(table.match_route(&Method::GET, "/posts/").is_none());
}

#[test]
fn test_first_declared_route_wins() {
    let mut routes = RouteCollector::new();
    routes.get("/users/{name}", "by_name", vec![]).unwrap();
    routes.get("/users/{id:\\d+}", "by_id", vec![]).unwrap();
    let table = routes.build();

    let matched = table.match_route(&Method::GET, "/users/7").unwrap();
    assert!(matches!(matched.handler(), HandlerDescriptor::Service(id) if id == "by_name"));
}

#[test]
fn test_method_must_match_exactly() {
    let mut routes = RouteCollector::new();
    routes.post("/items", "create", vec![]).unwrap();
    routes.get("/items", "list", vec![]).unwrap();
    let table = routes.build();

    let matched = table.match_route(&Method::GET, "/items").unwrap();
    assert!(matches!(matched.handler(), HandlerDescriptor::Service(id) if id == "list"));
    assert!(table.match_route(&Method::DELETE, "/items").is_none());
}

#[test]
fn test_nested_groups_compose_prefixes() {
    let mut routes = RouteCollector::new();
    routes
        .group("/api", vec![], |r| {
            r.group("/v2", vec![], |r| {
                r.get("/orders/{order}/lines/{line:\\d+}", "lines", vec![])?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
    let table = routes.build();

    let matched = table
        .match_route(&Method::GET, "/api/v2/orders/A-1/lines/3")
        .unwrap();
    assert_eq!(matched.params().get("order"), Some("A-1"));
    assert_eq!(matched.params().get("line"), Some("3"));
    assert!(table.match_route(&Method::GET, "/orders/A-1/lines/3").is_none());
}

#[test]
fn test_malformed_templates_fail_at_registration() {
    for template in ["/a/{id", "/a/[b", "/a/b]", "/a/{}", "/a/{1x}", "/a/{id:}"] {
        let err = RouteCollector::new()
            .get(template, "x", vec![])
            .map(|_| ())
            .unwrap_err();
        assert!(
            matches!(err, RouterError::InvalidTemplate { .. }),
            "{} gave {:?}",
            template,
            err
        );
    }
}

#[tokio::test]
async fn test_params_reach_handler() {
    let log = common::new_log();
    let mut routes = RouteCollector::new();
    routes
        .get(
            "/files/{dir}[/{name:[a-z]+\\.txt}]",
            common::recording_handler(&log),
            vec![],
        )
        .unwrap();
    let app = common::application(routes, Container::new());

    let response = app
        .run(common::request(Method::GET, "/files/docs/readme.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_string(response).await,
        r#"{"dir":"docs","name":"readme.txt"}"#
    );

    let response = app
        .run(common::request(Method::GET, "/files/docs"))
        .await
        .unwrap();
    assert_eq!(common::body_string(response).await, r#"{"dir":"docs"}"#);
}

#[tokio::test]
async fn test_unmatched_request_is_404() {
    let mut routes = RouteCollector::new();
    routes.get("/only", "only", vec![]).unwrap();
    let app = common::application(routes, Container::new());

    let response = app
        .run(common::request(Method::GET, "/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(common::body_string(response).await.is_empty());
}
