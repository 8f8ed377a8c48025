mod support;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use backend::{config, db_utils::search_engine::EngineResponse, server_extra::{router, state::AppState}};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use support::{MockEngine, RecordingReporter};

fn app(engine: MockEngine, reporter: Arc<RecordingReporter>) -> axum::Router {
    let state = AppState::from_parts(
        Arc::new(engine),
        reporter,
        config::Search { page_size: 30, grouped: true },
        Some("94".to_string()),
    );
    router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "tests")
        .header("x-forwarded-for", "10.1.2.3, 10.0.0.1")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_follows_the_engine() {
    let app = app(MockEngine::new(|_| Ok(EngineResponse::default())), Arc::default());

    let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn blank_search_is_a_bad_request() {
    let app = app(MockEngine::new(|_| Ok(EngineResponse::default())), Arc::default());

    let response = app.oneshot(post_json("/search/query", json!({ "query": " " }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_code"], "invalid_query");
}

#[tokio::test]
async fn unmatched_search_is_reported_with_request_metadata() {
    let reporter = Arc::new(RecordingReporter::default());
    let app = app(MockEngine::new(|_| Ok(EngineResponse::default())), reporter.clone());

    let response = app.oneshot(post_json("/search/query", json!({ "query": "xyzzy" }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "outcome": "notFound" }));
    assert_eq!(*reporter.not_found.lock().unwrap(), vec!["xyzzy".to_string()]);
}

#[tokio::test]
async fn engine_failures_are_bad_gateways() {
    let app = app(
        MockEngine::new(|_| Err(backend::Error::EngineUnavailable { message: "connection refused".to_string() })),
        Arc::default(),
    );

    let response = app.oneshot(post_json("/search/facet", json!({ "query": "PTEN" }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn missing_occurrences_are_not_found() {
    let app = app(MockEngine::new(|_| Ok(EngineResponse::default())), Arc::default());
    let request = Request::builder()
        .uri("/search/diagram/R-HSA-69278/occurrences/R-HSA-199420")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_icons_are_not_found() {
    let app = app(MockEngine::new(|_| Ok(EngineResponse::default())), Arc::default());

    let response = app.oneshot(Request::builder().uri("/icons/R-ICO-000000").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error_code"], "not_found");
}
