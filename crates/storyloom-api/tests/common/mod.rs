//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storyloom_core::generation::{ImageGenerator, TextGenerator};
use storyloom_narrative::application::illustration_client::IllustrationClient;
use storyloom_narrative::application::narrative_client::NarrativeClient;
use storyloom_narrative::application::scene_service::SceneGenerationService;
use storyloom_test_support::{FixedClock, RecordingImageGenerator, ScriptedTextGenerator};
use tower::ServiceExt;

use storyloom_api::routes;
use storyloom_api::state::AppState;

/// Build the full app router around the given capabilities. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageGenerator>) -> Router {
    let scenes =
        SceneGenerationService::new(NarrativeClient::new(text), IllustrationClient::new(images));
    let app_state = AppState::new(Arc::new(FixedClock::default()), scenes);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .with_state(app_state)
}

/// Build the app with scripted narrative replies and a working illustrator.
pub fn build_scripted_app(responses: &[String]) -> Router {
    build_test_app(
        Arc::new(ScriptedTextGenerator::replying(responses)),
        Arc::new(RecordingImageGenerator::new()),
    )
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
