// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use serde_json::Value;
use std::sync::Arc;
use workout_map::config::Config;
use workout_map::db::{BlobStore, MemoryBlobStore};
use workout_map::routes::create_router;
use workout_map::services::PersistenceAdapter;
use workout_map::AppState;

/// Create a test app over a fresh in-memory blob store.
/// Returns the router, the shared state and the blob store.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryBlobStore) {
    let blobs = MemoryBlobStore::new();
    let (app, state) = create_test_app_with(Arc::new(blobs.clone())).await;
    (app, state, blobs)
}

/// Create a test app over the given blob store, loading whatever it holds.
#[allow(dead_code)]
pub async fn create_test_app_with(blobs: Arc<dyn BlobStore>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let persistence = PersistenceAdapter::spawn(blobs, &config.storage_key);
    let state = Arc::new(AppState::load(config, persistence).await);
    (create_router(state.clone()), state)
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Report a position so the map is loaded, then click on the map.
#[allow(dead_code)]
pub async fn load_map_and_click(app: &axum::Router, latitude: f64, longitude: f64) {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/position",
            serde_json::json!({ "latitude": 39.0, "longitude": -12.0 }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            serde_json::json!({ "latitude": latitude, "longitude": longitude }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
}

/// A running form as typed into the browser.
#[allow(dead_code)]
pub fn running_form(distance: &str, duration: &str, cadence: &str) -> Value {
    serde_json::json!({
        "type": "running",
        "distance": distance,
        "duration": duration,
        "cadence": cadence,
        "elevation": "",
    })
}

/// A cycling form as typed into the browser.
#[allow(dead_code)]
pub fn cycling_form(distance: &str, duration: &str, elevation: &str) -> Value {
    serde_json::json!({
        "type": "cycling",
        "distance": distance,
        "duration": duration,
        "cadence": "",
        "elevation": elevation,
    })
}
