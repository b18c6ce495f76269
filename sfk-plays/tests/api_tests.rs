//! Integration tests for sfk-plays API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Recording playbacks (POST /reproducciones)
//! - Listing and per-user queries (GET /reproducciones)

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sfk_plays::{build_router, AppState, PlaybackStore};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Create app over a fresh store, keeping a handle on the state
fn setup_app(store: PlaybackStore) -> (axum::Router, AppState) {
    let state = AppState::new(store);
    (build_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/reproducciones")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_app(PlaybackStore::with_sample_data());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "sfk-plays");
    assert_eq!(body["records"], 4);
}

// =============================================================================
// Recording
// =============================================================================

#[tokio::test]
async fn test_record_playback_returns_created() {
    let (app, state) = setup_app(PlaybackStore::new());

    let response = app
        .oneshot(post_json(json!({"idUsuario": 7, "titulo": "Tren al Sur"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = state.store.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, 7);
    assert_eq!(stored[0].title, "Tren al Sur");
}

#[tokio::test]
async fn test_record_strips_mp3_suffix() {
    let (app, state) = setup_app(PlaybackStore::new());

    let response = app
        .oneshot(post_json(json!({"idUsuario": 1, "titulo": "Flaca.mp3"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(state.store.for_user(1)[0].title, "Flaca");
}

#[tokio::test]
async fn test_record_rejects_malformed_json() {
    let (app, state) = setup_app(PlaybackStore::new());

    let response = app
        .oneshot(post_json("{not json".to_string()))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn test_record_rejects_missing_fields() {
    let (app, state) = setup_app(PlaybackStore::new());

    let response = app
        .oneshot(post_json(json!({"titulo": "Flaca"}).to_string()))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(state.store.is_empty());
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_list_all_playbacks() {
    let (app, _) = setup_app(PlaybackStore::with_sample_data());

    let response = app.oneshot(get("/reproducciones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["idUsuario"], 1);
    assert_eq!(records[0]["titulo"], "Lamento Boliviano");
    assert_eq!(records[0]["fechaHora"], "2025-10-20 10:00:00");
}

#[tokio::test]
async fn test_list_by_user() {
    let (app, _) = setup_app(PlaybackStore::with_sample_data());

    let response = app
        .oneshot(get("/reproducciones?idUsuario=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["titulo"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Lamento Boliviano", "Lloraras", "Flaca"]);
}

#[tokio::test]
async fn test_list_by_unknown_or_negative_user_is_empty() {
    let (app, _) = setup_app(PlaybackStore::with_sample_data());

    for uri in ["/reproducciones?idUsuario=99", "/reproducciones?idUsuario=-1"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn test_list_by_non_integer_user_is_bad_request() {
    let (app, _) = setup_app(PlaybackStore::with_sample_data());

    for uri in [
        "/reproducciones?idUsuario=abc",
        "/reproducciones?idUsuario=1.5",
        "/reproducciones?idUsuario=%201",
        "/reproducciones?idUsuario=1%20",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_recorded_playback_is_queryable() {
    let (app, _) = setup_app(PlaybackStore::new());

    let response = app
        .clone()
        .oneshot(post_json(json!({"idUsuario": 3, "titulo": "Persiana Americana.mp3"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get("/reproducciones?idUsuario=3"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["titulo"], "Persiana Americana");
    assert!(body[0]["fechaHora"].as_str().unwrap().len() == 19);
}
