//! Integration tests for revisit-server API endpoints
//!
//! Tests cover:
//! - Lookup match precedence (strong wins over soft)
//! - Soft-fingerprint fallback matching
//! - No-match as a 404, distinct from failures
//! - Store/delete acknowledgement and idempotency
//! - Forget clears the record for subsequent lookups
//! - Health endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method
use revisit_server::{build_router, db, enrichment::EnrichmentClient, AppState};

/// Test helper: Build an app over a fresh in-memory database
async fn setup_app() -> axum::Router {
    let pool = db::connect_memory()
        .await
        .expect("Should create in-memory database");
    let enrichment = EnrichmentClient::new(Some("http://enrich.invalid".to_string()))
        .expect("Should create enrichment client");
    build_router(AppState::new(pool, enrichment))
}

/// Test helper: GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: form-encoded POST request
fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: percent-encode the soft fingerprint's field delimiter
fn enc(value: &str) -> String {
    value.replace('|', "%7C")
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: store a record and assert acknowledgement
async fn store(app: &axum::Router, strong: &str, soft: &str, name: &str) {
    let body = format!("strong_fp={}&soft_fp={}&name={}", strong, enc(soft), name);
    let response = app
        .clone()
        .oneshot(post_form("/api/store_name", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "revisit-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Lookup: no match vs match
// =============================================================================

#[tokio::test]
async fn test_lookup_unknown_signals_returns_404() {
    let app = setup_app().await;

    let response = app
        .oneshot(get("/api/lookup?strong_fp=nobody&soft_fp=nothing"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookup_missing_params_is_bad_request() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/lookup?strong_fp=abc&soft_fp="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Entirely absent params fail query deserialization
    let response = app.oneshot(get("/api/lookup")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lookup_strong_match() {
    let app = setup_app().await;
    store(&app, "S1", "ua|plat|en|UTC|1920x1080x24", "Robin").await;

    let uri = format!(
        "/api/lookup?strong_fp=S1&soft_fp={}",
        enc("ua|plat|en|UTC|1920x1080x24")
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Robin");
    assert_eq!(body["match"], "strong");
}

#[tokio::test]
async fn test_lookup_soft_fallback() {
    let app = setup_app().await;
    store(&app, "S1", "ua|plat|en|UTC|1920x1080x24", "Robin").await;

    // Unknown strong fingerprint (fresh incognito profile), same environment
    let uri = format!(
        "/api/lookup?strong_fp=S2-unknown&soft_fp={}",
        enc("ua|plat|en|UTC|1920x1080x24")
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Robin");
    assert_eq!(body["match"], "soft");
}

#[tokio::test]
async fn test_strong_match_wins_over_soft_collision() {
    let app = setup_app().await;

    // Two distinct visitors whose environments collide on the soft key.
    // S1's soft fingerprint equals the one stored for S2.
    store(&app, "S1", "shared-soft", "Alice").await;
    store(&app, "S2", "shared-soft", "Bob").await;

    let response = app
        .oneshot(get("/api/lookup?strong_fp=S1&soft_fp=shared-soft"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["match"], "strong");
}

// =============================================================================
// Store
// =============================================================================

#[tokio::test]
async fn test_store_acknowledges() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_form(
            "/api/store_name",
            "strong_fp=abc123&soft_fp=soft1&name=Robin",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_store_blank_name_is_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_form(
            "/api/store_name",
            "strong_fp=abc123&soft_fp=soft1&name=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_replaces_existing_record() {
    let app = setup_app().await;
    store(&app, "S1", "soft1", "Robin").await;
    store(&app, "S1", "soft2", "Casey").await;

    // One live record per strong fingerprint: the name and soft key moved
    let response = app
        .clone()
        .oneshot(get("/api/lookup?strong_fp=S1&soft_fp=whatever"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Casey");

    // The old soft key no longer resolves
    let response = app
        .oneshot(get("/api/lookup?strong_fp=unknown&soft_fp=soft1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete / forget
// =============================================================================

#[tokio::test]
async fn test_forget_clears_everything() {
    let app = setup_app().await;
    store(&app, "S1", "soft1", "Robin").await;

    let response = app
        .clone()
        .oneshot(post_form("/api/delete_name", "strong_fp=S1&soft_fp=soft1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Same signals now resolve to nothing, by either key
    let response = app
        .oneshot(get("/api/lookup?strong_fp=S1&soft_fp=soft1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = setup_app().await;

    // Nothing stored; forget still acknowledges so clients can clear state
    let response = app
        .oneshot(post_form(
            "/api/delete_name",
            "strong_fp=never-stored&soft_fp=soft1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
}

// =============================================================================
// End-to-end over the HTTP surface: fresh visitor, save, re-visit
// =============================================================================

#[tokio::test]
async fn test_save_then_reidentify_flow() {
    let app = setup_app().await;
    let soft = "uaX|platX|en|UTC|1920x1080x24";

    // Fresh signals: no match
    let uri = format!("/api/lookup?strong_fp=abc123&soft_fp={}", enc(soft));
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Visitor saves a name
    store(&app, "abc123", soft, "Robin").await;

    // Later session with the same signals is recognized by strong key
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Robin");
    assert_eq!(body["match"], "strong");
}
