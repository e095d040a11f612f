//! revisit-server library - remembered-name store
//!
//! HTTP service backing the visitor re-identification demo: stores names
//! keyed by strong fingerprint (soft fingerprint as fallback key) and serves
//! the enrichment data shown on the recognized screen.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod enrichment;

use enrichment::EnrichmentClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Visitor record store
    pub db: SqlitePool,
    /// Client for the opaque IP-enrichment collaborator
    pub enrichment: EnrichmentClient,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, enrichment: EnrichmentClient) -> Self {
        Self { db, enrichment }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/lookup", get(api::lookup))
        .route("/api/store_name", post(api::store_name))
        .route("/api/delete_name", post(api::delete_name))
        .route("/api/fingerprint", get(api::fingerprint))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
