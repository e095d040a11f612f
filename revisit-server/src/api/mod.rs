//! HTTP API handlers for revisit-server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub mod enrich;
pub mod health;
pub mod lookup;
pub mod names;

pub use enrich::fingerprint;
pub use health::health_routes;
pub use lookup::lookup;
pub use names::{delete_name, store_name};

/// API errors shared by the handlers
#[derive(Debug)]
pub enum ApiError {
    /// Missing or blank request parameter
    BadRequest(String),
    /// No record matched either fingerprint. A valid outcome, not a failure:
    /// clients treat the 404 as "no match".
    NoMatch,
    /// Storage failure
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NoMatch => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(message) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
