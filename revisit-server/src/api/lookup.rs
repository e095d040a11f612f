//! Visitor lookup endpoint
//!
//! Matching policy: strong fingerprint first, soft fingerprint as fallback,
//! 404 when neither matches. A strong match always wins over a soft match
//! when both would resolve to different records.

use axum::extract::{Query, State};
use axum::Json;
use revisit_common::api::{LookupQuery, LookupResponse};
use revisit_common::types::MatchKind;

use crate::api::ApiError;
use crate::{db, AppState};

/// GET /api/lookup?strong_fp=&soft_fp=
///
/// Returns `200 {name, match}` on a match, `404` on no match. Any other
/// status signals a transport-level failure to the caller.
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    if query.strong_fp.trim().is_empty() {
        return Err(ApiError::BadRequest("strong_fp is required".to_string()));
    }
    if query.soft_fp.trim().is_empty() {
        return Err(ApiError::BadRequest("soft_fp is required".to_string()));
    }

    // Primary key first
    if let Some(row) = db::find_by_strong(&state.db, &query.strong_fp)
        .await
        .map_err(internal)?
    {
        tracing::info!(name = %row.name, "Visitor recognized by strong fingerprint");
        return Ok(Json(LookupResponse {
            name: row.name,
            match_kind: MatchKind::Strong,
        }));
    }

    // Fallback key
    if let Some(row) = db::find_by_soft(&state.db, &query.soft_fp)
        .await
        .map_err(internal)?
    {
        tracing::info!(name = %row.name, "Visitor recognized by soft fingerprint");
        return Ok(Json(LookupResponse {
            name: row.name,
            match_kind: MatchKind::Soft,
        }));
    }

    tracing::debug!("No record matched either fingerprint");
    Err(ApiError::NoMatch)
}

fn internal(err: revisit_common::Error) -> ApiError {
    ApiError::Internal(err.to_string())
}
