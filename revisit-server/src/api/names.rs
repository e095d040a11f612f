//! Name store/forget endpoints

use axum::extract::State;
use axum::{Form, Json};
use revisit_common::api::{AckResponse, DeleteNameForm, StoreNameForm};

use crate::api::ApiError;
use crate::{db, AppState};

/// POST /api/store_name (form: strong_fp, soft_fp, name)
///
/// Upserts the record for the strong fingerprint. One live record per strong
/// fingerprint; storing again replaces the name and refreshes the soft key.
pub async fn store_name(
    State(state): State<AppState>,
    Form(form): Form<StoreNameForm>,
) -> Result<Json<AckResponse>, ApiError> {
    if form.strong_fp.trim().is_empty() {
        return Err(ApiError::BadRequest("strong_fp is required".to_string()));
    }
    if form.soft_fp.trim().is_empty() {
        return Err(ApiError::BadRequest("soft_fp is required".to_string()));
    }

    let name = form.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    db::upsert(&state.db, &form.strong_fp, &form.soft_fp, name)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(name = %name, "Stored visitor name");
    Ok(Json(AckResponse { ok: true }))
}

/// POST /api/delete_name (form: strong_fp, soft_fp)
///
/// Idempotent: deleting an absent record still acknowledges, so a client can
/// always clear its local state.
pub async fn delete_name(
    State(state): State<AppState>,
    Form(form): Form<DeleteNameForm>,
) -> Result<Json<AckResponse>, ApiError> {
    if form.strong_fp.trim().is_empty() {
        return Err(ApiError::BadRequest("strong_fp is required".to_string()));
    }

    let removed = db::delete_by_strong(&state.db, &form.strong_fp)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(removed, "Forgot visitor");
    Ok(Json(AckResponse { ok: true }))
}
