//! API request/response types shared by revisit-server and revisit-client
//!
//! The HTTP surface is stable across reimplementations:
//! - `GET  /api/lookup?strong_fp=&soft_fp=` → `200 {name, match}` or `404`
//! - `POST /api/store_name` (form: strong_fp, soft_fp, name) → 2xx ack
//! - `POST /api/delete_name` (form: strong_fp, soft_fp) → 2xx ack
//! - `GET  /api/fingerprint` → `200 {ip, city, country, isp, platform}`
//! - `GET  /health` → `200 {status, module, version}`

use serde::{Deserialize, Serialize};

use crate::types::MatchKind;

/// Query parameters for GET /api/lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupQuery {
    pub strong_fp: String,
    pub soft_fp: String,
}

/// Body of a successful GET /api/lookup. A no-match is a 404, not a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub name: String,
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
}

/// Form fields for POST /api/store_name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreNameForm {
    pub strong_fp: String,
    pub soft_fp: String,
    pub name: String,
}

/// Form fields for POST /api/delete_name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNameForm {
    pub strong_fp: String,
    pub soft_fp: String,
}

/// Acknowledgement body for store/delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}
