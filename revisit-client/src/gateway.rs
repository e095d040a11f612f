//! Backend gateway
//!
//! Typed client for the remote identity-record store. Contract:
//! - `lookup` distinguishes "no match" (a valid outcome) from transport
//!   failure (an error the caller may retry) — the two are never conflated.
//! - `store` and `delete` return a boolean acknowledgement and never fail
//!   with an error.
//! - `enrich` returns display data with optional fields, or a transport
//!   error for the caller's own retry/timeout policy.

use std::time::Duration;

use async_trait::async_trait;
use revisit_common::api::{DeleteNameForm, StoreNameForm};
use revisit_common::types::{EnrichmentInfo, MatchKind};
use revisit_common::{Error, IdentitySignals, RecognizedVisitor, Result};
use serde::Deserialize;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// The four backend operations the client flow is built on.
#[async_trait]
pub trait RecognitionGateway: Send + Sync {
    /// Look the signals up. `Ok(None)` is "no record found", a successful
    /// outcome distinct from `Err(Transport)`.
    async fn lookup(&self, signals: &IdentitySignals) -> Result<Option<RecognizedVisitor>>;

    /// Store a name for the signals. `false` on any failure, never an error.
    async fn store(&self, signals: &IdentitySignals, name: &str) -> bool;

    /// Delete the record for the signals. `false` on any failure, never an
    /// error.
    async fn delete(&self, signals: &IdentitySignals) -> bool;

    /// Fetch enrichment data for the recognized screen.
    async fn enrich(&self) -> Result<EnrichmentInfo>;
}

/// Lenient lookup body: a structurally valid response whose name is absent
/// or empty is a "no match", same as a 404.
#[derive(Debug, Deserialize)]
struct LookupBody {
    name: Option<String>,
    #[serde(rename = "match")]
    match_kind: Option<MatchKind>,
}

/// HTTP implementation of the gateway.
pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("http client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecognitionGateway for HttpGateway {
    async fn lookup(&self, signals: &IdentitySignals) -> Result<Option<RecognizedVisitor>> {
        let response = self
            .http_client
            .get(self.url("/api/lookup"))
            .query(&[
                ("strong_fp", signals.strong.as_str()),
                ("soft_fp", signals.soft.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Transport(format!("lookup request failed: {}", e)))?;

        let status = response.status();

        // 404 is the wire encoding for "no record found"
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        // Any other non-OK status is a transport failure, not a non-match
        if !status.is_success() {
            return Err(Error::Transport(format!("lookup returned {}", status)));
        }

        let body: LookupBody = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("lookup response invalid: {}", e)))?;

        match body.name {
            Some(name) if !name.trim().is_empty() => match body.match_kind {
                Some(match_kind) => Ok(Some(RecognizedVisitor { name, match_kind })),
                None => Err(Error::Transport(
                    "lookup response carried a name without a match tag".to_string(),
                )),
            },
            // Structurally valid but empty/absent name: a genuine non-match
            _ => Ok(None),
        }
    }

    async fn store(&self, signals: &IdentitySignals, name: &str) -> bool {
        let form = StoreNameForm {
            strong_fp: signals.strong.clone(),
            soft_fp: signals.soft.clone(),
            name: name.to_string(),
        };

        match self
            .http_client
            .post(self.url("/api/store_name"))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Store request failed");
                false
            }
        }
    }

    async fn delete(&self, signals: &IdentitySignals) -> bool {
        let form = DeleteNameForm {
            strong_fp: signals.strong.clone(),
            soft_fp: signals.soft.clone(),
        };

        match self
            .http_client
            .post(self.url("/api/delete_name"))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Delete request failed");
                false
            }
        }
    }

    async fn enrich(&self) -> Result<EnrichmentInfo> {
        let response = self
            .http_client
            .get(self.url("/api/fingerprint"))
            .send()
            .await
            .map_err(|e| Error::Transport(format!("enrichment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("enrichment returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("enrichment response invalid: {}", e)))
    }
}
