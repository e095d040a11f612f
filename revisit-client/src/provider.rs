//! Identity provider adapter
//!
//! Wraps the external strong-fingerprint source behind a trait. The provider
//! issues one opaque, stable identifier per session; both failure modes are
//! fatal to the identification flow — there is no soft-only fallback, so
//! callers never see a lookup with an empty strong signal.

use std::path::PathBuf;

use async_trait::async_trait;
use revisit_common::{Error, Result};

/// Source of the opaque strong identity. Acquired once per session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Acquire the strong identifier.
    ///
    /// # Errors
    /// * [`Error::ProviderUnavailable`] - the source is not loaded/reachable
    /// * [`Error::ProviderError`] - the source loaded but failed to produce
    async fn acquire(&self) -> Result<String>;
}

/// Provider reading a provisioned identity token from a file.
///
/// The external fingerprinting tool writes a stable token to a well-known
/// path; this adapter only hands it over. A missing file means the provider
/// was never installed; an unreadable or blank file means it is broken.
pub struct FileIdentityProvider {
    path: PathBuf,
}

impl FileIdentityProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl IdentityProvider for FileIdentityProvider {
    async fn acquire(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(Error::ProviderUnavailable(format!(
                "identity token not found at {}",
                self.path.display()
            )));
        }

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::ProviderError(format!("failed to read identity token: {}", e)))?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(Error::ProviderError(
                "identity token file is empty".to_string(),
            ));
        }

        tracing::debug!(path = %self.path.display(), "Acquired strong identity");
        Ok(token.to_string())
    }
}

/// Fixed-token provider for tests.
pub struct StaticIdentityProvider(pub String);

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn acquire(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
