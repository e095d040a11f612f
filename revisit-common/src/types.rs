//! Identity and visitor record types

use serde::{Deserialize, Serialize};

/// Which key resolved a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Resolved via the provider-issued strong fingerprint.
    Strong,
    /// Resolved via the soft fingerprint fallback. Collision-prone by design.
    Soft,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Strong => write!(f, "strong"),
            MatchKind::Soft => write!(f, "soft"),
        }
    }
}

/// A successful lookup: the remembered name plus the key that matched.
///
/// A lookup that finds nothing is `Option::<RecognizedVisitor>::None` — a
/// valid outcome, distinct from a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedVisitor {
    pub name: String,
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
}

/// The two identifiers a session presents to the backend.
///
/// `strong` is opaque and provider-issued. `soft` is the deterministic
/// composition produced by [`crate::signals::EnvironmentProfile::compose`].
/// Both are set exactly once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySignals {
    pub strong: String,
    pub soft: String,
}

impl IdentitySignals {
    pub fn new(strong: impl Into<String>, soft: impl Into<String>) -> Self {
        Self {
            strong: strong.into(),
            soft: soft.into(),
        }
    }
}

/// Server-owned remembered-name record.
///
/// Keyed primarily by `strong_fp`; `soft_fp` is a secondary lookup key.
/// At most one live record exists per strong fingerprint. Soft-key collisions
/// across distinct strong fingerprints are expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub strong_fp: String,
    pub soft_fp: String,
    pub name: String,
}

/// Enrichment data for a recognized visitor. Every field may be absent;
/// absence renders as a placeholder, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentInfo {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub isp: Option<String>,
    pub platform: Option<String>,
}

impl EnrichmentInfo {
    /// Placeholder used when every enrichment attempt was exhausted.
    pub fn unknown() -> Self {
        Self::default()
    }
}
