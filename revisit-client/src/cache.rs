//! Local display cache
//!
//! Non-authoritative persisted flags used only to skip the redundant name
//! prompt in normal-mode sessions when the backend gave no answer. Never a
//! source of identity truth: whether a visitor is "recognized" is always
//! server-confirmed. Created on successful save, cleared on forget.

use std::path::PathBuf;

use revisit_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// The persisted flags. All three are written together on save and cleared
/// together on forget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// A save succeeded at some point.
    #[serde(default)]
    pub saved: bool,
    /// The last saved display name.
    #[serde(default)]
    pub saved_name: String,
    /// This profile has completed a save in a normal-mode session before.
    #[serde(default)]
    pub normal_mode_seen: bool,
}

/// File-backed display cache. Read once at boot, written only by
/// save/forget.
pub struct DisplayCache {
    path: Option<PathBuf>,
    entry: CacheEntry,
}

impl DisplayCache {
    /// Load the cache from `path`. A missing or corrupt file degrades to an
    /// empty entry — the cache is an optimization, never a failure source.
    pub fn load(path: PathBuf) -> Self {
        let entry = match std::fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Display cache corrupt, starting empty");
                    CacheEntry::default()
                }
            },
            Err(_) => CacheEntry::default(),
        };

        Self {
            path: Some(path),
            entry,
        }
    }

    /// Cache without a backing file. Used for incognito-like sessions and
    /// tests; writes update memory only for the lifetime of the session.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            entry: CacheEntry::default(),
        }
    }

    pub fn entry(&self) -> &CacheEntry {
        &self.entry
    }

    /// Whether the thank-you shortcut may be shown: a prior save recorded in
    /// a normal-mode session.
    pub fn shows_prior_save(&self) -> bool {
        self.entry.saved && self.entry.normal_mode_seen && !self.entry.saved_name.is_empty()
    }

    /// Record a successful save.
    pub fn record_save(&mut self, name: &str) -> Result<()> {
        self.entry = CacheEntry {
            saved: true,
            saved_name: name.to_string(),
            normal_mode_seen: true,
        };
        self.persist()
    }

    /// Clear every flag. The backing file is removed so all three flags
    /// disappear together.
    pub fn clear(&mut self) -> Result<()> {
        self.entry = CacheEntry::default();

        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = toml::to_string(&self.entry)
            .map_err(|e| Error::Internal(format!("cache serialization failed: {}", e)))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// Platform-default cache location.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("revisit").join("display_cache.toml"))
}
