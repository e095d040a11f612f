//! Screen state machine and session context
//!
//! One state machine, parameterized by [`SessionConfig`], drives the finite
//! set of UI states. The session context owns the identity signals, the
//! current screen, and the display cache — no ambient globals. Rendering is
//! delegated to a [`View`] that only observes state changes, so the matching
//! and transition logic tests without a rendering environment.
//!
//! Truth-source discipline: screens are chosen from backend-confirmed
//! identity. The display cache only ever shortcuts the thank-you screen in
//! normal-mode sessions; it never decides that a visitor is "recognized".

use std::sync::Arc;
use std::time::{Duration, Instant};

use revisit_common::signals::EnvironmentProfile;
use revisit_common::types::EnrichmentInfo;
use revisit_common::{Error, IdentitySignals, MatchKind, RecognizedVisitor, Result, RetryPolicy};

use crate::cache::DisplayCache;
use crate::gateway::RecognitionGateway;
use crate::matching::MatchingClient;
use crate::provider::IdentityProvider;

/// The finite set of UI states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Name entry for an unrecognized visitor.
    Initial,
    /// Post-save confirmation. Normal-mode sessions only.
    ThankYou,
    /// Post-lookup-match disclosure.
    Recognized,
    /// Explanation page. Pure navigation, no backend interaction.
    HowItWorks,
    /// Mitigation guidance. Pure navigation, no backend interaction.
    Protect,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Screen::Initial => "initial",
            Screen::ThankYou => "thankyou",
            Screen::Recognized => "recognized",
            Screen::HowItWorks => "how-it-works",
            Screen::Protect => "protect",
        };
        write!(f, "{}", name)
    }
}

/// Timing, retry, and screen configuration for one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Incognito-like session: the display cache is never written and the
    /// thank-you shortcut never taken.
    pub incognito: bool,
    /// Whether the thank-you shortcut screen exists at all.
    pub thankyou_shortcut: bool,
    /// Retry policy for the boot-time identity lookup.
    pub lookup_policy: RetryPolicy,
    /// Retry policy for the enrichment fetch.
    pub enrich_policy: RetryPolicy,
    /// Per-attempt timeout for the enrichment fetch.
    pub enrich_timeout: Duration,
    /// Minimum on-screen loading duration before the recognized reveal.
    pub reveal_floor: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            incognito: false,
            thankyou_shortcut: true,
            lookup_policy: RetryPolicy::new(3, Duration::from_millis(500)),
            enrich_policy: RetryPolicy::new(2, Duration::from_millis(500)),
            enrich_timeout: Duration::from_secs(5),
            reveal_floor: Duration::from_secs(2),
        }
    }
}

/// Snapshot handed to the view on every decisive transition.
#[derive(Debug)]
pub struct ScreenView<'a> {
    pub screen: Screen,
    pub display_name: Option<&'a str>,
    pub match_kind: Option<MatchKind>,
    pub enrichment: Option<&'a EnrichmentInfo>,
    pub identity: Option<&'a IdentitySignals>,
}

/// Observer of session state. Implementations render; they never mutate.
pub trait View: Send + Sync {
    /// A decisive screen transition happened.
    fn screen_changed(&self, view: &ScreenView<'_>);

    /// A transient status line (busy indicators, errors, confirmations).
    fn status(&self, message: &str, is_error: bool);

    /// Debug-only display data (signal digests). No-op by default.
    fn debug(&self, _message: &str) {}
}

/// The session context: identity signals, current screen, saved name, and
/// the collaborators that mutate them. Created at boot, discarded at the end
/// of the session.
pub struct Session {
    config: SessionConfig,
    gateway: Arc<dyn RecognitionGateway>,
    matching: MatchingClient,
    cache: DisplayCache,
    view: Arc<dyn View>,

    screen: Screen,
    /// Where `back` returns to after a navigation screen.
    home: Screen,
    identity: Option<IdentitySignals>,
    saved_name: Option<String>,
    match_kind: Option<MatchKind>,
    enrichment: Option<EnrichmentInfo>,
}

impl Session {
    pub fn new(
        gateway: Arc<dyn RecognitionGateway>,
        cache: DisplayCache,
        view: Arc<dyn View>,
        config: SessionConfig,
    ) -> Self {
        let matching = MatchingClient::new(Arc::clone(&gateway), config.lookup_policy);
        Self {
            config,
            gateway,
            matching,
            cache,
            view,
            screen: Screen::Initial,
            home: Screen::Initial,
            identity: None,
            saved_name: None,
            match_kind: None,
            enrichment: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn identity(&self) -> Option<&IdentitySignals> {
        self.identity.as_ref()
    }

    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }

    pub fn match_kind(&self) -> Option<MatchKind> {
        self.match_kind
    }

    pub fn enrichment(&self) -> Option<&EnrichmentInfo> {
        self.enrichment.as_ref()
    }

    pub fn cache(&self) -> &DisplayCache {
        &self.cache
    }

    /// Boot the session: acquire both identity signals, reconcile them
    /// against the backend, and enter the first decisive screen.
    ///
    /// Identification fully resolves (match, confirmed non-match, or
    /// exhausted transport error) before any screen is entered. Provider
    /// failures are fatal: the flow aborts with a blocking status and no
    /// screen is chosen.
    pub async fn boot(
        &mut self,
        provider: &dyn IdentityProvider,
        profile: &EnvironmentProfile,
    ) -> Result<()> {
        let strong = match provider.acquire().await {
            Ok(id) => id,
            Err(e) => {
                self.view.status(&format!("{}", e), true);
                return Err(e);
            }
        };

        let soft = profile.compose();
        self.view.debug(&format!(
            "strong: {}... | soft: {}",
            truncated(&strong, 8),
            revisit_common::signals::display_digest(&soft)
        ));
        let signals = IdentitySignals::new(strong, soft);
        self.identity = Some(signals.clone());

        self.view.status("Checking whether we recognize you...", false);

        match self.matching.identify(&signals).await {
            Ok(Some(visitor)) => {
                tracing::info!(
                    name = %visitor.name,
                    match_kind = %visitor.match_kind,
                    "Visitor recognized by backend"
                );
                self.enter_recognized(visitor).await;
                return Ok(());
            }
            Ok(None) => {
                tracing::info!("Backend confirmed: no record for these signals");
            }
            Err(e) => {
                // Exhausted retries. Surfaced as transient, never treated as
                // a backend-confirmed non-match.
                tracing::warn!(error = %e, "Lookup attempts exhausted");
                self.view
                    .status("Could not reach the backend. Identification unavailable.", true);
            }
        }

        // No backend-confirmed match. The cache may shortcut the thank-you
        // screen in normal-mode sessions; it is display-only and not
        // re-verified against the backend.
        if self.config.thankyou_shortcut && !self.config.incognito && self.cache.shows_prior_save()
        {
            self.saved_name = Some(self.cache.entry().saved_name.clone());
            self.transition(Screen::ThankYou);
        } else {
            self.transition(Screen::Initial);
        }

        Ok(())
    }

    /// Save a name for the current signals.
    ///
    /// Validation is local and contacts no backend. On a negative
    /// acknowledgement the session state and display cache are left
    /// unchanged.
    pub async fn save(&mut self, raw_name: &str) -> Result<()> {
        let name = match validate_name(raw_name) {
            Ok(name) => name,
            Err(e) => {
                self.view.status("Enter a valid name (min 2 chars).", true);
                return Err(e);
            }
        };

        let Some(signals) = self.identity.clone() else {
            self.view
                .status("Identity signals not ready; cannot save.", true);
            return Err(Error::Internal("identity signals not ready".to_string()));
        };

        if !self.gateway.store(&signals, &name).await {
            self.view.status("Save failed.", true);
            return Err(Error::SaveFailed);
        }

        self.saved_name = Some(name.clone());

        // Incognito-like sessions leave no local trace
        if !self.config.incognito {
            if let Err(e) = self.cache.record_save(&name) {
                tracing::warn!(error = %e, "Display cache write failed");
            }
        }

        self.transition(Screen::ThankYou);
        self.view.status(
            &format!(
                "Thank you, {}. Now open a private window and visit the same URL.",
                name
            ),
            false,
        );
        Ok(())
    }

    /// Forget the visitor: delete the backend record and clear the display
    /// cache unconditionally.
    pub async fn forget(&mut self) -> Result<()> {
        let Some(signals) = self.identity.clone() else {
            self.view
                .status("Identity signals not ready; cannot forget.", true);
            return Err(Error::Internal("identity signals not ready".to_string()));
        };

        if !self.gateway.delete(&signals).await {
            self.view.status("Forget failed.", true);
            return Err(Error::DeleteFailed);
        }

        if let Err(e) = self.cache.clear() {
            tracing::warn!(error = %e, "Display cache clear failed");
        }

        self.saved_name = None;
        self.match_kind = None;
        self.enrichment = None;

        self.transition(Screen::Initial);
        self.view.status("Forgot you. Enter a new name.", false);
        Ok(())
    }

    /// Pure navigation, no backend interaction.
    pub fn show_how_it_works(&mut self) {
        self.transition(Screen::HowItWorks);
    }

    /// Pure navigation, no backend interaction.
    pub fn show_protect(&mut self) {
        self.transition(Screen::Protect);
    }

    /// Return from a navigation screen to the last decisive screen.
    pub fn back(&mut self) {
        self.transition(self.home);
    }

    /// Enter the recognized screen: fetch enrichment under its own timeout
    /// and retry budget, and hold the loading beat for at least the reveal
    /// floor so the reveal reads as deliberate processing.
    async fn enter_recognized(&mut self, visitor: RecognizedVisitor) {
        self.saved_name = Some(visitor.name);
        self.match_kind = Some(visitor.match_kind);

        self.view
            .status("Welcome back. Analyzing what this session reveals...", false);

        let started = Instant::now();
        let enrichment = self.fetch_enrichment().await;

        // Total suspension = max(actual fetch latency, floor duration)
        let elapsed = started.elapsed();
        if elapsed < self.config.reveal_floor {
            tokio::time::sleep(self.config.reveal_floor - elapsed).await;
        }

        self.enrichment = Some(enrichment);
        self.transition(Screen::Recognized);
    }

    /// Bounded enrichment fetch. Exhaustion yields the "Unknown" placeholder
    /// rather than blocking the recognized transition.
    async fn fetch_enrichment(&self) -> EnrichmentInfo {
        let gateway = Arc::clone(&self.gateway);
        let per_attempt = self.config.enrich_timeout;

        let result = self
            .config
            .enrich_policy
            .run("enrich", Error::is_transport, move || {
                let gateway = Arc::clone(&gateway);
                async move {
                    match tokio::time::timeout(per_attempt, gateway.enrich()).await {
                        Ok(result) => result,
                        Err(_) => Err(Error::Transport(format!(
                            "enrichment timed out after {:?}",
                            per_attempt
                        ))),
                    }
                }
            })
            .await;

        match result {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, "Enrichment exhausted, rendering placeholders");
                EnrichmentInfo::unknown()
            }
        }
    }

    fn transition(&mut self, screen: Screen) {
        // Navigation screens are excursions; everything else is a decisive
        // screen that `back` returns to.
        if !matches!(screen, Screen::HowItWorks | Screen::Protect) {
            self.home = screen;
        }

        tracing::debug!(from = %self.screen, to = %screen, "Screen transition");
        self.screen = screen;

        let snapshot = ScreenView {
            screen: self.screen,
            display_name: self.saved_name.as_deref(),
            match_kind: self.match_kind,
            enrichment: self.enrichment.as_ref(),
            identity: self.identity.as_ref(),
        };
        self.view.screen_changed(&snapshot);
    }
}

/// Validate a name for `save`: non-empty after trimming and at least two
/// characters. Violation is local and non-fatal; no network call is issued.
fn validate_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < 2 {
        return Err(Error::Validation(
            "name must be at least 2 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn truncated(value: &str, max: usize) -> &str {
    let end = value
        .char_indices()
        .nth(max)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    &value[..end]
}
