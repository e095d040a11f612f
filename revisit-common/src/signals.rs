//! Soft-signal composition
//!
//! Derives the secondary (soft) identity signal from stable-ish environment
//! attributes. Composition is pure and deterministic: two sessions produce the
//! same soft signal iff all five components are bit-identical. An unavailable
//! field degrades specificity but never fails composition.

/// Screen geometry component of the environment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
}

impl std::fmt::Display for ScreenGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.color_depth)
    }
}

/// The five environment fields the soft signal is built from.
///
/// Absent fields default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    /// IANA time zone name (e.g. "Europe/Berlin")
    pub time_zone: String,
    pub screen: Option<ScreenGeometry>,
}

/// Fixed field delimiter. Changing it changes every soft signal ever issued.
const DELIMITER: char = '|';

impl EnvironmentProfile {
    /// Compose the soft identity signal.
    ///
    /// Field order is fixed: user agent, platform, language, time zone,
    /// screen geometry. The output is human-unreadable by intent but not
    /// hashed; the backend stores and compares it verbatim.
    pub fn compose(&self) -> String {
        let screen = self
            .screen
            .map(|s| s.to_string())
            .unwrap_or_default();
        format!(
            "{ua}{d}{plat}{d}{lang}{d}{tz}{d}{screen}",
            ua = self.user_agent,
            plat = self.platform,
            lang = self.language,
            tz = self.time_zone,
            screen = screen,
            d = DELIMITER,
        )
    }
}

/// 32-bit FNV-1a digest of a signal, rendered in hex.
///
/// Debug display only: shortens the verbose soft signal to something a human
/// can compare at a glance. Carries no identity-matching role.
pub fn display_digest(signal: &str) -> String {
    const FNV_OFFSET: u32 = 2166136261;
    const FNV_PRIME: u32 = 16777619;

    let mut hash = FNV_OFFSET;
    for byte in signal.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> EnvironmentProfile {
        EnvironmentProfile {
            user_agent: "uaX".to_string(),
            platform: "platX".to_string(),
            language: "en".to_string(),
            time_zone: "UTC".to_string(),
            screen: Some(ScreenGeometry {
                width: 1920,
                height: 1080,
                color_depth: 24,
            }),
        }
    }

    #[test]
    fn compose_is_deterministic() {
        let profile = sample_profile();
        let first = profile.compose();
        for _ in 0..10 {
            assert_eq!(profile.compose(), first);
        }
    }

    #[test]
    fn compose_fixed_order_and_delimiter() {
        assert_eq!(sample_profile().compose(), "uaX|platX|en|UTC|1920x1080x24");
    }

    #[test]
    fn compose_tolerates_absent_fields() {
        let empty = EnvironmentProfile::default();
        assert_eq!(empty.compose(), "||||");

        let partial = EnvironmentProfile {
            language: "de-DE".to_string(),
            ..Default::default()
        };
        assert_eq!(partial.compose(), "||de-DE||");
    }

    #[test]
    fn any_component_change_changes_the_signal() {
        let base = sample_profile();
        let mut other = base.clone();
        other.time_zone = "Europe/Berlin".to_string();
        assert_ne!(base.compose(), other.compose());

        let mut other = base.clone();
        other.screen = Some(ScreenGeometry {
            width: 1920,
            height: 1080,
            color_depth: 30,
        });
        assert_ne!(base.compose(), other.compose());
    }

    #[test]
    fn display_digest_known_vectors() {
        // FNV-1a 32-bit reference values
        assert_eq!(display_digest(""), "811c9dc5");
        assert_eq!(display_digest("a"), "e40c292c");
    }

    #[test]
    fn display_digest_is_stable_for_a_fixed_signal() {
        let signal = sample_profile().compose();
        assert_eq!(display_digest(&signal), display_digest(&signal));
    }
}
