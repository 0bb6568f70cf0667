//! Runtime settings for the detection service.
//!
//! All knobs carry sensible defaults and can be overridden through
//! `LANGSENSE_*` environment variables, so embedding applications only set
//! what they need.

use crate::integrity::SecurityLevel;
use std::time::Duration;

/// Tunable settings for the catalogue, cache, and detection pipeline.
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Process default language, used when detection cannot produce a
    /// confident answer (e.g., "en").
    pub default_language: String,

    /// Minimum ensemble confidence accepted without consulting the
    /// statistical fallback.
    pub detection_threshold: f64,

    /// Absolute confidence floor. Below this the process default language is
    /// substituted at confidence 0.3.
    pub confidence_floor: f64,

    /// Detected confidence below which a caller's preferred language
    /// overrides the detected one.
    pub preference_threshold: f64,

    /// Maximum input length in characters; longer input is truncated.
    pub max_text_length: usize,

    /// Per-adapter timeout for ensemble detection.
    pub adapter_timeout: Duration,

    /// Whether detection results are cached at all.
    pub cache_enabled: bool,

    /// Maximum age of a cache entry before it is treated as a miss.
    pub cache_ttl: Duration,

    /// Entry-count ceiling that triggers inline cache compaction.
    pub cache_max_entries: usize,

    /// Texts longer than this many bytes are cached under a digest key
    /// instead of the raw text.
    pub cache_key_max_len: usize,

    /// Per-record byte ceiling applied to raw catalogue records.
    pub max_record_bytes: usize,

    /// Digest strength for catalogue integrity hashes.
    pub security_level: SecurityLevel,

    /// Keyed-digest secret. When `None`, the `LANGSENSE_INTEGRITY_KEY`
    /// environment variable is consulted; what happens when that is also
    /// absent depends on the security level.
    pub integrity_key: Option<String>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            detection_threshold: 0.65,
            confidence_floor: 0.2,
            preference_threshold: 0.7,
            max_text_length: 10_000,
            adapter_timeout: Duration::from_millis(1_000),
            cache_enabled: true,
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 1_000,
            cache_key_max_len: 256,
            max_record_bytes: 64 * 1024,
            security_level: SecurityLevel::Standard,
            integrity_key: None,
        }
    }
}

impl DetectionSettings {
    /// Build settings from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_language: std::env::var("LANGSENSE_DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            detection_threshold: env_parse("LANGSENSE_DETECTION_THRESHOLD")
                .unwrap_or(defaults.detection_threshold),
            confidence_floor: env_parse("LANGSENSE_CONFIDENCE_FLOOR")
                .unwrap_or(defaults.confidence_floor),
            preference_threshold: env_parse("LANGSENSE_PREFERENCE_THRESHOLD")
                .unwrap_or(defaults.preference_threshold),
            max_text_length: env_parse("LANGSENSE_MAX_TEXT_LENGTH")
                .unwrap_or(defaults.max_text_length),
            adapter_timeout: env_parse("LANGSENSE_ADAPTER_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.adapter_timeout),
            cache_enabled: env_parse("LANGSENSE_CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            cache_ttl: env_parse("LANGSENSE_CACHE_TTL_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_max_entries: env_parse("LANGSENSE_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_key_max_len: defaults.cache_key_max_len,
            max_record_bytes: env_parse("LANGSENSE_MAX_RECORD_BYTES")
                .unwrap_or(defaults.max_record_bytes),
            security_level: std::env::var("LANGSENSE_SECURITY_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.security_level),
            integrity_key: std::env::var("LANGSENSE_INTEGRITY_KEY").ok(),
        }
    }

    /// Resolve the integrity key: explicit setting first, then environment.
    pub fn resolved_integrity_key(&self) -> Option<String> {
        self.integrity_key
            .clone()
            .or_else(|| std::env::var("LANGSENSE_INTEGRITY_KEY").ok())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DetectionSettings::default();
        assert_eq!(settings.default_language, "en");
        assert_eq!(settings.detection_threshold, 0.65);
        assert_eq!(settings.confidence_floor, 0.2);
        assert_eq!(settings.preference_threshold, 0.7);
        assert_eq!(settings.max_text_length, 10_000);
        assert_eq!(settings.adapter_timeout, Duration::from_millis(1_000));
        assert!(settings.cache_enabled);
        assert_eq!(settings.security_level, SecurityLevel::Standard);
    }

    #[test]
    fn test_cache_defaults_bound_memory() {
        let settings = DetectionSettings::default();
        assert!(settings.cache_max_entries > 0);
        assert!(settings.cache_key_max_len > 0);
        assert!(settings.max_record_bytes > 0);
    }
}
