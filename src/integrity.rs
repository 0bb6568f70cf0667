//! Tamper-evident hashing for catalogue records.
//!
//! Every language configuration can carry a keyed digest over its other
//! fields. The digest algorithm is selected by a closed [`SecurityLevel`]
//! enumeration at construction time, and verification uses a constant-time
//! comparison to prevent timing attacks.

use crate::catalogue::{Gender, LanguageConfig, MeasurementSystem};
use crate::error::{LanguageError, Result};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Digest strength for catalogue integrity hashes.
///
/// Levels map to explicit algorithm choices; there is no string-based
/// dispatch anywhere else in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    /// HMAC-SHA256. Records without a hash are accepted.
    Standard,
    /// HMAC-SHA384. Every record must carry a valid hash.
    High,
    /// HMAC-SHA512. Every record must carry a valid hash.
    Maximum,
}

impl SecurityLevel {
    /// Whether this level refuses records that carry no hash at all.
    pub fn requires_hash(self) -> bool {
        !matches!(self, SecurityLevel::Standard)
    }

    /// Name of the digest algorithm this level maps to.
    pub fn algorithm(self) -> &'static str {
        match self {
            SecurityLevel::Standard => "HMAC-SHA256",
            SecurityLevel::High => "HMAC-SHA384",
            SecurityLevel::Maximum => "HMAC-SHA512",
        }
    }
}

impl std::str::FromStr for SecurityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(SecurityLevel::Standard),
            "high" => Ok(SecurityLevel::High),
            "maximum" => Ok(SecurityLevel::Maximum),
            other => Err(format!("unknown security level: '{}'", other)),
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SecurityLevel::Standard => "standard",
            SecurityLevel::High => "high",
            SecurityLevel::Maximum => "maximum",
        };
        write!(f, "{}", name)
    }
}

/// Creates and verifies keyed digests over [`LanguageConfig`] records.
///
/// Pure function of record + key: hashing the same record with the same key
/// always yields the same digest, and no state is carried between calls.
pub struct IntegrityVerifier {
    level: SecurityLevel,
    key: Vec<u8>,
}

impl IntegrityVerifier {
    /// Create a verifier for the given level.
    ///
    /// A missing key is tolerated at `Standard` (an ephemeral key is
    /// generated with a warning; hashes will not survive a restart). At
    /// `High` and `Maximum` a missing key is a startup error.
    pub fn new(level: SecurityLevel, key: Option<String>) -> Result<Self> {
        let key = match key {
            Some(k) if !k.is_empty() => k.into_bytes(),
            _ => {
                if level.requires_hash() {
                    return Err(LanguageError::Configuration(format!(
                        "security level '{}' requires an integrity key; set LANGSENSE_INTEGRITY_KEY",
                        level
                    )));
                }
                warn!(
                    "no integrity key supplied; generated an ephemeral key \
                     (hashes will not verify across restarts)"
                );
                let mut bytes = [0u8; 32];
                use rand::RngCore;
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes.to_vec()
            }
        };

        Ok(Self { level, key })
    }

    /// The level this verifier was constructed with.
    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// Compute the digest for a record, ignoring any hash it already carries.
    pub fn create_hash(&self, config: &LanguageConfig) -> String {
        self.mac_hex(canonical_payload(config).as_bytes())
    }

    /// Recompute and compare the record's digest in constant time.
    ///
    /// Returns `false` when the record carries no hash.
    pub fn verify(&self, config: &LanguageConfig) -> bool {
        let Some(stored) = config.security_hash.as_deref() else {
            return false;
        };
        constant_time_compare(stored, &self.create_hash(config))
    }

    fn mac_hex(&self, payload: &[u8]) -> String {
        match self.level {
            SecurityLevel::Standard => {
                let mut mac = HmacSha256::new_from_slice(&self.key)
                    .expect("HMAC can take any size key");
                mac.update(payload);
                hex::encode(mac.finalize().into_bytes())
            }
            SecurityLevel::High => {
                let mut mac = HmacSha384::new_from_slice(&self.key)
                    .expect("HMAC can take any size key");
                mac.update(payload);
                hex::encode(mac.finalize().into_bytes())
            }
            SecurityLevel::Maximum => {
                let mut mac = HmacSha512::new_from_slice(&self.key)
                    .expect("HMAC can take any size key");
                mac.update(payload);
                hex::encode(mac.finalize().into_bytes())
            }
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Serialize a record into a canonical `field=value` string with a fixed
/// field order, excluding `security_hash`. Map-typed fields are emitted in
/// sorted key order so the payload is deterministic.
fn canonical_payload(config: &LanguageConfig) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(16);

    parts.push(format!("code={}", config.code));
    parts.push(format!("locale={}", config.locale));
    parts.push(format!("name={}", config.name));
    parts.push(format!(
        "nativeName={}",
        config.native_name.as_deref().unwrap_or("")
    ));
    parts.push(format!("rtl={}", config.rtl));
    parts.push(format!("enabled={}", config.enabled));

    parts.push(format!(
        "region={}|{}|{}|{}|{}",
        config.region.code,
        config.region.name,
        config.region.country_code.as_deref().unwrap_or(""),
        config.region.dialects.join(","),
        config.region.cultural_notes.as_deref().unwrap_or("")
    ));

    let genders: Vec<String> = config
        .gender_options
        .iter()
        .map(|g| {
            format!(
                "{}:{}:{}:{}",
                gender_tag(g.gender),
                g.voice_id.as_deref().unwrap_or(""),
                g.pronouns.join(","),
                g.formality_levels.join(",")
            )
        })
        .collect();
    parts.push(format!("genderOptions={}", genders.join("|")));

    let fmt = &config.formatters;
    parts.push(format!(
        "formatters={}|{}|{}{}{}|{}|{}|{}",
        fmt.date,
        fmt.time,
        fmt.number.decimal_separator,
        fmt.number.grouping_separator,
        fmt.number.grouping,
        fmt.currency.symbol,
        fmt.currency.template,
        measurement_tag(fmt.measurement)
    ));

    if let Some(freq) = &config.frequencies {
        let mut entries: Vec<(&char, &f64)> = freq.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let rendered: Vec<String> = entries
            .iter()
            .map(|(c, v)| format!("{}:{}", c, v))
            .collect();
        parts.push(format!("frequencies={}", rendered.join(",")));
    } else {
        parts.push("frequencies=".to_string());
    }

    parts.push(format!(
        "lastUpdated={}",
        config
            .last_updated
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    ));

    parts.join(";")
}

fn gender_tag(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
        Gender::Neutral => "neutral",
    }
}

fn measurement_tag(measurement: MeasurementSystem) -> &'static str {
    match measurement {
        MeasurementSystem::Metric => "metric",
        MeasurementSystem::Imperial => "imperial",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::GenderOption;
    use std::collections::HashMap;

    fn verifier(level: SecurityLevel) -> IntegrityVerifier {
        IntegrityVerifier::new(level, Some("test-integrity-key".to_string()))
            .expect("key supplied")
    }

    fn sample_config() -> LanguageConfig {
        let mut config = LanguageConfig::new("en", "en-US", "English");
        config.native_name = Some("English".to_string());
        config.frequencies = Some(HashMap::from([('e', 12.7), ('t', 9.1), ('a', 8.2)]));
        config
    }

    // ==================== Hash Creation Tests ====================

    #[test]
    fn test_hash_is_deterministic() {
        let verifier = verifier(SecurityLevel::Standard);
        let config = sample_config();
        assert_eq!(verifier.create_hash(&config), verifier.create_hash(&config));
    }

    #[test]
    fn test_hash_ignores_existing_hash_field() {
        let verifier = verifier(SecurityLevel::Standard);
        let mut config = sample_config();
        let clean = verifier.create_hash(&config);
        config.security_hash = Some("something-else".to_string());
        assert_eq!(verifier.create_hash(&config), clean);
    }

    #[test]
    fn test_levels_map_to_distinct_digests() {
        let config = sample_config();
        let standard = verifier(SecurityLevel::Standard).create_hash(&config);
        let high = verifier(SecurityLevel::High).create_hash(&config);
        let maximum = verifier(SecurityLevel::Maximum).create_hash(&config);

        // SHA-256/384/512 hex lengths
        assert_eq!(standard.len(), 64);
        assert_eq!(high.len(), 96);
        assert_eq!(maximum.len(), 128);
        assert_ne!(standard, high);
        assert_ne!(high, maximum);
    }

    #[test]
    fn test_different_keys_produce_different_hashes() {
        let config = sample_config();
        let a = IntegrityVerifier::new(SecurityLevel::Standard, Some("key-a".to_string()))
            .unwrap()
            .create_hash(&config);
        let b = IntegrityVerifier::new(SecurityLevel::Standard, Some("key-b".to_string()))
            .unwrap()
            .create_hash(&config);
        assert_ne!(a, b);
    }

    // ==================== Verification Tests ====================

    #[test]
    fn test_verify_round_trip() {
        let verifier = verifier(SecurityLevel::Standard);
        let mut config = sample_config();
        config.security_hash = Some(verifier.create_hash(&config));
        assert!(verifier.verify(&config));
    }

    #[test]
    fn test_verify_fails_without_hash() {
        let verifier = verifier(SecurityLevel::Standard);
        let config = sample_config();
        assert!(config.security_hash.is_none());
        assert!(!verifier.verify(&config));
    }

    #[test]
    fn test_mutating_any_field_invalidates_hash() {
        let verifier = verifier(SecurityLevel::Standard);
        let mut config = sample_config();
        config.security_hash = Some(verifier.create_hash(&config));

        let mut tampered = config.clone();
        tampered.name = "Anglish".to_string();
        assert!(!verifier.verify(&tampered));

        let mut tampered = config.clone();
        tampered.rtl = true;
        assert!(!verifier.verify(&tampered));

        let mut tampered = config.clone();
        tampered.region.code = "GB".to_string();
        assert!(!verifier.verify(&tampered));

        let mut tampered = config.clone();
        tampered.gender_options.push(GenderOption::neutral());
        assert!(!verifier.verify(&tampered));

        let mut tampered = config.clone();
        tampered.formatters.date = "%d/%m/%Y".to_string();
        assert!(!verifier.verify(&tampered));

        let mut tampered = config.clone();
        if let Some(freq) = tampered.frequencies.as_mut() {
            freq.insert('z', 0.1);
        }
        assert!(!verifier.verify(&tampered));
    }

    #[test]
    fn test_verify_is_stable_across_frequency_map_ordering() {
        // HashMap iteration order varies; the canonical payload must not.
        let verifier = verifier(SecurityLevel::Standard);
        let mut config = sample_config();
        config.security_hash = Some(verifier.create_hash(&config));

        for _ in 0..16 {
            let rebuilt: LanguageConfig =
                serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
            assert!(verifier.verify(&rebuilt));
        }
    }

    // ==================== Key Sourcing Tests ====================

    #[test]
    fn test_missing_key_tolerated_at_standard() {
        let verifier = IntegrityVerifier::new(SecurityLevel::Standard, None)
            .expect("standard generates an ephemeral key");
        let config = sample_config();
        // Still a functioning verifier
        assert_eq!(verifier.create_hash(&config).len(), 64);
    }

    #[test]
    fn test_missing_key_rejected_at_high_and_maximum() {
        assert!(matches!(
            IntegrityVerifier::new(SecurityLevel::High, None),
            Err(LanguageError::Configuration(_))
        ));
        assert!(matches!(
            IntegrityVerifier::new(SecurityLevel::Maximum, None),
            Err(LanguageError::Configuration(_))
        ));
        // Empty string counts as missing
        assert!(matches!(
            IntegrityVerifier::new(SecurityLevel::High, Some(String::new())),
            Err(LanguageError::Configuration(_))
        ));
    }

    // ==================== Level Parsing Tests ====================

    #[test]
    fn test_security_level_from_str() {
        assert_eq!("standard".parse(), Ok(SecurityLevel::Standard));
        assert_eq!("HIGH".parse(), Ok(SecurityLevel::High));
        assert_eq!("Maximum".parse(), Ok(SecurityLevel::Maximum));
        assert!("paranoid".parse::<SecurityLevel>().is_err());
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(SecurityLevel::Standard.algorithm(), "HMAC-SHA256");
        assert_eq!(SecurityLevel::High.algorithm(), "HMAC-SHA384");
        assert_eq!(SecurityLevel::Maximum.algorithm(), "HMAC-SHA512");
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc123", "abc12"));
        assert!(!constant_time_compare("", "abc"));
    }
}
