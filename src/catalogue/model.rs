//! Catalogue data model: language configuration records.
//!
//! Records arrive from an external document source as JSON (camelCase field
//! names), get validated and integrity-checked by the registry, and are then
//! served as immutable snapshots. The model itself carries no behavior beyond
//! construction helpers; validation lives in the registry, hashing in the
//! integrity verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gender presented by a voice or pronoun set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Neutral
    }
}

/// Voice and pronoun metadata for one gender presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderOption {
    /// Which gender this option presents as
    #[serde(rename = "type")]
    pub gender: Gender,

    /// Provider-specific voice identifier, if a voice is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Pronoun set for this presentation (e.g., ["he", "him"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pronouns: Vec<String>,

    /// Supported formality levels (e.g., ["formal", "informal"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formality_levels: Vec<String>,
}

impl GenderOption {
    /// The neutral option every record falls back to when none is supplied.
    pub fn neutral() -> Self {
        Self {
            gender: Gender::Neutral,
            voice_id: None,
            pronouns: Vec::new(),
            formality_levels: Vec::new(),
        }
    }
}

/// Regional variant metadata for a language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInfo {
    /// Region code (e.g., "US", "419")
    #[serde(default)]
    pub code: String,

    /// Human-readable region name (e.g., "United States")
    #[serde(default)]
    pub name: String,

    /// ISO 3166-1 country code when the region is a single country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// Dialects spoken in the region
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialects: Vec<String>,

    /// Free-form usage notes for the region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_notes: Option<String>,
}

/// Measurement system used by a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        MeasurementSystem::Metric
    }
}

/// Number rendering rules for a locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    /// Decimal separator (e.g., '.' or ',')
    pub decimal_separator: char,

    /// Separator between digit groups (e.g., ',' or '.')
    pub grouping_separator: char,

    /// Whether digit grouping is applied at all
    pub grouping: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: true,
        }
    }
}

/// Currency rendering rules for a locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Currency symbol (e.g., "$", "€")
    pub symbol: String,

    /// Render template with `{symbol}` and `{amount}` placeholders
    pub template: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            template: "{symbol}{amount}".to_string(),
        }
    }
}

/// Formatting rules bundled with a language configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterSet {
    /// strftime pattern for dates (e.g., "%m/%d/%Y")
    pub date: String,

    /// strftime pattern for times (e.g., "%H:%M")
    pub time: String,

    /// Number rendering rules
    #[serde(default)]
    pub number: NumberFormat,

    /// Currency rendering rules
    #[serde(default)]
    pub currency: CurrencyFormat,

    /// Measurement system for the locale
    #[serde(default)]
    pub measurement: MeasurementSystem,
}

impl Default for FormatterSet {
    fn default() -> Self {
        Self {
            date: "%Y-%m-%d".to_string(),
            time: "%H:%M".to_string(),
            number: NumberFormat::default(),
            currency: CurrencyFormat::default(),
            measurement: MeasurementSystem::default(),
        }
    }
}

/// Configuration record for a supported language.
///
/// `code` and `locale` must match `^[a-z]{2}(-[A-Z]{2})?$`. When
/// `security_hash` is present it must equal the keyed digest recomputed over
/// every other field; a stale hash means the record is treated as tampered
/// and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// ISO 639-1 language code, optionally with a region (e.g., "en", "pt-BR")
    pub code: String,

    /// Locale identifier governing formatting (e.g., "en-US")
    pub locale: String,

    /// English name of the language (e.g., "Spanish")
    pub name: String,

    /// Native name of the language (e.g., "Español")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,

    /// Whether the language is written right-to-left
    #[serde(default)]
    pub rtl: bool,

    /// Whether this language is enabled for detection and lookup
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Regional variant metadata
    #[serde(default)]
    pub region: RegionInfo,

    /// Voice/gender metadata; at least one entry, defaulting to neutral
    #[serde(default)]
    pub gender_options: Vec<GenderOption>,

    /// Date/time/number/currency formatting rules
    #[serde(default)]
    pub formatters: FormatterSet,

    /// Expected character frequency percentages for the fallback classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<HashMap<char, f64>>,

    /// Keyed tamper-evident digest over every other field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_hash: Option<String>,

    /// When the record was last modified upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl LanguageConfig {
    /// Minimal record for the given code/locale/name, with defaults for
    /// everything else. Used by the baked-in catalogue and tests.
    pub fn new(code: impl Into<String>, locale: impl Into<String>, name: impl Into<String>) -> Self {
        let code = code.into();
        let locale = locale.into();
        let region_code = locale
            .split('-')
            .nth(1)
            .map(str::to_string)
            .unwrap_or_else(|| code.to_uppercase());

        Self {
            code,
            locale,
            name: name.into(),
            native_name: None,
            rtl: false,
            enabled: true,
            region: RegionInfo {
                code: region_code,
                ..RegionInfo::default()
            },
            gender_options: vec![GenderOption::neutral()],
            formatters: FormatterSet::default(),
            frequencies: None,
            security_hash: None,
            last_updated: None,
        }
    }

    /// The base language part of the code ("pt-BR" -> "pt").
    pub fn base_code(&self) -> &str {
        self.code.split('-').next().unwrap_or(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_region_from_locale() {
        let config = LanguageConfig::new("en", "en-US", "English");
        assert_eq!(config.region.code, "US");
        assert!(config.enabled);
        assert_eq!(config.gender_options.len(), 1);
        assert_eq!(config.gender_options[0].gender, Gender::Neutral);
    }

    #[test]
    fn test_new_derives_region_from_code_when_locale_bare() {
        let config = LanguageConfig::new("ar", "ar", "Arabic");
        assert_eq!(config.region.code, "AR");
    }

    #[test]
    fn test_base_code_strips_region() {
        let config = LanguageConfig::new("pt-BR", "pt-BR", "Brazilian Portuguese");
        assert_eq!(config.base_code(), "pt");
    }

    #[test]
    fn test_deserializes_camel_case_document() {
        let json = r#"{
            "code": "es",
            "locale": "es-MX",
            "name": "Spanish",
            "nativeName": "Español",
            "rtl": false,
            "region": {
                "code": "MX",
                "name": "Mexico",
                "countryCode": "MX",
                "dialects": ["Mexican Spanish"]
            },
            "genderOptions": [
                {"type": "female", "voiceId": "es-voice-f1", "pronouns": ["ella"]}
            ],
            "formatters": {
                "date": "%d/%m/%Y",
                "time": "%H:%M",
                "number": {"decimalSeparator": ".", "groupingSeparator": ",", "grouping": true},
                "currency": {"symbol": "$", "template": "{symbol}{amount}"},
                "measurement": "metric"
            },
            "securityHash": "abc123"
        }"#;

        let config: LanguageConfig = serde_json::from_str(json).expect("parses");
        assert_eq!(config.code, "es");
        assert_eq!(config.native_name.as_deref(), Some("Español"));
        assert_eq!(config.region.country_code.as_deref(), Some("MX"));
        assert_eq!(config.gender_options[0].gender, Gender::Female);
        assert_eq!(config.security_hash.as_deref(), Some("abc123"));
        assert!(config.enabled, "enabled defaults to true");
    }

    #[test]
    fn test_frequencies_deserialize_as_char_map() {
        let json = r#"{
            "code": "en",
            "locale": "en-US",
            "name": "English",
            "frequencies": {"e": 12.7, "t": 9.1}
        }"#;

        let config: LanguageConfig = serde_json::from_str(json).expect("parses");
        let freq = config.frequencies.expect("has frequencies");
        assert_eq!(freq.get(&'e'), Some(&12.7));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = LanguageConfig::new("fr", "fr-FR", "French");
        let json = serde_json::to_string(&config).expect("serializes");
        let back: LanguageConfig = serde_json::from_str(&json).expect("parses");
        assert_eq!(config, back);
    }
}
