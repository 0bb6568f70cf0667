//! Shared detection result types.
//!
//! These are the values that cross the façade boundary: the detection result
//! itself, ranked alternatives, caller preferences, and voice metadata.

use serde::{Deserialize, Serialize};

/// How a detection result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Result served from the detection cache.
    Cache,
    /// Result produced by the external adapter ensemble.
    External,
    /// Result produced by the statistical frequency classifier.
    Fallback,
    /// Process default substituted because nothing was confident enough.
    Default,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            DetectionMethod::Cache => "cache",
            DetectionMethod::External => "external",
            DetectionMethod::Fallback => "fallback",
            DetectionMethod::Default => "default",
        };
        write!(f, "{}", tag)
    }
}

/// A candidate language with its score, used both for ranked classifier
/// output and for the alternatives attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCandidate {
    /// ISO 639-1 language code
    pub code: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

/// The outcome of a detection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// ISO 639-1 code of the detected language
    pub language_code: String,
    /// Resolved locale (e.g., "en-US")
    pub locale: String,
    /// English name of the detected language
    pub name: String,
    /// Whether the language is written right-to-left
    pub rtl: bool,
    /// Region code of the resolved catalogue record
    pub region_code: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
    /// Which stage of the pipeline produced this result
    pub method: DetectionMethod,
    /// Whether a caller preference replaced the detected language
    pub preference_applied: bool,
    /// Wall-clock cost of the request in milliseconds
    pub processing_time_ms: f64,
    /// Other plausible languages, ranked by confidence
    pub alternatives: Vec<LanguageCandidate>,
}

impl DetectionResult {
    /// The method tag as exposed to callers: the pipeline stage, with a
    /// `+preference` suffix when a caller preference replaced the detected
    /// language.
    pub fn method_tag(&self) -> String {
        if self.preference_applied {
            format!("{}+preference", self.method)
        } else {
            self.method.to_string()
        }
    }
}

/// Caller-supplied preferences applied after detection.
#[derive(Debug, Clone, Default)]
pub struct DetectionPreferences {
    /// Preferred ISO 639-1 language code
    pub language: Option<String>,
    /// Preferred region code (e.g., "MX"), re-resolves locale and region
    pub region: Option<String>,
}

impl DetectionPreferences {
    /// Preference for a language only.
    pub fn language(code: impl Into<String>) -> Self {
        Self {
            language: Some(code.into()),
            region: None,
        }
    }

    /// Preference for a language within a region.
    pub fn with_region(code: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: Some(code.into()),
            region: Some(region.into()),
        }
    }
}

/// A selectable voice for a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOption {
    /// Provider-specific voice identifier
    pub voice_id: String,
    /// Gender the voice presents as
    pub gender: crate::catalogue::Gender,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(DetectionMethod::Cache.to_string(), "cache");
        assert_eq!(DetectionMethod::External.to_string(), "external");
        assert_eq!(DetectionMethod::Fallback.to_string(), "fallback");
        assert_eq!(DetectionMethod::Default.to_string(), "default");
    }

    #[test]
    fn test_method_tag_with_preference() {
        let result = DetectionResult {
            language_code: "es".to_string(),
            locale: "es-ES".to_string(),
            name: "Spanish".to_string(),
            rtl: false,
            region_code: "ES".to_string(),
            confidence: 0.5,
            method: DetectionMethod::External,
            preference_applied: true,
            processing_time_ms: 1.0,
            alternatives: Vec::new(),
        };
        assert_eq!(result.method_tag(), "external+preference");
    }

    #[test]
    fn test_method_tag_without_preference() {
        let result = DetectionResult {
            language_code: "en".to_string(),
            locale: "en-US".to_string(),
            name: "English".to_string(),
            rtl: false,
            region_code: "US".to_string(),
            confidence: 0.9,
            method: DetectionMethod::Fallback,
            preference_applied: false,
            processing_time_ms: 1.0,
            alternatives: Vec::new(),
        };
        assert_eq!(result.method_tag(), "fallback");
    }

    #[test]
    fn test_preferences_constructors() {
        let prefs = DetectionPreferences::language("es");
        assert_eq!(prefs.language.as_deref(), Some("es"));
        assert!(prefs.region.is_none());

        let prefs = DetectionPreferences::with_region("en", "GB");
        assert_eq!(prefs.language.as_deref(), Some("en"));
        assert_eq!(prefs.region.as_deref(), Some("GB"));
    }

    #[test]
    fn test_result_serializes() {
        let result = DetectionResult {
            language_code: "en".to_string(),
            locale: "en-US".to_string(),
            name: "English".to_string(),
            rtl: false,
            region_code: "US".to_string(),
            confidence: 1.0,
            method: DetectionMethod::Default,
            preference_applied: false,
            processing_time_ms: 0.2,
            alternatives: Vec::new(),
        };
        let json = serde_json::to_string(&result).expect("serializes");
        assert!(json.contains("\"method\":\"default\""));
    }
}
