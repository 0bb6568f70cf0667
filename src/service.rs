//! Language detection service façade.
//!
//! Orchestrates the full request pipeline: cache lookup, ensemble vote,
//! statistical fallback, confidence floor, caller-preference override, cache
//! store, and metrics. Detection is a stateless read path over the immutable
//! catalogue snapshot; the cache is the only mutable hot-path structure.

use crate::cache::{NoopCache, ResultCache, TtlCache};
use crate::catalogue::{ConfigSource, Gender, LanguageConfig, LanguageRegistry};
use crate::classifier::FrequencyClassifier;
use crate::ensemble::{DetectorAdapter, EnsembleDetector, EnsembleVote};
use crate::error::{LanguageError, Result};
use crate::format::{self, DateStyle};
use crate::integrity::IntegrityVerifier;
use crate::metrics::{DetectionMetrics, MetricsReport};
use crate::settings::DetectionSettings;
use crate::types::{
    DetectionMethod, DetectionPreferences, DetectionResult, LanguageCandidate, VoiceOption,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Confidence assigned when the process default is substituted for an
/// unconfident result.
const DEFAULT_SUBSTITUTE_CONFIDENCE: f64 = 0.3;

/// How many classifier runners-up are surfaced as alternatives.
const MAX_FALLBACK_ALTERNATIVES: usize = 3;

/// The detection façade. Explicitly constructed and dependency-injected;
/// holds no global state.
pub struct LanguageDetectionService {
    settings: DetectionSettings,
    registry: Arc<LanguageRegistry>,
    classifier: FrequencyClassifier,
    ensemble: EnsembleDetector,
    cache: Box<dyn ResultCache<DetectionResult>>,
    metrics: DetectionMetrics,
}

impl LanguageDetectionService {
    /// Wire up a service from settings and an explicit adapter list.
    ///
    /// Fails when the security level demands an integrity key and none is
    /// available. Call [`initialize`](Self::initialize) before detecting.
    pub fn new(
        settings: DetectionSettings,
        adapters: Vec<Arc<dyn DetectorAdapter>>,
    ) -> Result<Self> {
        let verifier = IntegrityVerifier::new(
            settings.security_level,
            settings.resolved_integrity_key(),
        )?;
        let registry = Arc::new(LanguageRegistry::new(verifier, settings.max_record_bytes));
        let classifier =
            FrequencyClassifier::new(Arc::clone(&registry), settings.default_language.clone());
        let ensemble = EnsembleDetector::new(adapters, settings.adapter_timeout);

        let cache: Box<dyn ResultCache<DetectionResult>> = if settings.cache_enabled {
            Box::new(TtlCache::new(
                settings.cache_ttl,
                settings.cache_max_entries,
                settings.cache_key_max_len,
            ))
        } else {
            Box::new(NoopCache)
        };

        Ok(Self {
            settings,
            registry,
            classifier,
            ensemble,
            cache,
            metrics: DetectionMetrics::new(),
        })
    }

    /// Load the catalogue. Must run before the first detection; fails only
    /// on a configuration error (no usable languages).
    pub async fn initialize(&self, source: &dyn ConfigSource) -> Result<usize> {
        let served = self.registry.initialize(source).await?;

        if self.registry.get_by_code(&self.settings.default_language).is_none() {
            return Err(LanguageError::Configuration(format!(
                "default language '{}' is not in the catalogue",
                self.settings.default_language
            )));
        }

        info!(
            "language detection service ready: {} languages, {} adapters",
            served,
            self.ensemble.len()
        );
        Ok(served)
    }

    /// Rebuild the catalogue from the source and swap it in atomically.
    /// The cache is cleared so stale results cannot outlive their records.
    pub async fn reload(&self, source: &dyn ConfigSource) -> Result<usize> {
        let served = self.registry.reload(source).await?;
        self.cache.clear();
        Ok(served)
    }

    /// Release per-request state. The catalogue snapshot stays valid for
    /// readers that still hold it.
    pub fn shutdown(&self) {
        self.cache.clear();
        info!("language detection service shut down");
    }

    // ==================== Detection ====================

    /// Detect the language of `text`, honoring caller preferences.
    ///
    /// Never fails: every error path inside the pipeline degrades to a less
    /// confident result instead of surfacing to the caller.
    pub async fn detect(
        &self,
        text: &str,
        preferences: Option<&DetectionPreferences>,
    ) -> DetectionResult {
        let start = Instant::now();

        let trimmed = text.trim();
        let input: String = if trimmed.chars().count() > self.settings.max_text_length {
            trimmed.chars().take(self.settings.max_text_length).collect()
        } else {
            trimmed.to_string()
        };

        if input.is_empty() {
            let mut result = self.empty_input_result(preferences);
            result.processing_time_ms = elapsed_ms(start);
            self.metrics.record_detection(&result);
            return result;
        }

        if let Some(cached) = self.cache.get(&input) {
            self.metrics.record_cache_hit();
            let mut result = cached;
            result.method = DetectionMethod::Cache;
            result.preference_applied = false;
            self.apply_preferences(&mut result, preferences);
            result.processing_time_ms = elapsed_ms(start);
            self.metrics.record_detection(&result);
            debug!("cache hit: {} ({:.2})", result.language_code, result.confidence);
            return result;
        }
        self.metrics.record_cache_miss();

        let vote = self.ensemble.vote(&input).await;
        let mut raw = self.decide(vote, &input);
        raw.processing_time_ms = elapsed_ms(start);

        // Cached results are preference-agnostic: the raw detection is
        // stored, and preferences apply strictly after the cache stage.
        self.cache.put(&input, raw.clone());

        let mut result = raw;
        self.apply_preferences(&mut result, preferences);
        result.processing_time_ms = elapsed_ms(start);
        self.metrics.record_detection(&result);

        debug!(
            "detected {} ({:.2}) via {} in {:.2}ms",
            result.language_code,
            result.confidence,
            result.method_tag(),
            result.processing_time_ms
        );
        result
    }

    /// Decision rule: accept a confident ensemble vote; otherwise keep the
    /// better of {ensemble, statistical fallback}; below the absolute floor,
    /// substitute the process default.
    fn decide(&self, vote: Option<EnsembleVote>, input: &str) -> DetectionResult {
        // A confident vote for a catalogued language short-circuits
        if let Some(v) = &vote {
            if v.confidence >= self.settings.detection_threshold {
                if let Some(config) = self.registry.get_by_code(&v.code) {
                    return self.result_from(
                        &config,
                        v.confidence,
                        DetectionMethod::External,
                        v.alternatives.clone(),
                    );
                }
            }
        }

        let ranked = self.classifier.classify(input);

        let ensemble_choice = vote.as_ref().and_then(|v| {
            self.registry
                .get_by_code(&v.code)
                .map(|config| (config, v.confidence, v.alternatives.clone()))
        });

        let fallback_choice = ranked.first().and_then(|best| {
            self.registry.get_by_code(&best.code).map(|config| {
                let alternatives: Vec<LanguageCandidate> = ranked
                    .iter()
                    .skip(1)
                    .take(MAX_FALLBACK_ALTERNATIVES)
                    .cloned()
                    .collect();
                (config, best.confidence, alternatives)
            })
        });

        let (config, confidence, method, alternatives) = match (ensemble_choice, fallback_choice) {
            (Some((ec, econf, ealts)), Some((_, fconf, _))) if econf >= fconf => {
                (ec, econf, DetectionMethod::External, ealts)
            }
            (_, Some((fc, fconf, falts))) => (fc, fconf, DetectionMethod::Fallback, falts),
            (Some((ec, econf, ealts)), None) => (ec, econf, DetectionMethod::External, ealts),
            (None, None) => return self.default_substitute(Vec::new()),
        };

        if confidence < self.settings.confidence_floor {
            let rejected = vec![LanguageCandidate {
                code: config.code,
                confidence,
            }];
            return self.default_substitute(rejected);
        }

        self.result_from(&config, confidence, method, alternatives)
    }

    /// Empty input short-circuits to the caller's preferred language, or the
    /// process default, at full confidence.
    fn empty_input_result(&self, preferences: Option<&DetectionPreferences>) -> DetectionResult {
        let preferred = preferences
            .and_then(|p| p.language.as_deref())
            .and_then(|code| match preferences.and_then(|p| p.region.as_deref()) {
                Some(region) => self.registry.get_by_region(code, region),
                None => self.registry.get_by_code(code),
            });

        let config = preferred.unwrap_or_else(|| self.default_config());
        self.result_from(&config, 1.0, DetectionMethod::Default, Vec::new())
    }

    /// The process default at low confidence, tagged `default`.
    fn default_substitute(&self, alternatives: Vec<LanguageCandidate>) -> DetectionResult {
        let config = self.default_config();
        self.result_from(
            &config,
            DEFAULT_SUBSTITUTE_CONFIDENCE,
            DetectionMethod::Default,
            alternatives,
        )
    }

    /// Resolve the configured default language, degrading to the first
    /// enabled record and finally to a synthesized record so detection can
    /// always answer.
    fn default_config(&self) -> LanguageConfig {
        self.registry
            .get_by_code(&self.settings.default_language)
            .or_else(|| self.registry.enabled().into_iter().next())
            .unwrap_or_else(|| {
                LanguageConfig::new(
                    self.settings.default_language.clone(),
                    self.settings.default_language.clone(),
                    self.settings.default_language.to_uppercase(),
                )
            })
    }

    fn result_from(
        &self,
        config: &LanguageConfig,
        confidence: f64,
        method: DetectionMethod,
        alternatives: Vec<LanguageCandidate>,
    ) -> DetectionResult {
        DetectionResult {
            language_code: config.code.clone(),
            locale: config.locale.clone(),
            name: config.name.clone(),
            rtl: config.rtl,
            region_code: config.region.code.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            method,
            preference_applied: false,
            processing_time_ms: 0.0,
            alternatives,
        }
    }

    /// Preference override: switch to the caller's preferred language when
    /// the detection was not confident, and re-resolve the region either
    /// way. Confidence is never altered here.
    fn apply_preferences(
        &self,
        result: &mut DetectionResult,
        preferences: Option<&DetectionPreferences>,
    ) {
        let Some(preferences) = preferences else {
            return;
        };

        if let Some(preferred) = preferences.language.as_deref() {
            if preferred != result.language_code
                && result.confidence < self.settings.preference_threshold
            {
                if let Some(config) = self.registry.get_by_code(preferred) {
                    result.alternatives.retain(|a| a.code != preferred);
                    result.alternatives.insert(
                        0,
                        LanguageCandidate {
                            code: result.language_code.clone(),
                            confidence: result.confidence,
                        },
                    );
                    result.language_code = config.code;
                    result.locale = config.locale;
                    result.name = config.name;
                    result.rtl = config.rtl;
                    result.region_code = config.region.code;
                    result.preference_applied = true;
                }
            }
        }

        if let Some(region) = preferences.region.as_deref() {
            if let Some(config) = self.registry.get_by_region(&result.language_code, region) {
                result.locale = config.locale;
                result.name = config.name;
                result.rtl = config.rtl;
                result.region_code = config.region.code;
            }
        }
    }

    // ==================== Catalogue & Formatting ====================

    /// The canonical record for a language code.
    pub fn get_language(&self, code: &str) -> Option<LanguageConfig> {
        self.registry.get_by_code(code)
    }

    /// Direct access to the underlying registry.
    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    /// Voices available for a language, optionally filtered by gender.
    pub fn get_voice_options(&self, code: &str, gender: Option<Gender>) -> Result<Vec<VoiceOption>> {
        let config = self
            .registry
            .get_by_code(code)
            .ok_or_else(|| LanguageError::UnknownLanguage(code.to_string()))?;

        Ok(config
            .gender_options
            .iter()
            .filter(|option| gender.map_or(true, |want| option.gender == want))
            .filter_map(|option| {
                option.voice_id.clone().map(|voice_id| VoiceOption {
                    voice_id,
                    gender: option.gender,
                })
            })
            .collect())
    }

    /// Render a timestamp with the language's locale patterns.
    pub fn format_date(
        &self,
        date: &DateTime<Utc>,
        code: &str,
        style: Option<DateStyle>,
    ) -> Result<String> {
        let config = self
            .registry
            .get_by_code(code)
            .ok_or_else(|| LanguageError::UnknownLanguage(code.to_string()))?;
        Ok(format::format_date(date, &config, style.unwrap_or_default()))
    }

    /// Render a number with the language's separators and grouping.
    pub fn format_number(&self, value: f64, code: &str, decimals: Option<usize>) -> Result<String> {
        let config = self
            .registry
            .get_by_code(code)
            .ok_or_else(|| LanguageError::UnknownLanguage(code.to_string()))?;
        Ok(format::format_number(value, &config.formatters.number, decimals))
    }

    /// Render a currency amount with the language's symbol and template.
    pub fn format_currency(&self, value: f64, code: &str) -> Result<String> {
        let config = self
            .registry
            .get_by_code(code)
            .ok_or_else(|| LanguageError::UnknownLanguage(code.to_string()))?;
        Ok(format::format_currency(value, &config))
    }

    // ==================== Metrics ====================

    /// Snapshot the performance metrics.
    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Reset the performance metrics to zero.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
