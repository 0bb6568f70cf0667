//! Language registry: validated, integrity-checked catalogue of languages.
//!
//! The registry pulls raw records from a [`ConfigSource`], validates and
//! integrity-checks each one (discarding failures individually), and serves
//! the survivors as an immutable snapshot. Reloads build a fresh snapshot and
//! swap it atomically, so readers never observe a partially updated
//! catalogue.

use crate::catalogue::defaults::builtin_catalogue;
use crate::catalogue::{ConfigSource, GenderOption, LanguageConfig};
use crate::error::{LanguageError, Result};
use crate::format::validate_strftime;
use crate::integrity::IntegrityVerifier;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::{info, warn};

// Code and locale share the same shape: "en" or "en-US"
static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    CODE_REGEX.get_or_init(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap())
}

/// An immutable, validated view of the catalogue.
#[derive(Default)]
struct Catalogue {
    records: Vec<LanguageConfig>,
    /// code -> index of the canonical record (first valid wins); later
    /// records with the same code are reachable as regional variants only.
    canonical: HashMap<String, usize>,
}

impl Catalogue {
    fn index(records: Vec<LanguageConfig>) -> Self {
        let mut canonical = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            canonical.entry(record.code.clone()).or_insert(idx);
        }
        Self { records, canonical }
    }
}

/// Loads, validates, and serves the language catalogue.
pub struct LanguageRegistry {
    verifier: IntegrityVerifier,
    max_record_bytes: usize,
    snapshot: RwLock<Arc<Catalogue>>,
}

impl LanguageRegistry {
    /// Create an empty registry. Call [`initialize`](Self::initialize) to
    /// load the catalogue before serving lookups.
    pub fn new(verifier: IntegrityVerifier, max_record_bytes: usize) -> Self {
        Self {
            verifier,
            max_record_bytes,
            snapshot: RwLock::new(Arc::new(Catalogue::default())),
        }
    }

    /// Load the catalogue from the source, falling back to the baked-in
    /// defaults when zero valid records survive. Returns the number of
    /// records served.
    ///
    /// A source that cannot be reached at all is treated the same as a
    /// source with zero valid records: the process keeps starting on the
    /// defaults rather than failing.
    pub async fn initialize(&self, source: &dyn ConfigSource) -> Result<usize> {
        let raw = match source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("config source unavailable ({}); using built-in defaults", e);
                Vec::new()
            }
        };

        let total = raw.len();
        let mut records = Vec::with_capacity(total);
        for value in raw {
            match self.admit_record(value) {
                Ok(config) => records.push(config),
                Err(e) => warn!("skipping language record: {}", e),
            }
        }

        if records.is_empty() {
            warn!(
                "no valid language records from {}; falling back to built-in defaults",
                source.describe()
            );
            records = self.stamped_defaults();
        }

        info!(
            "language catalogue loaded: {} records served ({} candidates from {})",
            records.len(),
            total,
            source.describe()
        );

        let catalogue = Catalogue::index(records);
        if !catalogue.records.iter().any(|r| r.enabled) {
            return Err(LanguageError::Configuration(
                "no enabled languages after load and defaults".to_string(),
            ));
        }

        let served = catalogue.records.len();
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(catalogue);
        Ok(served)
    }

    /// Rebuild the catalogue from the source and swap it in atomically.
    pub async fn reload(&self, source: &dyn ConfigSource) -> Result<usize> {
        self.initialize(source).await
    }

    // ==================== Lookups ====================

    /// The canonical record for a language code. Fails closed (returns
    /// `None`) when the stored record no longer passes its integrity check.
    pub fn get_by_code(&self, code: &str) -> Option<LanguageConfig> {
        let snapshot = self.snapshot();
        let idx = *snapshot.canonical.get(code)?;
        let record = &snapshot.records[idx];
        self.intact(record).then(|| record.clone())
    }

    /// The record whose locale matches exactly.
    pub fn get_by_locale(&self, locale: &str) -> Option<LanguageConfig> {
        let snapshot = self.snapshot();
        snapshot
            .records
            .iter()
            .find(|r| r.locale == locale && self.intact(r))
            .cloned()
    }

    /// The best record for a language within a region: an exact regional
    /// variant first, then a country-code match, then the base language.
    /// Unknown regions therefore resolve to the base record, never an error.
    pub fn get_by_region(&self, code: &str, region: &str) -> Option<LanguageConfig> {
        let snapshot = self.snapshot();

        let variant = snapshot.records.iter().find(|r| {
            (r.code == code || r.base_code() == code)
                && r.region.code.eq_ignore_ascii_case(region)
                && self.intact(r)
        });
        if let Some(record) = variant {
            return Some(record.clone());
        }

        let by_country = snapshot.records.iter().find(|r| {
            (r.code == code || r.base_code() == code)
                && r.region
                    .country_code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(region))
                && self.intact(r)
        });
        if let Some(record) = by_country {
            return Some(record.clone());
        }

        self.get_by_code(code)
    }

    /// All enabled, intact records.
    pub fn enabled(&self) -> Vec<LanguageConfig> {
        self.snapshot()
            .records
            .iter()
            .filter(|r| r.enabled && self.intact(r))
            .cloned()
            .collect()
    }

    /// Every intact record, including disabled ones.
    pub fn all(&self) -> Vec<LanguageConfig> {
        self.snapshot()
            .records
            .iter()
            .filter(|r| self.intact(r))
            .cloned()
            .collect()
    }

    /// The character frequency profile for a language, if it has one.
    pub fn frequency_table(&self, code: &str) -> Option<HashMap<char, f64>> {
        self.get_by_code(code).and_then(|c| c.frequencies)
    }

    /// Number of records in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot().records.len()
    }

    /// Whether the catalogue is empty (i.e., not yet initialized).
    pub fn is_empty(&self) -> bool {
        self.snapshot().records.is_empty()
    }

    // ==================== Internals ====================

    fn snapshot(&self) -> Arc<Catalogue> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Integrity gate applied on every lookup: hashed records must verify;
    /// unhashed records are acceptable only when the level tolerates them.
    fn intact(&self, record: &LanguageConfig) -> bool {
        if record.security_hash.is_some() {
            let ok = self.verifier.verify(record);
            if !ok {
                warn!("language record '{}' failed integrity re-check", record.code);
            }
            ok
        } else {
            !self.verifier.level().requires_hash()
        }
    }

    /// Size-check, parse, validate, and integrity-check one raw record.
    fn admit_record(&self, value: serde_json::Value) -> Result<LanguageConfig> {
        let code_hint = value
            .get("code")
            .and_then(|c| c.as_str())
            .unwrap_or("?")
            .to_string();

        let size = value.to_string().len();
        if size > self.max_record_bytes {
            return Err(LanguageError::Validation {
                code: code_hint,
                reason: format!("record is {} bytes (limit {})", size, self.max_record_bytes),
            });
        }

        let mut config: LanguageConfig =
            serde_json::from_value(value).map_err(|e| LanguageError::Validation {
                code: code_hint,
                reason: format!("malformed record: {}", e),
            })?;

        validate_config(&mut config)?;

        match &config.security_hash {
            Some(_) => {
                if !self.verifier.verify(&config) {
                    return Err(LanguageError::Integrity { code: config.code });
                }
            }
            None => {
                if self.verifier.level().requires_hash() {
                    return Err(LanguageError::Integrity { code: config.code });
                }
            }
        }

        Ok(config)
    }

    /// The built-in catalogue, stamped with fresh hashes so lookups pass the
    /// integrity gate at every security level.
    fn stamped_defaults(&self) -> Vec<LanguageConfig> {
        builtin_catalogue()
            .into_iter()
            .map(|mut config| {
                config.security_hash = Some(self.verifier.create_hash(&config));
                config
            })
            .collect()
    }
}

/// Field validation and normalization shared by every admitted record.
fn validate_config(config: &mut LanguageConfig) -> Result<()> {
    let fail = |code: &str, reason: String| LanguageError::Validation {
        code: code.to_string(),
        reason,
    };

    if !code_regex().is_match(&config.code) {
        return Err(fail(&config.code, "code must match ^[a-z]{2}(-[A-Z]{2})?$".to_string()));
    }
    if !code_regex().is_match(&config.locale) {
        return Err(fail(
            &config.code,
            format!("locale '{}' must match ^[a-z]{{2}}(-[A-Z]{{2}})?$", config.locale),
        ));
    }
    if config.name.trim().is_empty() {
        return Err(fail(&config.code, "name must not be empty".to_string()));
    }
    if !validate_strftime(&config.formatters.date) {
        return Err(fail(
            &config.code,
            format!("invalid date format '{}'", config.formatters.date),
        ));
    }
    if !validate_strftime(&config.formatters.time) {
        return Err(fail(
            &config.code,
            format!("invalid time format '{}'", config.formatters.time),
        ));
    }
    if let Some(freq) = &config.frequencies {
        if freq.values().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(fail(
                &config.code,
                "frequency values must be finite and non-negative".to_string(),
            ));
        }
    }

    // Normalization: every record has at least a neutral gender option and a
    // region code derived from its locale.
    if config.gender_options.is_empty() {
        config.gender_options.push(GenderOption::neutral());
    }
    if config.region.code.is_empty() {
        config.region.code = config
            .locale
            .split('-')
            .nth(1)
            .map(str::to_string)
            .unwrap_or_else(|| config.code.to_uppercase());
    }

    Ok(())
}
