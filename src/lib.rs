//! Language identification and locale configuration library.
//!
//! Maintains a verified catalogue of language configurations (locale data,
//! regional variants, formatting rules, voice metadata) and detects the
//! language of arbitrary text by combining pluggable detection adapters with
//! a statistical fallback, a TTL-bounded result cache, and caller-preference
//! overrides.
//!
//! # Architecture
//!
//! - `catalogue`: the validated, integrity-checked language registry
//! - `integrity`: keyed tamper-evident hashing over catalogue records
//! - `cache`: TTL-bounded detection result cache
//! - `classifier`: character-frequency statistical fallback
//! - `ensemble`: concurrent adapter voting with per-adapter timeouts
//! - `service`: the detection façade composing all of the above
//! - `metrics`: per-service performance counters
//! - `format`: locale-aware date/number/currency rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use langsense::{
//!     DetectionPreferences, DetectionSettings, LanguageDetectionService, StaticSource,
//! };
//!
//! # async fn run() -> langsense::Result<()> {
//! let service = LanguageDetectionService::new(
//!     DetectionSettings::default(),
//!     langsense::default_adapters(),
//! )?;
//! service.initialize(&StaticSource::empty()).await?;
//!
//! let result = service.detect("the quick brown fox", None).await;
//! println!("{} ({:.2})", result.language_code, result.confidence);
//!
//! let prefs = DetectionPreferences::language("es");
//! let result = service.detect("hola mundo", Some(&prefs)).await;
//! println!("{}", result.method_tag());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalogue;
pub mod classifier;
pub mod ensemble;
pub mod error;
pub mod format;
pub mod integrity;
pub mod metrics;
pub mod service;
pub mod settings;
pub mod types;

pub use cache::{NoopCache, ResultCache, TtlCache};
pub use catalogue::{
    ConfigSource, Gender, GenderOption, HttpConfigSource, JsonFileSource, LanguageConfig,
    LanguageRegistry, StaticSource,
};
pub use classifier::FrequencyClassifier;
pub use ensemble::{default_adapters, DetectorAdapter, EnsembleDetector, EnsembleVote};
pub use error::{LanguageError, Result};
pub use format::DateStyle;
pub use integrity::{IntegrityVerifier, SecurityLevel};
pub use metrics::{DetectionMetrics, MetricsReport};
pub use service::LanguageDetectionService;
pub use settings::DetectionSettings;
pub use types::{
    DetectionMethod, DetectionPreferences, DetectionResult, LanguageCandidate, VoiceOption,
};
