//! Ensemble adapter layer: pluggable detectors combined by majority vote.
//!
//! Adapters are supplied at construction time; the core has no runtime
//! dependency on which detection libraries happen to be present. Every
//! adapter runs concurrently under its own timeout, and a timeout, panic, or
//! `None` answer is an abstention, never an error.

use crate::types::LanguageCandidate;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A single language-identification strategy.
///
/// Returns the detected ISO 639-1 code, or `None` to abstain.
#[async_trait]
pub trait DetectorAdapter: Send + Sync {
    /// Adapter name, for log messages.
    fn name(&self) -> &str;

    /// Detect the language of the text, or abstain.
    async fn detect(&self, text: &str) -> Option<String>;
}

/// The aggregated outcome of one ensemble round.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleVote {
    /// Winning language code
    pub code: String,
    /// Winner's vote share among non-abstaining adapters
    pub confidence: f64,
    /// Every other distinct answer with its vote share
    pub alternatives: Vec<LanguageCandidate>,
}

/// Runs registered adapters concurrently and aggregates their answers.
pub struct EnsembleDetector {
    adapters: Vec<Arc<dyn DetectorAdapter>>,
    timeout: Duration,
}

impl EnsembleDetector {
    pub fn new(adapters: Vec<Arc<dyn DetectorAdapter>>, timeout: Duration) -> Self {
        Self { adapters, timeout }
    }

    /// Whether any adapters are registered at all.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Run every adapter under its own timeout and majority-vote the
    /// answers. `None` when no adapters are registered or all abstain.
    pub async fn vote(&self, text: &str) -> Option<EnsembleVote> {
        if self.adapters.is_empty() {
            return None;
        }

        let text: Arc<str> = Arc::from(text);
        let handles: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                let text = Arc::clone(&text);
                let timeout = self.timeout;
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, adapter.detect(&text)).await {
                        Ok(answer) => answer,
                        Err(_) => {
                            warn!("detector '{}' timed out after {:?}", adapter.name(), timeout);
                            None
                        }
                    }
                })
            })
            .collect();

        let mut answers = Vec::with_capacity(handles.len());
        for joined in futures::future::join_all(handles).await {
            match joined {
                Ok(answer) => answers.push(answer),
                Err(e) => {
                    // A panicking adapter abstains like any other failure
                    warn!("detector task failed: {}", e);
                    answers.push(None);
                }
            }
        }

        let vote = aggregate(answers.into_iter().flatten().collect());
        debug!("ensemble vote over {} adapters: {:?}", self.adapters.len(), vote);
        vote
    }
}

/// Majority vote over non-abstaining answers, ties broken by first-seen
/// order. Confidence is the winner's share of the non-abstaining total.
fn aggregate(answers: Vec<String>) -> Option<EnsembleVote> {
    if answers.is_empty() {
        return None;
    }
    let total = answers.len() as f64;

    // First-seen order decides ties, so tally in arrival order
    let mut tally: Vec<(String, usize)> = Vec::new();
    for answer in answers {
        match tally.iter_mut().find(|(code, _)| *code == answer) {
            Some((_, count)) => *count += 1,
            None => tally.push((answer, 1)),
        }
    }

    let mut winner_idx = 0;
    for (idx, (_, count)) in tally.iter().enumerate() {
        if *count > tally[winner_idx].1 {
            winner_idx = idx;
        }
    }

    let (code, count) = tally.remove(winner_idx);
    let alternatives = tally
        .into_iter()
        .map(|(code, count)| LanguageCandidate {
            code,
            confidence: count as f64 / total,
        })
        .collect();

    Some(EnsembleVote {
        code,
        confidence: count as f64 / total,
        alternatives,
    })
}

/// The built-in adapters enabled by cargo features, in a stable order.
pub fn default_adapters() -> Vec<Arc<dyn DetectorAdapter>> {
    #[allow(unused_mut)]
    let mut adapters: Vec<Arc<dyn DetectorAdapter>> = Vec::new();

    #[cfg(feature = "whatlang")]
    adapters.push(Arc::new(WhatlangAdapter));

    #[cfg(feature = "whichlang")]
    adapters.push(Arc::new(WhichlangAdapter));

    adapters
}

// ==================== Built-in Adapters ====================

/// Trigram-based detection via the `whatlang` crate.
///
/// Abstains on unreliable detections and on languages outside the ISO 639-1
/// mapping below.
#[cfg(feature = "whatlang")]
pub struct WhatlangAdapter;

#[cfg(feature = "whatlang")]
#[async_trait]
impl DetectorAdapter for WhatlangAdapter {
    fn name(&self) -> &str {
        "whatlang"
    }

    async fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        if !info.is_reliable() {
            return None;
        }
        whatlang_code(info.lang()).map(str::to_string)
    }
}

#[cfg(feature = "whatlang")]
fn whatlang_code(lang: whatlang::Lang) -> Option<&'static str> {
    use whatlang::Lang;

    Some(match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Nld => "nl",
        Lang::Tur => "tr",
        Lang::Pol => "pl",
        Lang::Swe => "sv",
        Lang::Vie => "vi",
        Lang::Ukr => "uk",
        Lang::Heb => "he",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Ell => "el",
        Lang::Ces => "cs",
        Lang::Ron => "ro",
        Lang::Hun => "hu",
        Lang::Tha => "th",
        Lang::Ind => "id",
        _ => return None,
    })
}

/// Fast detection via the `whichlang` crate. Always answers, so it never
/// abstains on supported text.
#[cfg(feature = "whichlang")]
pub struct WhichlangAdapter;

#[cfg(feature = "whichlang")]
#[async_trait]
impl DetectorAdapter for WhichlangAdapter {
    fn name(&self) -> &str {
        "whichlang"
    }

    async fn detect(&self, text: &str) -> Option<String> {
        use whichlang::Lang;

        let code = match whichlang::detect_language(text) {
            Lang::Ara => "ar",
            Lang::Cmn => "zh",
            Lang::Deu => "de",
            Lang::Eng => "en",
            Lang::Fra => "fr",
            Lang::Hin => "hi",
            Lang::Ita => "it",
            Lang::Jpn => "ja",
            Lang::Kor => "ko",
            Lang::Nld => "nl",
            Lang::Por => "pt",
            Lang::Rus => "ru",
            Lang::Spa => "es",
            Lang::Swe => "sv",
            Lang::Tur => "tr",
            Lang::Vie => "vi",
        };
        Some(code.to_string())
    }
}
