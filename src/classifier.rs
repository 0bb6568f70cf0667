//! Statistical fallback classifier.
//!
//! Scores every enabled language that carries a character frequency profile
//! by comparing it against the observed letter distribution of the input.
//! Used when the adapter ensemble abstains or is not confident enough.

use crate::catalogue::LanguageRegistry;
use crate::types::LanguageCandidate;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Confidence reported when the classifier has nothing to go on (no
/// alphabetic input, or no reference tables) and falls back to the
/// configured language.
const NO_SIGNAL_CONFIDENCE: f64 = 0.25;

/// Character-frequency distance classifier over the catalogue's profiles.
pub struct FrequencyClassifier {
    registry: Arc<LanguageRegistry>,
    fallback_language: String,
}

impl FrequencyClassifier {
    pub fn new(registry: Arc<LanguageRegistry>, fallback_language: impl Into<String>) -> Self {
        Self {
            registry,
            fallback_language: fallback_language.into(),
        }
    }

    /// Rank candidate languages for the input, best first.
    ///
    /// Deterministic: identical input and tables always produce identical
    /// output (ties are broken by code).
    pub fn classify(&self, text: &str) -> Vec<LanguageCandidate> {
        let observed = observed_distribution(text);

        // One profile per code: the canonical record comes first in the
        // snapshot, so later regional variants never shadow it.
        let mut seen = HashSet::new();
        let references: Vec<(String, HashMap<char, f64>)> = self
            .registry
            .enabled()
            .into_iter()
            .filter_map(|config| {
                let table = config.frequencies?;
                seen.insert(config.code.clone()).then_some((config.code, table))
            })
            .collect();

        if observed.is_empty() || references.is_empty() {
            return vec![LanguageCandidate {
                code: self.fallback_language.clone(),
                confidence: NO_SIGNAL_CONFIDENCE,
            }];
        }

        let mut candidates: Vec<LanguageCandidate> = references
            .into_iter()
            .map(|(code, table)| {
                let distance = frequency_distance(&observed, &table);
                LanguageCandidate {
                    code,
                    confidence: (1.0 - distance / 100.0).max(0.0),
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.code.cmp(&b.code))
        });
        candidates
    }
}

/// Percentage frequency of each alphabetic character in the input,
/// lower-cased. Non-alphabetic characters are stripped.
fn observed_distribution(text: &str) -> HashMap<char, f64> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;

    for c in text.chars().filter(|c| c.is_alphabetic()) {
        for lower in c.to_lowercase() {
            *counts.entry(lower).or_insert(0) += 1;
            total += 1;
        }
    }

    if total == 0 {
        return HashMap::new();
    }

    counts
        .into_iter()
        .map(|(c, count)| (c, count as f64 / total as f64 * 100.0))
        .collect()
}

/// Mean absolute difference between observed and expected percentages, over
/// the characters present in the observed text. Characters absent from the
/// reference table count at their full observed weight; reference characters
/// absent from the text are ignored.
fn frequency_distance(observed: &HashMap<char, f64>, expected: &HashMap<char, f64>) -> f64 {
    let total: f64 = observed
        .iter()
        .map(|(c, obs)| (obs - expected.get(c).copied().unwrap_or(0.0)).abs())
        .sum();
    total / observed.len() as f64
}
