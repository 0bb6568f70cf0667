//! Detection metrics and observability.
//!
//! Counters accumulate for the lifetime of a service instance and can be
//! reset explicitly. A rising share of `fallback`/`default` results is the
//! signal that upstream detection quality is degrading.

use crate::types::{DetectionMethod, DetectionResult};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Running totals for the detection pipeline.
#[derive(Default)]
pub struct DetectionMetrics {
    /// Total detection calls, whatever the outcome
    detections: AtomicUsize,

    /// Number of times a result was served from the cache
    cache_hits: AtomicUsize,

    /// Number of times the cache had nothing usable
    cache_misses: AtomicUsize,

    /// Results produced by the adapter ensemble
    external_results: AtomicUsize,

    /// Results produced by the statistical classifier
    fallback_results: AtomicUsize,

    /// Results where the process default was substituted
    default_results: AtomicUsize,

    /// Results where a caller preference replaced the detected language
    preference_overrides: AtomicUsize,

    /// Cumulative processing time across all calls, in microseconds
    total_latency_micros: AtomicU64,
}

impl DetectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit (result served from cache).
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss (full pipeline ran).
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished detection, whatever its outcome.
    pub fn record_detection(&self, result: &DetectionResult) {
        self.detections.fetch_add(1, Ordering::Relaxed);
        self.total_latency_micros.fetch_add(
            (result.processing_time_ms * 1000.0) as u64,
            Ordering::Relaxed,
        );

        let counter = match result.method {
            DetectionMethod::Cache => None,
            DetectionMethod::External => Some(&self.external_results),
            DetectionMethod::Fallback => Some(&self.fallback_results),
            DetectionMethod::Default => Some(&self.default_results),
        };
        if let Some(counter) = counter {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        if result.preference_applied {
            self.preference_overrides.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot the current totals.
    pub fn report(&self) -> MetricsReport {
        let detections = self.detections.load(Ordering::Relaxed);
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total_micros = self.total_latency_micros.load(Ordering::Relaxed);

        let cache_queries = hits + misses;
        let cache_hit_rate = if cache_queries > 0 {
            (hits as f64 / cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let total_latency_ms = total_micros as f64 / 1000.0;
        let average_latency_ms = if detections > 0 {
            total_latency_ms / detections as f64
        } else {
            0.0
        };

        MetricsReport {
            detections,
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            total_latency_ms,
            average_latency_ms,
            external_results: self.external_results.load(Ordering::Relaxed),
            fallback_results: self.fallback_results.load(Ordering::Relaxed),
            default_results: self.default_results.load(Ordering::Relaxed),
            preference_overrides: self.preference_overrides.load(Ordering::Relaxed),
        }
    }

    /// Reset every counter to zero.
    pub fn reset(&self) {
        self.detections.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.external_results.store(0, Ordering::Relaxed);
        self.fallback_results.store(0, Ordering::Relaxed);
        self.default_results.store(0, Ordering::Relaxed);
        self.preference_overrides.store(0, Ordering::Relaxed);
        self.total_latency_micros.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total detection calls
    pub detections: usize,

    /// Number of cache hits
    pub cache_hits: usize,

    /// Number of cache misses
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    /// Cumulative processing time in milliseconds
    pub total_latency_ms: f64,

    /// Average processing time per call in milliseconds
    pub average_latency_ms: f64,

    /// Results produced by the adapter ensemble
    pub external_results: usize,

    /// Results produced by the statistical classifier
    pub fallback_results: usize,

    /// Results where the process default was substituted
    pub default_results: usize,

    /// Results where a caller preference replaced the detected language
    pub preference_overrides: usize,
}
