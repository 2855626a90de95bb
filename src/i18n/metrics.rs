//! Lookup metrics for a catalog.
//!
//! Counts resolved lookups, bracketed fallbacks and language switches so
//! tooling can report how much of a UI is still untranslated.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by one catalog instance.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Lookups that found a value in the current table
    hits: AtomicUsize,

    /// Lookups that fell back to the bracketed key
    fallbacks: AtomicUsize,

    /// Language switches that changed the current language
    switches: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch(&self) {
        self.switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn switches(&self) -> usize {
        self.switches.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let total = hits + fallbacks;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            fallbacks,
            hit_rate,
            switches: self.switches(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.switches.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of lookup metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub fallbacks: usize,
    /// Percentage of lookups that resolved (0.0 when nothing was looked up)
    pub hit_rate: f64,
    pub switches: usize,
}

impl MetricsReport {
    /// Format the report as a single log line.
    pub fn format(&self) -> String {
        format!(
            "Lookups: {} hits, {} fallbacks ({:.1}% resolved) | Language switches: {}",
            self.hits, self.fallbacks, self.hit_rate, self.switches
        )
    }
}
