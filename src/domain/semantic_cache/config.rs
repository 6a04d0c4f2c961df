//! Response cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the semantic response cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseCacheConfig {
    /// Whether response caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Similarity threshold for cache hits (0.0 to 1.0)
    /// Higher values require more similar queries
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Stricter threshold used when proposing queries to prefetch
    #[serde(default = "default_preload_threshold")]
    pub preload_threshold: f64,

    /// Maximum number of preload candidates returned per query
    #[serde(default = "default_max_preload_candidates")]
    pub max_preload_candidates: usize,

    /// Maximum number of entries to store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Default time-to-live for cached entries in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Share of entries evicted at once when the cache is full
    #[serde(default = "default_eviction_fraction")]
    pub eviction_fraction: f64,

    /// Queries shorter than this (in characters, after trimming) are not cached
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,

    /// Queries longer than this (in characters, after trimming) are not cached
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Chance that a lookup also sweeps expired entries
    #[serde(default = "default_cleanup_probability")]
    pub cleanup_probability: f64,

    /// Period of the background expiry sweep in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_preload_threshold() -> f64 {
    0.9
}

fn default_max_preload_candidates() -> usize {
    3
}

fn default_max_entries() -> usize {
    100
}

fn default_ttl_secs() -> u64 {
    1800
}

fn default_eviction_fraction() -> f64 {
    0.2
}

fn default_min_query_length() -> usize {
    3
}

fn default_max_query_length() -> usize {
    2000
}

fn default_cleanup_probability() -> f64 {
    0.1
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            similarity_threshold: default_similarity_threshold(),
            preload_threshold: default_preload_threshold(),
            max_preload_candidates: default_max_preload_candidates(),
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
            eviction_fraction: default_eviction_fraction(),
            min_query_length: default_min_query_length(),
            max_query_length: default_max_query_length(),
            cleanup_probability: default_cleanup_probability(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl ResponseCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Get the sweep period as Duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Number of entries removed by one capacity eviction pass over `len` entries
    pub fn eviction_batch(&self, len: usize) -> usize {
        let batch = (len as f64 * self.eviction_fraction).ceil() as usize;
        batch.clamp(1, len.max(1))
    }

    /// Set whether caching is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the preload threshold
    pub fn with_preload_threshold(mut self, threshold: f64) -> Self {
        self.preload_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the maximum number of preload candidates
    pub fn with_max_preload_candidates(mut self, max: usize) -> Self {
        self.max_preload_candidates = max;
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the default TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    /// Set the eviction fraction
    pub fn with_eviction_fraction(mut self, fraction: f64) -> Self {
        self.eviction_fraction = fraction;
        self
    }

    /// Set the accepted query length range (in characters)
    pub fn with_query_length(mut self, min: usize, max: usize) -> Self {
        self.min_query_length = min;
        self.max_query_length = max;
        self
    }

    /// Set the read-time sweep probability
    pub fn with_cleanup_probability(mut self, probability: f64) -> Self {
        self.cleanup_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the background sweep period
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = interval.as_secs();
        self
    }

    /// Reject settings the cache cannot operate with
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::configuration(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.preload_threshold) {
            return Err(DomainError::configuration(format!(
                "preload_threshold must be within [0, 1], got {}",
                self.preload_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.cleanup_probability) {
            return Err(DomainError::configuration(format!(
                "cleanup_probability must be within [0, 1], got {}",
                self.cleanup_probability
            )));
        }

        if self.max_entries == 0 {
            return Err(DomainError::configuration("max_entries must be positive"));
        }

        if !(self.eviction_fraction > 0.0 && self.eviction_fraction <= 1.0) {
            return Err(DomainError::configuration(format!(
                "eviction_fraction must be within (0, 1], got {}",
                self.eviction_fraction
            )));
        }

        if self.min_query_length > self.max_query_length {
            return Err(DomainError::configuration(format!(
                "min_query_length ({}) exceeds max_query_length ({})",
                self.min_query_length, self.max_query_length
            )));
        }

        if self.cleanup_interval_secs == 0 {
            return Err(DomainError::configuration(
                "cleanup_interval_secs must be positive",
            ));
        }

        Ok(())
    }
}
