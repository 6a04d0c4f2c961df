//! Response cache trait and types

use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// How a lookup matched its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Normalized query equal to the stored key
    Exact,
    /// TF-IDF cosine similarity above the threshold
    Semantic,
}

/// Result of a successful cache lookup
#[derive(Debug, Clone)]
pub struct CacheHit<R> {
    /// The cached response
    pub response: R,
    /// Query the response was originally stored under
    pub matched_query: String,
    /// Entry ID
    pub entry_id: String,
    /// Similarity score (1.0 for exact matches)
    pub similarity: f64,
    /// How the entry was matched
    pub kind: MatchKind,
}

/// Statistics for the response cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Total entries evicted for capacity
    pub evictions: u64,
    /// Hits plus misses
    pub total_queries: u64,
    /// hits / total_queries, 0 without queries
    pub hit_rate: f64,
    /// Entries physically present, expired ones included
    pub total_entries: usize,
    /// Mean entry age in milliseconds
    pub average_age_ms: f64,
    /// Approximate footprint as the sum of serialized entry sizes
    pub memory_usage_bytes: usize,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn calculate_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits.saturating_add(misses);

        if total == 0 {
            return 0.0;
        }

        hits as f64 / total as f64
    }
}

/// Trait for query/response caches with exact and semantic matching
pub trait ResponseCache<R>: Send + Sync + Debug {
    /// Look up a response with match details
    fn lookup(&self, query: &str) -> Result<Option<CacheHit<R>>, DomainError>;

    /// Look up a response
    fn find(&self, query: &str) -> Result<Option<R>, DomainError> {
        Ok(self.lookup(query)?.map(|hit| hit.response))
    }

    /// Store a response under the default TTL
    fn store(&self, query: &str, response: R) -> Result<(), DomainError>;

    /// Store a response with an explicit TTL
    fn store_with_ttl(&self, query: &str, response: R, ttl: Duration) -> Result<(), DomainError>;

    /// Delete the entry stored under the query's normalized key
    fn remove(&self, query: &str) -> Result<bool, DomainError>;

    /// Clear all entries and counters
    fn clear(&self) -> Result<(), DomainError>;

    /// Get cache statistics
    fn stats(&self) -> Result<CacheStats, DomainError>;

    /// Stored queries similar enough to be worth prefetching
    fn preload_candidates(&self, query: &str) -> Result<Vec<String>, DomainError>;

    /// Clean up expired entries
    fn cleanup_expired(&self) -> Result<usize, DomainError>;

    /// Get the number of entries, expired ones included
    fn len(&self) -> Result<usize, DomainError>;

    fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }
}
