//! Semantic response cache
//!
//! Reuses expensive responses for repeated or rephrased queries:
//! - Exact matching on normalized query text
//! - TF-IDF cosine similarity for paraphrases
//! - LRU batch eviction, per-entry TTL and background expiry sweeps
//! - Virtualized list windowing for rendering long transcripts

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    CacheHit, CacheStats, Clock, DomainError, MatchKind, ResponseCache, ResponseCacheConfig,
    ResponseProvider,
};
pub use infrastructure::semantic_cache::{InMemoryResponseCache, ResponseCacheContext};
pub use infrastructure::services::{CachedResponder, CachedResponse, ResponseSource};
