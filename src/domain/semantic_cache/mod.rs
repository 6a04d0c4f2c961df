//! Semantic response cache domain models and traits
//!
//! Matches queries either on their normalized text or on TF-IDF similarity,
//! so that rephrased questions can reuse an earlier response.

mod config;
mod entry;
mod key;
mod repository;

pub use config::ResponseCacheConfig;
pub use entry::{CacheEntry, EntryState};
pub use key::{normalize_query, QueryPolicy};
pub use repository::{CacheHit, CacheStats, MatchKind, ResponseCache};
