//! Domain layer - Core types, traits and algorithms

pub mod clock;
pub mod embedding;
pub mod error;
pub mod provider;
pub mod semantic_cache;
pub mod virtual_list;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DomainError;
pub use provider::ResponseProvider;
pub use semantic_cache::{
    CacheEntry, CacheHit, CacheStats, MatchKind, ResponseCache, ResponseCacheConfig,
};
pub use virtual_list::{FollowBottom, VirtualItem, VirtualListLayout, VisibleRange};
