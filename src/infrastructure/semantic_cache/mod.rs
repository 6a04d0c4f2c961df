//! Semantic response cache implementations

mod context;
mod in_memory;
mod sweeper;

pub use context::ResponseCacheContext;
pub use in_memory::InMemoryResponseCache;
pub use sweeper::CacheSweeper;
