//! Per-session response cache context

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::{CacheSweeper, InMemoryResponseCache};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::semantic_cache::{ResponseCache, ResponseCacheConfig};
use crate::domain::DomainError;

/// Owns one session's response cache together with its expiry sweeper
///
/// Build it once per session and hand out [`ResponseCacheContext::cache`] to
/// whatever sends queries. [`ResponseCacheContext::shutdown`] cancels the
/// sweeper; dropping the context does the same.
#[derive(Debug)]
pub struct ResponseCacheContext<R> {
    cache: Arc<InMemoryResponseCache<R>>,
    sweeper: CacheSweeper,
}

impl<R> ResponseCacheContext<R>
where
    R: Clone + Serialize + Send + Sync + 'static,
{
    /// Create a context on the system clock; must run inside a Tokio runtime
    pub fn new(config: ResponseCacheConfig) -> Result<Self, DomainError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a context reading time from `clock`
    pub fn with_clock(
        config: ResponseCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let period = config.cleanup_interval();
        let cache = Arc::new(InMemoryResponseCache::with_clock(config, clock));
        let sweeper = CacheSweeper::spawn(cache.clone(), period)?;

        info!(
            "Response cache ready (max_entries={}, ttl={:?})",
            cache.config().max_entries,
            cache.config().ttl()
        );

        Ok(Self { cache, sweeper })
    }

    /// Shared handle to the cache
    pub fn cache(&self) -> Arc<InMemoryResponseCache<R>> {
        self.cache.clone()
    }

    /// The cache as a trait object
    pub fn dyn_cache(&self) -> Arc<dyn ResponseCache<R>> {
        self.cache.clone()
    }

    /// Whether the expiry sweeper is still scheduled
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.is_running()
    }

    /// Cancel the sweeper and release the session's cache handle
    pub fn shutdown(mut self) {
        self.sweeper.stop();
        info!("Response cache context shut down");
    }
}
