//! Cache-first response service
//!
//! Answers queries from the response cache when an exact or semantically
//! similar query was seen before, and falls through to the provider otherwise.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::provider::ResponseProvider;
use crate::domain::semantic_cache::{CacheStats, MatchKind, ResponseCache, ResponseCacheConfig};
use crate::domain::DomainError;

/// Where a response came from
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSource {
    /// Served from the cache
    Cache {
        kind: MatchKind,
        similarity: f64,
        matched_query: String,
    },
    /// Produced by the provider
    Provider,
}

/// Response with its provenance
#[derive(Debug, Clone)]
pub struct CachedResponse<R> {
    pub response: R,
    pub source: ResponseSource,
}

impl<R> CachedResponse<R> {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, ResponseSource::Cache { .. })
    }
}

/// Response service that consults the cache before the provider
pub struct CachedResponder<R: Send + Sync + 'static> {
    cache: Arc<dyn ResponseCache<R>>,
    provider: Arc<dyn ResponseProvider<R>>,
    config: ResponseCacheConfig,
}

impl<R: Send + Sync + 'static> fmt::Debug for CachedResponder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedResponder")
            .field("cache", &self.cache)
            .field("provider", &self.provider.provider_name())
            .field("enabled", &self.config.enabled)
            .finish()
    }
}

impl<R> CachedResponder<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Create a new responder
    pub fn new(cache: Arc<dyn ResponseCache<R>>, provider: Arc<dyn ResponseProvider<R>>) -> Self {
        Self::with_config(cache, provider, ResponseCacheConfig::default())
    }

    /// Create a new responder with custom config
    pub fn with_config(
        cache: Arc<dyn ResponseCache<R>>,
        provider: Arc<dyn ResponseProvider<R>>,
        config: ResponseCacheConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            config,
        }
    }

    /// Check if caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Answer a query, from the cache when possible
    pub async fn respond(&self, query: &str) -> Result<CachedResponse<R>, DomainError> {
        if self.config.enabled {
            match self.cache.lookup(query) {
                Ok(Some(hit)) => {
                    return Ok(CachedResponse {
                        response: hit.response,
                        source: ResponseSource::Cache {
                            kind: hit.kind,
                            similarity: hit.similarity,
                            matched_query: hit.matched_query,
                        },
                    });
                }
                Ok(None) => {}
                Err(e) => warn!("Response cache lookup failed, using provider: {}", e),
            }
        }

        let response = self.provider.generate(query).await?;

        if self.config.enabled {
            if let Err(e) = self.cache.store(query, response.clone()) {
                warn!("Failed to cache response: {}", e);
            }
        }

        debug!(
            "Response for query produced by provider {}",
            self.provider.provider_name()
        );

        Ok(CachedResponse {
            response,
            source: ResponseSource::Provider,
        })
    }

    /// Cached queries close enough to `query` to be worth prefetching
    pub fn preload_candidates(&self, query: &str) -> Vec<String> {
        if !self.config.enabled {
            return Vec::new();
        }

        self.cache.preload_candidates(query).unwrap_or_else(|e| {
            warn!("Failed to compute preload candidates: {}", e);
            Vec::new()
        })
    }

    /// Invalidate all cached responses
    pub fn invalidate_all(&self) -> Result<(), DomainError> {
        self.cache.clear()
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats, DomainError> {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::provider::MockResponseProvider;
    use crate::infrastructure::semantic_cache::InMemoryResponseCache;
    use serde_json::{json, Value};

    fn create_cache() -> Arc<InMemoryResponseCache<Value>> {
        let config = ResponseCacheConfig::default().with_cleanup_probability(0.0);
        Arc::new(InMemoryResponseCache::with_clock(
            config,
            Arc::new(ManualClock::new(1_700_000_000_000)),
        ))
    }

    fn create_provider(times: usize) -> MockResponseProvider<Value> {
        let mut provider = MockResponseProvider::new();
        provider
            .expect_generate()
            .times(times)
            .returning(|query| Ok(json!({"answer": format!("fresh: {}", query)})));
        provider.expect_provider_name().return_const("mock");
        provider
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = create_cache();
        let responder = CachedResponder::<Value>::new(cache.clone(), Arc::new(create_provider(1)));

        let first = responder
            .respond("What is the capital of France")
            .await
            .unwrap();
        assert!(!first.is_cached());
        assert_eq!(first.source, ResponseSource::Provider);

        let second = responder.respond("capital of France").await.unwrap();
        assert!(second.is_cached());
        assert_eq!(second.response, first.response);
        match second.source {
            ResponseSource::Cache {
                kind,
                matched_query,
                ..
            } => {
                assert_eq!(kind, MatchKind::Semantic);
                assert_eq!(matched_query, "What is the capital of France");
            }
            ResponseSource::Provider => panic!("expected a cache hit"),
        }

        let stats = responder.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_disabled_always_uses_provider() {
        let cache = create_cache();
        let config = ResponseCacheConfig::default().with_enabled(false);
        let responder =
            CachedResponder::<Value>::with_config(cache.clone(), Arc::new(create_provider(2)), config);

        assert!(!responder.is_enabled());
        responder.respond("weather in Lisbon").await.unwrap();
        responder.respond("weather in Lisbon").await.unwrap();

        assert_eq!(cache.len().unwrap(), 0);
        assert!(responder.preload_candidates("weather in Lisbon").is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated_and_not_cached() {
        let cache = create_cache();
        let mut provider = MockResponseProvider::<Value>::new();
        provider
            .expect_generate()
            .returning(|_| Err(DomainError::provider("mock", "backend unavailable")));
        provider.expect_provider_name().return_const("mock");
        let responder = CachedResponder::<Value>::new(cache.clone(), Arc::new(provider));

        let result = responder.respond("weather in Lisbon").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_uncacheable_query_goes_to_provider_each_time() {
        let cache = create_cache();
        let responder = CachedResponder::<Value>::new(cache.clone(), Arc::new(create_provider(2)));

        responder.respond("hi").await.unwrap();
        let again = responder.respond("hi").await.unwrap();

        assert!(!again.is_cached());
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = create_cache();
        let responder = CachedResponder::<Value>::new(cache.clone(), Arc::new(create_provider(2)));

        responder.respond("weather in Lisbon").await.unwrap();
        responder.invalidate_all().unwrap();
        let after = responder.respond("weather in Lisbon").await.unwrap();

        assert!(!after.is_cached());
    }
}
