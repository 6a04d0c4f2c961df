//! In-memory semantic response cache implementation

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::embedding::{calculate_idf, cosine_similarity, create_vector, tokenize, IdfTable};
use crate::domain::semantic_cache::{
    normalize_query, CacheEntry, CacheHit, CacheStats, MatchKind, QueryPolicy, ResponseCache,
    ResponseCacheConfig,
};
use crate::domain::DomainError;

/// Similarity of a live entry to a query
#[derive(Debug, Clone)]
struct ScoredEntry {
    key: String,
    similarity: f64,
    last_accessed: u64,
    sequence: u64,
}

impl ScoredEntry {
    /// Higher similarity first, then most recently accessed, then most recently stored
    fn rank(&self, other: &Self) -> CmpOrdering {
        self.similarity
            .partial_cmp(&other.similarity)
            .unwrap_or(CmpOrdering::Equal)
            .then(self.last_accessed.cmp(&other.last_accessed))
            .then(self.sequence.cmp(&other.sequence))
    }
}

struct CacheState<R> {
    entries: HashMap<String, CacheEntry<R>>,
    idf: IdfTable,
    idf_generation: u64,
    idf_stale: bool,
    /// Earliest expiry among the entries the IDF table was built from
    idf_valid_until: u64,
}

impl<R> CacheState<R> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            idf: IdfTable::default(),
            idf_generation: 0,
            idf_stale: false,
            idf_valid_until: u64::MAX,
        }
    }

    fn refresh_idf(&mut self, now: u64) {
        if !self.idf_stale && !self.idf.is_empty() && now <= self.idf_valid_until {
            return;
        }

        let live: Vec<&CacheEntry<R>> = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .collect();
        let documents: Vec<&[String]> = live.iter().map(|entry| entry.tokens()).collect();

        self.idf_valid_until = live
            .iter()
            .map(|entry| entry.expires_at())
            .min()
            .unwrap_or(u64::MAX);
        self.idf = calculate_idf(&documents);
        self.idf_generation += 1;
        self.idf_stale = false;
    }

    /// Score every live entry against the query tokens
    fn score(&mut self, tokens: &[String], now: u64) -> Vec<ScoredEntry> {
        self.refresh_idf(now);

        let query_vector = create_vector(tokens, &self.idf);
        let generation = self.idf_generation;
        let idf = &self.idf;

        self.entries
            .iter_mut()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, entry)| ScoredEntry {
                key: key.clone(),
                similarity: cosine_similarity(&query_vector, entry.vector(idf, generation)),
                last_accessed: entry.last_accessed(),
                sequence: entry.sequence(),
            })
            .collect()
    }
}

/// In-memory response cache using linear similarity search
pub struct InMemoryResponseCache<R> {
    state: RwLock<CacheState<R>>,
    config: ResponseCacheConfig,
    policy: QueryPolicy,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    next_sequence: AtomicU64,
}

impl<R> fmt::Debug for InMemoryResponseCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryResponseCache")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("evictions", &self.evictions)
            .finish_non_exhaustive()
    }
}

impl<R> InMemoryResponseCache<R>
where
    R: Clone + Serialize + Send + Sync,
{
    /// Create a new cache on the system clock
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new cache reading time from `clock`
    pub fn with_clock(config: ResponseCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(CacheState::new()),
            policy: QueryPolicy::from_config(&config),
            config,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ResponseCacheConfig {
        &self.config
    }

    /// Get a fresh entry by query without touching statistics
    pub fn get_entry(&self, query: &str) -> Result<Option<CacheEntry<R>>, DomainError> {
        let now = self.clock.now_millis();
        let state = self.read_state()?;

        Ok(state
            .entries
            .get(&normalize_query(query))
            .filter(|entry| !entry.is_expired(now))
            .cloned())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, CacheState<R>>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, CacheState<R>>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))
    }

    /// Sweep expired entries with the configured probability
    fn maybe_cleanup(&self) {
        let probability = self.config.cleanup_probability;

        if probability <= 0.0 || rand::thread_rng().r#gen::<f64>() >= probability {
            return;
        }

        if let Err(e) = self.cleanup_expired() {
            warn!("Read-time cache sweep failed: {}", e);
        }
    }

    /// Evict the least recently accessed share of entries
    fn evict_lru(&self, state: &mut CacheState<R>) {
        let batch = self.config.eviction_batch(state.entries.len());

        let mut by_recency: Vec<(u64, u64, String)> = state
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_accessed(), entry.sequence(), key.clone()))
            .collect();
        by_recency.sort_unstable();

        for (_, _, key) in by_recency.into_iter().take(batch) {
            state.entries.remove(&key);
        }

        state.idf_stale = true;
        self.evictions.fetch_add(batch as u64, Ordering::Relaxed);

        debug!(
            "Evicted {} least recently used cache entries, {} remain",
            batch,
            state.entries.len()
        );
    }

    fn record_hit(
        &self,
        entry: &mut CacheEntry<R>,
        now: u64,
        similarity: f64,
        kind: MatchKind,
    ) -> CacheHit<R> {
        entry.record_access(now);
        self.hits.fetch_add(1, Ordering::Relaxed);

        debug!(
            "Response cache {:?} hit with similarity {:.4} for entry {}",
            kind,
            similarity,
            entry.id()
        );

        CacheHit {
            response: entry.response().clone(),
            matched_query: entry.query().to_string(),
            entry_id: entry.id().to_string(),
            similarity,
            kind,
        }
    }

    fn record_miss(&self, query: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Response cache miss for query: {}...",
            query.chars().take(50).collect::<String>()
        );
    }
}

impl<R> ResponseCache<R> for InMemoryResponseCache<R>
where
    R: Clone + Serialize + Send + Sync,
{
    fn lookup(&self, query: &str) -> Result<Option<CacheHit<R>>, DomainError> {
        if !self.policy.admits(query) {
            return Ok(None);
        }

        self.maybe_cleanup();

        let now = self.clock.now_millis();
        let key = normalize_query(query);
        let mut state = self.write_state()?;

        if let Some(entry) = state.entries.get_mut(&key) {
            if !entry.is_expired(now) {
                return Ok(Some(self.record_hit(entry, now, 1.0, MatchKind::Exact)));
            }
        }

        let tokens = tokenize(query);

        if tokens.is_empty() {
            self.record_miss(query);
            return Ok(None);
        }

        let best = state
            .score(&tokens, now)
            .into_iter()
            .filter(|scored| scored.similarity >= self.config.similarity_threshold)
            .max_by(|a, b| a.rank(b));

        let hit = best.and_then(|scored| {
            let entry = state.entries.get_mut(&scored.key)?;
            Some(self.record_hit(entry, now, scored.similarity, MatchKind::Semantic))
        });

        if hit.is_none() {
            self.record_miss(query);
        }

        Ok(hit)
    }

    fn store(&self, query: &str, response: R) -> Result<(), DomainError> {
        self.store_with_ttl(query, response, self.config.ttl())
    }

    fn store_with_ttl(&self, query: &str, response: R, ttl: Duration) -> Result<(), DomainError> {
        if !self.policy.admits(query) || self.config.max_entries == 0 {
            debug!("Query outside cacheable length range, not caching");
            return Ok(());
        }

        let now = self.clock.now_millis();
        let key = normalize_query(query);
        let mut state = self.write_state()?;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.config.max_entries {
            self.evict_lru(&mut state);
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let entry = CacheEntry::new(format!("resp:{}", Uuid::new_v4()), query, response, now, ttl)
            .with_sequence(sequence);

        debug!("Cached response as entry {}", entry.id());

        state.entries.insert(key, entry);
        state.idf_stale = true;

        Ok(())
    }

    fn remove(&self, query: &str) -> Result<bool, DomainError> {
        let mut state = self.write_state()?;
        let removed = state.entries.remove(&normalize_query(query)).is_some();

        if removed {
            state.idf_stale = true;
        }

        Ok(removed)
    }

    fn clear(&self) -> Result<(), DomainError> {
        let mut state = self.write_state()?;

        state.entries.clear();
        state.idf = IdfTable::default();
        state.idf_generation += 1;
        state.idf_stale = false;
        state.idf_valid_until = u64::MAX;

        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);

        Ok(())
    }

    fn stats(&self) -> Result<CacheStats, DomainError> {
        let now = self.clock.now_millis();
        let state = self.read_state()?;

        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total_entries = state.entries.len();

        let average_age_ms = if total_entries == 0 {
            0.0
        } else {
            let total_age: u64 = state.entries.values().map(|e| e.age_ms(now)).sum();
            total_age as f64 / total_entries as f64
        };

        let memory_usage_bytes = state
            .entries
            .values()
            .map(|entry| match serde_json::to_vec(entry) {
                Ok(bytes) => bytes.len(),
                Err(e) => {
                    warn!("Failed to size cache entry {}: {}", entry.id(), e);
                    0
                }
            })
            .sum();

        Ok(CacheStats {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            total_queries: hits + misses,
            hit_rate: CacheStats::calculate_hit_rate(hits, misses),
            total_entries,
            average_age_ms,
            memory_usage_bytes,
        })
    }

    fn preload_candidates(&self, query: &str) -> Result<Vec<String>, DomainError> {
        if !self.policy.admits(query) {
            return Ok(Vec::new());
        }

        let tokens = tokenize(query);

        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.clock.now_millis();
        let key = normalize_query(query);
        let mut state = self.write_state()?;

        let mut candidates: Vec<ScoredEntry> = state
            .score(&tokens, now)
            .into_iter()
            .filter(|scored| scored.key != key)
            .filter(|scored| scored.similarity >= self.config.preload_threshold)
            .collect();

        candidates.sort_by(|a, b| b.rank(a));
        candidates.truncate(self.config.max_preload_candidates);

        Ok(candidates
            .iter()
            .filter_map(|scored| state.entries.get(&scored.key))
            .map(|entry| entry.query().to_string())
            .collect())
    }

    fn cleanup_expired(&self) -> Result<usize, DomainError> {
        let now = self.clock.now_millis();
        let mut state = self.write_state()?;

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - state.entries.len();

        if removed > 0 {
            state.idf_stale = true;
            debug!("Swept {} expired cache entries", removed);
        }

        Ok(removed)
    }

    fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read_state()?.entries.len())
    }
}
