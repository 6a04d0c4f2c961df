//! Cached query/response entries

use std::time::Duration;

use serde::Serialize;

use super::normalize_query;
use crate::domain::embedding::{create_vector, tokenize, IdfTable};

/// Freshness of an entry relative to its TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Within its TTL and visible to lookups
    Fresh,
    /// Past its TTL, invisible to lookups until swept
    Expired,
}

/// TF-IDF vector memoized against one IDF generation
#[derive(Debug, Clone)]
struct MemoizedVector {
    generation: u64,
    values: Vec<f64>,
}

/// A cached entry in the response cache
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<R> {
    /// Unique identifier for this entry
    id: String,
    /// The original query text
    query: String,
    /// Normalized query used for exact matches
    #[serde(skip)]
    key: String,
    /// The cached response payload
    response: R,
    /// Creation time in epoch milliseconds
    timestamp: u64,
    /// Time-to-live in milliseconds
    ttl_ms: u64,
    /// Number of read hits
    access_count: u64,
    /// Last read hit (or creation) in epoch milliseconds
    last_accessed: u64,
    /// Content tokens of the query
    tokens: Vec<String>,
    /// Insertion order, used to break recency ties
    #[serde(skip)]
    sequence: u64,
    #[serde(skip)]
    query_vector: Option<MemoizedVector>,
}

impl<R> CacheEntry<R> {
    /// Create a new entry stamped at `now_millis`
    pub fn new(
        id: impl Into<String>,
        query: impl Into<String>,
        response: R,
        now_millis: u64,
        ttl: Duration,
    ) -> Self {
        let query = query.into();
        let key = normalize_query(&query);
        let tokens = tokenize(&query);

        Self {
            id: id.into(),
            query,
            key,
            response,
            timestamp: now_millis,
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            access_count: 0,
            last_accessed: now_millis,
            tokens,
            sequence: 0,
            query_vector: None,
        }
    }

    /// Set the insertion sequence number
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Get the entry ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the original query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the normalized exact-match key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the cached response
    pub fn response(&self) -> &R {
        &self.response
    }

    /// Get creation timestamp
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Get the TTL in milliseconds
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Last instant at which the entry is still fresh
    pub fn expires_at(&self) -> u64 {
        self.timestamp.saturating_add(self.ttl_ms)
    }

    /// Get read hit count
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Get last access timestamp
    pub fn last_accessed(&self) -> u64 {
        self.last_accessed
    }

    /// Get the query tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Get the insertion sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Age of the entry at `now_millis`
    pub fn age_ms(&self, now_millis: u64) -> u64 {
        now_millis.saturating_sub(self.timestamp)
    }

    /// Freshness at `now_millis`; an entry is fresh while `age <= ttl`
    pub fn state(&self, now_millis: u64) -> EntryState {
        if self.age_ms(now_millis) > self.ttl_ms {
            EntryState::Expired
        } else {
            EntryState::Fresh
        }
    }

    /// Check if entry is expired
    pub fn is_expired(&self, now_millis: u64) -> bool {
        self.state(now_millis) == EntryState::Expired
    }

    /// Record a read hit
    pub fn record_access(&mut self, now_millis: u64) {
        self.access_count += 1;
        self.last_accessed = self.last_accessed.max(now_millis);
    }

    /// TF-IDF vector of the query against `idf`, computed once per generation
    pub fn vector(&mut self, idf: &IdfTable, generation: u64) -> &[f64] {
        let stale = self
            .query_vector
            .as_ref()
            .map_or(true, |memo| memo.generation != generation);

        if stale {
            self.query_vector = Some(MemoizedVector {
                generation,
                values: create_vector(&self.tokens, idf),
            });
        }

        self.query_vector
            .as_ref()
            .map(|memo| memo.values.as_slice())
            .unwrap_or_default()
    }

    /// The memoized vector, if one exists for `generation`
    pub fn cached_vector(&self, generation: u64) -> Option<&[f64]> {
        self.query_vector
            .as_ref()
            .filter(|memo| memo.generation == generation)
            .map(|memo| memo.values.as_slice())
    }
}
