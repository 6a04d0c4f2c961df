//! Exact-match keys and the caching admission policy

use once_cell::sync::Lazy;
use regex::Regex;

use super::ResponseCacheConfig;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a query into its exact-match key
///
/// Lower-cases, trims and collapses internal whitespace runs to one space.
pub fn normalize_query(query: &str) -> String {
    WHITESPACE_RUN
        .replace_all(query.trim(), " ")
        .to_lowercase()
}

/// Length bounds deciding which queries take part in caching at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    min_length: usize,
    max_length: usize,
}

impl QueryPolicy {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    pub fn from_config(config: &ResponseCacheConfig) -> Self {
        Self::new(config.min_query_length, config.max_query_length)
    }

    /// Whether the query may be stored or matched
    pub fn admits(&self, query: &str) -> bool {
        let length = query.trim().chars().count();
        length >= self.min_length && length <= self.max_length
    }
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self::from_config(&ResponseCacheConfig::default())
    }
}
