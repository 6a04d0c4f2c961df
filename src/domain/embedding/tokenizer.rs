//! Query tokenization for TF-IDF vectors

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest token kept, in characters
pub const MIN_TOKEN_CHARS: usize = 3;

static PUNCTUATION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
        "was", "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "who",
        "did", "get", "got", "let", "she", "too", "use", "way", "what", "when", "where",
        "which", "while", "with", "that", "this", "these", "those", "from", "into", "about",
        "there", "their", "them", "then", "than", "they", "will", "would", "could", "should",
        "been", "being", "were", "does", "just", "also", "some", "such", "your", "yours",
        "please", "tell", "give", "show", "want", "need", "like", "know", "more", "most",
        "very", "much", "many", "each", "other", "only", "over", "after", "before",
    ]
    .into_iter()
    .collect()
});

/// Check whether a token is in the fixed stop-word set
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Split free text into lower-cased content tokens
///
/// Punctuation is stripped, short tokens and stop words are dropped. Order is
/// preserved but carries no meaning downstream.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION_PATTERN.replace_all(&lowered, "");

    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
