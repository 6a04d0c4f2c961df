//! Local text embeddings
//!
//! Queries are embedded as TF-IDF vectors over the vocabulary of the live
//! cache entries and compared with cosine similarity.

mod similarity;
mod tfidf;
mod tokenizer;

pub use similarity::cosine_similarity;
pub use tfidf::{calculate_idf, calculate_tf, create_vector, IdfTable};
pub use tokenizer::{is_stop_word, tokenize, MIN_TOKEN_CHARS};
