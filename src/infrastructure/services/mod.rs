//! Application services

mod cached_responder;

pub use cached_responder::{CachedResponder, CachedResponse, ResponseSource};
