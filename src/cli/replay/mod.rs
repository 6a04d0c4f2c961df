//! Replay command - drives a response cache from a JSONL transcript

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::semantic_cache::{CacheStats, ResponseCache, ResponseCacheConfig};
use crate::infrastructure::semantic_cache::ResponseCacheContext;

/// Arguments for the replay command
#[derive(Args, Clone)]
pub struct ReplayArgs {
    /// JSONL file with one `{"query": ..., "response": ...}` object per line
    pub file: PathBuf,

    /// Similarity threshold for semantic hits (overrides config)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum number of cached entries (overrides config)
    #[arg(long)]
    pub max_entries: Option<usize>,
}

/// One line of a replay transcript
#[derive(Debug, Deserialize)]
pub struct ReplayRecord {
    pub query: String,
    pub response: Value,
}

/// Run the replay and print the final statistics as JSON
pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let cache_config = apply_overrides(config.cache, &args);

    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read transcript {}", args.file.display()))?;
    let records = parse_transcript(&content)?;

    info!(
        "Replaying {} records from {}",
        records.len(),
        args.file.display()
    );

    let context = ResponseCacheContext::<Value>::new(cache_config)?;
    let stats = replay(context.cache().as_ref(), records)?;
    context.shutdown();

    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

fn apply_overrides(mut config: ResponseCacheConfig, args: &ReplayArgs) -> ResponseCacheConfig {
    if let Some(threshold) = args.threshold {
        config = config.with_similarity_threshold(threshold);
    }

    if let Some(max_entries) = args.max_entries {
        config = config.with_max_entries(max_entries);
    }

    config
}

/// Parse a JSONL transcript, skipping blank lines
pub fn parse_transcript(content: &str) -> anyhow::Result<Vec<ReplayRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid transcript record on line {}", number + 1))
        })
        .collect()
}

/// Look every record up and store the response on a miss
pub fn replay<C>(cache: &C, records: Vec<ReplayRecord>) -> anyhow::Result<CacheStats>
where
    C: ResponseCache<Value> + ?Sized,
{
    for record in records {
        match cache.lookup(&record.query)? {
            Some(hit) => info!(
                "HIT ({:?}, similarity {:.3}): {:?} -> {:?}",
                hit.kind, hit.similarity, record.query, hit.matched_query
            ),
            None => {
                info!("MISS: {:?}", record.query);

                let candidates = cache.preload_candidates(&record.query)?;
                if !candidates.is_empty() {
                    debug!("Preload candidates for {:?}: {:?}", record.query, candidates);
                }

                if let Err(e) = cache.store(&record.query, record.response) {
                    warn!("Failed to store response for {:?}: {}", record.query, e);
                }
            }
        }
    }

    Ok(cache.stats()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::semantic_cache::InMemoryResponseCache;

    const TRANSCRIPT: &str = r#"
{"query": "What is the capital of France", "response": "Paris"}
{"query": "best running shoes for beginners", "response": "Cushioned trainers"}
{"query": "Easy vegetarian dinner recipes", "response": "Lentil curry"}
{"query": "Cheap flights to Tokyo in spring", "response": "Book early"}

{"query": "capital of France", "response": "Paris (again)"}
{"query": "hi", "response": "hello"}
"#;

    #[test]
    fn test_parse_transcript_skips_blank_lines() {
        let records = parse_transcript(TRANSCRIPT).unwrap();

        assert_eq!(records.len(), 6);
        assert_eq!(records[0].query, "What is the capital of France");
        assert_eq!(records[4].response, Value::String("Paris (again)".to_string()));
    }

    #[test]
    fn test_parse_transcript_reports_line() {
        let err = parse_transcript("{\"query\": \"ok\", \"response\": 1}\nnot json")
            .unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_replay_counts_hits_and_misses() {
        let config = ResponseCacheConfig::default().with_cleanup_probability(0.0);
        let cache = InMemoryResponseCache::<Value>::new(config);
        let records = parse_transcript(TRANSCRIPT).unwrap();

        let stats = replay(&cache, records).unwrap();

        // "hi" is too short to be looked up at all
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(
            cache.find("capital of France").unwrap(),
            Some(Value::String("Paris".to_string()))
        );
    }

    #[test]
    fn test_apply_overrides() {
        let args = ReplayArgs {
            file: PathBuf::from("transcript.jsonl"),
            threshold: Some(0.5),
            max_entries: None,
        };

        let config = apply_overrides(ResponseCacheConfig::default(), &args);

        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.max_entries, 100);
    }
}
