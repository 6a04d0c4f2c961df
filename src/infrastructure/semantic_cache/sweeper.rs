//! Background TTL sweep for response caches

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::semantic_cache::ResponseCache;
use crate::domain::DomainError;

/// Periodically removes expired entries from a cache
///
/// The task is aborted by [`CacheSweeper::stop`] or when the sweeper is dropped.
#[derive(Debug)]
pub struct CacheSweeper {
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl CacheSweeper {
    /// Start sweeping `cache` every `period` on the current Tokio runtime
    pub fn spawn<R, C>(cache: Arc<C>, period: Duration) -> Result<Self, DomainError>
    where
        R: 'static,
        C: ResponseCache<R> + ?Sized + 'static,
    {
        if period.is_zero() {
            return Err(DomainError::configuration("Cache sweep period must be positive"));
        }

        let handle = Handle::try_current().map_err(|e| {
            DomainError::internal(format!("Cache sweeper requires a Tokio runtime: {}", e))
        })?;

        let task = handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match cache.cleanup_expired() {
                    Ok(0) => {}
                    Ok(removed) => debug!("Periodic sweep removed {} expired entries", removed),
                    Err(e) => warn!("Periodic cache sweep failed: {}", e),
                }
            }
        });

        info!("Cache sweeper started with interval: {:?}", period);

        Ok(Self {
            task: Some(task),
            period,
        })
    }

    /// Sweep period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the sweep task is still scheduled
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the sweep task
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Cache sweeper stopped");
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::semantic_cache::ResponseCacheConfig;
    use crate::infrastructure::semantic_cache::InMemoryResponseCache;

    fn create_cache(clock: Arc<ManualClock>) -> Arc<InMemoryResponseCache<String>> {
        let config = ResponseCacheConfig::default()
            .with_cleanup_probability(0.0)
            .with_ttl(Duration::from_secs(1));
        Arc::new(InMemoryResponseCache::with_clock(config, clock))
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeps_expired_entries_on_interval() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = create_cache(clock.clone());
        cache.store("expiring question", "answer".to_string()).unwrap();

        let sweeper = CacheSweeper::spawn(cache.clone(), Duration::from_secs(300)).unwrap();
        assert!(sweeper.is_running());
        assert_eq!(sweeper.period(), Duration::from_secs(300));

        clock.advance(Duration::from_secs(5));
        assert_eq!(cache.len().unwrap(), 1);

        tokio::time::sleep(Duration::from_secs(301)).await;

        assert_eq!(cache.len().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_sweep() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = create_cache(clock.clone());
        cache.store("expiring question", "answer".to_string()).unwrap();

        let mut sweeper = CacheSweeper::spawn(cache.clone(), Duration::from_secs(60)).unwrap();
        sweeper.stop();
        assert!(!sweeper.is_running());

        clock.advance(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(cache.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let cache = create_cache(Arc::new(ManualClock::new(0)));

        let result = CacheSweeper::spawn(cache, Duration::ZERO);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_spawn_without_runtime_fails() {
        let cache = create_cache(Arc::new(ManualClock::new(0)));

        let result = CacheSweeper::spawn(cache, Duration::from_secs(60));

        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }
}
