//! Periodic removal of expired entries.
//!
//! Both tables tolerate expired entries (reads treat them as absent), so
//! sweeping exists purely to bound memory. Each sweep runs on a timer that
//! fires independently of request traffic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::TtlCache;
use crate::ratelimit::RateLimiter;

/// A table that can drop its expired entries.
pub trait Sweep: Send + Sync {
    /// Remove every expired entry, returning how many were removed.
    fn sweep(&self) -> usize;
}

impl Sweep for RateLimiter {
    fn sweep(&self) -> usize {
        RateLimiter::sweep(self)
    }
}

impl<V: Send> Sweep for TtlCache<V> {
    fn sweep(&self) -> usize {
        TtlCache::sweep(self)
    }
}

/// Handle to a background task sweeping one table on a fixed interval.
///
/// [`stop`](Self::stop) shuts the task down deterministically for hosts
/// that terminate gracefully. Dropping the handle closes the shutdown
/// channel, which also ends the task.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn a sweep loop over `target`, firing every `interval`.
    pub fn spawn<S>(target: Arc<S>, interval: Duration) -> Self
    where
        S: Sweep + 'static,
    {
        let (shutdown, mut signal) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // An interval's first tick completes immediately; consume it so
            // the first sweep lands one full interval after spawn.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = target.sweep();
                        if removed > 0 {
                            debug!(removed, "Swept expired entries");
                        }
                    }
                    _ = signal.changed() => break,
                }
            }
        });

        Self { shutdown, task }
    }

    /// Stop the sweep task and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::LimitPolicy;

    #[tokio::test]
    async fn test_sweeper_prunes_expired_windows() {
        let limiter = Arc::new(RateLimiter::new());
        let policy = LimitPolicy::new(5, Duration::from_millis(50));
        limiter.check("user:1", &policy);
        limiter.check("user:2", &policy);

        let sweeper = Sweeper::spawn(limiter.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(limiter.window_count(), 0);
        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_sweeper_prunes_expired_cache_entries() {
        let cache = Arc::new(TtlCache::new(16));
        cache.set("stale", 1, Duration::from_millis(50));
        cache.set("fresh", 2, Duration::from_secs(60));

        let sweeper = Sweeper::spawn(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(2));
        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_stop_returns_before_the_next_tick() {
        let cache: Arc<TtlCache<i32>> = Arc::new(TtlCache::new(16));
        let sweeper = Sweeper::spawn(cache, Duration::from_secs(3600));

        // Must not wait out the hour-long interval.
        sweeper.stop().await;
    }
}
