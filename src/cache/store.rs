//! Bounded TTL cache and async memoization.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::entry::CacheEntry;

/// Default maximum number of entries.
const DEFAULT_CAPACITY: usize = 1000;

/// Inner table state, guarded by one mutex.
///
/// `order` mirrors the keys of `entries` in insertion order and is kept in
/// lockstep with it. Overwriting a key keeps its original position.
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: VecDeque<String>,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }
}

/// A bounded in-memory cache with per-entry TTL.
///
/// Memoizes the result of an expensive or rate-limited producer (typically a
/// network or database call) for a bounded time, bounding both staleness and
/// memory. When the table is full, inserting a new key evicts the oldest
/// inserted entry first; callers must not rely on LRU semantics.
///
/// Entries live in process memory; replicas do not share state. A deployment
/// that needs a shared cache should back this with a store such as Redis
/// instead.
///
/// The cache is thread-safe and can be shared across tasks. The lock is
/// never held across an await point.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
}

impl<V> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    /// Insert or overwrite the entry for `key`, expiring `ttl` from now.
    ///
    /// When the table is full and `key` is new, the oldest inserted entry is
    /// evicted first; the incoming key is never the victim. Overwriting an
    /// existing key evicts nothing.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        if inner.entries.len() >= self.capacity && !inner.entries.contains_key(key) {
            if let Some(evicted) = inner.order.pop_front() {
                inner.entries.remove(&evicted);
                debug!(key = %evicted, "Capacity reached, evicting oldest entry");
            }
        }

        if inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl, now))
            .is_none()
        {
            inner.order.push_back(key.to_string());
        }
    }

    /// Remove the entry for `key` if one is physically present.
    ///
    /// Returns whether something was removed. An expired entry that has not
    /// been cleaned up yet counts as present here.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key)
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry and return how many were removed.
    ///
    /// This only bounds memory; `get` treats expired entries as absent
    /// regardless of sweeping.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let Inner { entries, order } = &mut *inner;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        order.retain(|key| entries.contains_key(key));
        before.saturating_sub(entries.len())
    }
}

impl<V: Clone> TtlCache<V> {
    /// Return the value for `key` if present and unexpired.
    ///
    /// An entry found past its deadline is removed here and reported absent,
    /// so a stale value is never returned even if no sweep has run.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        match inner.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => return Some(entry.value().clone()),
            Some(_) => {}
        }

        inner.remove(key);
        trace!(key, "Expired entry removed on read");
        None
    }

    /// Return the cached value for `key`, or produce, store, and return it.
    ///
    /// On a miss the caller-supplied `producer` is awaited and its `Ok`
    /// result is stored under `key` with `ttl`. A producer failure
    /// propagates unchanged and nothing is cached, so a later call retries.
    ///
    /// There is no in-flight de-duplication: callers that miss concurrently
    /// for the same key each invoke their producer, and the last write wins.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            trace!(key, "Cache hit");
            return Ok(value);
        }

        trace!(key, "Cache miss, invoking producer");
        let value = producer().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
