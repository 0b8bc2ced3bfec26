//! A single cached value and its expiry deadline.

use std::time::{Duration, Instant};

/// A cached value with an expiry deadline.
///
/// An entry past its deadline is treated as absent by readers even before
/// it is physically removed; nothing transitions it back. A new write for
/// the same key replaces it wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Create an entry expiring `ttl` after `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    /// Whether the entry's deadline has passed.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// The cached value.
    pub fn value(&self) -> &V {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_expires_at_the_deadline() {
        let now = Instant::now();
        let entry = CacheEntry::new("v", Duration::from_secs(5), now);

        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::from_secs(4)));
        assert!(entry.is_expired(now + Duration::from_secs(5)));
        assert!(entry.is_expired(now + Duration::from_secs(6)));
    }
}
