//! Fixed-window accounting for a single identifier.

use std::time::{Duration, Instant};

/// Default number of requests admitted per window when no policy is configured.
const DEFAULT_MAX_REQUESTS: u32 = 10;
/// Default window duration when no policy is configured.
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// A rate limit policy: how many requests are admitted per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Maximum requests admitted within one window. Must be non-zero.
    pub max_requests: u32,
    /// Duration of the window. Must be non-zero.
    pub window: Duration,
}

impl LimitPolicy {
    /// Create a new policy.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// The outcome of a rate limit check.
///
/// A denied check is a normal result, not an error. `reset_after` tells the
/// caller how long until the current window ends, which maps directly onto a
/// `Retry-After`-style response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitDecision {
    /// Whether the request was admitted
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Time until the current window ends
    pub reset_after: Duration,
}

impl LimitDecision {
    /// The decision returned when a fresh window opens: the triggering
    /// request is counted as the window's first hit.
    pub(crate) fn fresh(policy: &LimitPolicy) -> Self {
        Self {
            allowed: true,
            remaining: policy.max_requests.saturating_sub(1),
            reset_after: policy.window,
        }
    }
}

/// One identifier's window: a hit count and the instant the window ends.
///
/// A window is never rewound. When it elapses, the limiter replaces it with
/// a fresh one rather than mutating it in place.
#[derive(Debug, Clone, Copy)]
pub struct FixedWindow {
    count: u32,
    reset_at: Instant,
}

impl FixedWindow {
    /// Open a window whose first hit is the request that created it.
    pub fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    /// Whether this window has already ended.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }

    /// Record a hit against this window, or deny it if the policy's budget
    /// is spent. A denied hit does not consume quota.
    pub fn admit(&mut self, policy: &LimitPolicy, now: Instant) -> LimitDecision {
        let reset_after = self.reset_at.saturating_duration_since(now);

        if self.count >= policy.max_requests {
            return LimitDecision {
                allowed: false,
                remaining: 0,
                reset_after,
            };
        }

        self.count += 1;
        LimitDecision {
            allowed: true,
            remaining: policy.max_requests.saturating_sub(self.count),
            reset_after,
        }
    }

    /// Hits recorded in this window so far.
    pub fn count(&self) -> u32 {
        self.count
    }
}
