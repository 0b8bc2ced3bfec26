//! Core rate limiter implementation.

use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace};

use super::window::{FixedWindow, LimitDecision, LimitPolicy};

/// A fixed-window rate limiter keyed by opaque string identifiers.
///
/// Each identifier gets its own window. Callers typically build identifiers
/// from a scope and a client address, e.g. `"chat:203.0.113.7"` (see
/// [`super::ClientKey`]); the limiter itself never inspects them.
///
/// Fixed windows reset at a fixed instant rather than rolling with traffic,
/// so a burst straddling a window boundary can see up to twice the policy's
/// budget. That is the scheme's accepted trade-off.
///
/// Windows live in process memory; replicas do not share state. A deployment
/// that needs a global limit should back this with a shared store such as
/// Redis instead.
///
/// This struct is thread-safe and can be shared across tasks. `check` is
/// atomic per identifier.
pub struct RateLimiter {
    /// Live windows indexed by identifier
    windows: DashMap<String, FixedWindow>,
}

impl RateLimiter {
    /// Create a new rate limiter with no tracked identifiers.
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Check whether a request from `identifier` is admitted under `policy`.
    ///
    /// Always returns immediately with a decision; a full window is a normal
    /// denied [`LimitDecision`], not an error. An expired window is replaced
    /// on access, so correctness never depends on [`sweep`](Self::sweep)
    /// having run.
    pub fn check(&self, identifier: &str, policy: &LimitPolicy) -> LimitDecision {
        let now = Instant::now();

        match self.windows.entry(identifier.to_string()) {
            Entry::Vacant(vacant) => {
                trace!(
                    identifier,
                    max_requests = policy.max_requests,
                    "Opening rate limit window"
                );
                vacant.insert(FixedWindow::open(now, policy.window));
                LimitDecision::fresh(policy)
            }
            Entry::Occupied(mut occupied) => {
                let window = occupied.get_mut();

                if window.is_expired(now) {
                    debug!(identifier, "Window elapsed, opening a fresh one");
                    *window = FixedWindow::open(now, policy.window);
                    return LimitDecision::fresh(policy);
                }

                let decision = window.admit(policy, now);
                if decision.allowed {
                    trace!(identifier, remaining = decision.remaining, "Request admitted");
                } else {
                    debug!(
                        identifier,
                        reset_after_ms = decision.reset_after.as_millis() as u64,
                        "Rate limit exceeded"
                    );
                }
                decision
            }
        }
    }

    /// Drop every expired window and return how many were removed.
    ///
    /// This only bounds memory; `check` self-heals expired windows on access
    /// regardless of sweeping.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(now));
        before.saturating_sub(self.windows.len())
    }

    /// Number of identifiers currently tracked, expired or not.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Remove all windows.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.windows.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
