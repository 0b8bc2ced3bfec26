//! Rate limiting logic and state management.

mod identity;
mod limiter;
mod window;

pub use identity::{client_ip, ClientKey};
pub use limiter::RateLimiter;
pub use window::{FixedWindow, LimitDecision, LimitPolicy};
