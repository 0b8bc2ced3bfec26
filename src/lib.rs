//! Backstop - In-Process Rate Limiting and Response Caching
//!
//! This crate implements the admission-control and memoization layer that
//! request handlers put in front of cost-sensitive hosted services, such as
//! a metered AI completion endpoint. It provides a fixed-window rate limiter
//! keyed by opaque client identifiers and a bounded TTL cache with an async
//! memoization helper, each swept by a stoppable background task.
//!
//! Both tables live in process memory and are stand-ins for a shared store
//! (e.g. Redis) in deployments that run more than one replica.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use backstop::cache::TtlCache;
//! use backstop::ratelimit::{LimitPolicy, RateLimiter};
//! use backstop::sweep::Sweeper;
//!
//! #[tokio::main]
//! async fn main() {
//!     let limiter = Arc::new(RateLimiter::new());
//!     let sweeper = Sweeper::spawn(limiter.clone(), Duration::from_secs(60));
//!
//!     let policy = LimitPolicy::new(20, Duration::from_secs(3600));
//!     let decision = limiter.check("chat:203.0.113.7", &policy);
//!     assert!(decision.allowed);
//!
//!     let cache: Arc<TtlCache<String>> = Arc::new(TtlCache::new(1000));
//!     let motd = cache
//!         .get_or_fetch("motd", Duration::from_secs(300), || async {
//!             Ok::<_, std::io::Error>("hello".to_string())
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(motd, "hello");
//!
//!     sweeper.stop().await;
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod ratelimit;
pub mod sweep;
