//! Configuration management for Backstop.
//!
//! Rules are written in YAML with per-scope rate limit overrides, mirroring
//! how handlers consume them: each route resolves its scope to a policy and
//! passes that policy to the limiter per request.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BackstopError, Result};
use crate::ratelimit::LimitPolicy;

/// Main configuration for the Backstop components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackstopConfig {
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitSettings,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheSettings,
}

impl Default for BackstopConfig {
    fn default() -> Self {
        Self {
            rate_limiting: RateLimitSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl BackstopConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| BackstopError::Config(format!("Failed to parse configuration: {}", e)))
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Rule applied to scopes without an explicit override
    #[serde(default)]
    pub fallback: LimitRule,

    /// Per-scope rules, keyed by scope name (e.g. "chat")
    #[serde(default)]
    pub scopes: HashMap<String, LimitRule>,

    /// Sweep interval in seconds
    #[serde(default = "default_limit_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            fallback: LimitRule::default(),
            scopes: HashMap::new(),
            sweep_interval_secs: default_limit_sweep_interval(),
        }
    }
}

impl RateLimitSettings {
    /// Resolve the policy for a scope, falling back to the default rule.
    pub fn policy_for(&self, scope: &str) -> LimitPolicy {
        self.scopes
            .get(scope)
            .copied()
            .unwrap_or(self.fallback)
            .policy()
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// A rate limit rule as written in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitRule {
    /// Number of requests allowed per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl LimitRule {
    /// The runtime policy this rule describes.
    pub fn policy(&self) -> LimitPolicy {
        LimitPolicy::new(self.max_requests, Duration::from_secs(self.window_secs))
    }
}

impl Default for LimitRule {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of entries
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// TTL in seconds applied when a caller has no better one
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,

    /// Sweep interval in seconds
    #[serde(default = "default_cache_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            default_ttl_secs: default_cache_ttl(),
            sweep_interval_secs: default_cache_sweep_interval(),
        }
    }
}

impl CacheSettings {
    /// Default TTL as a duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_limit_sweep_interval() -> u64 {
    60
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_sweep_interval() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackstopConfig::default();

        assert_eq!(config.rate_limiting.fallback.max_requests, 10);
        assert_eq!(config.rate_limiting.fallback.window_secs, 60);
        assert_eq!(config.rate_limiting.sweep_interval_secs, 60);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.cache.default_ttl_secs, 300);
        assert_eq!(config.cache.sweep_interval_secs, 300);
    }

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let config = BackstopConfig::from_yaml("{}").unwrap();
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.rate_limiting.fallback.max_requests, 10);
    }

    #[test]
    fn test_parse_scoped_rules() {
        let yaml = r#"
rate_limiting:
  fallback:
    max_requests: 30
    window_secs: 60
  scopes:
    chat:
      max_requests: 20
      window_secs: 3600
cache:
  capacity: 500
"#;
        let config = BackstopConfig::from_yaml(yaml).unwrap();

        let chat = config.rate_limiting.policy_for("chat");
        assert_eq!(chat.max_requests, 20);
        assert_eq!(chat.window, Duration::from_secs(3600));

        // Unlisted scopes resolve to the fallback rule.
        let other = config.rate_limiting.policy_for("documents");
        assert_eq!(other.max_requests, 30);
        assert_eq!(other.window, Duration::from_secs(60));

        assert_eq!(config.cache.capacity, 500);
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let result = BackstopConfig::from_yaml("rate_limiting: [not, a, mapping]");
        assert!(matches!(
            result,
            Err(crate::error::BackstopError::Config(_))
        ));
    }
}
