//! Cache configuration types and defaults

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::cache;

/// Configuration for the in-memory response cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live applied uniformly to every entry
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: cache::DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a configuration with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_five_minutes() {
        assert_eq!(CacheConfig::default().ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_with_ttl() {
        let config = CacheConfig::with_ttl(Duration::from_millis(20));
        assert_eq!(config.ttl, Duration::from_millis(20));
    }
}
