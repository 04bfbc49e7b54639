//! Aggregation service configuration
//!
//! The source table lists the known upstream sources in declaration order
//! together with a hardcoded known-good date per source. Those dates are a
//! deliberate compromise for sources whose "latest" metadata is unreliable:
//! when nothing else works the service shows photos from that date rather than
//! nothing at all.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::strategy::LatestStrategy;
use crate::constants::service;

/// One upstream source and its known-good fallback date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path segment used upstream, e.g. "curiosity"
    pub name: String,
    /// Earth date (`YYYY-MM-DD`) known to have photos
    pub fallback_date: String,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, fallback_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback_date: fallback_date.into(),
        }
    }
}

/// Configuration for [`PhotoService`](super::PhotoService)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Known sources, in the order their photos are concatenated
    pub sources: Vec<SourceConfig>,
    /// Fallback date for sources missing from the table
    pub default_fallback_date: String,
    /// Strategies tried by `get_latest_photos`, in order
    pub latest_strategies: Vec<LatestStrategy>,
    /// Bound applied to every upstream call
    pub call_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let sources = service::DEFAULT_SOURCES
            .iter()
            .map(|name| {
                let date = if *name == "curiosity" {
                    service::CURIOSITY_FALLBACK_DATE
                } else {
                    service::DEFAULT_FALLBACK_DATE
                };
                SourceConfig::new(*name, date)
            })
            .collect();

        Self {
            sources,
            default_fallback_date: service::DEFAULT_FALLBACK_DATE.to_string(),
            latest_strategies: LatestStrategy::default_order(),
            call_timeout: service::DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Known-good date for a source, falling back to the table default
    pub fn fallback_date_for(&self, source: &str) -> &str {
        self.sources
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(source))
            .map(|s| s.fallback_date.as_str())
            .unwrap_or(&self.default_fallback_date)
    }

    /// Source names in declaration order
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    /// Replace the source table
    pub fn with_sources(mut self, sources: Vec<SourceConfig>) -> Self {
        self.sources = sources;
        self
    }

    /// Replace the latest-photos strategy list
    pub fn with_latest_strategies(mut self, strategies: Vec<LatestStrategy>) -> Self {
        self.latest_strategies = strategies;
        self
    }

    /// Set the per-call bound
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_table() {
        let config = ServiceConfig::default();
        let names: Vec<&str> = config.source_names().collect();
        assert_eq!(names, vec!["curiosity", "opportunity", "spirit"]);
        assert_eq!(config.fallback_date_for("curiosity"), "2024-01-01");
        assert_eq!(config.fallback_date_for("opportunity"), "2018-06-01");
        assert_eq!(config.fallback_date_for("spirit"), "2018-06-01");
    }

    #[test]
    fn test_unknown_source_uses_default_date() {
        let config = ServiceConfig::default();
        assert_eq!(config.fallback_date_for("perseverance"), "2018-06-01");
    }

    #[test]
    fn test_builder_helpers() {
        let config = ServiceConfig::default()
            .with_sources(vec![SourceConfig::new("spirit", "2004-01-10")])
            .with_latest_strategies(vec![LatestStrategy::KnownGoodDate])
            .with_call_timeout(Duration::from_secs(2));

        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.fallback_date_for("Spirit"), "2004-01-10");
        assert_eq!(config.latest_strategies, vec![LatestStrategy::KnownGoodDate]);
        assert_eq!(config.call_timeout, Duration::from_secs(2));
    }
}
