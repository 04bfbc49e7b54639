//! Ordered strategies for finding a source's most recent photos
//!
//! `get_latest_photos` walks a list of these in order until one yields photos.
//! An empty result moves on to the next strategy, while a failure skips ahead
//! to the next [`LatestStrategy::KnownGoodDate`].
//! Keeping the list as data makes the degrade-gracefully policy configurable
//! and testable on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::service;

/// One way of obtaining recent photos for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestStrategy {
    /// The dedicated `latest_photos` endpoint
    LatestEndpoint,
    /// Read `max_sol` from source metadata and probe `max_sol, max_sol-1, ...`
    SolScan { probes: u32 },
    /// Query the configured known-good earth date for the source
    KnownGoodDate,
}

impl LatestStrategy {
    /// The default order: dedicated endpoint, sol scan, known-good date
    pub fn default_order() -> Vec<LatestStrategy> {
        vec![
            LatestStrategy::LatestEndpoint,
            LatestStrategy::SolScan {
                probes: service::SOL_SCAN_PROBES,
            },
            LatestStrategy::KnownGoodDate,
        ]
    }

    /// Whether photos found by this strategy go into the cache
    ///
    /// Known-good-date results are a degraded answer and are not cached.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, LatestStrategy::KnownGoodDate)
    }

    /// Whether this strategy is a fallback rather than a real "latest" lookup
    pub fn is_fallback(&self) -> bool {
        matches!(self, LatestStrategy::KnownGoodDate)
    }
}

impl fmt::Display for LatestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestStrategy::LatestEndpoint => write!(f, "latest-endpoint"),
            LatestStrategy::SolScan { probes } => write!(f, "sol-scan({})", probes),
            LatestStrategy::KnownGoodDate => write!(f, "known-good-date"),
        }
    }
}
