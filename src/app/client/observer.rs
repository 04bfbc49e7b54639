//! Observability hook for fetch activity
//!
//! The client and the aggregation service report what they do through a
//! [`FetchObserver`] instead of writing to a fixed sink. The default
//! [`TracingObserver`] forwards events to `tracing`; [`NoopObserver`] discards them.

use std::fmt;

use tracing::{debug, info, warn};

/// A single observable step of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// Request about to be sent
    Request {
        path: String,
        params: Vec<(String, String)>,
    },
    /// Successful response
    Response { path: String, item_count: usize },
    /// Request failed
    Failure {
        path: String,
        status: Option<u16>,
        message: String,
    },
    /// Served from cache without network access
    CacheHit { key: String },
    /// Result stored in the cache
    CacheStore { key: String },
    /// A latest-photos strategy failed; the next one will be tried
    StrategyFailed {
        source: String,
        strategy: String,
        message: String,
    },
    /// A latest-photos strategy produced nothing
    StrategyEmpty { source: String, strategy: String },
    /// A degraded path (known-good date, whole-pipeline fallback) was taken
    FallbackEngaged { source: String, reason: String },
    /// One source of a fan-out failed and contributes no photos
    SourceFailed { source: String, message: String },
    /// Fan-out finished
    AggregateComplete { sources: usize, photo_count: usize },
}

/// Receiver of fetch events
pub trait FetchObserver: Send + Sync {
    fn on_event(&self, event: &FetchEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, event: &FetchEvent) {
        match event {
            FetchEvent::Request { path, params } => {
                debug!("API request: {} params: {:?}", path, params);
            }
            FetchEvent::Response { path, item_count } => {
                debug!("API response: {} ({} items)", path, item_count);
            }
            FetchEvent::Failure {
                path,
                status,
                message,
            } => {
                warn!("API error: {} status: {:?} message: {}", path, status, message);
            }
            FetchEvent::CacheHit { key } => debug!("Using cached data for: {}", key),
            FetchEvent::CacheStore { key } => debug!("Cached: {}", key),
            FetchEvent::StrategyFailed {
                source,
                strategy,
                message,
            } => {
                warn!("{} strategy failed for {}: {}", strategy, source, message);
            }
            FetchEvent::StrategyEmpty { source, strategy } => {
                debug!("{} strategy returned no photos for {}", strategy, source);
            }
            FetchEvent::FallbackEngaged { source, reason } => {
                warn!("Falling back for {}: {}", source, reason);
            }
            FetchEvent::SourceFailed { source, message } => {
                warn!("Failed to fetch photos for {}: {}", source, message);
            }
            FetchEvent::AggregateComplete {
                sources,
                photo_count,
            } => {
                info!("Fetched {} photos from {} sources", photo_count, sources);
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn on_event(&self, _event: &FetchEvent) {}
}

impl fmt::Debug for dyn FetchObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FetchObserver")
    }
}
