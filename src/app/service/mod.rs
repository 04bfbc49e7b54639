//! Aggregation service over the upstream photo collections
//!
//! [`PhotoService`] is the entry point view controllers use for data. Every
//! operation consults the response cache first, coalesces concurrent misses for
//! the same key, and only then goes to the transport. Browsing operations
//! (`get_latest_photos`, `get_photos_from_all_sources`) absorb per-source
//! failures into empty results; metadata lookups propagate transport errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rover_photos::app::{PhotoService, RoverClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = PhotoService::new(RoverClient::new()?);
//!
//! let photos = service.get_photos_from_all_sources().await;
//! println!("{} photos across all sources", photos.len());
//!
//! let rover = service.get_rover_info("curiosity").await?;
//! println!("{} max sol: {:?}", rover.name, rover.max_sol);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::app::cache::{CacheConfig, CacheStats, FetchReservations, ResponseCache};
use crate::app::client::{
    FetchEvent, FetchObserver, Query, RoverClient, TracingObserver, Transport,
};
use crate::app::models::{
    intern_references, LatestPhotosEnvelope, Manifest, ManifestEnvelope, Photo, PhotosEnvelope,
    Rover, RoverEnvelope,
};
use crate::config::AppConfig;
use crate::constants::{api, service};
use crate::errors::{TransportError, TransportResult};

pub mod config;
pub mod strategy;


pub use config::{ServiceConfig, SourceConfig};
pub use strategy::LatestStrategy;

/// Cache keys, one namespace per operation
mod keys {
    pub fn photos_by_sol(source: &str, sol: u32, page: u32) -> String {
        format!("photos-sol-{}-{}-{}", source, sol, page)
    }

    pub fn photos_by_date(source: &str, earth_date: &str, page: u32) -> String {
        format!("photos-date-{}-{}-{}", source, earth_date, page)
    }

    pub fn latest(source: &str) -> String {
        format!("latest-{}", source)
    }

    pub fn rover(source: &str) -> String {
        format!("rover-{}", source)
    }

    pub fn manifest(source: &str) -> String {
        format!("manifest-{}", source)
    }
}

/// Values held by the service's response cache
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Photos(Arc<[Photo]>),
    Rover(Arc<Rover>),
    Manifest(Arc<Manifest>),
}

/// Conversion between a typed result and its cached form
trait Cacheable: Clone {
    fn into_payload(self) -> CachedPayload;
    fn from_payload(payload: CachedPayload) -> Option<Self>;
}

impl Cacheable for Arc<[Photo]> {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::Photos(self)
    }

    fn from_payload(payload: CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::Photos(photos) => Some(photos),
            _ => None,
        }
    }
}

impl Cacheable for Arc<Rover> {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::Rover(self)
    }

    fn from_payload(payload: CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::Rover(rover) => Some(rover),
            _ => None,
        }
    }
}

impl Cacheable for Arc<Manifest> {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::Manifest(self)
    }

    fn from_payload(payload: CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::Manifest(manifest) => Some(manifest),
            _ => None,
        }
    }
}

/// Outcome of a fetch, and whether it may be cached
enum Fetched<V> {
    Store(V),
    Skip(V),
}

fn no_photos() -> Arc<[Photo]> {
    Arc::from(Vec::new())
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Cache-backed access to every upstream source
#[derive(Debug)]
pub struct PhotoService<T> {
    transport: T,
    cache: ResponseCache<CachedPayload>,
    reservations: FetchReservations,
    config: ServiceConfig,
    observer: Arc<dyn FetchObserver>,
}

impl PhotoService<RoverClient> {
    /// Build a service backed by the HTTP client from application configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the HTTP client cannot be created
    pub fn from_app_config(config: &AppConfig) -> TransportResult<Self> {
        let runtime = config.to_runtime_config();
        let client = RoverClient::with_config(runtime.client)?;
        Ok(Self::with_config(client, runtime.service, runtime.cache))
    }
}

impl<T: Transport> PhotoService<T> {
    /// Create a service with default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ServiceConfig::default(), CacheConfig::default())
    }

    /// Create a service with custom configuration
    pub fn with_config(transport: T, config: ServiceConfig, cache_config: CacheConfig) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(cache_config),
            reservations: FetchReservations::new(),
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the observer receiving cache and fallback events
    ///
    /// The transport is attached to the same observer, so its request,
    /// response and failure events reach it too.
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.transport.attach_observer(Arc::clone(&observer));
        self.observer = observer;
        self
    }

    /// Get the service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of cache activity
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop every cached response
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        self.reservations.prune();
    }

    /// Photos of one sol, one upstream page
    ///
    /// # Errors
    ///
    /// Propagates the `TransportError` of the upstream call
    pub async fn get_photos_by_sol(
        &self,
        source: &str,
        sol: u32,
        page: u32,
    ) -> TransportResult<Vec<Photo>> {
        let key = keys::photos_by_sol(source, sol, page);
        let photos: Arc<[Photo]> = self
            .cached(&key, move || async move {
                let query = [("sol", sol.to_string()), ("page", page.to_string())];
                let photos = self.fetch_photos(source, &query).await?;
                Ok(Fetched::Store(photos.into()))
            })
            .await?;
        Ok(photos.to_vec())
    }

    /// Photos of one earth date, one upstream page
    ///
    /// # Errors
    ///
    /// Propagates the `TransportError` of the upstream call
    pub async fn get_photos_by_earth_date(
        &self,
        source: &str,
        earth_date: &str,
        page: u32,
    ) -> TransportResult<Vec<Photo>> {
        let key = keys::photos_by_date(source, earth_date, page);
        let photos: Arc<[Photo]> = self
            .cached(&key, move || async move {
                let query = [
                    ("earth_date", earth_date.to_string()),
                    ("page", page.to_string()),
                ];
                let photos = self.fetch_photos(source, &query).await?;
                Ok(Fetched::Store(photos.into()))
            })
            .await?;
        Ok(photos.to_vec())
    }

    /// Most recent photos of a source; never fails
    ///
    /// Walks the configured strategies in order and returns the first non-empty
    /// result. An empty strategy moves on to the next one; a failing strategy
    /// jumps to the known-good date. When nothing yields photos the result is an
    /// empty collection.
    pub async fn get_latest_photos(&self, source: &str) -> Vec<Photo> {
        match self.try_latest_photos(source).await {
            Ok(photos) => photos,
            Err(e) => {
                debug!("No latest photos for {}: {}", source, e);
                Vec::new()
            }
        }
    }

    /// Like [`get_latest_photos`](Self::get_latest_photos), but reports the last
    /// strategy error when no strategy produced photos and at least one failed
    ///
    /// # Errors
    ///
    /// Returns the `TransportError` of the last failing strategy
    pub async fn try_latest_photos(&self, source: &str) -> TransportResult<Vec<Photo>> {
        let key = keys::latest(source);
        let photos: Arc<[Photo]> = self
            .cached(&key, || self.run_latest_strategies(source))
            .await?;
        Ok(photos.to_vec())
    }

    /// Latest photos of every configured source, concatenated in declaration order
    ///
    /// Sources are queried concurrently. A failing source contributes nothing.
    /// If no source yields photos, the known-good date of the first source is
    /// tried once before giving up with an empty collection.
    pub async fn get_photos_from_all_sources(&self) -> Vec<Photo> {
        let result: TransportResult<Arc<[Photo]>> = self
            .cached(service::ALL_SOURCES_KEY, || self.aggregate_sources())
            .await;
        result.map(|photos| photos.to_vec()).unwrap_or_default()
    }

    /// Photos of one earth date from every configured source, in declaration order
    ///
    /// Per-source failures contribute nothing.
    pub async fn get_photos_by_date_across_sources(&self, earth_date: &str) -> Vec<Photo> {
        let queries = self.config.sources.iter().map(|source| async move {
            match self.get_photos_by_earth_date(&source.name, earth_date, 1).await {
                Ok(photos) => photos,
                Err(e) => {
                    self.emit(FetchEvent::SourceFailed {
                        source: source.name.clone(),
                        message: e.to_string(),
                    });
                    Vec::new()
                }
            }
        });

        join_all(queries).await.into_iter().flatten().collect()
    }

    /// Source (rover) metadata
    ///
    /// # Errors
    ///
    /// Propagates the `TransportError` of the upstream call
    pub async fn get_rover_info(&self, source: &str) -> TransportResult<Rover> {
        let key = keys::rover(source);
        let rover: Arc<Rover> = self
            .cached(&key, move || async move {
                let envelope: RoverEnvelope = self.call(&api::rover_path(source), &[]).await?;
                Ok(Fetched::Store(Arc::new(envelope.rover)))
            })
            .await?;
        Ok(Rover::clone(&rover))
    }

    /// Per-sol manifest of a source
    ///
    /// # Errors
    ///
    /// Propagates the `TransportError` of the upstream call
    pub async fn get_rover_manifest(&self, source: &str) -> TransportResult<Manifest> {
        let key = keys::manifest(source);
        let manifest: Arc<Manifest> = self
            .cached(&key, move || async move {
                let envelope: ManifestEnvelope =
                    self.call(&api::manifest_path(source), &[]).await?;
                Ok(Fetched::Store(Arc::new(envelope.photo_manifest)))
            })
            .await?;
        Ok(Manifest::clone(&manifest))
    }

    /// Serve `key` from cache, or fetch it while holding the key's reservation
    async fn cached<V, F, Fut>(&self, key: &str, fetch: F) -> TransportResult<V>
    where
        V: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = TransportResult<Fetched<V>>>,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let _reservation = self.reservations.reserve(key).await;

        // Another caller may have stored the value while we waited
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        match fetch().await? {
            Fetched::Store(value) => {
                self.cache.put(key, value.clone().into_payload()).await;
                self.emit(FetchEvent::CacheStore {
                    key: key.to_string(),
                });
                Ok(value)
            }
            Fetched::Skip(value) => Ok(value),
        }
    }

    async fn lookup<V: Cacheable>(&self, key: &str) -> Option<V> {
        let value = V::from_payload(self.cache.get(key).await?)?;
        self.emit(FetchEvent::CacheHit {
            key: key.to_string(),
        });
        Some(value)
    }

    /// Empty results move on to the next strategy; a failure skips straight to
    /// the next known-good-date fallback
    async fn run_latest_strategies(&self, source: &str) -> TransportResult<Fetched<Arc<[Photo]>>> {
        let mut last_error = None;

        for strategy in &self.config.latest_strategies {
            if last_error.is_some() && !strategy.is_fallback() {
                debug!("Skipping {} strategy for {} after a failure", strategy, source);
                continue;
            }

            if strategy.is_fallback() {
                self.emit(FetchEvent::FallbackEngaged {
                    source: source.to_string(),
                    reason: format!(
                        "using known-good date {}",
                        self.config.fallback_date_for(source)
                    ),
                });
            }

            match self.run_strategy(source, *strategy).await {
                Ok(photos) if !photos.is_empty() => {
                    debug!(
                        "{} strategy found {} photos for {}",
                        strategy,
                        photos.len(),
                        source
                    );
                    let photos: Arc<[Photo]> = photos.into();
                    return Ok(if strategy.is_cacheable() {
                        Fetched::Store(photos)
                    } else {
                        Fetched::Skip(photos)
                    });
                }
                Ok(_) => self.emit(FetchEvent::StrategyEmpty {
                    source: source.to_string(),
                    strategy: strategy.to_string(),
                }),
                Err(e) => {
                    self.emit(FetchEvent::StrategyFailed {
                        source: source.to_string(),
                        strategy: strategy.to_string(),
                        message: e.to_string(),
                    });
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Fetched::Skip(no_photos())),
        }
    }

    async fn run_strategy(
        &self,
        source: &str,
        strategy: LatestStrategy,
    ) -> TransportResult<Vec<Photo>> {
        match strategy {
            LatestStrategy::LatestEndpoint => {
                let envelope: LatestPhotosEnvelope =
                    self.call(&api::latest_photos_path(source), &[]).await?;
                Ok(intern_references(envelope.latest_photos))
            }
            LatestStrategy::SolScan { probes } => {
                let rover = self.get_rover_info(source).await?;
                let max_sol = rover
                    .max_sol
                    .ok_or_else(|| TransportError::MalformedPayload {
                        path: api::rover_path(source),
                        reason: "rover record has no max_sol".to_string(),
                    })?;

                for offset in 0..probes {
                    let Some(sol) = max_sol.checked_sub(offset) else {
                        break;
                    };
                    let photos = self
                        .fetch_photos(source, &[("sol", sol.to_string())])
                        .await?;
                    if !photos.is_empty() {
                        return Ok(photos);
                    }
                }
                Ok(Vec::new())
            }
            LatestStrategy::KnownGoodDate => {
                let date = self.config.fallback_date_for(source).to_string();
                self.fetch_photos(source, &[("earth_date", date)]).await
            }
        }
    }

    async fn aggregate_sources(&self) -> TransportResult<Fetched<Arc<[Photo]>>> {
        let pipelines = self.config.sources.iter().map(|source| async move {
            match self.try_latest_photos(&source.name).await {
                Ok(photos) => photos,
                Err(e) => {
                    self.emit(FetchEvent::SourceFailed {
                        source: source.name.clone(),
                        message: e.to_string(),
                    });
                    Vec::new()
                }
            }
        });

        let photos: Vec<Photo> = join_all(pipelines).await.into_iter().flatten().collect();
        self.emit(FetchEvent::AggregateComplete {
            sources: self.config.sources.len(),
            photo_count: photos.len(),
        });

        if !photos.is_empty() {
            return Ok(Fetched::Store(photos.into()));
        }

        let Some(first) = self.config.sources.first() else {
            return Ok(Fetched::Skip(no_photos()));
        };

        self.emit(FetchEvent::FallbackEngaged {
            source: first.name.clone(),
            reason: "no photos from any source".to_string(),
        });

        match self
            .get_photos_by_earth_date(&first.name, &first.fallback_date, 1)
            .await
        {
            Ok(photos) if !photos.is_empty() => Ok(Fetched::Store(photos.into())),
            Ok(_) => Ok(Fetched::Skip(no_photos())),
            Err(e) => {
                self.emit(FetchEvent::SourceFailed {
                    source: first.name.clone(),
                    message: e.to_string(),
                });
                Ok(Fetched::Skip(no_photos()))
            }
        }
    }

    async fn fetch_photos(&self, source: &str, query: &Query) -> TransportResult<Vec<Photo>> {
        let envelope: PhotosEnvelope = self.call(&api::photos_path(source), query).await?;
        Ok(intern_references(envelope.photos))
    }

    /// One upstream call, bounded by the configured timeout, decoded into `D`
    async fn call<D: DeserializeOwned>(&self, path: &str, query: &Query) -> TransportResult<D> {
        let bound = self.config.call_timeout;
        let value = match tokio::time::timeout(bound, self.transport.get_json(path, query)).await
        {
            Ok(result) => result?,
            Err(_) => {
                let error = TransportError::Timeout {
                    path: path.to_string(),
                    millis: saturating_millis(bound),
                };
                self.emit(FetchEvent::Failure {
                    path: path.to_string(),
                    status: None,
                    message: error.to_string(),
                });
                return Err(error);
            }
        };

        serde_json::from_value(value).map_err(|e| TransportError::MalformedPayload {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn emit(&self, event: FetchEvent) {
        self.observer.on_event(&event);
    }
}
