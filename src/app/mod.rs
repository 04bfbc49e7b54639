//! Core application logic for Rover Photos
//!
//! This module contains the remote client, data models, response cache,
//! aggregation service, derived-view pipeline, navigation state and the view
//! controllers built on top of them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rover_photos::app::view::{FilterCriteria, SortField, SortOrder, ViewQuery};
//! use rover_photos::app::{NavigationState, PhotoService, RoverClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = PhotoService::new(RoverClient::new()?);
//! let photos = service.get_photos_from_all_sources().await;
//!
//! let query = ViewQuery::new(FilterCriteria::new().with_source("Curiosity"))
//!     .sorted_by(SortField::Sol, SortOrder::Desc);
//! let shown = query.apply(&photos);
//!
//! let mut navigation = NavigationState::new();
//! navigation.replace(shown, 0)?;
//! if let Some(photo) = navigation.current() {
//!     println!("{} from {} on sol {}", photo.img_src, photo.source_name(), photo.sol);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod controller;
pub mod models;
pub mod navigation;
pub mod service;
pub mod view;

// Re-export main public API
pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use client::{
    ClientConfig, FetchEvent, FetchObserver, NoopObserver, RoverClient, TracingObserver, Transport,
};
pub use controller::{DetailController, GalleryController, ListController, ViewState};
pub use models::{Camera, Manifest, ManifestEntry, Photo, Rover};
pub use navigation::NavigationState;
pub use service::{LatestStrategy, PhotoService, ServiceConfig, SourceConfig};
pub use view::{
    filter_photos, paginate, sort_photos, unique_cameras, unique_sources, FilterCriteria,
    PhotoPage, SortField, SortOrder, ViewQuery,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert_eq!(config.api_key, crate::constants::DEMO_API_KEY);
        assert_eq!(ServiceConfig::default().sources.len(), 3);
        assert!(NavigationState::new().is_empty());
    }
}
