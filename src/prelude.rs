//! Prelude module for Rover Photos Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use rover_photos::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rover_photos::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     config.validate()?;
//!     config.logging.init_subscriber()?;
//!
//!     let service = Arc::new(PhotoService::from_app_config(&config)?);
//!     let mut gallery = GalleryController::new(Arc::clone(&service));
//!     gallery.load().await;
//!
//!     let mut navigation = NavigationState::new();
//!     if let ViewState::Ready(photos) = gallery.state() {
//!         println!("{} photos", photos.len());
//!         gallery.open(0, &mut navigation)?;
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Configuration
pub use crate::config::{AppConfig, LoggingConfig};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Data types
    Camera,
    Manifest,
    Photo,
    Rover,

    // Remote access and caching
    CacheConfig,
    CacheStats,
    ClientConfig,
    FetchEvent,
    FetchObserver,
    RoverClient,
    Transport,

    // Aggregation
    LatestStrategy,
    PhotoService,
    ServiceConfig,
    SourceConfig,

    // Derived views
    FilterCriteria,
    SortField,
    SortOrder,
    ViewQuery,
    filter_photos,
    sort_photos,
    unique_cameras,
    unique_sources,

    // Navigation and controllers
    DetailController,
    GalleryController,
    ListController,
    NavigationState,
    ViewState,
};

// Commonly used constants
pub use crate::constants::{DEMO_API_KEY, ENV_API_KEY, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
