//! In-memory response cache with fetch coalescing
//!
//! This module shields the remote client from redundant calls. It is an
//! explicitly constructed component: the aggregation service owns one, and
//! tests create isolated instances.
//!
//! # Module Organization
//!
//! - [`config`] - TTL configuration
//! - [`manager`] - The key/value store with lazy expiry
//! - [`reservation`] - Per-key locks so concurrent misses issue one fetch
//! - [`stats`] - Hit/miss counters
//!
//! # Examples
//!
//! ```rust
//! use rover_photos::app::cache::{CacheConfig, ResponseCache};
//!
//! # async fn example() {
//! let cache = ResponseCache::new(CacheConfig::default());
//! cache.put("rover-spirit", 2208u32).await;
//! assert_eq!(cache.get("rover-spirit").await, Some(2208));
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod reservation;
pub mod stats;

// Re-export main public API
pub use config::CacheConfig;
pub use manager::{CacheEntry, ResponseCache};
pub use reservation::{FetchReservations, Reservation};
pub use stats::CacheStats;
