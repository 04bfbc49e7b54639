//! Rover Photos Library
//!
//! A Rust library for browsing the public Mars rover photo archive. Provides a
//! cache-backed aggregation service over the upstream sources, a pure pipeline
//! for filtering, sorting and paginating photo collections, and the navigation
//! state and view controllers that tie them together.

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
