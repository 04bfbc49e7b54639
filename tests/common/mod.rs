//! Shared helpers for integration tests

#![allow(dead_code)]

use rover_photos::app::Photo;

pub use rover_photos::app::client::testing::{
    latest_json, photo_json, photos_json, rover_json, RecordingObserver, Reply, ScriptedTransport,
};

/// Decode a photo the same way the service does
pub fn photo(id: u64, sol: u32, earth_date: &str, camera: &str, rover: &str) -> Photo {
    serde_json::from_value(photo_json(id, sol, earth_date, camera, rover)).unwrap()
}
