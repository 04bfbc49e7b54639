//! Data models for Rover Photos
//!
//! This module defines the records decoded from the upstream API: photos, the
//! cameras and rovers they reference, and per-rover manifests. Records are
//! immutable once decoded; rover and camera records are shared between photos
//! through `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A camera mounted on a rover
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Camera {
    /// Upstream id (absent on the camera list embedded in a rover record)
    #[serde(default)]
    pub id: Option<u64>,
    /// Short code, e.g. "FHAZ"
    pub name: String,
    /// Human readable name, e.g. "Front Hazard Avoidance Camera"
    #[serde(default)]
    pub full_name: Option<String>,
    /// Back-reference to the owning rover
    #[serde(default)]
    pub rover_id: Option<u64>,
}

/// A rover (one upstream source)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rover {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub landing_date: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    /// Mission status, kept opaque ("active", "complete", ...)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub max_sol: Option<u32>,
    #[serde(default)]
    pub max_date: Option<String>,
    #[serde(default)]
    pub total_photos: Option<u64>,
    #[serde(default)]
    pub cameras: Vec<Camera>,
}

/// A single archive photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique within one source, not across sources
    pub id: u64,
    /// Mission-relative day
    pub sol: u32,
    /// Calendar date, `YYYY-MM-DD`
    pub earth_date: String,
    /// Absolute image URL
    pub img_src: String,
    pub camera: Arc<Camera>,
    pub rover: Arc<Rover>,
}

impl Photo {
    /// Name of the source (rover) this photo came from
    pub fn source_name(&self) -> &str {
        &self.rover.name
    }

    /// Short camera code
    pub fn camera_name(&self) -> &str {
        &self.camera.name
    }
}

/// One sol of a rover manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub sol: u32,
    #[serde(default)]
    pub earth_date: Option<String>,
    #[serde(default)]
    pub total_photos: Option<u64>,
    /// Camera codes active on this sol
    #[serde(default)]
    pub cameras: Vec<String>,
}

/// Per-rover summary of which sols have photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub landing_date: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub max_sol: Option<u32>,
    #[serde(default)]
    pub max_date: Option<String>,
    #[serde(default)]
    pub total_photos: Option<u64>,
    #[serde(default)]
    pub photos: Vec<ManifestEntry>,
}

impl Manifest {
    /// Sols that have at least one photo, most recent first
    pub fn sols_with_photos(&self) -> Vec<u32> {
        let mut sols: Vec<u32> = self
            .photos
            .iter()
            .filter(|entry| entry.total_photos.unwrap_or(0) > 0)
            .map(|entry| entry.sol)
            .collect();
        sols.sort_unstable_by(|a, b| b.cmp(a));
        sols
    }
}

/// `{ "photos": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosEnvelope {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// `{ "latest_photos": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct LatestPhotosEnvelope {
    #[serde(default)]
    pub latest_photos: Vec<Photo>,
}

/// `{ "rover": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct RoverEnvelope {
    pub rover: Rover,
}

/// `{ "photo_manifest": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEnvelope {
    pub photo_manifest: Manifest,
}

/// Collapse duplicate rover and camera records so that photos of one page share them
///
/// Decoding gives every photo its own `Arc`; after interning, photos referencing
/// the same rover id (or the same rover/camera pair) point at one allocation.
pub fn intern_references(photos: Vec<Photo>) -> Vec<Photo> {
    let mut rovers: HashMap<u64, Arc<Rover>> = HashMap::new();
    let mut cameras: HashMap<(u64, String), Arc<Camera>> = HashMap::new();

    photos
        .into_iter()
        .map(|mut photo| {
            let rover = rovers
                .entry(photo.rover.id)
                .or_insert_with(|| Arc::clone(&photo.rover));
            photo.rover = Arc::clone(rover);

            let camera = cameras
                .entry((photo.rover.id, photo.camera.name.clone()))
                .or_insert_with(|| Arc::clone(&photo.camera));
            photo.camera = Arc::clone(camera);

            photo
        })
        .collect()
}
