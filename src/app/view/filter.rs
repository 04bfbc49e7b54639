//! Filtering by source, camera and free-text search

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::app::models::Photo;

/// Declarative filter over a photo collection
///
/// Categories combine with AND; values inside a category combine with OR. An
/// empty category places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Selected source names, matched case-insensitively
    pub sources: BTreeSet<String>,
    /// Selected camera short names, matched case-insensitively
    pub cameras: BTreeSet<String>,
    /// Case-insensitive substring searched across several photo fields
    pub search_query: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into());
        self
    }

    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.cameras.insert(camera.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Add `source` if absent, remove it if present
    pub fn toggle_source(&mut self, source: &str) {
        if !self.sources.remove(source) {
            self.sources.insert(source.to_string());
        }
    }

    /// Add `camera` if absent, remove it if present
    pub fn toggle_camera(&mut self, camera: &str) {
        if !self.cameras.remove(camera) {
            self.cameras.insert(camera.to_string());
        }
    }

    /// Drop every selection and the search query
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no category constrains the result
    pub fn is_unconstrained(&self) -> bool {
        self.sources.is_empty() && self.cameras.is_empty() && self.search_query.is_empty()
    }

    /// Whether a single photo passes every active category
    pub fn matches(&self, photo: &Photo) -> bool {
        self.matches_source(photo) && self.matches_camera(photo) && self.matches_search(photo)
    }

    fn matches_source(&self, photo: &Photo) -> bool {
        self.sources.is_empty()
            || self
                .sources
                .iter()
                .any(|s| s.eq_ignore_ascii_case(photo.source_name()))
    }

    fn matches_camera(&self, photo: &Photo) -> bool {
        self.cameras.is_empty()
            || self
                .cameras
                .iter()
                .any(|c| c.eq_ignore_ascii_case(photo.camera_name()))
    }

    fn matches_search(&self, photo: &Photo) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&needle);

        contains(&photo.camera.name)
            || photo.camera.full_name.as_deref().is_some_and(contains)
            || contains(&photo.rover.name)
            || contains(&photo.earth_date)
            || contains(&photo.sol.to_string())
    }
}

/// Photos passing `criteria`, in input order
pub fn filter_photos(photos: &[Photo], criteria: &FilterCriteria) -> Vec<Photo> {
    photos
        .iter()
        .filter(|photo| criteria.matches(photo))
        .cloned()
        .collect()
}

/// Distinct source names, ascending
pub fn unique_sources(photos: &[Photo]) -> Vec<String> {
    photos
        .iter()
        .map(|p| p.source_name().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct camera short names, ascending
pub fn unique_cameras(photos: &[Photo]) -> Vec<String> {
    photos
        .iter()
        .map(|p| p.camera_name().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
