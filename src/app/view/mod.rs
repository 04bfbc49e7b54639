//! Derived-view pipeline
//!
//! Pure functions turning a base photo collection into what a view shows:
//! filter, then sort, then paginate in memory. Inputs are never modified; every
//! stage returns a new collection and is total over well-formed photos.
//!
//! # Examples
//!
//! ```rust
//! use rover_photos::app::view::{FilterCriteria, SortField, SortOrder, ViewQuery};
//!
//! let query = ViewQuery::new(FilterCriteria::new().with_camera("NAVCAM"))
//!     .sorted_by(SortField::EarthDate, SortOrder::Desc);
//! let shown = query.apply(&[]);
//! assert!(shown.is_empty());
//! ```

pub mod filter;
pub mod paginate;
pub mod sort;

use serde::{Deserialize, Serialize};

use crate::app::models::Photo;

pub use filter::{filter_photos, unique_cameras, unique_sources, FilterCriteria};
pub use paginate::{paginate, PhotoPage};
pub use sort::{sort_photos, SortField, SortOrder};

/// Filter criteria plus an optional ordering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    pub criteria: FilterCriteria,
    pub sort: Option<(SortField, SortOrder)>,
}

impl ViewQuery {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            sort: None,
        }
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// Run filter then sort over `photos`
    pub fn apply(&self, photos: &[Photo]) -> Vec<Photo> {
        let filtered = filter_photos(photos, &self.criteria);
        match self.sort {
            Some((field, order)) => sort_photos(&filtered, field, order),
            None => filtered,
        }
    }
}
