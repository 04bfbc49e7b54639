//! In-memory pagination of an already derived collection

use serde::Serialize;

use crate::app::models::Photo;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoPage {
    pub items: Vec<Photo>,
    /// 1-based page number that was requested
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PhotoPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// Index into the full collection of the first item on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.per_page
    }
}

/// Slice page `page` (1-based) of `per_page` items out of `photos`
///
/// A `per_page` of zero is treated as one. Pages past the end, and page zero,
/// come back with no items.
pub fn paginate(photos: &[Photo], page: usize, per_page: usize) -> PhotoPage {
    let per_page = per_page.max(1);
    let total_items = photos.len();
    let total_pages = total_items.div_ceil(per_page);

    let items = if page == 0 {
        Vec::new()
    } else {
        photos
            .iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect()
    };

    PhotoPage {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}
