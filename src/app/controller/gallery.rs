//! Gallery view: every source, narrowed by source and camera selections

use std::sync::Arc;

use tracing::debug;

use super::{publish, ViewState};
use crate::app::client::Transport;
use crate::app::models::Photo;
use crate::app::navigation::NavigationState;
use crate::app::service::PhotoService;
use crate::app::view::{filter_photos, unique_cameras, unique_sources, FilterCriteria};
use crate::errors::NavigationResult;

#[derive(Debug)]
pub struct GalleryController<T> {
    service: Arc<PhotoService<T>>,
    base: ViewState<Vec<Photo>>,
    criteria: FilterCriteria,
    displayed: Vec<Photo>,
    available_sources: Vec<String>,
    available_cameras: Vec<String>,
}

impl<T: Transport> GalleryController<T> {
    pub fn new(service: Arc<PhotoService<T>>) -> Self {
        Self {
            service,
            base: ViewState::Loading,
            criteria: FilterCriteria::default(),
            displayed: Vec::new(),
            available_sources: Vec::new(),
            available_cameras: Vec::new(),
        }
    }

    /// Fetch the aggregate of every source and reset the filter choices
    pub async fn load(&mut self) {
        self.base = ViewState::Loading;
        let photos = self.service.get_photos_from_all_sources().await;
        debug!("Gallery loaded {} photos", photos.len());

        self.available_sources = unique_sources(&photos);
        self.available_cameras = unique_cameras(&photos);
        self.base = ViewState::from_photos(photos);
        self.refresh();
    }

    pub fn toggle_source(&mut self, source: &str) {
        self.criteria.toggle_source(source);
        self.refresh();
    }

    pub fn toggle_camera(&mut self, camera: &str) {
        self.criteria.toggle_camera(camera);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.refresh();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn available_sources(&self) -> &[String] {
        &self.available_sources
    }

    pub fn available_cameras(&self) -> &[String] {
        &self.available_cameras
    }

    /// Total photos before filtering
    pub fn total(&self) -> usize {
        self.base.photos().len()
    }

    pub fn displayed(&self) -> &[Photo] {
        &self.displayed
    }

    pub fn state(&self) -> ViewState<&[Photo]> {
        self.base.displaying(&self.displayed)
    }

    /// Publish the displayed photos with `index` selected, for drill-down
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::IndexOutOfBounds` if `index` is not displayed
    pub fn open(&self, index: usize, navigation: &mut NavigationState) -> NavigationResult<Photo> {
        publish(&self.displayed, index, navigation)
    }

    fn refresh(&mut self) {
        self.displayed = filter_photos(self.base.photos(), &self.criteria);
    }
}
