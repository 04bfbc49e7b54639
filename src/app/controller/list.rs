//! List view: search and sort over every source, or over a single sol

use std::sync::Arc;

use tracing::{debug, warn};

use super::{publish, ViewState};
use crate::app::client::Transport;
use crate::app::models::Photo;
use crate::app::navigation::NavigationState;
use crate::app::service::PhotoService;
use crate::app::view::{paginate, FilterCriteria, PhotoPage, SortField, SortOrder, ViewQuery};
use crate::constants::views;
use crate::errors::NavigationResult;

#[derive(Debug)]
pub struct ListController<T> {
    service: Arc<PhotoService<T>>,
    base: ViewState<Vec<Photo>>,
    query: ViewQuery,
    displayed: Vec<Photo>,
    per_page: usize,
}

impl<T: Transport> ListController<T> {
    /// New controller sorted by earth date, newest first
    pub fn new(service: Arc<PhotoService<T>>) -> Self {
        Self {
            service,
            base: ViewState::Loading,
            query: ViewQuery::new(FilterCriteria::default())
                .sorted_by(SortField::EarthDate, SortOrder::Desc),
            displayed: Vec::new(),
            per_page: views::DEFAULT_PAGE_SIZE,
        }
    }

    /// Photos per in-memory page
    pub fn with_page_size(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Fetch the aggregate of every source
    pub async fn load(&mut self) {
        self.base = ViewState::Loading;
        let photos = self.service.get_photos_from_all_sources().await;
        debug!("List loaded {} photos", photos.len());
        self.base = ViewState::from_photos(photos);
        self.refresh();
    }

    /// Fetch one upstream page of a single sol
    ///
    /// Transport failures leave the controller in the error state.
    pub async fn load_sol(&mut self, source: &str, sol: u32, page: u32) {
        self.base = ViewState::Loading;
        self.base = match self.service.get_photos_by_sol(source, sol, page).await {
            Ok(photos) => ViewState::from_photos(photos),
            Err(e) => {
                warn!("Failed to load sol {} of {}: {}", sol, source, e);
                ViewState::Error {
                    message: e.to_string(),
                }
            }
        };
        self.refresh();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query.criteria.search_query = query.into();
        self.refresh();
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        let order = self.sort_order();
        self.query.sort = Some((field, order));
        self.refresh();
    }

    pub fn toggle_sort_order(&mut self) {
        let field = self.sort_field();
        let order = self.sort_order().toggle();
        self.query.sort = Some((field, order));
        self.refresh();
    }

    pub fn sort_field(&self) -> SortField {
        self.query.sort.map_or(SortField::EarthDate, |(field, _)| field)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.query.sort.map_or(SortOrder::Desc, |(_, order)| order)
    }

    pub fn search_query(&self) -> &str {
        &self.query.criteria.search_query
    }

    /// Total photos before searching
    pub fn total(&self) -> usize {
        self.base.photos().len()
    }

    pub fn displayed(&self) -> &[Photo] {
        &self.displayed
    }

    /// One in-memory page (1-based) of the displayed photos
    pub fn page(&self, page: usize) -> PhotoPage {
        paginate(&self.displayed, page, self.per_page)
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
        self.displayed = self.query.apply(self.base.photos());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::testing::{photos_json, Reply, ScriptedTransport};
    use crate::app::client::NoopObserver;
    use crate::app::controller::testing::service;

    fn ids(photos: &[Photo]) -> Vec<u64> {
        photos.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_default_sort_is_newest_first() {
        let mut list = ListController::new(service());
        assert_eq!(list.sort_field(), SortField::EarthDate);
        assert_eq!(list.sort_order(), SortOrder::Desc);

        list.load().await;
        assert_eq!(list.displayed().len(), 5);
        assert_eq!(list.page(1).per_page, 25);
    }

    #[tokio::test]
    async fn test_search_and_sort() {
        let mut list = ListController::new(service());
        list.load().await;

        list.set_sort_field(SortField::Id);
        assert_eq!(ids(list.displayed()), vec![21, 20, 10, 2, 1]);

        list.toggle_sort_order();
        assert_eq!(ids(list.displayed()), vec![1, 2, 10, 20, 21]);

        list.set_search_query("spirit");
        assert_eq!(ids(list.displayed()), vec![20, 21]);
        assert_eq!(list.total(), 5);

        list.set_search_query("no such rover");
        assert!(list.state().is_empty());
    }

    #[tokio::test]
    async fn test_paging_over_displayed() {
        let mut list = ListController::new(service()).with_page_size(2);
        list.load().await;
        list.set_sort_field(SortField::Id);
        list.toggle_sort_order();

        let page = list.page(2);
        assert_eq!(ids(&page.items), vec![10, 20]);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_sol_failure_is_error_state() {
        let transport = ScriptedTransport::new()
            .reply("/rovers/curiosity/photos?sol=1000&page=1", Reply::Status(500))
            .json("/rovers/curiosity/photos?sol=1001&page=1", photos_json(1, 3, "Curiosity"));
        let service =
            Arc::new(PhotoService::new(transport).with_observer(Arc::new(NoopObserver)));
        let mut list = ListController::new(service);

        list.load_sol("curiosity", 1000, 1).await;
        assert!(list.state().is_error());
        assert!(list.displayed().is_empty());

        list.load_sol("curiosity", 1001, 1).await;
        assert_eq!(list.state().ready().map(|p| p.len()), Some(3));
    }

    #[tokio::test]
    async fn test_open_after_sort() {
        let mut list = ListController::new(service());
        list.load().await;
        list.set_sort_field(SortField::Id);

        let mut navigation = NavigationState::new();
        assert_eq!(list.open(0, &mut navigation).unwrap().id, 21);
        assert_eq!(navigation.active().len(), 5);
    }
}
