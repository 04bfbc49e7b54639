//! Detail view: one photo, with sibling navigation through the shared state

use std::sync::Arc;

use tracing::{debug, warn};

use super::ViewState;
use crate::app::client::Transport;
use crate::app::models::Photo;
use crate::app::navigation::NavigationState;
use crate::app::service::PhotoService;
use crate::errors::{NavigationError, NavigationResult};

#[derive(Debug)]
pub struct DetailController<T> {
    service: Arc<PhotoService<T>>,
    state: ViewState<Photo>,
}

impl<T: Transport> DetailController<T> {
    pub fn new(service: Arc<PhotoService<T>>) -> Self {
        Self {
            service,
            state: ViewState::Loading,
        }
    }

    /// Show `photo_id`
    ///
    /// Resolves from the navigation state when the photo is already there.
    /// Otherwise fetches the aggregate of every source and republishes it, so
    /// previous/next work after a direct link too.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NotFound` if no known collection has the photo;
    /// the controller is then in the error state.
    pub async fn open(
        &mut self,
        photo_id: u64,
        navigation: &mut NavigationState,
    ) -> NavigationResult<Photo> {
        self.state = ViewState::Loading;

        if let Some(index) = navigation.index_of(photo_id) {
            let photo = navigation.select(index)?.clone();
            self.state = ViewState::Ready(photo.clone());
            return Ok(photo);
        }

        debug!("Photo {} not in navigation state, fetching all sources", photo_id);
        let photos = self.service.get_photos_from_all_sources().await;

        let Some(index) = photos.iter().position(|p| p.id == photo_id) else {
            let err = NavigationError::NotFound { photo_id };
            warn!("{}", err);
            self.state = ViewState::Error {
                message: err.to_string(),
            };
            return Err(err);
        };

        navigation.replace(photos, index)?;
        let photo = navigation
            .current()
            .cloned()
            .ok_or(NavigationError::NotFound { photo_id })?;
        self.state = ViewState::Ready(photo.clone());
        Ok(photo)
    }

    /// Step to the next sibling; `None` at the end
    pub fn next(&mut self, navigation: &mut NavigationState) -> Option<Photo> {
        let photo = navigation.next()?.clone();
        self.state = ViewState::Ready(photo.clone());
        Some(photo)
    }

    /// Step to the previous sibling; `None` at the start
    pub fn previous(&mut self, navigation: &mut NavigationState) -> Option<Photo> {
        let photo = navigation.previous()?.clone();
        self.state = ViewState::Ready(photo.clone());
        Some(photo)
    }

    /// 1-based position and total for the "3 / 25" counter
    pub fn counter(&self, navigation: &NavigationState) -> Option<(usize, usize)> {
        navigation.position()
    }

    pub fn state(&self) -> &ViewState<Photo> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controller::testing::service;
    use crate::app::controller::ListController;
    use crate::app::models::fixtures::photo;
    use crate::app::view::SortField;

    #[tokio::test]
    async fn test_resolves_from_navigation_without_fetching() {
        let service = service();
        let mut navigation = NavigationState::new();
        navigation
            .replace(
                vec![
                    photo(7, 1, "2015-05-30", "FHAZ", "Curiosity"),
                    photo(8, 1, "2015-05-30", "FHAZ", "Curiosity"),
                ],
                0,
            )
            .unwrap();

        let mut detail = DetailController::new(Arc::clone(&service));
        let shown = detail.open(8, &mut navigation).await.unwrap();

        assert_eq!(shown.id, 8);
        assert_eq!(detail.counter(&navigation), Some((2, 2)));
        assert_eq!(service.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_direct_link_fetches_and_publishes() {
        let mut navigation = NavigationState::new();
        let mut detail = DetailController::new(service());

        let shown = detail.open(10, &mut navigation).await.unwrap();
        assert_eq!(shown.source_name(), "Opportunity");
        assert_eq!(navigation.len(), 5);
        assert_eq!(detail.counter(&navigation), Some((3, 5)));
        assert_eq!(detail.state().ready().map(|p| p.id), Some(10));
    }

    #[tokio::test]
    async fn test_unknown_photo_is_not_found() {
        let mut navigation = NavigationState::new();
        let mut detail = DetailController::new(service());

        let err = detail.open(404, &mut navigation).await.unwrap_err();
        assert_eq!(err, NavigationError::NotFound { photo_id: 404 });
        assert!(detail.state().is_error());
        assert!(navigation.is_empty());
    }

    #[tokio::test]
    async fn test_prev_next_follow_list_order() {
        let service = service();
        let mut list = ListController::new(Arc::clone(&service));
        list.load().await;
        list.set_sort_field(SortField::Id);

        let mut navigation = NavigationState::new();
        let opened = list.open(4, &mut navigation).unwrap();
        assert_eq!(opened.id, 1);

        let mut detail = DetailController::new(service);
        detail.open(opened.id, &mut navigation).await.unwrap();

        assert!(detail.next(&mut navigation).is_none());
        assert_eq!(detail.previous(&mut navigation).map(|p| p.id), Some(2));
        assert_eq!(detail.state().ready().map(|p| p.id), Some(2));
        assert_eq!(detail.counter(&navigation), Some((4, 5)));
    }
}
