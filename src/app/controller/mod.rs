//! View controllers
//!
//! Controllers sit between presentation and the core. Each one asks the
//! [`PhotoService`](crate::app::PhotoService) for data, runs the derived-view
//! pipeline over it, and publishes the displayed collection to a
//! [`NavigationState`] that the caller owns and passes by reference.
//!
//! - [`gallery`] - All sources, filtered by source and camera selections
//! - [`list`] - All sources, searched and sorted, with in-memory paging
//! - [`detail`] - One photo with previous/next stepping

pub mod detail;
pub mod gallery;
pub mod list;

pub use detail::DetailController;
pub use gallery::GalleryController;
pub use list::ListController;

use crate::app::models::Photo;
use crate::app::navigation::NavigationState;
use crate::errors::{NavigationError, NavigationResult};

/// What a view renders
///
/// `Loading`, `Error` and `Empty` are mutually exclusive; `Error` means the
/// fetch failed and a retry makes sense, `Empty` means the fetch succeeded but
/// nothing is left to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Error { message: String },
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewState::Empty)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl ViewState<Vec<Photo>> {
    /// `Ready` for a non-empty collection, `Empty` otherwise
    pub fn from_photos(photos: Vec<Photo>) -> Self {
        if photos.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Ready(photos)
        }
    }

    /// State of the displayed subset of this base collection
    pub(crate) fn displaying<'a>(&self, displayed: &'a [Photo]) -> ViewState<&'a [Photo]> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Error { message } => ViewState::Error {
                message: message.clone(),
            },
            ViewState::Ready(_) if !displayed.is_empty() => ViewState::Ready(displayed),
            _ => ViewState::Empty,
        }
    }

    pub(crate) fn photos(&self) -> &[Photo] {
        self.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Publish `displayed` with `index` selected and return the selected photo
fn publish(
    displayed: &[Photo],
    index: usize,
    navigation: &mut NavigationState,
) -> NavigationResult<Photo> {
    let photo = displayed
        .get(index)
        .cloned()
        .ok_or(NavigationError::IndexOutOfBounds {
            index,
            len: displayed.len(),
        })?;
    navigation.replace(displayed.to_vec(), index)?;
    Ok(photo)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::app::client::testing::{latest_json, ScriptedTransport};
    use crate::app::client::NoopObserver;
    use crate::app::service::PhotoService;

    /// Service whose three sources return 2, 1 and 2 latest photos
    pub fn service() -> Arc<PhotoService<ScriptedTransport>> {
        let transport = ScriptedTransport::new()
            .json("/rovers/curiosity/latest_photos", latest_json(1, 2, "Curiosity"))
            .json("/rovers/opportunity/latest_photos", latest_json(10, 1, "Opportunity"))
            .json("/rovers/spirit/latest_photos", latest_json(20, 2, "Spirit"));
        Arc::new(PhotoService::new(transport).with_observer(Arc::new(NoopObserver)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::fixtures::photo;

    #[test]
    fn test_states_are_exclusive() {
        let loading: ViewState<()> = ViewState::Loading;
        assert!(loading.is_loading() && !loading.is_error() && !loading.is_empty());

        let error: ViewState<()> = ViewState::Error {
            message: "upstream unavailable".to_string(),
        };
        assert!(error.is_error() && !error.is_empty());
        assert_eq!(error.error_message(), Some("upstream unavailable"));

        assert!(ViewState::from_photos(Vec::new()).is_empty());
    }

    #[test]
    fn test_displaying_empty_subset_is_empty() {
        let base = ViewState::from_photos(vec![photo(1, 1, "2015-05-30", "FHAZ", "Curiosity")]);
        assert!(base.displaying(&[]).is_empty());
        assert_eq!(base.displaying(base.photos()).ready().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_publish_rejects_bad_index() {
        let mut navigation = NavigationState::new();
        let photos = vec![photo(1, 1, "2015-05-30", "FHAZ", "Curiosity")];

        assert!(publish(&photos, 1, &mut navigation).is_err());
        assert!(navigation.is_empty());

        assert_eq!(publish(&photos, 0, &mut navigation).unwrap().id, 1);
        assert_eq!(navigation.len(), 1);
    }
}
