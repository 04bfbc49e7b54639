//! Shared navigation state
//!
//! Holds the collection a view last displayed and the selected position in
//! it, so a detail view can step to siblings without refetching. Controllers
//! write it wholesale with [`NavigationState::replace`] whenever the browsing
//! context changes, then read it back on drill-down.
//!
//! Invariant: while the collection is non-empty the selected index is in
//! bounds. An empty collection ignores the index.

use crate::app::models::Photo;
use crate::errors::{NavigationError, NavigationResult};

#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    active: Vec<Photo>,
    selected: usize,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active collection and selection in one step
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::IndexOutOfBounds` if the collection is
    /// non-empty and `selected` is past its end; the state is left unchanged.
    pub fn replace(&mut self, collection: Vec<Photo>, selected: usize) -> NavigationResult<()> {
        if !collection.is_empty() && selected >= collection.len() {
            return Err(NavigationError::IndexOutOfBounds {
                index: selected,
                len: collection.len(),
            });
        }
        self.active = collection;
        self.selected = selected;
        Ok(())
    }

    /// Move the selection within the current collection
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::IndexOutOfBounds` if `index` is past the end
    pub fn select(&mut self, index: usize) -> NavigationResult<&Photo> {
        if index >= self.active.len() {
            return Err(NavigationError::IndexOutOfBounds {
                index,
                len: self.active.len(),
            });
        }
        self.selected = index;
        Ok(&self.active[index])
    }

    pub fn active(&self) -> &[Photo] {
        &self.active
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn current(&self) -> Option<&Photo> {
        self.active.get(self.selected)
    }

    pub fn has_next(&self) -> bool {
        !self.active.is_empty() && self.selected + 1 < self.active.len()
    }

    pub fn has_previous(&self) -> bool {
        !self.active.is_empty() && self.selected > 0
    }

    /// Step forward; no-op returning `None` at the last photo
    pub fn next(&mut self) -> Option<&Photo> {
        if !self.has_next() {
            return None;
        }
        self.selected += 1;
        self.active.get(self.selected)
    }

    /// Step back; no-op returning `None` at the first photo
    pub fn previous(&mut self) -> Option<&Photo> {
        if !self.has_previous() {
            return None;
        }
        self.selected -= 1;
        self.active.get(self.selected)
    }

    /// 1-based position and total, e.g. `(3, 25)`
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current().map(|_| (self.selected + 1, self.active.len()))
    }

    /// Index of the first photo with `photo_id`
    pub fn index_of(&self, photo_id: u64) -> Option<usize> {
        self.active.iter().position(|p| p.id == photo_id)
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::fixtures::photo;

    fn photos(count: u64) -> Vec<Photo> {
        (1..=count)
            .map(|id| photo(id, 1000, "2015-05-30", "FHAZ", "Curiosity"))
            .collect()
    }

    #[test]
    fn test_next_is_noop_at_last_photo() {
        let mut state = NavigationState::new();
        state.replace(photos(3), 2).unwrap();

        assert!(!state.has_next());
        assert!(state.next().is_none());
        assert_eq!(state.selected_index(), 2);
        assert_eq!(state.position(), Some((3, 3)));
    }

    #[test]
    fn test_previous_is_noop_at_first_photo() {
        let mut state = NavigationState::new();
        state.replace(photos(3), 0).unwrap();

        assert!(!state.has_previous());
        assert!(state.previous().is_none());
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn test_stepping_through_collection() {
        let mut state = NavigationState::new();
        state.replace(photos(3), 0).unwrap();

        assert_eq!(state.next().map(|p| p.id), Some(2));
        assert_eq!(state.next().map(|p| p.id), Some(3));
        assert_eq!(state.previous().map(|p| p.id), Some(2));
        assert_eq!(state.current().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_out_of_bounds_replace_is_rejected() {
        let mut state = NavigationState::new();
        state.replace(photos(2), 1).unwrap();

        let err = state.replace(photos(3), 3).unwrap_err();
        assert_eq!(err, NavigationError::IndexOutOfBounds { index: 3, len: 3 });
        assert_eq!(state.len(), 2);
        assert_eq!(state.selected_index(), 1);
    }

    #[test]
    fn test_empty_collection_ignores_index() {
        let mut state = NavigationState::new();
        state.replace(Vec::new(), 7).unwrap();

        assert!(state.is_empty());
        assert!(state.current().is_none());
        assert!(state.position().is_none());
        assert!(!state.has_next());
        assert!(!state.has_previous());
    }

    #[test]
    fn test_select_and_index_of() {
        let mut state = NavigationState::new();
        state.replace(photos(4), 0).unwrap();

        let index = state.index_of(3).unwrap();
        assert_eq!(state.select(index).unwrap().id, 3);
        assert!(state.select(4).is_err());
        assert_eq!(state.index_of(99), None);

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.selected_index(), 0);
    }
}
