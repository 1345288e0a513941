//! Session state as an immutable snapshot.
//!
//! Each update returns a new [`Session`]; views derive everything from the
//! snapshot they are handed. The dataset itself is shared, not copied.

use std::sync::Arc;

use crate::filter::{filter_stores, FilterSpec};
use crate::geo::Coordinate;
use crate::store::{Dataset, StoreRecord};

/// Highest zoom the map view will move to.
pub const MAX_VIEWPORT_ZOOM: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Viewport {
    /// A viewport centered on `center`, with `zoom` clamped to
    /// [`MAX_VIEWPORT_ZOOM`].
    #[must_use]
    pub fn centered_on(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_VIEWPORT_ZOOM),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Coordinate {
                latitude: 39.0,
                longitude: -80.0,
            },
            zoom: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    filter: FilterSpec,
    viewport: Viewport,
    user_location: Option<Coordinate>,
    selected_store: Option<i64>,
}

impl Session {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            filter: FilterSpec::default(),
            viewport: Viewport::default(),
            user_location: None,
            selected_store: None,
        }
    }

    #[must_use]
    pub fn with_filter(&self, filter: FilterSpec) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_viewport(&self, viewport: Viewport) -> Self {
        Self {
            viewport,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_user_location(&self, user_location: Option<Coordinate>) -> Self {
        Self {
            user_location,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn select_store(&self, selected_store: Option<i64>) -> Self {
        Self {
            selected_store,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    /// The dataset narrowed by the current filter, in dataset order.
    #[must_use]
    pub fn filtered_stores(&self) -> Vec<&StoreRecord> {
        filter_stores(self.dataset.stores(), &self.filter)
    }

    /// The selected store, if it is still part of the filtered view.
    #[must_use]
    pub fn selected_store(&self) -> Option<&StoreRecord> {
        let id = self.selected_store?;
        self.dataset
            .get(id)
            .filter(|store| self.filter.matches(store))
    }
}
