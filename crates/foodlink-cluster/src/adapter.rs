//! Per-category clustering of store records.

use foodlink_core::{Coordinate, RetailCategory, StoreRecord, Viewport};

use crate::error::ClusterError;
use crate::index::{BoundingBox, ClusterFeature, ClusterId, ClusterIndex, ClusterOptions};

/// A marker to draw for one category at the current viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum MapMarker<'a> {
    Cluster {
        id: ClusterId,
        center: Coordinate,
        point_count: usize,
    },
    Store(&'a StoreRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryClusters<'a> {
    pub category: RetailCategory,
    /// Stores of this category with usable coordinates.
    pub indexed: usize,
    pub markers: Vec<MapMarker<'a>>,
}

/// One [`ClusterIndex`] per retail category, built over borrowed stores.
#[derive(Debug)]
pub struct CategoryClusterer<'a> {
    indexes: Vec<(RetailCategory, ClusterIndex<&'a StoreRecord>)>,
    excluded: usize,
}

impl<'a> CategoryClusterer<'a> {
    /// Partition `stores` by category and index each partition. Stores
    /// without a usable coordinate are left out. Categories keep first-seen
    /// order.
    pub fn new<I>(options: ClusterOptions, stores: I) -> Self
    where
        I: IntoIterator<Item = &'a StoreRecord>,
    {
        let mut partitions: Vec<(RetailCategory, Vec<(Coordinate, &'a StoreRecord)>)> = Vec::new();
        let mut excluded = 0usize;

        for store in stores {
            let Some(coordinate) = store.coordinate() else {
                tracing::debug!(store_id = store.id, "store has no usable coordinate; not clustered");
                excluded += 1;
                continue;
            };
            match partitions.iter_mut().find(|(c, _)| *c == store.category) {
                Some((_, points)) => points.push((coordinate, store)),
                None => partitions.push((store.category, vec![(coordinate, store)])),
            }
        }

        let indexes: Vec<_> = partitions
            .into_iter()
            .map(|(category, points)| (category, ClusterIndex::new(options, points)))
            .collect();

        tracing::debug!(
            categories = indexes.len(),
            excluded,
            "built category cluster indexes"
        );

        Self { indexes, excluded }
    }

    /// Stores dropped for lacking a usable coordinate.
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    #[must_use]
    pub fn categories(&self) -> Vec<RetailCategory> {
        self.indexes.iter().map(|(c, _)| *c).collect()
    }

    /// Markers for every category visible in `bbox` at `zoom`.
    #[must_use]
    pub fn clusters(&self, bbox: &BoundingBox, zoom: u8) -> Vec<CategoryClusters<'a>> {
        self.indexes
            .iter()
            .map(|(category, index)| CategoryClusters {
                category: *category,
                indexed: index.len(),
                markers: index
                    .clusters(bbox, zoom)
                    .into_iter()
                    .map(to_marker)
                    .collect(),
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownCategory`] if no store of `category`
    /// was indexed, or [`ClusterError::UnknownCluster`] for a bad `id`.
    pub fn expansion_zoom(&self, category: RetailCategory, id: ClusterId) -> Result<u8, ClusterError> {
        self.index(category)?.expansion_zoom(id)
    }

    /// The viewport a click on the cluster moves to: centered on the
    /// cluster at its expansion zoom.
    ///
    /// # Errors
    ///
    /// Same as [`CategoryClusterer::expansion_zoom`].
    pub fn zoom_to_cluster(
        &self,
        category: RetailCategory,
        id: ClusterId,
    ) -> Result<Viewport, ClusterError> {
        let index = self.index(category)?;
        let (center, _) = index.cluster(id)?;
        let zoom = index.expansion_zoom(id)?;
        Ok(Viewport::centered_on(center, zoom))
    }

    /// Every store inside a cluster.
    ///
    /// # Errors
    ///
    /// Same as [`CategoryClusterer::expansion_zoom`].
    pub fn stores_in(
        &self,
        category: RetailCategory,
        id: ClusterId,
    ) -> Result<Vec<&'a StoreRecord>, ClusterError> {
        let leaves = self.index(category)?.leaves(id)?;
        Ok(leaves.into_iter().copied().collect())
    }

    fn index(
        &self,
        category: RetailCategory,
    ) -> Result<&ClusterIndex<&'a StoreRecord>, ClusterError> {
        self.indexes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, index)| index)
            .ok_or(ClusterError::UnknownCategory(category))
    }
}

fn to_marker<'a>(feature: ClusterFeature<'_, &'a StoreRecord>) -> MapMarker<'a> {
    match feature {
        ClusterFeature::Cluster {
            id,
            center,
            point_count,
        } => MapMarker::Cluster {
            id,
            center,
            point_count,
        },
        ClusterFeature::Point { item, .. } => MapMarker::Store(*item),
    }
}

/// Marker diameter in pixels: 20 plus up to 30 more in proportion to the
/// cluster's share of `total`, the whole filtered store list.
#[must_use]
pub fn cluster_marker_size(point_count: usize, total: usize) -> f64 {
    if total == 0 {
        return 20.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = point_count as f64 / total as f64;
    20.0 + share * 30.0
}
