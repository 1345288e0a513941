//! Hierarchical greedy clustering on web-mercator coordinates.
//!
//! Level `max_zoom + 1` holds every input point. Each lower level is built
//! from the one above it: an unvisited node absorbs every unvisited neighbor
//! within `radius / (extent * 2^zoom)` and becomes a weighted-centroid
//! cluster, or is carried down unchanged when it has no neighbors. Each node
//! remembers the node it was merged into one level down, which is what
//! cluster expansion walks.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use foodlink_core::Coordinate;

use crate::error::ClusterError;
use crate::projection::{lat_y, lng_x, x_lng, y_lat};

/// Highest `max_zoom` an index accepts. Larger values are clamped.
pub const MAX_SUPPORTED_ZOOM: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    /// Merge radius in pixels.
    pub radius: f64,
    /// Tile extent in pixels the radius is measured against.
    pub extent: f64,
    pub min_zoom: u8,
    /// Points never merge above this zoom.
    pub max_zoom: u8,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: 40.0,
            extent: 512.0,
            min_zoom: 0,
            max_zoom: 16,
        }
    }
}

/// Identifies a cluster node: the zoom level it lives on and its position
/// within that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId {
    pub zoom: u8,
    pub index: usize,
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zoom, self.index)
    }
}

impl FromStr for ClusterId {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClusterError::InvalidClusterId(s.to_owned());
        let (zoom, index) = s.trim().split_once('/').ok_or_else(invalid)?;
        Ok(Self {
            zoom: zoom.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

/// Viewport bounds in degrees. `west > east` means the box crosses the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// The whole web-mercator world.
    pub const WORLD: BoundingBox = BoundingBox {
        west: -180.0,
        south: -85.0,
        east: 180.0,
        north: 85.0,
    };

    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidBoundingBox`] for non-finite values,
    /// latitudes outside [-90, 90], or `south > north`.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ClusterError> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(ClusterError::InvalidBoundingBox(
                "all bounds must be finite".to_owned(),
            ));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(ClusterError::InvalidBoundingBox(format!(
                "latitudes must be within [-90, 90], got south={south} north={north}"
            )));
        }
        if south > north {
            return Err(ClusterError::InvalidBoundingBox(format!(
                "south ({south}) is above north ({north})"
            )));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }
}

impl FromStr for BoundingBox {
    type Err = ClusterError;

    /// Parses `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| ClusterError::InvalidBoundingBox(format!("{s}: {e}")))?;
        match values.as_slice() {
            [west, south, east, north] => Self::new(*west, *south, *east, *north),
            _ => Err(ClusterError::InvalidBoundingBox(format!(
                "expected west,south,east,north, got \"{s}\""
            ))),
        }
    }
}

/// One entry of a clustering query.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterFeature<'a, T> {
    Cluster {
        id: ClusterId,
        center: Coordinate,
        point_count: usize,
    },
    Point {
        item: &'a T,
        coordinate: Coordinate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeKind {
    /// Index into the input points.
    Point(usize),
    Cluster,
}

#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
    point_count: usize,
    kind: NodeKind,
    /// Index of the node this one became on the level below.
    parent: Option<usize>,
}

#[derive(Debug)]
pub struct ClusterIndex<T> {
    options: ClusterOptions,
    points: Vec<(Coordinate, T)>,
    /// `levels[i]` holds zoom `min_zoom + i`, up to `max_zoom + 1`.
    levels: Vec<Vec<Node>>,
}

impl<T> ClusterIndex<T> {
    pub fn new<I>(options: ClusterOptions, points: I) -> Self
    where
        I: IntoIterator<Item = (Coordinate, T)>,
    {
        let min_zoom = options.min_zoom.min(MAX_SUPPORTED_ZOOM);
        let options = ClusterOptions {
            min_zoom,
            max_zoom: options.max_zoom.clamp(min_zoom, MAX_SUPPORTED_ZOOM),
            ..options
        };
        let points: Vec<(Coordinate, T)> = points.into_iter().collect();

        let mut current: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(i, (coordinate, _))| Node {
                x: lng_x(coordinate.longitude),
                y: lat_y(coordinate.latitude),
                point_count: 1,
                kind: NodeKind::Point(i),
                parent: None,
            })
            .collect();

        let mut descending = Vec::with_capacity(usize::from(options.max_zoom - options.min_zoom) + 2);
        for zoom in (options.min_zoom..=options.max_zoom).rev() {
            let radius = options.radius / (options.extent * 2f64.powi(i32::from(zoom)));
            let (next, parents) = cluster_level(&current, radius);
            for (node, parent) in current.iter_mut().zip(parents) {
                node.parent = Some(parent);
            }
            descending.push(current);
            current = next;
        }
        descending.push(current);
        descending.reverse();

        Self {
            options,
            points,
            levels: descending,
        }
    }

    #[must_use]
    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Clusters and points visible in `bbox` at `zoom`. Zooms above
    /// `max_zoom` return the unclustered points.
    #[must_use]
    pub fn clusters(&self, bbox: &BoundingBox, zoom: u8) -> Vec<ClusterFeature<'_, T>> {
        let zoom = zoom.clamp(self.options.min_zoom, self.options.max_zoom + 1);

        if bbox.east - bbox.west >= 360.0 {
            return self.clusters_in_range(-180.0, bbox.south, 180.0, bbox.north, zoom);
        }

        let west = (bbox.west + 180.0).rem_euclid(360.0) - 180.0;
        let east = if (bbox.east - 180.0).abs() < f64::EPSILON {
            180.0
        } else {
            (bbox.east + 180.0).rem_euclid(360.0) - 180.0
        };

        if west > east {
            let mut features = self.clusters_in_range(west, bbox.south, 180.0, bbox.north, zoom);
            features.extend(self.clusters_in_range(-180.0, bbox.south, east, bbox.north, zoom));
            return features;
        }
        self.clusters_in_range(west, bbox.south, east, bbox.north, zoom)
    }

    /// Center and point count of a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownCluster`] if `id` does not name a
    /// cluster in this index.
    pub fn cluster(&self, id: ClusterId) -> Result<(Coordinate, usize), ClusterError> {
        let node = self.cluster_node(id)?;
        Ok((unproject(node.x, node.y), node.point_count))
    }

    /// The nodes a cluster splits into one zoom level up.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownCluster`] if `id` does not name a
    /// cluster in this index.
    pub fn children(&self, id: ClusterId) -> Result<Vec<ClusterFeature<'_, T>>, ClusterError> {
        self.cluster_node(id)?;
        let child_zoom = id.zoom + 1;
        let level = &self.levels[self.level_index(child_zoom)];
        Ok(level
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent == Some(id.index))
            .map(|(index, node)| self.feature(child_zoom, index, node))
            .collect())
    }

    /// Every input item inside a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownCluster`] if `id` does not name a
    /// cluster in this index.
    pub fn leaves(&self, id: ClusterId) -> Result<Vec<&T>, ClusterError> {
        let mut leaves = Vec::new();
        let mut pending = vec![id];
        while let Some(cluster) = pending.pop() {
            for child in self.children(cluster)? {
                match child {
                    ClusterFeature::Cluster { id, .. } => pending.push(id),
                    ClusterFeature::Point { item, .. } => leaves.push(item),
                }
            }
        }
        Ok(leaves)
    }

    /// Lowest zoom at which the cluster splits into more than one node.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownCluster`] if `id` does not name a
    /// cluster in this index.
    pub fn expansion_zoom(&self, id: ClusterId) -> Result<u8, ClusterError> {
        self.cluster_node(id)?;
        let mut current = id;
        let mut zoom = id.zoom;
        while zoom <= self.options.max_zoom {
            let children = self.children(current)?;
            zoom += 1;
            match children.as_slice() {
                [ClusterFeature::Cluster { id, .. }] => current = *id,
                _ => break,
            }
        }
        Ok(zoom)
    }

    fn clusters_in_range(
        &self,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        zoom: u8,
    ) -> Vec<ClusterFeature<'_, T>> {
        let (min_x, max_x) = (lng_x(west), lng_x(east));
        let (min_y, max_y) = (lat_y(north), lat_y(south));
        self.levels[self.level_index(zoom)]
            .iter()
            .enumerate()
            .filter(|(_, n)| n.x >= min_x && n.x <= max_x && n.y >= min_y && n.y <= max_y)
            .map(|(index, node)| self.feature(zoom, index, node))
            .collect()
    }

    fn cluster_node(&self, id: ClusterId) -> Result<&Node, ClusterError> {
        if id.zoom < self.options.min_zoom || id.zoom > self.options.max_zoom {
            return Err(ClusterError::UnknownCluster(id));
        }
        self.levels[self.level_index(id.zoom)]
            .get(id.index)
            .filter(|node| node.kind == NodeKind::Cluster)
            .ok_or(ClusterError::UnknownCluster(id))
    }

    fn level_index(&self, zoom: u8) -> usize {
        usize::from(zoom - self.options.min_zoom)
    }

    fn feature<'a>(&'a self, zoom: u8, index: usize, node: &Node) -> ClusterFeature<'a, T> {
        match node.kind {
            NodeKind::Cluster => ClusterFeature::Cluster {
                id: ClusterId { zoom, index },
                center: unproject(node.x, node.y),
                point_count: node.point_count,
            },
            NodeKind::Point(i) => {
                let (coordinate, item) = &self.points[i];
                ClusterFeature::Point {
                    item,
                    coordinate: *coordinate,
                }
            }
        }
    }
}

fn unproject(x: f64, y: f64) -> Coordinate {
    Coordinate {
        latitude: y_lat(y),
        longitude: x_lng(x),
    }
}

/// Cluster one level down. Returns the new level and, for every node of
/// `nodes`, the index of the node it became.
fn cluster_level(nodes: &[Node], radius: f64) -> (Vec<Node>, Vec<usize>) {
    let grid = Grid::new(nodes, radius);
    let mut assigned: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut next = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        if assigned[i].is_some() {
            continue;
        }
        let target = next.len();
        assigned[i] = Some(target);

        let neighbors: Vec<usize> = grid
            .within(nodes, node.x, node.y, radius)
            .filter(|&j| assigned[j].is_none())
            .collect();

        if neighbors.is_empty() {
            next.push(Node {
                parent: None,
                ..node.clone()
            });
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let mut weighted = (
            node.x * node.point_count as f64,
            node.y * node.point_count as f64,
        );
        let mut point_count = node.point_count;
        for &j in &neighbors {
            assigned[j] = Some(target);
            let neighbor = &nodes[j];
            #[allow(clippy::cast_precision_loss)]
            let weight = neighbor.point_count as f64;
            weighted.0 += neighbor.x * weight;
            weighted.1 += neighbor.y * weight;
            point_count += neighbor.point_count;
        }

        #[allow(clippy::cast_precision_loss)]
        let total = point_count as f64;
        next.push(Node {
            x: weighted.0 / total,
            y: weighted.1 / total,
            point_count,
            kind: NodeKind::Cluster,
            parent: None,
        });
    }

    let parents = assigned
        .into_iter()
        .map(|target| target.unwrap_or_default())
        .collect();
    (next, parents)
}

/// Smallest grid cell. Keeps cell keys for unit-square coordinates small
/// no matter how tiny the merge radius is.
const MIN_GRID_CELL: f64 = 1e-12;

/// Uniform bucket grid with cells at least as large as the query radius, so
/// a radius query only has to look at the 3x3 block around a point.
struct Grid {
    cell: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl Grid {
    fn new(nodes: &[Node], cell: f64) -> Self {
        let mut grid = Self {
            cell: cell.max(MIN_GRID_CELL),
            cells: HashMap::new(),
        };
        for (i, node) in nodes.iter().enumerate() {
            let key = grid.key(node.x, node.y);
            grid.cells.entry(key).or_default().push(i);
        }
        grid
    }

    // Coordinates are in [0, 1] and the cell is at least MIN_GRID_CELL.
    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / self.cell).floor() as i64, (y / self.cell).floor() as i64)
    }

    fn within<'a>(
        &'a self,
        nodes: &'a [Node],
        x: f64,
        y: f64,
        radius: f64,
    ) -> impl Iterator<Item = usize> + 'a {
        let (cx, cy) = self.key(x, y);
        let r2 = radius * radius;
        (cx.saturating_sub(1)..=cx.saturating_add(1))
            .flat_map(move |gx| {
                (cy.saturating_sub(1)..=cy.saturating_add(1)).map(move |gy| (gx, gy))
            })
            .filter_map(move |key| self.cells.get(&key))
            .flatten()
            .copied()
            .filter(move |&j| {
                let dx = nodes[j].x - x;
                let dy = nodes[j].y - y;
                dx * dx + dy * dy <= r2
            })
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
