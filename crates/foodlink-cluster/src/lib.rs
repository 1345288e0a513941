//! Zoom-dependent point clustering for the store map.
//!
//! [`ClusterIndex`] precomputes one clustering per zoom level so that
//! viewport queries are a plain scan of a single level. [`CategoryClusterer`]
//! keeps one index per retail category so clusters never mix categories.

pub mod adapter;
pub mod error;
pub mod index;
mod projection;

pub use adapter::{cluster_marker_size, CategoryClusterer, CategoryClusters, MapMarker};
pub use error::ClusterError;
pub use index::{
    BoundingBox, ClusterFeature, ClusterId, ClusterIndex, ClusterOptions, MAX_SUPPORTED_ZOOM,
};
