use foodlink_core::RetailCategory;
use thiserror::Error;

use crate::index::ClusterId;

#[derive(Debug, Error, PartialEq)]
pub enum ClusterError {
    #[error("no cluster {0} in this index")]
    UnknownCluster(ClusterId),

    #[error("no stores in category {0}")]
    UnknownCategory(RetailCategory),

    #[error("invalid cluster id \"{0}\": expected <zoom>/<index>")]
    InvalidClusterId(String),

    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
