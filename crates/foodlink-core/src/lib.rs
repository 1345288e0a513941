//! Domain model and pure data transformations for the food-retail store
//! explorer: store records, retail categories, filtering, distance ranking,
//! category summaries, outbound links, and the session snapshot.

pub mod app_config;
pub mod category;
pub mod config;
pub mod filter;
pub mod geo;
pub mod links;
pub mod session;
pub mod store;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use app_config::AppConfig;
pub use category::RetailCategory;
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_stores, FilterSpec};
pub use geo::{
    haversine_km, km_to_miles, nearby_stores, nearest_stores, Coordinate, DriveBudget,
    LocationError, NearbySummary, NearestResult, RankedStore,
};
pub use links::google_maps_search_url;
pub use session::{Session, Viewport, MAX_VIEWPORT_ZOOM};
pub use store::{Dataset, RawStoreRow, StoreRecord};
pub use summary::{
    percent_of_amount, percent_of_count, summarize, CategorySummary, DatasetSummary,
    RedemptionShare, SnapSplit,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("drive time must be between {min} and {max} minutes, got {minutes}")]
    DriveMinutesOutOfRange { minutes: u32, min: u32, max: u32 },

    #[error("average speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),

    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}
