//! Great-circle distance and proximity ranking.
//!
//! Distances are haversine on a spherical Earth of radius 6371 km. Stores
//! without a usable coordinate are treated as infinitely far away and never
//! appear in proximity results.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::category::RetailCategory;
use crate::store::StoreRecord;
use crate::summary::percent_of_count;
use crate::CoreError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621_371;

pub const DEFAULT_DRIVE_MINUTES: u32 = 15;
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;
pub const DEFAULT_NEAREST_LIMIT: usize = 10;
pub const DEFAULT_NEARBY_RADIUS_MILES: f64 = 20.0;

/// Allowed drive-time range, in minutes.
pub const MIN_DRIVE_MINUTES: u32 = 5;
pub const MAX_DRIVE_MINUTES: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is
    /// non-finite or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(CoreError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }
}

/// Why the user's position could not be determined.
///
/// Only the location-dependent views degrade on this error; everything
/// else keeps working.
#[derive(Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("location unavailable: no position was provided")]
    Unavailable,

    #[error("location rejected: {0}")]
    Invalid(#[from] CoreError),
}

/// Haversine distance in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[must_use]
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Distance from `origin` to a store, or `f64::INFINITY` if the store has no
/// usable coordinate.
#[must_use]
pub fn distance_to_store_km(origin: Coordinate, store: &StoreRecord) -> f64 {
    store
        .coordinate()
        .map_or(f64::INFINITY, |c| haversine_km(origin, c))
}

/// How far the user is willing to drive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveBudget {
    minutes: u32,
    speed_kmh: f64,
}

impl DriveBudget {
    /// # Errors
    ///
    /// Returns [`CoreError::DriveMinutesOutOfRange`] when `minutes` is outside
    /// 5..=600, or [`CoreError::InvalidSpeed`] when the speed is not a
    /// positive finite number.
    pub fn new(minutes: u32, speed_kmh: f64) -> Result<Self, CoreError> {
        if !(MIN_DRIVE_MINUTES..=MAX_DRIVE_MINUTES).contains(&minutes) {
            return Err(CoreError::DriveMinutesOutOfRange {
                minutes,
                min: MIN_DRIVE_MINUTES,
                max: MAX_DRIVE_MINUTES,
            });
        }
        if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
            return Err(CoreError::InvalidSpeed(speed_kmh));
        }
        Ok(Self { minutes, speed_kmh })
    }

    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    #[must_use]
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Furthest reachable distance: `(minutes / 60) * speed`.
    #[must_use]
    pub fn max_distance_km(&self) -> f64 {
        f64::from(self.minutes) / 60.0 * self.speed_kmh
    }

    /// Estimated drive time for `distance_km`, rounded to the nearest minute.
    #[must_use]
    pub fn drive_minutes(&self, distance_km: f64) -> u32 {
        // Bounded by max_distance_km for ranked stores, so at most 600.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let minutes = (distance_km / self.speed_kmh * 60.0).round() as u32;
        minutes
    }
}

impl Default for DriveBudget {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_DRIVE_MINUTES,
            speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

/// A store ranked by distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStore<'a> {
    pub store: &'a StoreRecord,
    pub distance_km: f64,
    pub drive_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestResult<'a> {
    pub max_distance_km: f64,
    /// Ascending by distance, at most `limit` entries.
    pub stores: Vec<RankedStore<'a>>,
    /// Category counts over `stores`, in first-seen order.
    pub categories: Vec<(RetailCategory, usize)>,
}

/// Stores reachable within the drive budget, nearest first, truncated to
/// `limit`.
#[must_use]
pub fn nearest_stores<'a, I>(
    stores: I,
    origin: Coordinate,
    budget: DriveBudget,
    limit: usize,
) -> NearestResult<'a>
where
    I: IntoIterator<Item = &'a StoreRecord>,
{
    let max_distance_km = budget.max_distance_km();
    let mut ranked: Vec<RankedStore<'a>> = stores
        .into_iter()
        .filter_map(|store| {
            let distance_km = distance_to_store_km(origin, store);
            (distance_km <= max_distance_km).then(|| RankedStore {
                store,
                distance_km,
                drive_minutes: budget.drive_minutes(distance_km),
            })
        })
        .collect();
    // Stable sort keeps input order for equal distances.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);

    let categories = count_by_category(ranked.iter().map(|r| r.store));

    NearestResult {
        max_distance_km,
        stores: ranked,
        categories,
    }
}

/// Stores within a radius of the user, with category counts and rates.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySummary<'a> {
    pub radius_miles: f64,
    pub stores: Vec<&'a StoreRecord>,
    pub categories: Vec<(RetailCategory, usize)>,
    pub snap_count: usize,
    pub fresh_produce_count: usize,
    pub snap_pct: f64,
    pub fresh_produce_pct: f64,
}

#[must_use]
pub fn nearby_stores<'a, I>(stores: I, origin: Coordinate, radius_miles: f64) -> NearbySummary<'a>
where
    I: IntoIterator<Item = &'a StoreRecord>,
{
    let nearby: Vec<&StoreRecord> = stores
        .into_iter()
        .filter(|store| km_to_miles(distance_to_store_km(origin, store)) <= radius_miles)
        .collect();

    let snap_count = nearby.iter().filter(|s| s.snap).count();
    let fresh_produce_count = nearby.iter().filter(|s| s.fresh_produce).count();

    NearbySummary {
        radius_miles,
        categories: count_by_category(nearby.iter().copied()),
        snap_pct: percent_of_count(snap_count, nearby.len()),
        fresh_produce_pct: percent_of_count(fresh_produce_count, nearby.len()),
        snap_count,
        fresh_produce_count,
        stores: nearby,
    }
}

fn count_by_category<'a, I>(stores: I) -> Vec<(RetailCategory, usize)>
where
    I: IntoIterator<Item = &'a StoreRecord>,
{
    let mut order = Vec::new();
    let mut counts: BTreeMap<RetailCategory, usize> = BTreeMap::new();
    for store in stores {
        let count = counts.entry(store.category).or_insert(0);
        if *count == 0 {
            order.push(store.category);
        }
        *count += 1;
    }
    order
        .into_iter()
        .map(|category| (category, counts.get(&category).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod tests;
