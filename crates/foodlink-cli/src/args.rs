//! Shared flag groups and how they resolve against the loaded config.

use clap::Args;
use foodlink_core::{AppConfig, Coordinate, DriveBudget, FilterSpec, LocationError, RetailCategory};

/// Store filter flags, accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only stores of this retail category (e.g. grocery, farmers-market)
    #[arg(long, global = true, value_parser = parse_category)]
    pub category: Option<RetailCategory>,
    /// Only stores that sell fresh produce
    #[arg(long, global = true)]
    pub fresh_produce: bool,
    /// Only stores that accept SNAP
    #[arg(long, global = true)]
    pub snap: bool,
}

impl FilterArgs {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            category: self.category,
            fresh_produce: self.fresh_produce,
            snap: self.snap,
        }
    }
}

/// Where the user is. Falls back to `FOODLINK_USER_LAT`/`FOODLINK_USER_LON`.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Your latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Your longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// Flags win over config. A half-specified position is treated as no
    /// position at all.
    pub fn resolve(&self, config: &AppConfig) -> Result<Coordinate, LocationError> {
        let (latitude, longitude) = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, None) => match (config.user_latitude, config.user_longitude) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => return Err(LocationError::Unavailable),
            },
            _ => return Err(LocationError::Unavailable),
        };
        Ok(Coordinate::new(latitude, longitude)?)
    }
}

/// Drive budget overrides for the nearest-store view.
#[derive(Debug, Clone, Default, Args)]
pub struct BudgetArgs {
    /// Maximum drive time in minutes (5-600)
    #[arg(long)]
    pub minutes: Option<u32>,
    /// Average driving speed in km/h
    #[arg(long)]
    pub speed: Option<f64>,
    /// Maximum number of stores to list
    #[arg(long)]
    pub limit: Option<usize>,
}

impl BudgetArgs {
    pub fn budget(&self, config: &AppConfig) -> anyhow::Result<DriveBudget> {
        let budget = DriveBudget::new(
            self.minutes.unwrap_or(config.drive_minutes),
            self.speed.unwrap_or(config.average_speed_kmh),
        )?;
        Ok(budget)
    }

    pub fn limit(&self, config: &AppConfig) -> usize {
        self.limit.unwrap_or(config.nearest_limit)
    }
}

/// Accepts the display label ("Farmers Market") or a slug
/// (`farmers-market`, `farmers_market`). Unknown names are rejected rather
/// than folded into "Other".
pub fn parse_category(raw: &str) -> Result<RetailCategory, String> {
    let category = RetailCategory::from_label(raw);
    let is_other = raw.trim().eq_ignore_ascii_case("other");
    if category == RetailCategory::Other && !is_other {
        let choices: Vec<&str> = RetailCategory::ALL.iter().map(|c| c.label()).collect();
        return Err(format!(
            "unknown category '{raw}', expected one of: {}",
            choices.join(", ")
        ));
    }
    Ok(category)
}
