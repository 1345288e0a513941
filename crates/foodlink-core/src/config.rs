use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let supabase_url = require("FOODLINK_SUPABASE_URL")?;
    let supabase_key = require("FOODLINK_SUPABASE_KEY")?;
    let stores_table = or_default("FOODLINK_STORES_TABLE", "find_food");
    let log_level = or_default("FOODLINK_LOG_LEVEL", "info");
    let user_agent = or_default("FOODLINK_USER_AGENT", "foodlink/0.1 (store-explorer)");

    let request_timeout_secs: u64 = parse_var(&lookup, "FOODLINK_REQUEST_TIMEOUT_SECS", "30")?;
    let drive_minutes: u32 = parse_var(&lookup, "FOODLINK_DRIVE_MINUTES", "15")?;
    let average_speed_kmh: f64 = parse_var(&lookup, "FOODLINK_AVERAGE_SPEED_KMH", "30")?;
    let nearest_limit: usize = parse_var(&lookup, "FOODLINK_NEAREST_LIMIT", "10")?;
    let nearby_radius_miles: f64 = parse_var(&lookup, "FOODLINK_NEARBY_RADIUS_MILES", "20")?;
    let cluster_radius: f64 = parse_var(&lookup, "FOODLINK_CLUSTER_RADIUS", "40")?;
    let cluster_max_zoom: u8 = parse_var(&lookup, "FOODLINK_CLUSTER_MAX_ZOOM", "16")?;

    require_positive("FOODLINK_AVERAGE_SPEED_KMH", average_speed_kmh)?;
    require_positive("FOODLINK_NEARBY_RADIUS_MILES", nearby_radius_miles)?;
    if !(cluster_radius.is_finite() && cluster_radius >= 1.0) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODLINK_CLUSTER_RADIUS".to_string(),
            reason: format!("must be at least 1 pixel, got {cluster_radius}"),
        });
    }

    let user_latitude: Option<f64> = parse_optional_var(&lookup, "FOODLINK_USER_LAT")?;
    let user_longitude: Option<f64> = parse_optional_var(&lookup, "FOODLINK_USER_LON")?;
    if user_latitude.is_some() != user_longitude.is_some() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODLINK_USER_LAT".to_string(),
            reason: "FOODLINK_USER_LAT and FOODLINK_USER_LON must be set together".to_string(),
        });
    }

    Ok(AppConfig {
        supabase_url,
        supabase_key,
        stores_table,
        log_level,
        request_timeout_secs,
        user_agent,
        drive_minutes,
        average_speed_kmh,
        nearest_limit,
        nearby_radius_miles,
        cluster_radius,
        cluster_max_zoom,
        user_latitude,
        user_longitude,
    })
}

fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

fn parse_optional_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

fn require_positive(var: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
