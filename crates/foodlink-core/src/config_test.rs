use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("FOODLINK_SUPABASE_URL", "https://example.supabase.co");
    m.insert("FOODLINK_SUPABASE_KEY", "anon-key");
    m
}

#[test]
fn build_app_config_fails_without_supabase_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "FOODLINK_SUPABASE_URL"),
        "expected MissingEnvVar(FOODLINK_SUPABASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_blank_key() {
    let mut map = full_env();
    map.insert("FOODLINK_SUPABASE_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "FOODLINK_SUPABASE_KEY"),
        "expected MissingEnvVar(FOODLINK_SUPABASE_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.supabase_url, "https://example.supabase.co");
    assert_eq!(cfg.stores_table, "find_food");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "foodlink/0.1 (store-explorer)");
    assert_eq!(cfg.drive_minutes, 15);
    assert!((cfg.average_speed_kmh - 30.0).abs() < f64::EPSILON);
    assert_eq!(cfg.nearest_limit, 10);
    assert!((cfg.nearby_radius_miles - 20.0).abs() < f64::EPSILON);
    assert!((cfg.cluster_radius - 40.0).abs() < f64::EPSILON);
    assert_eq!(cfg.cluster_max_zoom, 16);
    assert!(cfg.user_latitude.is_none());
    assert!(cfg.user_longitude.is_none());
}

#[test]
fn overrides_are_applied() {
    let mut map = full_env();
    map.insert("FOODLINK_STORES_TABLE", "stores_2020");
    map.insert("FOODLINK_DRIVE_MINUTES", "45");
    map.insert("FOODLINK_NEARBY_RADIUS_MILES", "2000");
    map.insert("FOODLINK_CLUSTER_MAX_ZOOM", "14");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.stores_table, "stores_2020");
    assert_eq!(cfg.drive_minutes, 45);
    assert!((cfg.nearby_radius_miles - 2000.0).abs() < f64::EPSILON);
    assert_eq!(cfg.cluster_max_zoom, 14);
}

#[test]
fn invalid_timeout_is_rejected() {
    let mut map = full_env();
    map.insert("FOODLINK_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODLINK_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FOODLINK_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn non_positive_speed_is_rejected() {
    let mut map = full_env();
    map.insert("FOODLINK_AVERAGE_SPEED_KMH", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODLINK_AVERAGE_SPEED_KMH"),
        "expected InvalidEnvVar(FOODLINK_AVERAGE_SPEED_KMH), got: {result:?}"
    );
}

#[test]
fn sub_pixel_cluster_radius_is_rejected() {
    let mut map = full_env();
    map.insert("FOODLINK_CLUSTER_RADIUS", "0.000001");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODLINK_CLUSTER_RADIUS"),
        "expected InvalidEnvVar(FOODLINK_CLUSTER_RADIUS), got: {result:?}"
    );
}

#[test]
fn user_location_requires_both_components() {
    let mut map = full_env();
    map.insert("FOODLINK_USER_LAT", "39.6");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODLINK_USER_LAT"),
        "expected InvalidEnvVar(FOODLINK_USER_LAT), got: {result:?}"
    );

    map.insert("FOODLINK_USER_LON", "-79.9");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_latitude, Some(39.6));
    assert_eq!(cfg.user_longitude, Some(-79.9));
}

#[test]
fn debug_output_redacts_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("anon-key"));
    assert!(debug.contains("[redacted]"));
}
