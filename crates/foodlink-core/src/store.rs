//! Store records and the in-memory dataset.
//!
//! Rows arrive from the backend with loosely typed columns: coordinates and
//! redemption estimates are often text, flags are sometimes strings. Parsing
//! here never fails; malformed values are coerced to NaN (coordinates),
//! zero (currency) or `false` (flags).

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::category::RetailCategory;
use crate::geo::Coordinate;

/// A row exactly as the backend table returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStoreRow {
    pub id: i64,
    #[serde(rename = "Store_Name", default)]
    pub store_name: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "County", default)]
    pub county: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Value,
    #[serde(rename = "Longitude", default)]
    pub longitude: Value,
    #[serde(rename = "Retail Category", default)]
    pub retail_category: Option<String>,
    #[serde(rename = "Fresh Produce", default)]
    pub fresh_produce: Value,
    #[serde(rename = "SNAP", default)]
    pub snap: Value,
    #[serde(rename = "WIC", default)]
    pub wic: Value,
    #[serde(rename = "Ownership", default)]
    pub ownership: Option<String>,
    #[serde(rename = "New Ownership Since 2019", default)]
    pub new_ownership_since_2019: Value,
    #[serde(rename = "New Location Since 2019", default)]
    pub new_location_since_2019: Value,
    #[serde(rename = "2020 SNAP Redemption Estimate", default)]
    pub snap_redemption_estimate: Value,
}

/// A parsed store. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub county: String,
    /// Decimal degrees, NaN when the source value was unusable.
    pub latitude: f64,
    /// Decimal degrees, NaN when the source value was unusable.
    pub longitude: f64,
    pub category: RetailCategory,
    /// The category text as it appeared in the dataset.
    pub category_label: String,
    pub fresh_produce: bool,
    pub snap: bool,
    pub wic: bool,
    pub ownership: Option<String>,
    pub new_ownership_since_2019: bool,
    pub new_location_since_2019: bool,
    /// 2020 SNAP redemption estimate in dollars. Never negative.
    pub snap_redemption_estimate: Decimal,
}

impl StoreRecord {
    #[must_use]
    pub fn from_raw(raw: RawStoreRow) -> Self {
        let category_label = text(raw.retail_category);
        Self {
            id: raw.id,
            name: text(raw.store_name),
            address: text(raw.address),
            city: text(raw.city),
            state: text(raw.state),
            county: text(raw.county),
            latitude: parse_degrees(&raw.latitude, 90.0),
            longitude: parse_degrees(&raw.longitude, 180.0),
            category: RetailCategory::from_label(&category_label),
            category_label,
            fresh_produce: parse_flag(&raw.fresh_produce),
            snap: parse_flag(&raw.snap),
            wic: parse_flag(&raw.wic),
            ownership: raw
                .ownership
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
            new_ownership_since_2019: parse_flag(&raw.new_ownership_since_2019),
            new_location_since_2019: parse_flag(&raw.new_location_since_2019),
            snap_redemption_estimate: parse_redemption(&raw.snap_redemption_estimate),
        }
    }

    /// The store's position, or `None` when either coordinate is unusable.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude, self.longitude).ok()
    }
}

/// The full store list for a session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    stores: Vec<StoreRecord>,
}

impl Dataset {
    /// Build a dataset, keeping the first record for each identifier.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StoreRecord>,
    {
        let mut seen = HashSet::new();
        let mut stores = Vec::new();
        for record in records {
            if seen.insert(record.id) {
                stores.push(record);
            } else {
                tracing::warn!(id = record.id, name = %record.name, "dropping duplicate store id");
            }
        }
        Self { stores }
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawStoreRow>,
    {
        Self::from_records(rows.into_iter().map(StoreRecord::from_raw))
    }

    #[must_use]
    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&StoreRecord> {
        self.stores.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_owned()).unwrap_or_default()
}

fn parse_degrees(value: &Value, limit: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v.abs() <= limit => v,
        _ => f64::NAN,
    }
}

fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| (f - 1.0).abs() < f64::EPSILON),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

fn parse_redemption(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal_text(&n.to_string()),
        Value::String(s) => parse_decimal_text(s),
        _ => None,
    };
    match parsed {
        Some(amount) if !amount.is_sign_negative() => amount,
        _ => Decimal::ZERO,
    }
}

fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
