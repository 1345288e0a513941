//! Plain-text report sections written to any `io::Write`.
//!
//! Every section renders from a [`foodlink_core::Session`] snapshot. Sections
//! that need the user's position take the resolved location as a `Result`
//! and print a short notice instead of failing when it is missing.

mod clusters;
mod dashboard;
mod location;
mod stores;
mod summary;

use std::io::{self, Write};

use foodlink_core::{LocationError, StoreRecord};
use rust_decimal::Decimal;

pub(crate) use clusters::{is_lookup_error, write_clusters, write_expand};
pub(crate) use dashboard::{write_dashboard, DashboardSettings};
pub(crate) use location::{write_nearby, write_nearest};
pub(crate) use stores::{write_store_detail, write_stores};
pub(crate) use summary::{write_redemption, write_summary};

fn fmt_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}

fn fmt_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

/// Short feature badges shown next to a store.
fn badges(store: &StoreRecord) -> Vec<&'static str> {
    let mut badges = Vec::new();
    if store.snap {
        badges.push("SNAP");
    }
    if store.wic {
        badges.push("WIC");
    }
    if store.fresh_produce {
        badges.push("Fresh Produce");
    }
    if store.new_location_since_2019 {
        badges.push("New Location");
    }
    if store.new_ownership_since_2019 {
        badges.push("New Ownership");
    }
    badges
}

fn section_heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))
}

fn write_location_notice(out: &mut impl Write, err: &LocationError) -> io::Result<()> {
    writeln!(out, "{err}. Pass --lat and --lon to enable this section.")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use foodlink_core::{Dataset, RetailCategory, Session, StoreRecord};
    use rust_decimal::Decimal;

    pub(crate) fn store(
        id: i64,
        category: RetailCategory,
        latitude: f64,
        longitude: f64,
    ) -> StoreRecord {
        StoreRecord {
            id,
            name: format!("Store {id}"),
            address: format!("{id} High St, Morgantown, WV"),
            city: "Morgantown".to_owned(),
            state: "WV".to_owned(),
            county: "Monongalia".to_owned(),
            latitude,
            longitude,
            category,
            category_label: category.label().to_owned(),
            fresh_produce: false,
            snap: false,
            wic: false,
            ownership: None,
            new_ownership_since_2019: false,
            new_location_since_2019: false,
            snap_redemption_estimate: Decimal::ZERO,
        }
    }

    /// Three stores around Morgantown and one with no coordinate.
    pub(crate) fn session() -> Session {
        let mut grocery = store(1, RetailCategory::Grocery, 39.630, -79.955);
        grocery.snap = true;
        grocery.fresh_produce = true;
        grocery.snap_redemption_estimate = Decimal::from(100);
        let mut second = store(2, RetailCategory::Grocery, 39.640, -79.960);
        second.snap_redemption_estimate = Decimal::from(50);
        let mut market = store(3, RetailCategory::FarmersMarket, 39.650, -79.940);
        market.snap = true;
        market.fresh_produce = true;
        let lost = store(4, RetailCategory::Convenience, f64::NAN, f64::NAN);
        Session::new(Arc::new(Dataset::from_records(vec![
            grocery, second, market, lost,
        ])))
    }

    pub(crate) fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("writing to a Vec never fails");
        String::from_utf8(buf).expect("reports are UTF-8")
    }
}
