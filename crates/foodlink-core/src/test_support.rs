use rust_decimal::Decimal;

use crate::category::RetailCategory;
use crate::store::StoreRecord;

/// A store at the given position with every flag off and no redemption.
pub(crate) fn store_at(id: i64, category: RetailCategory, latitude: f64, longitude: f64) -> StoreRecord {
    StoreRecord {
        id,
        name: format!("Store {id}"),
        address: format!("{id} Main St"),
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

pub(crate) fn store(id: i64, category: RetailCategory) -> StoreRecord {
    store_at(id, category, 39.0, -80.0)
}
