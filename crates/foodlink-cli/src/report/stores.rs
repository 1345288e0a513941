use std::io::{self, Write};

use foodlink_core::{google_maps_search_url, haversine_km, km_to_miles, Coordinate, Session};

use super::{badges, fmt_money, or_dash, section_heading, truncate};

/// Tabular listing of the filtered stores.
pub(crate) fn write_stores(
    out: &mut impl Write,
    session: &Session,
    limit: Option<usize>,
) -> io::Result<()> {
    let stores = session.filtered_stores();
    if stores.is_empty() {
        writeln!(out, "no stores match the current filters")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8}{:<34}{:<20}{:<18}{:<8}BADGES",
        "ID", "NAME", "CATEGORY", "CITY", "STATE"
    )?;
    let shown = limit.unwrap_or(stores.len());
    for store in stores.iter().take(shown) {
        writeln!(
            out,
            "{:<8}{:<34}{:<20}{:<18}{:<8}{}",
            store.id,
            truncate(or_dash(&store.name), 30),
            store.category.label(),
            truncate(or_dash(&store.city), 16),
            or_dash(&store.state),
            badges(store).join(", ")
        )?;
    }
    if shown < stores.len() {
        writeln!(out, "... {} more", stores.len() - shown)?;
    }
    writeln!(out, "{} stores", stores.len())
}

/// Detail card for one store, including its map link.
pub(crate) fn write_store_detail(
    out: &mut impl Write,
    session: &Session,
    origin: Option<Coordinate>,
) -> io::Result<()> {
    let Some(store) = session.selected_store() else {
        writeln!(out, "store not found, or hidden by the current filters")?;
        return Ok(());
    };

    section_heading(out, or_dash(&store.name))?;
    let label = store.category.label();
    if store.category_label.is_empty() || store.category_label == label {
        writeln!(out, "Category:   {label}")?;
    } else {
        writeln!(out, "Category:   {label} (listed as \"{}\")", store.category_label)?;
    }
    writeln!(
        out,
        "Address:    {}, {}, {} ({} County)",
        or_dash(&store.address),
        or_dash(&store.city),
        or_dash(&store.state),
        or_dash(&store.county)
    )?;
    if let Some(ownership) = &store.ownership {
        writeln!(out, "Ownership:  {ownership}")?;
    }
    writeln!(
        out,
        "SNAP 2020:  {}",
        fmt_money(store.snap_redemption_estimate)
    )?;
    let badges = badges(store);
    if !badges.is_empty() {
        writeln!(out, "Badges:     {}", badges.join(", "))?;
    }
    match (origin, store.coordinate()) {
        (Some(origin), Some(position)) => {
            let miles = km_to_miles(haversine_km(origin, position));
            writeln!(out, "Distance:   {miles:.1} mi")?;
        }
        (_, None) => writeln!(out, "Distance:   position unknown")?,
        (None, Some(_)) => {}
    }
    writeln!(out, "Map:        {}", google_maps_search_url(&store.address))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use foodlink_core::{Dataset, FilterSpec, RetailCategory};

    use super::*;
    use crate::report::test_support::{render, session, store};

    #[test]
    fn lists_filtered_stores_in_order() {
        let session = session().with_filter(FilterSpec {
            snap: true,
            ..FilterSpec::default()
        });
        let text = render(|out| write_stores(out, &session, None));
        let first = text.find("Store 1").expect("store 1 listed");
        let third = text.find("Store 3").expect("store 3 listed");
        assert!(first < third);
        assert!(!text.contains("Store 2"));
        assert!(text.trim_end().ends_with("2 stores"));
    }

    #[test]
    fn limit_reports_remaining() {
        let text = render(|out| write_stores(out, &session(), Some(1)));
        assert!(text.contains("... 3 more"));
    }

    #[test]
    fn empty_filter_result_is_reported() {
        let session = session().with_filter(FilterSpec {
            category: Some(RetailCategory::SmallBox),
            ..FilterSpec::default()
        });
        let text = render(|out| write_stores(out, &session, None));
        assert!(text.contains("no stores match"));
    }

    #[test]
    fn detail_card_includes_map_link_and_distance() {
        let session = session().select_store(Some(1));
        let origin = Coordinate::new(39.630, -79.955).unwrap();
        let text = render(|out| write_store_detail(out, &session, Some(origin)));
        assert!(text.contains("Grocery Store"));
        assert!(text.contains("SNAP, Fresh Produce"));
        assert!(text.contains("Distance:   0.0 mi"));
        assert!(text.contains(
            "https://www.google.com/maps/search/?api=1&query=1%20High%20St%2C%20Morgantown%2C%20WV"
        ));
    }

    #[test]
    fn detail_card_shows_dataset_spelling_of_category() {
        let mut store = store(9, RetailCategory::Other, 39.63, -79.95);
        store.category_label = "Supercenter".to_owned();
        let session = Session::new(Arc::new(Dataset::from_records(vec![store])))
            .select_store(Some(9));
        let text = render(|out| write_store_detail(out, &session, None));
        assert!(text.contains("Category:   Other (listed as \"Supercenter\")"));
    }

    #[test]
    fn detail_card_for_filtered_out_store() {
        let session = session()
            .select_store(Some(2))
            .with_filter(FilterSpec {
                snap: true,
                ..FilterSpec::default()
            });
        let text = render(|out| write_store_detail(out, &session, None));
        assert!(text.contains("hidden by the current filters"));
    }
}
