use std::io::{self, Write};

use foodlink_core::{
    google_maps_search_url, km_to_miles, nearby_stores, nearest_stores, Coordinate, DriveBudget,
    LocationError, RetailCategory, Session,
};

use super::{badges, fmt_pct, or_dash, section_heading, write_location_notice};

/// Nearest reachable stores within the drive budget.
pub(crate) fn write_nearest(
    out: &mut impl Write,
    session: &Session,
    origin: Result<Coordinate, &LocationError>,
    budget: DriveBudget,
    limit: usize,
) -> io::Result<()> {
    section_heading(
        out,
        &format!(
            "Nearest stores within {} min at {} km/h",
            budget.minutes(),
            budget.speed_kmh()
        ),
    )?;
    let origin = match origin {
        Ok(origin) => origin,
        Err(err) => return write_location_notice(out, err),
    };

    let result = nearest_stores(session.filtered_stores(), origin, budget, limit);
    if result.stores.is_empty() {
        writeln!(
            out,
            "no stores within {:.1} km of your location",
            result.max_distance_km
        )?;
        return Ok(());
    }

    for (rank, ranked) in result.stores.iter().enumerate() {
        let store = ranked.store;
        writeln!(
            out,
            "{:>2}. {} ({})",
            rank + 1,
            or_dash(&store.name),
            store.category.label()
        )?;
        writeln!(
            out,
            "    {:.1} mi, about {} min drive",
            km_to_miles(ranked.distance_km),
            ranked.drive_minutes
        )?;
        let badges = badges(store);
        if !badges.is_empty() {
            writeln!(out, "    {}", badges.join(" | "))?;
        }
        writeln!(out, "    {}", google_maps_search_url(&store.address))?;
    }
    writeln!(out)?;
    write_category_counts(out, &result.categories)
}

/// Stores within the configured radius and their SNAP/produce rates.
pub(crate) fn write_nearby(
    out: &mut impl Write,
    session: &Session,
    origin: Result<Coordinate, &LocationError>,
    radius_miles: f64,
) -> io::Result<()> {
    section_heading(out, &format!("Stores within {radius_miles} miles"))?;
    let origin = match origin {
        Ok(origin) => origin,
        Err(err) => return write_location_notice(out, err),
    };

    let nearby = nearby_stores(session.filtered_stores(), origin, radius_miles);
    writeln!(out, "Stores nearby:        {}", nearby.stores.len())?;
    writeln!(
        out,
        "Accept SNAP:          {} ({})",
        nearby.snap_count,
        fmt_pct(nearby.snap_pct)
    )?;
    writeln!(
        out,
        "Fresh produce:        {} ({})",
        nearby.fresh_produce_count,
        fmt_pct(nearby.fresh_produce_pct)
    )?;
    if !nearby.categories.is_empty() {
        writeln!(out)?;
        write_category_counts(out, &nearby.categories)?;
    }
    Ok(())
}

fn write_category_counts(
    out: &mut impl Write,
    categories: &[(RetailCategory, usize)],
) -> io::Result<()> {
    writeln!(out, "By category:")?;
    for (category, count) in categories {
        writeln!(out, "  {:<20}{:>5}  {}", category.label(), count, category.color())?;
    }
    Ok(())
}
