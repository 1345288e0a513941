use std::io::{self, Write};

use foodlink_cluster::{BoundingBox, ClusterOptions};
use foodlink_core::{Coordinate, DriveBudget, LocationError, Session};

use super::{
    write_clusters, write_nearby, write_nearest, write_redemption, write_stores, write_summary,
};

pub(crate) struct DashboardSettings {
    pub store_limit: usize,
    pub cluster_options: ClusterOptions,
    pub budget: DriveBudget,
    pub nearest_limit: usize,
    pub nearby_radius_miles: f64,
}

/// Every section in one report. The location sections degrade on their own
/// when no position is known.
pub(crate) fn write_dashboard(
    out: &mut impl Write,
    session: &Session,
    origin: Result<Coordinate, &LocationError>,
    settings: &DashboardSettings,
) -> io::Result<()> {
    if !session.filter().is_unconstrained() {
        let filter = session.filter();
        let mut active = Vec::new();
        if let Some(category) = filter.category {
            active.push(category.label().to_owned());
        }
        if filter.snap {
            active.push("accepts SNAP".to_owned());
        }
        if filter.fresh_produce {
            active.push("fresh produce".to_owned());
        }
        writeln!(out, "Filters: {}", active.join(", "))?;
        writeln!(out)?;
    }

    write_summary(out, session)?;
    writeln!(out)?;
    write_redemption(out, session)?;
    writeln!(out)?;
    write_stores(out, session, Some(settings.store_limit))?;
    writeln!(out)?;
    write_clusters(
        out,
        session,
        settings.cluster_options,
        &BoundingBox::WORLD,
        session.viewport().zoom,
    )?;
    writeln!(out)?;
    write_nearest(
        out,
        session,
        origin,
        settings.budget,
        settings.nearest_limit,
    )?;
    writeln!(out)?;
    write_nearby(out, session, origin, settings.nearby_radius_miles)
}
