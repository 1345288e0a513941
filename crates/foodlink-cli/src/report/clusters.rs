use std::io::{self, Write};

use foodlink_cluster::{
    cluster_marker_size, BoundingBox, CategoryClusterer, ClusterError, ClusterId, ClusterOptions,
    MapMarker,
};
use foodlink_core::{RetailCategory, Session};

use super::{or_dash, section_heading};

/// Markers per category for one viewport.
pub(crate) fn write_clusters(
    out: &mut impl Write,
    session: &Session,
    options: ClusterOptions,
    bbox: &BoundingBox,
    zoom: u8,
) -> io::Result<()> {
    let stores = session.filtered_stores();
    let clusterer = CategoryClusterer::new(options, stores.iter().copied());

    section_heading(
        out,
        &format!(
            "Map markers at zoom {zoom} for [{}, {}, {}, {}]",
            bbox.west, bbox.south, bbox.east, bbox.north
        ),
    )?;
    if clusterer.excluded() > 0 {
        writeln!(
            out,
            "{} stores have no usable position and are not shown",
            clusterer.excluded()
        )?;
    }

    for group in clusterer.clusters(bbox, zoom) {
        let category = group.category;
        writeln!(
            out,
            "{} [{} {}] {} markers",
            category.label(),
            category.icon(),
            category.color(),
            group.markers.len()
        )?;
        for marker in &group.markers {
            match marker {
                MapMarker::Cluster {
                    id,
                    center,
                    point_count,
                } => writeln!(
                    out,
                    "  cluster {:<10} {point_count:>5} stores  at {:.4}, {:.4}  size {:.0}px",
                    id.to_string(),
                    center.latitude,
                    center.longitude,
                    cluster_marker_size(*point_count, stores.len())
                )?,
                MapMarker::Store(store) => writeln!(
                    out,
                    "  store   {:<10} {}  at {:.4}, {:.4}",
                    store.id,
                    or_dash(&store.name),
                    store.latitude,
                    store.longitude
                )?,
            }
        }
    }
    Ok(())
}

/// Where clicking a cluster takes the map.
///
/// # Errors
///
/// Returns the cluster error when `id` does not name a cluster of
/// `category` in the current view.
pub(crate) fn write_expand(
    out: &mut impl Write,
    session: &Session,
    options: ClusterOptions,
    category: RetailCategory,
    id: ClusterId,
) -> anyhow::Result<()> {
    let stores = session.filtered_stores();
    let clusterer = CategoryClusterer::new(options, stores.iter().copied());

    let expansion_zoom = clusterer.expansion_zoom(category, id)?;
    let viewport = clusterer.zoom_to_cluster(category, id)?;
    let members = clusterer.stores_in(category, id)?;
    let session = session.with_viewport(viewport);
    let viewport = session.viewport();

    writeln!(out, "Cluster {id} ({})", category.label())?;
    writeln!(out, "Splits at zoom: {expansion_zoom}")?;
    writeln!(
        out,
        "Recentered map: {:.4}, {:.4} at zoom {}",
        viewport.center.latitude, viewport.center.longitude, viewport.zoom
    )?;
    writeln!(out, "Stores ({}):", members.len())?;
    for store in members {
        writeln!(out, "  {:<8}{}", store.id, or_dash(&store.name))?;
    }
    Ok(())
}

/// Whether an error from [`write_expand`] is a user mistake in the id.
pub(crate) fn is_lookup_error(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ClusterError>(),
        Some(ClusterError::UnknownCluster(_) | ClusterError::UnknownCategory(_))
    )
}
