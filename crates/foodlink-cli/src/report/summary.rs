use std::io::{self, Write};

use foodlink_core::{summarize, Session};

use super::{fmt_money, fmt_pct, section_heading};

/// Key statistics, category breakdown and SNAP split.
pub(crate) fn write_summary(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let summary = summarize(session.filtered_stores());

    section_heading(out, "Key statistics")?;
    writeln!(out, "Total stores:          {}", summary.total_stores)?;
    writeln!(
        out,
        "Total SNAP redemption: {}",
        fmt_money(summary.total_redemption)
    )?;
    writeln!(
        out,
        "Accept SNAP:           {} ({})",
        summary.snap_accepting,
        fmt_pct(summary.snap_pct)
    )?;
    writeln!(
        out,
        "Fresh produce:         {} ({})",
        summary.fresh_produce,
        fmt_pct(summary.fresh_produce_pct)
    )?;
    writeln!(out)?;

    section_heading(out, "Stores by category")?;
    if summary.categories.is_empty() {
        writeln!(out, "no stores match the current filters")?;
    } else {
        writeln!(
            out,
            "{:<20}{:>8}{:>10}{:>16}{:>12}",
            "CATEGORY", "STORES", "SHARE", "REDEMPTION", "SHARE"
        )?;
        for category in &summary.categories {
            writeln!(
                out,
                "{:<20}{:>8}{:>10}{:>16}{:>12}",
                category.category.label(),
                category.store_count,
                fmt_pct(category.store_share_pct),
                fmt_money(category.redemption),
                fmt_pct(category.redemption_share_pct)
            )?;
        }
    }
    writeln!(out)?;

    let split = summary.snap_split();
    section_heading(out, "SNAP acceptance")?;
    writeln!(out, "Accepting:     {}", split.accepting)?;
    writeln!(out, "Not accepting: {}", split.not_accepting)
}

/// Redemption by category, largest share first.
pub(crate) fn write_redemption(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let summary = summarize(session.filtered_stores());

    section_heading(out, "2020 SNAP redemption by category")?;
    let distribution = summary.redemption_distribution();
    if distribution.is_empty() {
        writeln!(out, "no stores match the current filters")?;
        return Ok(());
    }
    for share in &distribution {
        writeln!(
            out,
            "{:<20}{:>16}{:>10}",
            share.category.label(),
            fmt_money(share.redemption),
            fmt_pct(share.share_pct)
        )?;
    }
    writeln!(out, "{:<20}{:>16}", "Total", fmt_money(summary.total_redemption))
}
