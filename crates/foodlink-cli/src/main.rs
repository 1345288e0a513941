mod args;
mod report;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use foodlink_cluster::{BoundingBox, ClusterId, ClusterOptions};
use foodlink_core::{AppConfig, RetailCategory, Session};
use foodlink_supabase::SupabaseClient;
use tracing_subscriber::EnvFilter;

use crate::args::{parse_category, BudgetArgs, FilterArgs, LocationArgs};
use crate::report::DashboardSettings;

#[derive(Debug, Parser)]
#[command(name = "foodlink")]
#[command(about = "Explore food retailers, SNAP acceptance and nearby stores")]
struct Cli {
    #[command(flatten)]
    filter: FilterArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the stores matching the filters
    Stores {
        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one store in detail
    Show {
        /// Store id
        id: i64,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Key statistics and category breakdown
    Summary,
    /// 2020 SNAP redemption by category
    Redemption,
    /// Nearest stores within a drive-time budget
    Nearest {
        #[command(flatten)]
        location: LocationArgs,
        #[command(flatten)]
        budget: BudgetArgs,
    },
    /// Stores within a radius of your location
    Nearby {
        #[command(flatten)]
        location: LocationArgs,
        /// Search radius in miles
        #[arg(long)]
        radius_miles: Option<f64>,
    },
    /// Per-category map clusters for a viewport
    Clusters {
        /// Map zoom level
        #[arg(long, default_value = "8")]
        zoom: u8,
        /// Viewport as west,south,east,north (defaults to the whole world)
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
    },
    /// Zoom level and map center that break a cluster apart
    Expand {
        /// Category the cluster belongs to
        #[arg(value_name = "CATEGORY", value_parser = parse_category)]
        cluster_category: RetailCategory,
        /// Cluster id as printed by `clusters` (zoom/index)
        id: ClusterId,
    },
    /// Every report section at once
    Dashboard {
        #[command(flatten)]
        location: LocationArgs,
        /// Maximum number of store rows in the listing
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = foodlink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = SupabaseClient::new(&config)?;
    let dataset = client
        .fetch_stores()
        .await
        .context("could not load store data")?;

    let session = Session::new(Arc::new(dataset)).with_filter(cli.filter.to_spec());
    let mut out = std::io::stdout().lock();
    let result = run(&cli.command, &session, &config, &mut out);

    if let Err(err) = &result {
        if report::is_lookup_error(err) {
            eprintln!("hint: run `foodlink clusters` with the same filters to list cluster ids");
        }
    }
    result
}

fn run(
    command: &Commands,
    session: &Session,
    config: &AppConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let cluster_options = ClusterOptions {
        radius: config.cluster_radius,
        max_zoom: config.cluster_max_zoom,
        ..ClusterOptions::default()
    };

    match command {
        Commands::Stores { limit } => report::write_stores(out, session, *limit)?,
        Commands::Show { id, location } => {
            let origin = location.resolve(config).ok();
            let session = session
                .select_store(Some(*id))
                .with_user_location(origin);
            report::write_store_detail(out, &session, session.user_location())?;
        }
        Commands::Summary => report::write_summary(out, session)?,
        Commands::Redemption => report::write_redemption(out, session)?,
        Commands::Nearest { location, budget } => {
            let origin = location.resolve(config);
            report::write_nearest(
                out,
                session,
                origin.as_ref().copied(),
                budget.budget(config)?,
                budget.limit(config),
            )?;
        }
        Commands::Nearby {
            location,
            radius_miles,
        } => {
            let origin = location.resolve(config);
            let radius = radius_miles.unwrap_or(config.nearby_radius_miles);
            anyhow::ensure!(
                radius.is_finite() && radius > 0.0,
                "--radius-miles must be a positive number, got {radius}"
            );
            report::write_nearby(out, session, origin.as_ref().copied(), radius)?;
        }
        Commands::Clusters { zoom, bbox } => {
            let bbox = bbox.unwrap_or(BoundingBox::WORLD);
            report::write_clusters(out, session, cluster_options, &bbox, *zoom)?;
        }
        Commands::Expand {
            cluster_category,
            id,
        } => {
            report::write_expand(out, session, cluster_options, *cluster_category, *id)?;
        }
        Commands::Dashboard { location, limit } => {
            let origin = location.resolve(config);
            if let Err(err) = &origin {
                tracing::info!(error = %err, "no user location; location sections disabled");
            }
            let settings = DashboardSettings {
                store_limit: *limit,
                cluster_options,
                budget: BudgetArgs::default().budget(config)?,
                nearest_limit: config.nearest_limit,
                nearby_radius_miles: config.nearby_radius_miles,
            };
            report::write_dashboard(out, session, origin.as_ref().copied(), &settings)?;
        }
    }

    out.flush()?;
    Ok(())
}
