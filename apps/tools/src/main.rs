use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataset::{load_csv, Dataset};
use engine::DashboardContext;
use serde::Serialize;
use shared::{
    domain::{KnownSites, LaunchSite, SiteSelection},
    protocol::CategoryBreakdown,
};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "data/spacex_launch_dash.csv")]
    dataset: PathBuf,
    /// Comma-separated list of sites the table is allowed to contain.
    #[arg(long, value_delimiter = ',')]
    known_sites: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record count, known sites and payload bounds.
    Summary,
    /// Proportional breakdown for a site selection (payload range not applied).
    Breakdown {
        #[arg(long, default_value = "ALL")]
        site: String,
    },
    /// Scatter points for a site selection and payload range.
    Scatter {
        #[arg(long, default_value = "ALL")]
        site: String,
        #[arg(long)]
        low: Option<f64>,
        #[arg(long)]
        high: Option<f64>,
    },
}

#[derive(Debug, Serialize)]
struct Summary {
    records: usize,
    sites: Vec<String>,
    payload_min: f64,
    payload_max: f64,
    launches_by_site: CategoryBreakdown,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let known_sites = if cli.known_sites.is_empty() {
        None
    } else {
        Some(KnownSites::new(
            cli.known_sites.iter().map(|site| LaunchSite::new(site.trim())),
        ))
    };
    let dataset = load_csv(&cli.dataset, known_sites)
        .with_context(|| format!("failed to load dataset '{}'", cli.dataset.display()))?;
    let ctx = DashboardContext::new(Arc::new(dataset), 1000.0);

    match cli.command {
        Command::Summary => print_json(&summary(&ctx)?)?,
        Command::Breakdown { site } => {
            let control = ctx.control_state(Some(&site), None, None)?;
            print_json(&ctx.pie_figure(&control.selected_site)?)?;
        }
        Command::Scatter { site, low, high } => {
            let control = ctx.control_state(Some(&site), low, high)?;
            print_json(&ctx.scatter_figure(&control)?)?;
        }
    }

    Ok(())
}

fn summary(ctx: &DashboardContext) -> Result<Summary> {
    let dataset: &Dataset = &ctx.dataset;
    let bounds = dataset.payload_bounds();
    let pie = ctx.pie_figure(&SiteSelection::All)?;
    Ok(Summary {
        records: dataset.len(),
        sites: dataset.sites().iter().map(ToString::to_string).collect(),
        payload_min: bounds.low(),
        payload_max: bounds.high(),
        launches_by_site: pie.breakdown,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
