use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod loader;
mod provenance;
mod render;
mod server;
mod sorted;

use config::DashboardCfg;
use loader::Dataset;
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "polysort")]
#[command(about = "Order uploaded 2D points into a polygon outline and plot them")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Sort a CSV/Excel/JSON point file; print JSON or write it to --out
    Sort {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the raw and sorted plots for one file to a static HTML page
    Figure {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "Point polygons")]
        title: String,
    },
    /// Serve the upload dashboard over HTTP
    Serve {
        /// JSON file with DashboardCfg fields
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Dataset shown before the first upload
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Sort { input, out } => sort(&input, out.as_deref()),
        Action::Figure { input, out, title } => figure(&input, &out, &title),
        Action::Serve {
            config,
            address,
            port,
            dataset,
        } => serve(config, address, port, dataset),
        Action::Report => report(),
    }
}

fn load(input: &Path) -> Result<Dataset> {
    Dataset::from_path(input).with_context(|| format!("could not parse {}", input.display()))
}

fn ensure_parent(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn sorted_doc(ds: &Dataset) -> Result<serde_json::Value> {
    let resp = sorted::sorted_points(&ds.points.to_pairs())?;
    Ok(serde_json::json!({
        "input": ds.name,
        "centroid": resp.centroid,
        "sorted": resp.sorted,
    }))
}

fn sort(input: &Path, out: Option<&Path>) -> Result<()> {
    let ds = load(input)?;
    tracing::info!(input = %input.display(), points = ds.points.len(), "sort");
    let doc = sorted_doc(&ds)?;
    match out {
        None => println!("{}", serde_json::to_string_pretty(&doc)?),
        Some(out) => {
            ensure_parent(out)?;
            std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
                .with_context(|| format!("writing {}", out.display()))?;
            let payload = Payload::new(
                "sort",
                serde_json::json!({
                    "input": input.to_string_lossy(),
                    "points": ds.points.len(),
                }),
            );
            write_sidecar(out, payload)?;
        }
    }
    Ok(())
}

fn figure(input: &Path, out: &Path, title: &str) -> Result<()> {
    let ds = load(input)?;
    tracing::info!(input = %input.display(), out = %out.display(), points = ds.points.len(), "figure");
    let html = render::dashboard_page(title, render::View::Loaded(&ds), false)?;
    ensure_parent(out)?;
    std::fs::write(out, html).with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(
        "figure",
        serde_json::json!({
            "input": input.to_string_lossy(),
            "points": ds.points.len(),
            "title": title,
        }),
    );
    write_sidecar(out, payload)?;
    Ok(())
}

fn serve(
    config: Option<PathBuf>,
    address: Option<String>,
    port: Option<u16>,
    dataset: Option<PathBuf>,
) -> Result<()> {
    let base = match &config {
        Some(path) => DashboardCfg::from_file(path)?,
        None => DashboardCfg::default(),
    };
    let cfg = base.with_overrides(address, port, dataset);
    let default = cfg.default_dataset.as_deref().map(load).transpose()?;
    if let Some(ds) = &default {
        tracing::info!(dataset = %ds.name, points = ds.points.len(), "default_dataset");
    }
    actix_web::rt::System::new()
        .block_on(server::run(cfg, default))
        .context("dashboard server")
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "polysort_version": polysort::VERSION,
        "formats": ["csv", "xls", "xlsx", "json"],
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
