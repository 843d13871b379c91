use std::fs::File;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod charts;
mod data;
mod enrich;
mod error;
mod models;
mod pages;
mod report;
mod server;

#[derive(Parser)]
#[command(name = "ccc-dashboard")]
#[command(about = "Covid care centre analytics dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard pages and chart endpoint
    Serve {
        #[arg(long, env = "CCC_CSV", default_value = "karnataka_ccc.csv")]
        csv: PathBuf,
        #[arg(long, env = "CCC_HOST", default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, env = "CCC_PORT", default_value_t = 1234)]
        port: u16,
    },
    /// Generate a markdown report answering the dashboard questions
    Report {
        #[arg(long, env = "CCC_CSV", default_value = "karnataka_ccc.csv")]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the enriched table as CSV
    Export {
        #[arg(long, env = "CCC_CSV", default_value = "karnataka_ccc.csv")]
        csv: PathBuf,
        #[arg(long, default_value = "enriched.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { csv, host, port } => {
            let dataset = data::load_dataset(&csv)
                .with_context(|| format!("failed to load {}", csv.display()))?;
            server::serve(SocketAddr::new(host, port), dataset).await?;
        }
        Commands::Report { csv, out } => {
            let dataset = data::load_dataset(&csv)
                .with_context(|| format!("failed to load {}", csv.display()))?;
            let report = report::build_report(&csv.display().to_string(), &dataset);
            std::fs::write(&out, report)?;
            info!(out = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Export { csv, out } => {
            let dataset = data::load_dataset(&csv)
                .with_context(|| format!("failed to load {}", csv.display()))?;
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            data::write_enriched(dataset.records(), file)?;
            println!("Exported {} rows to {}.", dataset.len(), out.display());
        }
    }

    Ok(())
}
