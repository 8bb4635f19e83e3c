//! Health monitor interactive binary.

use std::path::PathBuf;

use clap::Parser;
use health_monitor::{HealthMonitor, Shell};
use health_records::{import_from_path_parallel, ImportConfig, PatientStore};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "health-monitor")]
#[command(about = "Interactive patient health record monitor")]
struct Cli {
    /// Delimited file to load before the menu starts
    #[arg(long)]
    import: Option<PathBuf>,
    /// Abort imports at the first malformed line
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the prompt
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = if cli.fail_fast {
        ImportConfig::fail_fast()
    } else {
        ImportConfig::default()
    };

    let mut store = PatientStore::new();
    if let Some(path) = &cli.import {
        tracing::info!("Loading patient records from: {}", path.display());
        let report = import_from_path_parallel(&mut store, path, &config)?;
        for failure in &report.failures {
            tracing::warn!("Rejected {}", failure);
        }
        let summary = store.summarize();
        tracing::info!(
            "Loaded {} patients with {} reports",
            summary.patients,
            summary.reports
        );
    }

    let monitor = HealthMonitor::new(store).with_import_config(config);
    let mut shell = Shell::new(
        monitor,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    shell.run().await?;

    Ok(())
}
