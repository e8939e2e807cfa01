#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the crime risk toolchain.
//!
//! Runs the pipeline against a local or remote incident CSV and prints the
//! per-area totals and predicted tiers, or starts the API server. With no
//! subcommand it falls back to an interactive menu.

mod interactive;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_risk_analytics::config::{PipelineConfig, load_config, load_from_env};
use crime_risk_crime_models::RawIncident;

#[derive(Parser)]
#[command(name = "crime_risk", about = "Per-area crime risk tier prediction")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict risk tiers from an incident CSV
    Predict {
        /// Local CSV file (`.gz` is decompressed)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,
        /// URL of a CSV file to download
        #[arg(long)]
        url: Option<String>,
        /// Only report this postal code
        #[arg(long)]
        zip: Option<String>,
        /// TOML pipeline config (overrides `CRIME_RISK_CONFIG`)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start the API server
    Serve,
    /// Print the effective pipeline config as TOML
    Config {
        /// TOML pipeline config (overrides `CRIME_RISK_CONFIG`)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Where to read incidents from.
enum IncidentSource {
    /// Local CSV file.
    File(PathBuf),
    /// Remote CSV file.
    Url(String),
}

impl IncidentSource {
    async fn load(&self) -> Result<Vec<RawIncident>, crime_risk_ingest::IngestError> {
        match self {
            Self::File(path) => crime_risk_ingest::read_csv_file(path),
            Self::Url(url) => crime_risk_ingest::fetch_csv(url).await,
        }
    }
}

fn resolve_config(
    path: Option<PathBuf>,
) -> Result<PipelineConfig, crime_risk_analytics::PipelineError> {
    path.map_or_else(load_from_env, |p| load_config(&p))
}

/// Loads incidents, runs the pipeline and prints the result.
///
/// # Errors
///
/// Returns an error if loading or any pipeline stage fails.
async fn predict(
    input: &IncidentSource,
    zip: Option<&str>,
    config: &PipelineConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = input.load().await?;
    let report = crime_risk_analytics::run(records, zip, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_table(&report);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Predict {
            file,
            url,
            zip,
            config,
            json,
        } => {
            let input = match (file, url) {
                (Some(path), _) => IncidentSource::File(path),
                (None, Some(url)) => IncidentSource::Url(url),
                (None, None) => return Err("either --file or --url is required".into()),
            };
            let config = resolve_config(config)?;
            predict(&input, zip.as_deref(), &config, json).await?;
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(crime_risk_server::run_server())
            })
            .await??;
        }
        Commands::Config { config } => {
            let config = resolve_config(config)?;
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}
