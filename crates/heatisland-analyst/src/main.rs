//! Command-line entry point for the Heat Island dashboard.
//!
//! Prints synthesized anomaly series, lists the city roster, and runs the
//! narrative analysis against an LLM backend.
//!
//! # Architecture
//!
//! ```text
//! Scenario --> Dashboard (synthesis) --> digest --> Prompt Engine --> LLM Backend --> Parser
//! ```
//!
//! Results go to stdout; logs go to stderr.

mod analyst;
mod config;
mod digest;
mod error;
mod llm;
mod output;
mod parse;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use heatisland_core::{Dashboard, DashboardConfig};
use heatisland_synthesis::{NoiseSource, RngNoise, cities_in_region, roster};
use heatisland_types::{AnalysisStatus, Region, Scenario};

use crate::analyst::Analyst;
use crate::output::SeriesFormat;

#[derive(Parser)]
#[command(name = "heatisland")]
#[command(about = "Synthetic urban heat island anomalies with LLM analysis")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true, default_value = "heatisland.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the anomaly series for a scenario
    Series {
        /// historical, optimistic, or bau (defaults to the configured scenario)
        #[arg(short, long)]
        scenario: Option<Scenario>,

        /// Noise seed (overrides the configured seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: SeriesFormat,
    },

    /// List the cities in the roster
    Roster {
        /// Only cities in this region (asia or world)
        #[arg(short, long)]
        region: Option<Region>,
    },

    /// Generate a series and ask the LLM for a narrative analysis
    Analyze {
        /// historical, optimistic, or bau (defaults to the configured scenario)
        #[arg(short, long)]
        scenario: Option<Scenario>,

        /// Noise seed (overrides the configured seed)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Application entry point.
///
/// Loads `.env`, reads configuration, initializes logging, then dispatches
/// the subcommand.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, output cannot be
/// rendered, or the analysis fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Missing .env is fine; real environment variables still apply.
    let dotenv = dotenvy::dotenv().ok();

    let config = DashboardConfig::from_file_or_default(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        config = %cli.config.display(),
        dotenv_loaded = dotenv.is_some(),
        backend = config.analysis.backend,
        "configuration loaded"
    );

    match cli.command {
        Command::Series {
            scenario,
            seed,
            format,
        } => {
            let scenario = scenario.unwrap_or(config.synthesis.default_scenario);
            let seed = seed.or(config.synthesis.seed);
            let dashboard = Dashboard::with_scenario(noise(seed), scenario);
            let rendered =
                output::render_series(dashboard.series(), scenario, seed, roster(), format)?;
            println!("{rendered}");
        }

        Command::Roster { region } => {
            let table = match region {
                Some(region) => output::roster_table(cities_in_region(region)),
                None => output::roster_table(roster()),
            };
            print!("{table}");
        }

        Command::Analyze { scenario, seed } => {
            let scenario = scenario.unwrap_or(config.synthesis.default_scenario);
            run_analysis(&config, scenario, seed.or(config.synthesis.seed)).await?;
        }
    }

    Ok(())
}

/// Drive one analysis through the dashboard lifecycle and print the result.
async fn run_analysis(
    config: &DashboardConfig,
    scenario: Scenario,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config.analysis.has_credentials() {
        warn!("no analysis API key configured; the request will fail");
    }

    let mut dashboard = Dashboard::with_scenario(noise(seed), scenario);
    let ticket = dashboard.begin_analysis()?;

    let outcome = match Analyst::from_config(&config.analysis) {
        Ok(analyst) => analyst.analyze(dashboard.series(), scenario).await,
        Err(e) => Err(e),
    };
    let failure = outcome.as_ref().err().map(ToString::to_string);

    let status = dashboard.finish_analysis(ticket, outcome);
    match (status, dashboard.analysis_result()) {
        (AnalysisStatus::Success, Some(result)) => {
            println!("{}", output::render_analysis(scenario, result)?);
            Ok(())
        }
        _ => {
            let message = failure.unwrap_or_else(|| "analysis did not complete".to_owned());
            error!(scenario = %scenario, error = message, "analysis failed");
            Err(format!("Failed to analyze climate data: {message}").into())
        }
    }
}

/// Seeded noise when a seed is given, fresh OS-seeded noise otherwise.
fn noise(seed: Option<u64>) -> impl NoiseSource {
    seed.map_or_else(RngNoise::from_os_rng, RngNoise::seeded)
}
