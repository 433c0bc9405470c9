//! Wind Compound Risk CLI
//!
//! Runs the multi-day wind stress pipeline on a CSV, or on the bundled
//! sample scenarios when no CSV is given.
//!
//! # Usage
//!
//! ```bash
//! # Run the three sample scenarios (generated on first use)
//! cargo run --release
//!
//! # Run a single station series
//! ./wind-compound-risk --csv data/station.csv --label "Station 12"
//!
//! # Also export hourly scores and JSON
//! ./wind-compound-risk --csv data/station.csv --hourly --json
//! ```
//!
//! # Environment Variables
//!
//! - `WINDRISK_CONFIG`: Path to a risk config TOML
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wind_compound_risk::config::{self, defaults, RiskConfig};
use wind_compound_risk::sample_data::{self, SampleDataset};
use wind_compound_risk::{acquisition, pipeline, report};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wind-compound-risk")]
#[command(about = "Multi-day compound wind stress and risk-state pipeline")]
#[command(version)]
struct CliArgs {
    /// Hourly wind CSV (timestamp, wind_speed_ms, gust_ms).
    /// Without it, the three sample scenarios are run.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Dataset label used in the summary banner and output file names
    #[arg(long)]
    label: Option<String>,

    /// Risk config TOML (overrides WINDRISK_CONFIG and ./risk_config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for CSV/JSON exports
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Directory holding the sample CSVs
    #[arg(long, value_name = "DIR", default_value = defaults::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Also write the chart-ready JSON export
    #[arg(long)]
    json: bool,

    /// Also write the hourly scores CSV and embed them in the JSON export
    #[arg(long)]
    hourly: bool,
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(args: &CliArgs) -> Result<RiskConfig> {
    let mut risk_config = match &args.config {
        Some(path) => RiskConfig::load_from_file(path)
            .with_context(|| format!("Failed to load risk config from {}", path.display()))?,
        None => {
            let (cfg, source) = RiskConfig::load_with_source();
            info!(source = %source, "Risk config resolved");
            cfg
        }
    };

    if let Some(dir) = &args.output_dir {
        risk_config.output.directory = dir.clone();
    }
    if let Some(label) = &args.label {
        risk_config.dataset.label = label.clone();
    }
    risk_config.output.write_json |= args.json;
    risk_config.output.write_hourly_csv |= args.hourly;
    risk_config.output.json_include_hourly |= args.hourly;

    Ok(risk_config)
}

fn run_dataset(path: &Path, label: &str, risk_config: &RiskConfig) -> Result<()> {
    let observations = acquisition::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let output = pipeline::run(&observations, risk_config).with_context(|| format!("Pipeline failed for {label}"))?;

    println!("{}", report::render_summary(label, &output));

    let written = report::write_all(&risk_config.output, label, &output)
        .with_context(|| format!("Failed to write reports for {label}"))?;
    if written.is_empty() {
        warn!(dataset = label, "All exports disabled, nothing written");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let risk_config = load_config(&args)?;
    info!(
        output_dir = %risk_config.output.directory.display(),
        cwl_baseline = risk_config.stress.baseline_wind_ms,
        recovery_baseline = risk_config.stress.baseline_recovery_ms,
        "Wind Compound Risk starting"
    );
    config::init(risk_config);
    let risk_config = config::get();

    match &args.csv {
        Some(path) => run_dataset(path, &risk_config.dataset.label, risk_config)?,
        None => {
            let generated = sample_data::write_samples(&args.data_dir, defaults::SAMPLE_SEED, false)
                .with_context(|| format!("Failed to generate sample data in {}", args.data_dir.display()))?;
            if !generated.is_empty() {
                info!(count = generated.len(), dir = %args.data_dir.display(), "Generated missing sample datasets");
            }
            for dataset in SampleDataset::ALL {
                run_dataset(&dataset.path_in(&args.data_dir), dataset.label(), risk_config)?;
            }
        }
    }

    info!("Done");
    Ok(())
}
