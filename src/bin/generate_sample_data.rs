//! Sample Wind Data Generator
//!
//! Writes the three seeded sample scenarios as hourly CSVs:
//! - Cyclone event (8 days)
//! - Fire-weather period (7 days)
//! - Cyclone with winds scaled +10%
//!
//! # Usage
//! ```bash
//! ./generate-sample-data --data-dir data --seed 42
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wind_compound_risk::config::defaults;
use wind_compound_risk::sample_data;

#[derive(Parser, Debug)]
#[command(name = "generate-sample-data")]
#[command(about = "Generate seeded sample wind datasets")]
struct Args {
    /// Output directory for the CSVs
    #[arg(long, default_value = defaults::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Random seed
    #[arg(long, default_value_t = defaults::SAMPLE_SEED)]
    seed: u64,

    /// Keep existing files instead of regenerating them
    #[arg(long)]
    keep_existing: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let written = sample_data::write_samples(&args.data_dir, args.seed, !args.keep_existing)
        .with_context(|| format!("Failed to write samples to {}", args.data_dir.display()))?;

    info!(count = written.len(), seed = args.seed, dir = %args.data_dir.display(), "Sample datasets ready");
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
