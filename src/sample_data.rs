//! Synthetic hourly wind datasets
//!
//! Generates the three sample scenarios used for demos and regression runs:
//! - **Cyclone event**: 8 days, Gaussian wind envelope peaking at 40% of
//!   the span, with rainfall concentrated near the peak
//! - **Fire-weather period**: 7 days of strong afternoon winds that slowly
//!   intensify, dry fuels, little rain
//! - **Future +10%**: the cyclone with wind and gust scaled by 1.10
//!
//! All generators are seeded, so a given seed always produces the same CSV.

use std::f64::consts::PI;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
use rand::prelude::*;
use rand_distr::{Distribution, Exp, ExpError, Normal, NormalError};
use thiserror::Error;

use crate::acquisition::csv_loader::{OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
use crate::config::defaults;
use crate::types::HourlyObservation;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid normal distribution: {0}")]
    Normal(#[from] NormalError),

    #[error("Invalid exponential distribution: {0}")]
    Exp(#[from] ExpError),

    #[error("Invalid start date: {0}")]
    StartDate(String),

    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Scenarios
// ============================================================================

/// The bundled sample scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleDataset {
    CycloneEvent,
    FireWeather,
    FuturePlus10,
}

impl SampleDataset {
    pub const ALL: [SampleDataset; 3] = [
        SampleDataset::CycloneEvent,
        SampleDataset::FireWeather,
        SampleDataset::FuturePlus10,
    ];

    /// Human-readable label used in banners and report file names
    pub fn label(&self) -> &'static str {
        match self {
            SampleDataset::CycloneEvent => "Cyclone Event",
            SampleDataset::FireWeather => "Fire-Weather Period",
            SampleDataset::FuturePlus10 => "Future +10% Scenario",
        }
    }

    /// CSV file name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SampleDataset::CycloneEvent => "sample_cyclone_event.csv",
            SampleDataset::FireWeather => "sample_wind_fireweather.csv",
            SampleDataset::FuturePlus10 => "sample_future_plus10pct_winds.csv",
        }
    }

    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    /// Generate the scenario with its default start date and length.
    pub fn generate(&self, seed: u64) -> Result<Vec<HourlyObservation>, GeneratorError> {
        let mut rng = StdRng::seed_from_u64(seed);
        match self {
            SampleDataset::CycloneEvent => {
                make_cyclone(start_date(defaults::CYCLONE_START)?, defaults::CYCLONE_DAYS, &mut rng)
            }
            SampleDataset::FireWeather => make_fireweather(
                start_date(defaults::FIREWEATHER_START)?,
                defaults::FIREWEATHER_DAYS,
                &mut rng,
            ),
            SampleDataset::FuturePlus10 => {
                let base = make_cyclone(start_date(defaults::CYCLONE_START)?, defaults::CYCLONE_DAYS, &mut rng)?;
                Ok(scale_winds(&base, defaults::FUTURE_WIND_SCALE))
            }
        }
    }
}

impl std::fmt::Display for SampleDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn start_date((y, m, d): (i32, u32, u32)) -> Result<NaiveDate, GeneratorError> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| GeneratorError::StartDate(format!("{y}-{m}-{d}")))
}

// ============================================================================
// Generators
// ============================================================================

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Hourly UTC timestamps starting at midnight of `start`.
fn hourly_index(start: NaiveDate, days: u32) -> Vec<chrono::DateTime<Utc>> {
    let origin = Utc.from_utc_datetime(&start.and_time(chrono::NaiveTime::MIN));
    (0..i64::from(days) * 24).map(|h| origin + Duration::hours(h)).collect()
}

/// Multi-day cyclone: wind ramps to ~50 m/s around 40% of the span, then decays.
pub fn make_cyclone(start: NaiveDate, days: u32, rng: &mut StdRng) -> Result<Vec<HourlyObservation>, GeneratorError> {
    let index = hourly_index(start, days);
    let peak_hour = (f64::from(days) * 24.0 * 0.40).floor();
    let wind_noise = Normal::new(0.0_f64, 1.5)?;
    let gust_noise = Normal::new(0.0_f64, 2.0)?;
    let rain_burst = Exp::new(1.0_f64)?;

    let envelope: Vec<f64> = (0..index.len())
        .map(|h| {
            let dh = h as f64 - peak_hour;
            8.0 + 44.0 * (-(dh * dh) / (2.0 * (24.0 * 1.5_f64).powi(2))).exp()
        })
        .collect();
    let envelope_max = envelope.iter().copied().fold(f64::MIN, f64::max);

    let mut rows = Vec::with_capacity(index.len());
    for (h, ts) in index.into_iter().enumerate() {
        // Diurnal modulation, stronger in the afternoon
        let hour_of_day = f64::from(ts.hour());
        let diurnal = 1.0 + 0.08 * (2.0 * PI * (hour_of_day - 6.0) / 24.0).sin();

        let wind = (envelope[h] * diurnal + wind_noise.sample(rng)).max(0.0);
        let gust_factor = 1.25 + 0.15 * rng.gen::<f64>();
        let gust = (wind * gust_factor + gust_noise.sample(rng)).max(wind);

        let dh = h as f64 - peak_hour;
        let rain_base = 5.0 * (-(dh * dh) / (2.0 * (24.0 * 1.2_f64).powi(2))).exp();
        let rainfall = (rain_base * (1.0 + rain_burst.sample(rng)) * (wind / envelope_max)).clamp(0.0, 60.0);

        rows.push(HourlyObservation {
            rainfall_mm: Some(round_to(rainfall, 2)),
            ..HourlyObservation::new(ts, round_to(wind, 2), round_to(gust, 2))
        });
    }
    Ok(rows)
}

/// Fire-weather: strong daytime winds, calmer nights, slow intensification.
pub fn make_fireweather(start: NaiveDate, days: u32, rng: &mut StdRng) -> Result<Vec<HourlyObservation>, GeneratorError> {
    let index = hourly_index(start, days);
    let wind_noise = Normal::new(0.0_f64, 2.0)?;
    let gust_noise = Normal::new(0.0_f64, 1.5)?;
    // Mean 0.3 mm
    let drizzle = Exp::new(1.0_f64 / 0.3)?;

    let mut rows = Vec::with_capacity(index.len());
    for (h, ts) in index.into_iter().enumerate() {
        let hour_of_day = f64::from(ts.hour());
        let day_wind = 18.0 + 14.0 * (PI * (hour_of_day - 8.0).clamp(0.0, 12.0) / 12.0).sin();
        let trend = 1.0 + 0.04 * (h as f64 / 24.0);

        let wind = (day_wind * trend + wind_noise.sample(rng)).max(2.0);
        let gust_factor = 1.30 + 0.20 * rng.gen::<f64>();
        let gust = (wind * gust_factor + gust_noise.sample(rng)).max(wind);

        let fuel_dryness = (0.75 + 0.20 * rng.gen::<f64>()).clamp(0.0, 1.0);
        let rainfall = drizzle.sample(rng).clamp(0.0, 3.0);
        let vulnerability = 0.4 + 0.3 * rng.gen::<f64>();

        rows.push(HourlyObservation {
            timestamp: ts,
            wind_speed_ms: round_to(wind, 2),
            gust_ms: round_to(gust, 2),
            rainfall_mm: Some(round_to(rainfall, 3)),
            fuel_dryness_index: Some(round_to(fuel_dryness, 3)),
            infrastructure_vulnerability: Some(round_to(vulnerability, 3)),
        });
    }
    Ok(rows)
}

/// Scale wind and gust by a common factor (future climate scenario).
pub fn scale_winds(base: &[HourlyObservation], scale: f64) -> Vec<HourlyObservation> {
    base.iter()
        .map(|obs| HourlyObservation {
            wind_speed_ms: round_to(obs.wind_speed_ms * scale, 2),
            gust_ms: round_to(obs.gust_ms * scale, 2),
            ..obs.clone()
        })
        .collect()
}

// ============================================================================
// CSV Output
// ============================================================================

fn fmt_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write observations in the loader's CSV schema.
///
/// Optional columns are emitted only when at least one row carries them.
pub fn write_csv(path: &Path, rows: &[HourlyObservation]) -> Result<(), GeneratorError> {
    let io_err = |source| GeneratorError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    let present = [
        rows.iter().any(|r| r.rainfall_mm.is_some()),
        rows.iter().any(|r| r.fuel_dryness_index.is_some()),
        rows.iter().any(|r| r.infrastructure_vulnerability.is_some()),
    ];

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.extend(OPTIONAL_COLUMNS.iter().zip(present).filter(|(_, p)| *p).map(|(c, _)| *c));
    writeln!(out, "{}", header.join(",")).map_err(io_err)?;

    for row in rows {
        let mut fields = vec![
            row.timestamp.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
            row.wind_speed_ms.to_string(),
            row.gust_ms.to_string(),
        ];
        let optional = [row.rainfall_mm, row.fuel_dryness_index, row.infrastructure_vulnerability];
        fields.extend(optional.into_iter().zip(present).filter(|(_, p)| *p).map(|(v, _)| fmt_optional(v)));
        writeln!(out, "{}", fields.join(",")).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote sample dataset");
    Ok(())
}

/// Write every sample scenario into `data_dir`.
///
/// Existing files are left alone unless `overwrite` is set. Returns the
/// paths that were (re)generated.
pub fn write_samples(data_dir: &Path, seed: u64, overwrite: bool) -> Result<Vec<PathBuf>, GeneratorError> {
    let mut written = Vec::new();
    for dataset in SampleDataset::ALL {
        let path = dataset.path_in(data_dir);
        if path.exists() && !overwrite {
            continue;
        }
        write_csv(&path, &dataset.generate(seed)?)?;
        written.push(path);
    }
    Ok(written)
}
