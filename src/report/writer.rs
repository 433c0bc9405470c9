//! File exports: daily CSV, hourly CSV, chart-ready JSON

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::ReportError;
use crate::config::defaults::{DAILY_CSV_SUFFIX, HOURLY_CSV_SUFFIX, JSON_SUFFIX};
use crate::config::OutputConfig;
use crate::pipeline::{PipelineOutput, StateHistogram};
use crate::types::{DailyRecord, HourlyRecord, RiskState};

/// Column order of the daily metrics CSV
pub const DAILY_COLUMNS: [&str; 18] = [
    "date",
    "hours",
    "daily_CWL",
    "daily_SHWe",
    "cumulative_CWL",
    "cumulative_SHWe",
    "max_recovery_EWS",
    "no_recovery_day",
    "high_wind_day",
    "failed_recovery_night",
    "compound",
    "consecutive_no_recovery_days",
    "consecutive_high_wind_days",
    "consecutive_failed_recovery_nights",
    "consecutive_compound_cycles",
    "risk_state",
    "risk_state_num",
    "risk_multiplier",
];

/// Filesystem-safe form of a dataset label: spaces to `_`, slashes to `-`.
pub fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            other => other,
        })
        .collect()
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io { path: parent.to_path_buf(), source })?;
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io { path: path.to_path_buf(), source })
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the full daily table, one row per date.
pub fn write_daily_csv(path: &Path, daily: &[DailyRecord]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io { path: path.to_path_buf(), source };
    let mut w = create(path)?;

    writeln!(w, "{}", DAILY_COLUMNS.join(",")).map_err(io_err)?;
    for day in daily {
        let a = &day.aggregate;
        let s = &day.streaks;
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            a.date.format("%Y-%m-%d"),
            a.hours,
            a.daily_cwl,
            a.daily_shwe,
            a.cumulative_cwl,
            a.cumulative_shwe,
            a.max_recovery_ews,
            a.flags.no_recovery_day,
            a.flags.high_wind_day,
            a.flags.failed_recovery_night,
            a.flags.compound,
            s.consecutive_no_recovery_days,
            s.consecutive_high_wind_days,
            s.consecutive_failed_recovery_nights,
            s.consecutive_compound_cycles,
            day.risk_state,
            day.risk_state_num,
            day.risk_multiplier,
        )
        .map_err(io_err)?;
    }
    w.flush().map_err(io_err)
}

/// Write the hourly table: input columns plus EWS, CWL_hour, SHWe_hour.
pub fn write_hourly_csv(path: &Path, hourly: &[HourlyRecord]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io { path: path.to_path_buf(), source };
    let mut w = create(path)?;

    writeln!(
        w,
        "timestamp,wind_speed_ms,gust_ms,rainfall_mm,fuel_dryness_index,infrastructure_vulnerability,EWS,CWL_hour,SHWe_hour"
    )
    .map_err(io_err)?;
    for rec in hourly {
        let o = &rec.observation;
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{}",
            o.timestamp.to_rfc3339(),
            o.wind_speed_ms,
            o.gust_ms,
            opt(o.rainfall_mm),
            opt(o.fuel_dryness_index),
            opt(o.infrastructure_vulnerability),
            rec.stress.ews,
            rec.stress.cwl_hour,
            rec.stress.shwe_hour,
        )
        .map_err(io_err)?;
    }
    w.flush().map_err(io_err)
}

#[derive(Serialize)]
struct StateLegend {
    state: RiskState,
    risk_state_num: u8,
    color: &'static str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'a str,
    state_legend: Vec<StateLegend>,
    state_histogram: StateHistogram,
    max_compound_streak: u32,
    daily: &'a [DailyRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    hourly: Option<&'a [HourlyRecord]>,
}

/// Write the chart-ready JSON export. Hourly rows are included on request.
pub fn write_json(path: &Path, label: &str, output: &PipelineOutput, include_hourly: bool) -> Result<(), ReportError> {
    let state_legend = RiskState::ALL
        .iter()
        .map(|&state| StateLegend {
            state,
            risk_state_num: state.ordinal(),
            color: state.color_hex(),
        })
        .collect();
    let report = JsonReport {
        label,
        state_legend,
        state_histogram: output.state_histogram(),
        max_compound_streak: output.max_compound_streak(),
        daily: &output.daily,
        hourly: include_hourly.then_some(output.hourly.as_slice()),
    };
    let mut w = create(path)?;
    serde_json::to_writer_pretty(&mut w, &report)?;
    w.flush().map_err(|source| ReportError::Io { path: path.to_path_buf(), source })
}

/// Write every export enabled in `config`; returns the paths written.
pub fn write_all(config: &OutputConfig, label: &str, output: &PipelineOutput) -> Result<Vec<PathBuf>, ReportError> {
    let stem = sanitize_label(label);
    let mut written = Vec::new();

    if config.write_daily_csv {
        let path = config.directory.join(format!("{stem}{DAILY_CSV_SUFFIX}"));
        write_daily_csv(&path, &output.daily)?;
        written.push(path);
    }
    if config.write_hourly_csv {
        let path = config.directory.join(format!("{stem}{HOURLY_CSV_SUFFIX}"));
        write_hourly_csv(&path, &output.hourly)?;
        written.push(path);
    }
    if config.write_json {
        let path = config.directory.join(format!("{stem}{JSON_SUFFIX}"));
        write_json(&path, label, output, config.json_include_hourly)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "Report written");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::types::HourlyObservation;
    use chrono::{Duration, TimeZone, Utc};

    fn output(days: i64, wind: f64) -> PipelineOutput {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let series: Vec<HourlyObservation> = (0..days * 24)
            .map(|i| HourlyObservation::new(start + Duration::hours(i), wind, wind))
            .collect();
        crate::pipeline::run(&series, &RiskConfig::default()).unwrap()
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Cyclone Event"), "Cyclone_Event");
        assert_eq!(sanitize_label("Future +10% Scenario"), "Future_+10%_Scenario");
        assert_eq!(sanitize_label("a/b c"), "a-b_c");
    }

    #[test]
    fn test_daily_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        write_daily_csv(&path, &output(2, 25.0).daily).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,hours,daily_CWL"));
        assert!(lines[0].ends_with("risk_state_num,risk_multiplier"));
        assert_eq!(lines[0].split(',').collect::<Vec<_>>(), DAILY_COLUMNS.to_vec());
        assert!(lines.iter().all(|l| l.split(',').count() == DAILY_COLUMNS.len()));
        assert!(lines[1].starts_with("2024-03-01,24,120,120,"));
        assert!(lines[2].contains(",Failure,2,"));
    }

    #[test]
    fn test_hourly_csv_row_count_and_blank_optionals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.csv");
        write_hourly_csv(&path, &output(1, 12.0).hourly).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 25);
        let first: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(first.len(), 9);
        assert_eq!(first[3], "");
        assert_eq!(first[6], "12");
    }

    #[test]
    fn test_json_contains_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        write_json(&path, "Storm", &output(3, 25.0), false).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["label"], "Storm");
        assert_eq!(value["state_histogram"]["failure"], 3);
        assert_eq!(value["daily"].as_array().unwrap().len(), 3);
        assert_eq!(value["daily"][2]["consecutive_compound_cycles"], 3);
        assert!(value.get("hourly").is_none());
    }

    #[test]
    fn test_json_uses_table_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        write_json(&path, "Storm", &output(1, 25.0), true).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let day = &value["daily"][0];
        for column in DAILY_COLUMNS.iter().filter(|c| **c != "date") {
            assert!(day.get(*column).is_some(), "daily JSON lacks {column}");
        }
        assert_eq!(day["daily_CWL"], 120.0);
        assert_eq!(day["cumulative_SHWe"], 120.0);
        assert!(day.get("daily_cwl").is_none());

        let hour = &value["hourly"][0];
        assert_eq!(hour["EWS"], 25.0);
        assert_eq!(hour["CWL_hour"], 5.0);
        assert_eq!(hour["SHWe_hour"], 15.0);
        assert!(hour.get("ews").is_none());
    }

    #[test]
    fn test_json_state_legend_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        write_json(&path, "Calm", &output(1, 0.0), false).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let legend = value["state_legend"].as_array().unwrap();
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[0]["state"], "Stable");
        assert_eq!(legend[0]["color"], "#4CAF50");
        assert_eq!(legend[2]["state"], "Failure");
        assert_eq!(legend[2]["risk_state_num"], 2);
        assert_eq!(legend[2]["color"], "#F44336");
    }

    #[test]
    fn test_write_all_respects_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().join("out"),
            write_daily_csv: true,
            write_hourly_csv: false,
            write_json: true,
            json_include_hourly: false,
        };
        let written = write_all(&config, "Cyclone Event", &output(1, 5.0)).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("out/Cyclone_Event_daily_metrics.csv").exists());
        assert!(dir.path().join("out/Cyclone_Event_risk.json").exists());
        assert!(!dir.path().join("out/Cyclone_Event_hourly_metrics.csv").exists());
    }

    #[test]
    fn test_json_hourly_toggle_independent_of_hourly_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_path_buf(),
            write_daily_csv: false,
            write_hourly_csv: false,
            write_json: true,
            json_include_hourly: true,
        };
        let written = write_all(&config, "Gale", &output(1, 5.0)).unwrap();
        assert_eq!(written, vec![dir.path().join("Gale_risk.json")]);

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(value["hourly"].as_array().map(Vec::len), Some(24));
    }
}
