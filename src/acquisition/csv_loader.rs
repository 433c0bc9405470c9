//! Wind-risk CSV loader
//!
//! Reads an hourly wind CSV, validates its schema, parses timestamps to UTC,
//! and returns observations sorted by time with duplicates removed.
//!
//! Required columns: `timestamp`, `wind_speed_ms`, `gust_ms`.
//! Optional columns: `rainfall_mm`, `fuel_dryness_index`,
//! `infrastructure_vulnerability`. Column order is free.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::HourlyObservation;

pub const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "wind_speed_ms", "gust_ms"];
pub const OPTIONAL_COLUMNS: [&str; 3] = ["rainfall_mm", "fuel_dryness_index", "infrastructure_vulnerability"];

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Line {line}: {message}")]
    Timestamp { line: usize, message: String },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    NotNumeric { line: usize, column: &'static str, value: String },

    #[error("{column} contains negative values (line {line}: {value})")]
    NegativeValue { column: &'static str, line: usize, value: f64 },

    #[error("CSV has no data rows")]
    Empty,
}

// ============================================================================
// CSV Splitting
// ============================================================================

/// Split one CSV record into fields. Commas inside quotes are kept and a
/// doubled quote inside a quoted field is a literal `"`.
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut just_closed = false;

    for ch in line.chars() {
        match (ch, quoted) {
            ('"', true) => quoted = false,
            ('"', false) => {
                if just_closed {
                    field.push('"');
                }
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
        just_closed = ch == '"' && !quoted;
    }
    fields.push(field);
    fields
}

// ============================================================================
// Column Mapping
// ============================================================================

/// Header name to column index
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    timestamp: usize,
    wind_speed: usize,
    gust: usize,
    rainfall: Option<usize>,
    fuel_dryness: Option<usize>,
    vulnerability: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, LoadError> {
        let columns: Vec<String> = csv_split(header)
            .into_iter()
            .map(|c| c.trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        let find = |name: &str| columns.iter().position(|c| c == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| find(name).is_none())
            .map(|name| (*name).to_string())
            .collect();

        match (find("timestamp"), find("wind_speed_ms"), find("gust_ms")) {
            (Some(timestamp), Some(wind_speed), Some(gust)) => Ok(Self {
                timestamp,
                wind_speed,
                gust,
                rainfall: find("rainfall_mm"),
                fuel_dryness: find("fuel_dryness_index"),
                vulnerability: find("infrastructure_vulnerability"),
            }),
            _ => Err(LoadError::MissingColumns(missing)),
        }
    }
}

// ============================================================================
// Field Parsing
// ============================================================================

/// Parse a timestamp string to UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS+HH:MM`, naive datetimes (taken as
/// UTC), and integer epoch seconds.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim().trim_matches('"');

    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Err("Empty timestamp".to_string());
    }

    if let Ok(epoch) = s.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp(epoch, 0)
            .ok_or_else(|| format!("Epoch out of range: '{s}'"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    // Without timezone (assume UTC)
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(format!("Cannot parse timestamp: '{s}'"))
}

/// Parse a numeric cell; blank, `nan`, `null` and `-` are missing.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") || s == "-" {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn required_number(fields: &[String], idx: usize, column: &'static str, line: usize) -> Result<f64, LoadError> {
    let raw = fields.get(idx).map_or("", String::as_str);
    let value = parse_number(raw).ok_or_else(|| LoadError::NotNumeric {
        line,
        column,
        value: raw.trim().to_string(),
    })?;
    if value < 0.0 {
        return Err(LoadError::NegativeValue { column, line, value });
    }
    Ok(value)
}

fn optional_number(fields: &[String], idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| fields.get(i)).and_then(|s| parse_number(s))
}

fn parse_row(fields: &[String], columns: &ColumnMap, line: usize) -> Result<HourlyObservation, LoadError> {
    let raw_ts = fields.get(columns.timestamp).map_or("", String::as_str);
    let timestamp = parse_timestamp(raw_ts).map_err(|message| LoadError::Timestamp { line, message })?;

    Ok(HourlyObservation {
        timestamp,
        wind_speed_ms: required_number(fields, columns.wind_speed, "wind_speed_ms", line)?,
        gust_ms: required_number(fields, columns.gust, "gust_ms", line)?,
        rainfall_mm: optional_number(fields, columns.rainfall),
        fuel_dryness_index: optional_number(fields, columns.fuel_dryness),
        infrastructure_vulnerability: optional_number(fields, columns.vulnerability),
    })
}

// ============================================================================
// Entry Points
// ============================================================================

/// Load from any buffered reader; `source` names the input in log lines.
pub fn load_from_reader<R: BufRead>(reader: R, source: &str) -> Result<Vec<HourlyObservation>, LoadError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, Ok(line))) if line.trim().is_empty() => continue,
            Some((_, Ok(line))) => break line,
            Some((_, Err(e))) => {
                return Err(LoadError::Io { path: PathBuf::from(source), source: e });
            }
            None => return Err(LoadError::Empty),
        }
    };
    let columns = ColumnMap::from_header(&header)?;

    // Keyed by timestamp: sorts the series and keeps the last duplicate
    let mut rows: BTreeMap<DateTime<Utc>, HourlyObservation> = BTreeMap::new();
    let mut duplicates = 0usize;

    for (idx, line_result) in lines {
        let line_num = idx + 1;
        let line = line_result.map_err(|e| LoadError::Io { path: PathBuf::from(source), source: e })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = csv_split(&line);
        let obs = parse_row(&fields, &columns, line_num)?;
        if rows.insert(obs.timestamp, obs).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        warn!(source = %source, duplicates, "Duplicate timestamps found, keeping the last row of each");
    }
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let observations: Vec<HourlyObservation> = rows.into_values().collect();
    if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
        info!(
            source = %source,
            rows = observations.len(),
            from = %first.timestamp.date_naive(),
            to = %last.timestamp.date_naive(),
            "Loaded hourly wind observations"
        );
    }
    Ok(observations)
}

/// Load and validate a wind-risk CSV file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<HourlyObservation>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| LoadError::Io { path: path.to_path_buf(), source: e })?;
    load_from_reader(BufReader::new(file), &path.display().to_string())
}
