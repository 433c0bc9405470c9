//! System-wide default constants.
//!
//! Values that are not risk thresholds (those live in `types::thresholds`
//! and `RiskConfig`), grouped by subsystem.

// ============================================================================
// Paths
// ============================================================================

/// Directory holding the sample CSV datasets.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Directory receiving report artefacts.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Suffix appended to the sanitised dataset label for the daily CSV.
pub const DAILY_CSV_SUFFIX: &str = "_daily_metrics.csv";

/// Suffix appended to the sanitised dataset label for the hourly CSV.
pub const HOURLY_CSV_SUFFIX: &str = "_hourly_metrics.csv";

/// Suffix appended to the sanitised dataset label for the JSON export.
pub const JSON_SUFFIX: &str = "_risk.json";

// ============================================================================
// Sample Data
// ============================================================================

/// Seed shared by the sample dataset generators.
pub const SAMPLE_SEED: u64 = 42;

/// Cyclone event: first day and length.
pub const CYCLONE_START: (i32, u32, u32) = (2024, 3, 1);
pub const CYCLONE_DAYS: u32 = 8;

/// Fire-weather period: first day and length.
pub const FIREWEATHER_START: (i32, u32, u32) = (2024, 11, 15);
pub const FIREWEATHER_DAYS: u32 = 7;

/// Wind and gust scale factor of the future scenario.
pub const FUTURE_WIND_SCALE: f64 = 1.10;

// ============================================================================
// Reporting
// ============================================================================

/// Width of the banner rule around summary tables.
pub const BANNER_WIDTH: usize = 70;
