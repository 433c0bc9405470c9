//! Risk Configuration - every stress baseline and risk gate as a TOML value
//!
//! Each section implements `Default` with values matching the built-in
//! constants in `types::thresholds`, so a run without a config file behaves
//! exactly like the built-in thresholds.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::{aggregation_thresholds, risk_thresholds, stress_thresholds};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WINDRISK_CONFIG";

/// Config file searched for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "risk_config.toml";

// ============================================================================
// Config Provenance
// ============================================================================

/// Which dotted keys were explicitly present in the user's TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvenance {
    pub explicit_keys: HashSet<String>,
}

impl ConfigProvenance {
    pub fn is_user_set(&self, dotted_key: &str) -> bool {
        self.explicit_keys.contains(dotted_key)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a risk analysis run.
///
/// Load with `RiskConfig::load()` which searches:
/// 1. `$WINDRISK_CONFIG` env var
/// 2. `./risk_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Dataset identification
    #[serde(default)]
    pub dataset: DatasetInfo,

    /// Per-hour stress scoring
    #[serde(default)]
    pub stress: StressConfig,

    /// Calendar-day flag thresholds
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Risk state gates and escalation gauge
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Report outputs
    #[serde(default)]
    pub output: OutputConfig,
}

impl RiskConfig {
    /// Load configuration using the standard search order, falling back to
    /// defaults when a candidate file is missing or invalid.
    pub fn load() -> Self {
        Self::load_with_source().0
    }

    /// Same as `load()` but also reports which source won.
    pub fn load_with_source() -> (Self, ConfigSource) {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), dataset = %config.dataset.label, "Loaded risk config from {}", CONFIG_ENV_VAR);
                        return (config, ConfigSource::File(p));
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./risk_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(dataset = %config.dataset.label, "Loaded risk config from ./{}", LOCAL_CONFIG_FILE);
                    return (config, ConfigSource::File(local));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        (Self::default(), ConfigSource::Defaults)
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let (config, _provenance) = Self::load_from_file_with_provenance(path)?;
        Ok(config)
    }

    /// Load from a specific TOML file path, also returning which keys the
    /// file set explicitly.
    pub fn load_from_file_with_provenance(
        path: &Path,
    ) -> Result<(Self, ConfigProvenance), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<(Self, ConfigProvenance), ConfigError> {
        // Two-pass: unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let provenance = ConfigProvenance {
            explicit_keys: super::validation::walk_toml_keys(
                &contents
                    .parse::<toml::Value>()
                    .unwrap_or(toml::Value::Table(toml::map::Map::new())),
                "",
            )
            .into_iter()
            .collect(),
        };

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok((config, provenance))
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file (e.g. to dump the effective defaults).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Risk config saved");
        Ok(())
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Failure gates must be >= Straining gates
    /// - Escalation gauge scales must be positive (used as divisors)
    /// - Recovery hours must be valid hours-of-day
    /// - Every value must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        let mut errors: Vec<String> = Vec::new();

        Self::check_escalation(c.cwl_strain, c.cwl_failure, "classifier.cwl", &mut errors);
        Self::check_escalation(c.shwe_strain, c.shwe_failure, "classifier.shwe", &mut errors);
        if c.compound_failure < c.compound_strain {
            errors.push(format!(
                "classifier.compound: failure ({}) must be >= strain ({})",
                c.compound_failure, c.compound_strain
            ));
        }

        if !(c.cwl_scale > 0.0) {
            errors.push(format!("classifier.cwl_scale = {} must be > 0 (used as divisor)", c.cwl_scale));
        }
        if !(c.shwe_scale > 0.0) {
            errors.push(format!("classifier.shwe_scale = {} must be > 0 (used as divisor)", c.shwe_scale));
        }
        if !(c.compound_weight > 0.0) {
            errors.push(format!("classifier.compound_weight = {} must be > 0", c.compound_weight));
        }

        if self.stress.recovery_hours.is_empty() {
            errors.push("stress.recovery_hours must name at least one hour".to_string());
        }
        for &hour in &self.stress.recovery_hours {
            if hour > 23 {
                errors.push(format!("stress.recovery_hours contains {hour}, expected 0-23"));
            }
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Reject NaN/Inf anywhere in the numeric fields
        let finite_checks = [
            ("stress.gust_weight", self.stress.gust_weight),
            ("stress.baseline_wind_ms", self.stress.baseline_wind_ms),
            ("stress.baseline_recovery_ms", self.stress.baseline_recovery_ms),
            ("aggregation.high_wind_day_cwl", self.aggregation.high_wind_day_cwl),
            ("aggregation.failed_recovery_night_shwe", self.aggregation.failed_recovery_night_shwe),
            ("classifier.compound_weight", c.compound_weight),
            ("classifier.cwl_scale", c.cwl_scale),
            ("classifier.shwe_scale", c.shwe_scale),
        ];
        for (name, value) in finite_checks {
            if !value.is_finite() {
                errors.push(format!("{name} must be a finite number (got {value})"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(strain: f64, failure: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, catch them explicitly
        if !strain.is_finite() || !failure.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got strain={strain}, failure={failure})"
            ));
            return;
        }
        if failure < strain {
            errors.push(format!(
                "{name}: failure ({failure:.3}) must be >= strain ({strain:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Dataset Info
// ============================================================================

/// Identification metadata, used only in logs and report file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_label() -> String {
    "Custom Dataset".to_string()
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self { label: default_label() }
    }
}

// ============================================================================
// Stress
// ============================================================================

/// Per-hour stress scoring: EWS blend, baselines, recovery window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressConfig {
    /// Weight of (gust - wind) added to sustained wind in EWS
    #[serde(default = "default_gust_weight")]
    pub gust_weight: f64,

    /// EWS above this accrues CWL (m/s)
    #[serde(default = "default_baseline_wind")]
    pub baseline_wind_ms: f64,

    /// EWS above this accrues SHWe inside the recovery window (m/s)
    #[serde(default = "default_baseline_recovery")]
    pub baseline_recovery_ms: f64,

    /// UTC hours-of-day forming the recovery window
    #[serde(default = "default_recovery_hours")]
    pub recovery_hours: Vec<u32>,
}

fn default_gust_weight() -> f64 { stress_thresholds::GUST_WEIGHT }
fn default_baseline_wind() -> f64 { stress_thresholds::BASELINE_WIND }
fn default_baseline_recovery() -> f64 { stress_thresholds::BASELINE_RECOVERY }
fn default_recovery_hours() -> Vec<u32> { stress_thresholds::RECOVERY_HOURS.to_vec() }

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            gust_weight: default_gust_weight(),
            baseline_wind_ms: default_baseline_wind(),
            baseline_recovery_ms: default_baseline_recovery(),
            recovery_hours: default_recovery_hours(),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Calendar-day flag thresholds (distinct from the classifier gates)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// daily_CWL strictly above this marks a high-wind day
    #[serde(default = "default_high_wind_day_cwl")]
    pub high_wind_day_cwl: f64,

    /// daily_SHWe strictly above this marks a failed recovery night
    #[serde(default = "default_failed_recovery_night_shwe")]
    pub failed_recovery_night_shwe: f64,
}

fn default_high_wind_day_cwl() -> f64 { aggregation_thresholds::HIGH_WIND_DAY_CWL }
fn default_failed_recovery_night_shwe() -> f64 { aggregation_thresholds::FAILED_RECOVERY_NIGHT_SHWE }

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            high_wind_day_cwl: default_high_wind_day_cwl(),
            failed_recovery_night_shwe: default_failed_recovery_night_shwe(),
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Risk state gates and escalation gauge scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_cwl_strain")]
    pub cwl_strain: f64,
    #[serde(default = "default_cwl_failure")]
    pub cwl_failure: f64,
    #[serde(default = "default_shwe_strain")]
    pub shwe_strain: f64,
    #[serde(default = "default_shwe_failure")]
    pub shwe_failure: f64,
    #[serde(default = "default_compound_strain")]
    pub compound_strain: u32,
    #[serde(default = "default_compound_failure")]
    pub compound_failure: u32,

    /// risk_multiplier adds daily_CWL / cwl_scale
    #[serde(default = "default_cwl_scale")]
    pub cwl_scale: f64,
    /// risk_multiplier adds daily_SHWe / shwe_scale
    #[serde(default = "default_shwe_scale")]
    pub shwe_scale: f64,
    /// risk_multiplier adds compound streak * compound_weight
    #[serde(default = "default_compound_weight")]
    pub compound_weight: f64,
}

fn default_cwl_strain() -> f64 { risk_thresholds::CWL_STRAIN }
fn default_cwl_failure() -> f64 { risk_thresholds::CWL_FAIL }
fn default_shwe_strain() -> f64 { risk_thresholds::SHWE_STRAIN }
fn default_shwe_failure() -> f64 { risk_thresholds::SHWE_FAIL }
fn default_compound_strain() -> u32 { risk_thresholds::COMPOUND_STRAIN }
fn default_compound_failure() -> u32 { risk_thresholds::COMPOUND_FAIL }
fn default_cwl_scale() -> f64 { risk_thresholds::CWL_SCALE }
fn default_shwe_scale() -> f64 { risk_thresholds::SHWE_SCALE }
fn default_compound_weight() -> f64 { risk_thresholds::COMPOUND_WEIGHT }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cwl_strain: default_cwl_strain(),
            cwl_failure: default_cwl_failure(),
            shwe_strain: default_shwe_strain(),
            shwe_failure: default_shwe_failure(),
            compound_strain: default_compound_strain(),
            compound_failure: default_compound_failure(),
            cwl_scale: default_cwl_scale(),
            shwe_scale: default_shwe_scale(),
            compound_weight: default_compound_weight(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Which report artefacts to write and where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_true")]
    pub write_daily_csv: bool,
    #[serde(default)]
    pub write_hourly_csv: bool,
    #[serde(default)]
    pub write_json: bool,
    /// Embed the hourly table in the JSON export. Independent of `write_hourly_csv`.
    #[serde(default)]
    pub json_include_hourly: bool,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(super::defaults::DEFAULT_OUTPUT_DIR)
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_daily_csv: true,
            write_hourly_csv: false,
            write_json: false,
            json_include_hourly: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
