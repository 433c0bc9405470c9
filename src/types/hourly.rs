//! Hourly wind observations and their derived stress scores

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Raw Observation
// ============================================================================

/// One row of the hourly input series, as handed over by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    /// Observation instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Sustained wind speed (m/s)
    pub wind_speed_ms: f64,
    /// Peak gust (m/s)
    pub gust_ms: f64,
    /// Rainfall (mm), carried through unscored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_mm: Option<f64>,
    /// Fuel dryness index (0-1), carried through unscored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_dryness_index: Option<f64>,
    /// Infrastructure vulnerability (0-1), carried through unscored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_vulnerability: Option<f64>,
}

impl HourlyObservation {
    /// Observation with only the required wind columns
    pub fn new(timestamp: DateTime<Utc>, wind_speed_ms: f64, gust_ms: f64) -> Self {
        Self {
            timestamp,
            wind_speed_ms,
            gust_ms,
            rainfall_mm: None,
            fuel_dryness_index: None,
            infrastructure_vulnerability: None,
        }
    }

    /// UTC hour-of-day (0-23)
    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }
}

// ============================================================================
// Derived Scores
// ============================================================================

/// The three per-hour stress scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyStress {
    /// Effective Wind Stress (m/s)
    #[serde(rename = "EWS")]
    pub ews: f64,
    /// Hourly contribution to Cumulative Wind Load
    #[serde(rename = "CWL_hour")]
    pub cwl_hour: f64,
    /// Hourly Sustained High-Wind Excess (recovery window only)
    #[serde(rename = "SHWe_hour")]
    pub shwe_hour: f64,
}

/// Observation plus derived scores: one row of the hourly output table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(flatten)]
    pub observation: HourlyObservation,
    #[serde(flatten)]
    pub stress: HourlyStress,
}

impl HourlyRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.observation.timestamp
    }

    pub fn hour_of_day(&self) -> u32 {
        self.observation.hour_of_day()
    }
}
