//! Calendar-day tables: aggregates, streak counters, and the final classified day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RiskState;

// ============================================================================
// Stage 2: Aggregation
// ============================================================================

/// Boolean day conditions derived during aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    /// Max EWS inside the recovery window exceeded the recovery baseline
    pub no_recovery_day: bool,
    /// daily_CWL above the high-wind threshold
    pub high_wind_day: bool,
    /// daily_SHWe above the failed-night threshold
    pub failed_recovery_night: bool,
    /// high_wind_day AND failed_recovery_night
    pub compound: bool,
}

/// One calendar date of aggregated hourly scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// UTC calendar date
    pub date: NaiveDate,
    /// Hours present for this date
    pub hours: u32,
    #[serde(rename = "daily_CWL")]
    pub daily_cwl: f64,
    #[serde(rename = "daily_SHWe")]
    pub daily_shwe: f64,
    /// Running total of daily_cwl up to and including this date
    #[serde(rename = "cumulative_CWL")]
    pub cumulative_cwl: f64,
    /// Running total of daily_shwe up to and including this date
    #[serde(rename = "cumulative_SHWe")]
    pub cumulative_shwe: f64,
    /// Max EWS among recovery-window hours (0.0 when none are present)
    #[serde(rename = "max_recovery_EWS")]
    pub max_recovery_ews: f64,
    #[serde(flatten)]
    pub flags: DayFlags,
}

// ============================================================================
// Stage 3: Streaks
// ============================================================================

/// Consecutive-day counters, one per boolean flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStreaks {
    pub consecutive_no_recovery_days: u32,
    pub consecutive_high_wind_days: u32,
    pub consecutive_failed_recovery_nights: u32,
    pub consecutive_compound_cycles: u32,
}

/// Aggregate with its streak counters attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakDay {
    #[serde(flatten)]
    pub aggregate: DailyAggregate,
    #[serde(flatten)]
    pub streaks: DayStreaks,
}

// ============================================================================
// Stage 4: Classification
// ============================================================================

/// Per-day classifier output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_state: RiskState,
    /// Continuous escalation gauge, >= 1.0
    pub risk_multiplier: f64,
}

/// Final row of the daily table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(flatten)]
    pub aggregate: DailyAggregate,
    #[serde(flatten)]
    pub streaks: DayStreaks,
    pub risk_state: RiskState,
    /// Ordinal encoding of `risk_state` for plotting
    pub risk_state_num: u8,
    pub risk_multiplier: f64,
}

impl DailyRecord {
    pub fn new(day: StreakDay, assessment: RiskAssessment) -> Self {
        Self {
            aggregate: day.aggregate,
            streaks: day.streaks,
            risk_state: assessment.risk_state,
            risk_state_num: assessment.risk_state.ordinal(),
            risk_multiplier: assessment.risk_multiplier,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.aggregate.date
    }

    pub fn flags(&self) -> &DayFlags {
        &self.aggregate.flags
    }
}
