//! Hourly stress scoring: EWS, CWL_hour, SHWe_hour

use rayon::prelude::*;

use crate::config::StressConfig;
use crate::types::{HourlyObservation, HourlyRecord, HourlyStress};

// ============================================================================
// Recovery Window
// ============================================================================

/// Set of UTC hours-of-day designated for overnight recovery.
///
/// An explicit hour predicate, not a rolling window: the default set wraps
/// midnight (`22-23` and `0-5`) while day aggregation splits at midnight, so
/// one physical night contributes to two calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryWindow {
    mask: [bool; 24],
}

impl RecoveryWindow {
    /// Build from a list of hours; values above 23 are ignored.
    pub fn from_hours(hours: &[u32]) -> Self {
        let mut mask = [false; 24];
        for &h in hours {
            if let Some(slot) = mask.get_mut(h as usize) {
                *slot = true;
            }
        }
        Self { mask }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.mask.get(hour as usize).copied().unwrap_or(false)
    }

    /// Hours in the window, ascending
    pub fn hours(&self) -> Vec<u32> {
        (0u32..24).filter(|&h| self.contains(h)).collect()
    }
}

impl Default for RecoveryWindow {
    fn default() -> Self {
        Self::from_hours(&crate::types::stress_thresholds::RECOVERY_HOURS)
    }
}

impl StressConfig {
    pub fn recovery_window(&self) -> RecoveryWindow {
        RecoveryWindow::from_hours(&self.recovery_hours)
    }
}

// ============================================================================
// Per-Hour Scores
// ============================================================================

/// Effective Wind Stress: sustained wind plus a weighted share of the gust excess.
///
/// `EWS = wind + gust_weight * (gust - wind)`. A gust below the sustained
/// wind pulls EWS under the wind speed; that is tolerated, not rejected.
pub fn effective_wind_stress(wind_speed_ms: f64, gust_ms: f64, gust_weight: f64) -> f64 {
    wind_speed_ms + gust_weight * (gust_ms - wind_speed_ms)
}

/// Hourly CWL contribution: EWS above the load baseline, clipped at zero.
pub fn cwl_hour(ews: f64, baseline_wind_ms: f64) -> f64 {
    (ews - baseline_wind_ms).max(0.0)
}

/// Hourly SHWe contribution: EWS above the recovery baseline, clipped at
/// zero, and only inside the recovery window.
pub fn shwe_hour(ews: f64, hour: u32, window: &RecoveryWindow, baseline_recovery_ms: f64) -> f64 {
    if window.contains(hour) {
        (ews - baseline_recovery_ms).max(0.0)
    } else {
        0.0
    }
}

/// Score a single observation.
pub fn score_hour(obs: &HourlyObservation, config: &StressConfig, window: &RecoveryWindow) -> HourlyStress {
    let ews = effective_wind_stress(obs.wind_speed_ms, obs.gust_ms, config.gust_weight);
    HourlyStress {
        ews,
        cwl_hour: cwl_hour(ews, config.baseline_wind_ms),
        shwe_hour: shwe_hour(ews, obs.hour_of_day(), window, config.baseline_recovery_ms),
    }
}

/// Derive EWS, CWL_hour and SHWe_hour for every row.
///
/// Rows are independent, so scoring runs on the rayon pool; `collect`
/// keeps input order, making the result identical to a sequential pass.
pub fn compute_hourly(observations: &[HourlyObservation], config: &StressConfig) -> Vec<HourlyRecord> {
    let window = config.recovery_window();
    observations
        .par_iter()
        .map(|obs| HourlyRecord {
            observation: obs.clone(),
            stress: score_hour(obs, config, &window),
        })
        .collect()
}
