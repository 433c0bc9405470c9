//! Risk Pipeline
//!
//! Wires the stages together:
//!
//! ```text
//! hourly observations ──▶ compute_hourly ──▶ aggregate_daily
//!                                              │
//!           DailyRecord ◀── compute_risk_states ◀── track_streaks
//! ```
//!
//! Every stage returns a new table, so intermediate results stay
//! inspectable. For a fixed config the whole run is a pure function of the
//! input series.

mod contract;

pub use contract::{validate_series, PipelineError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::compute_risk_states;
use crate::config::RiskConfig;
use crate::stress_engine::{aggregate_daily, compute_hourly, track_streaks};
use crate::types::{DailyRecord, HourlyObservation, HourlyRecord, RiskState};

/// Tables produced by one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Input rows plus EWS, CWL_hour, SHWe_hour
    pub hourly: Vec<HourlyRecord>,
    /// One classified row per UTC calendar date, chronological
    pub daily: Vec<DailyRecord>,
}

/// Day counts per risk state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistogram {
    pub stable: usize,
    pub straining: usize,
    pub failure: usize,
}

impl StateHistogram {
    pub fn from_days(days: &[DailyRecord]) -> Self {
        days.iter().fold(Self::default(), |mut h, day| {
            match day.risk_state {
                RiskState::Stable => h.stable += 1,
                RiskState::Straining => h.straining += 1,
                RiskState::Failure => h.failure += 1,
            }
            h
        })
    }

    pub fn total(&self) -> usize {
        self.stable + self.straining + self.failure
    }
}

impl PipelineOutput {
    pub fn state_histogram(&self) -> StateHistogram {
        StateHistogram::from_days(&self.daily)
    }

    /// Day with the highest risk multiplier (earliest on ties)
    pub fn peak_day(&self) -> Option<&DailyRecord> {
        self.daily.iter().reduce(|best, day| {
            if day.risk_multiplier > best.risk_multiplier {
                day
            } else {
                best
            }
        })
    }

    /// Longest compound streak reached anywhere in the series
    pub fn max_compound_streak(&self) -> u32 {
        self.daily
            .iter()
            .map(|d| d.streaks.consecutive_compound_cycles)
            .max()
            .unwrap_or(0)
    }

    /// Final cumulative (CWL, SHWe) totals
    pub fn totals(&self) -> (f64, f64) {
        self.daily
            .last()
            .map_or((0.0, 0.0), |d| (d.aggregate.cumulative_cwl, d.aggregate.cumulative_shwe))
    }
}

/// Run the full pipeline on a validated hourly series.
///
/// Fails fast on contract violations; no partial tables are returned.
pub fn run(observations: &[HourlyObservation], config: &RiskConfig) -> Result<PipelineOutput, PipelineError> {
    validate_series(observations)?;

    let hourly = compute_hourly(observations, &config.stress);
    debug!(rows = hourly.len(), "Hourly stress scored");

    let aggregates = aggregate_daily(&hourly, &config.stress, &config.aggregation);
    debug!(days = aggregates.len(), "Daily aggregates computed");

    let streak_days = track_streaks(&aggregates);
    let daily = compute_risk_states(&streak_days, &config.classifier);

    let output = PipelineOutput { hourly, daily };
    let histogram = output.state_histogram();
    info!(
        hours = output.hourly.len(),
        days = output.daily.len(),
        stable = histogram.stable,
        straining = histogram.straining,
        failure = histogram.failure,
        max_compound_streak = output.max_compound_streak(),
        "Risk pipeline complete"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn constant_days(days: i64, wind: f64) -> Vec<HourlyObservation> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        (0..days * 24)
            .map(|i| HourlyObservation::new(start + Duration::hours(i), wind, wind))
            .collect()
    }

    #[test]
    fn test_run_rejects_empty() {
        assert_eq!(run(&[], &RiskConfig::default()).unwrap_err(), PipelineError::EmptySeries);
    }

    #[test]
    fn test_calm_series_is_stable() {
        let output = run(&constant_days(3, 5.0), &RiskConfig::default()).unwrap();
        assert_eq!(output.daily.len(), 3);
        assert!(output.daily.iter().all(|d| d.risk_state == RiskState::Stable));
        assert!(output.daily.iter().all(|d| d.risk_multiplier == 1.0));
        assert_eq!(output.state_histogram(), StateHistogram { stable: 3, straining: 0, failure: 0 });
    }

    #[test]
    fn test_sustained_storm_escalates_to_failure() {
        // 25 m/s: daily CWL 120, SHWe 120 -> Failure on SHWe from day one
        let output = run(&constant_days(5, 25.0), &RiskConfig::default()).unwrap();
        assert!(output.daily.iter().all(|d| d.risk_state == RiskState::Failure));
        let cycles: Vec<u32> = output.daily.iter().map(|d| d.streaks.consecutive_compound_cycles).collect();
        assert_eq!(cycles, vec![1, 2, 3, 4, 5]);
        assert_eq!(output.max_compound_streak(), 5);
        // 1 + 120/80 + 120/40 + 5*0.5
        let last = output.daily.last().unwrap();
        assert!((last.risk_multiplier - 8.0).abs() < 1e-9);
        assert_eq!(output.peak_day().map(|d| d.date()), Some(last.date()));
    }

    #[test]
    fn test_risk_state_num_matches_state() {
        let output = run(&constant_days(2, 25.0), &RiskConfig::default()).unwrap();
        for day in &output.daily {
            assert_eq!(day.risk_state_num, day.risk_state.ordinal());
        }
    }

    #[test]
    fn test_totals_match_daily_sums() {
        let output = run(&constant_days(4, 22.0), &RiskConfig::default()).unwrap();
        let (cwl, shwe) = output.totals();
        let sum_cwl: f64 = output.daily.iter().map(|d| d.aggregate.daily_cwl).sum();
        let sum_shwe: f64 = output.daily.iter().map(|d| d.aggregate.daily_shwe).sum();
        assert!((cwl - sum_cwl).abs() < 1e-9);
        assert!((shwe - sum_shwe).abs() < 1e-9);
    }

    #[test]
    fn test_run_is_deterministic() {
        let series: Vec<HourlyObservation> = constant_days(6, 0.0)
            .into_iter()
            .enumerate()
            .map(|(i, mut o)| {
                o.wind_speed_ms = 10.0 + (i as f64 * 0.37).sin() * 15.0;
                o.gust_ms = o.wind_speed_ms * 1.3;
                o
            })
            .collect();
        let a = run(&series, &RiskConfig::default()).unwrap();
        let b = run(&series, &RiskConfig::default()).unwrap();
        assert_eq!(a.daily, b.daily);
        assert_eq!(a.hourly, b.hourly);
    }
}
