//! Calendar-day aggregation of hourly stress scores
//!
//! Rows are grouped by the UTC calendar date of their timestamp, never by a
//! rolling 24 h window. Sums accumulate in input (chronological) order so the
//! cumulative columns are reproducible bit-for-bit.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::hourly::RecoveryWindow;
use crate::config::{AggregationConfig, StressConfig};
use crate::types::{DailyAggregate, DayFlags, HourlyRecord};

/// Per-date running sums while scanning the hourly table
#[derive(Debug, Default)]
struct DayAccumulator {
    hours: u32,
    cwl: f64,
    shwe: f64,
    /// None until a recovery-window hour is seen
    max_recovery_ews: Option<f64>,
}

impl DayAccumulator {
    fn push(&mut self, record: &HourlyRecord, window: &RecoveryWindow) {
        self.hours += 1;
        self.cwl += record.stress.cwl_hour;
        self.shwe += record.stress.shwe_hour;
        if window.contains(record.hour_of_day()) {
            let ews = record.stress.ews;
            self.max_recovery_ews = Some(self.max_recovery_ews.map_or(ews, |m| m.max(ews)));
        }
    }
}

/// Prefix-sum carry threaded through the ordered date sequence
#[derive(Debug, Clone, Copy, Default)]
struct CumulativeCarry {
    cwl: f64,
    shwe: f64,
}

/// Derive the day flags from a date's sums.
///
/// A date without any recovery-window hours has its max EWS treated as 0,
/// so `no_recovery_day` is false rather than undefined.
pub fn day_flags(
    daily_cwl: f64,
    daily_shwe: f64,
    max_recovery_ews: f64,
    baseline_recovery_ms: f64,
    thresholds: &AggregationConfig,
) -> DayFlags {
    let high_wind_day = daily_cwl > thresholds.high_wind_day_cwl;
    let failed_recovery_night = daily_shwe > thresholds.failed_recovery_night_shwe;
    DayFlags {
        no_recovery_day: max_recovery_ews > baseline_recovery_ms,
        high_wind_day,
        failed_recovery_night,
        compound: high_wind_day && failed_recovery_night,
    }
}

/// Group hourly records by UTC calendar date and compute daily sums,
/// cumulative totals and the four day flags.
///
/// Output is one row per date present in the input, ascending. Dates with
/// no rows are absent, never zero-filled.
pub fn aggregate_daily(
    hourly: &[HourlyRecord],
    stress: &StressConfig,
    thresholds: &AggregationConfig,
) -> Vec<DailyAggregate> {
    let window = stress.recovery_window();

    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for record in hourly {
        days.entry(record.timestamp().date_naive())
            .or_default()
            .push(record, &window);
    }

    days.into_iter()
        .scan(CumulativeCarry::default(), |carry, (date, acc)| {
            carry.cwl += acc.cwl;
            carry.shwe += acc.shwe;
            let max_recovery_ews = acc.max_recovery_ews.unwrap_or(0.0);
            Some(DailyAggregate {
                date,
                hours: acc.hours,
                daily_cwl: acc.cwl,
                daily_shwe: acc.shwe,
                cumulative_cwl: carry.cwl,
                cumulative_shwe: carry.shwe,
                max_recovery_ews,
                flags: day_flags(
                    acc.cwl,
                    acc.shwe,
                    max_recovery_ews,
                    stress.baseline_recovery_ms,
                    thresholds,
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress_engine::compute_hourly;
    use crate::types::HourlyObservation;
    use chrono::{Duration, TimeZone, Utc};

    fn series(start_day: u32, hours: usize, wind: impl Fn(usize) -> f64) -> Vec<HourlyObservation> {
        let start = Utc.with_ymd_and_hms(2024, 3, start_day, 0, 0, 0).unwrap();
        (0..hours)
            .map(|i| {
                let w = wind(i);
                HourlyObservation::new(start + Duration::hours(i as i64), w, w)
            })
            .collect()
    }

    fn run(observations: &[HourlyObservation]) -> Vec<DailyAggregate> {
        let stress = StressConfig::default();
        let hourly = compute_hourly(observations, &stress);
        aggregate_daily(&hourly, &stress, &AggregationConfig::default())
    }

    #[test]
    fn test_groups_by_calendar_date() {
        let days = run(&series(1, 72, |_| 5.0));
        assert_eq!(days.len(), 3);
        assert!(days.iter().all(|d| d.hours == 24));
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[2].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_daily_sums_and_cumulative() {
        // 25 m/s all day: CWL_hour = 5, SHWe_hour = 15 for the 8 window hours
        let days = run(&series(1, 48, |_| 25.0));
        assert!((days[0].daily_cwl - 120.0).abs() < 1e-9);
        assert!((days[0].daily_shwe - 120.0).abs() < 1e-9);
        assert!((days[1].cumulative_cwl - 240.0).abs() < 1e-9);
        assert!((days[1].cumulative_shwe - 240.0).abs() < 1e-9);
        assert!(days[0].flags.high_wind_day);
        assert!(days[0].flags.failed_recovery_night);
        assert!(days[0].flags.compound);
        assert!(days[0].flags.no_recovery_day);
    }

    #[test]
    fn test_cumulative_non_decreasing_and_totals() {
        let days = run(&series(1, 24 * 5, |i| 10.0 + (i % 37) as f64));
        for pair in days.windows(2) {
            assert!(pair[1].cumulative_cwl >= pair[0].cumulative_cwl);
            assert!(pair[1].cumulative_shwe >= pair[0].cumulative_shwe);
        }
        let total: f64 = days.iter().map(|d| d.daily_cwl).sum();
        let last = days.last().unwrap();
        assert!((last.cumulative_cwl - total).abs() < 1e-9);
    }

    #[test]
    fn test_partial_day_without_recovery_hours() {
        // 08:00-19:00 only: no recovery-window hours present
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let observations: Vec<HourlyObservation> = (0..12)
            .map(|i| HourlyObservation::new(start + Duration::hours(i), 40.0, 40.0))
            .collect();
        let days = run(&observations);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].max_recovery_ews, 0.0);
        assert!(!days[0].flags.no_recovery_day);
        assert_eq!(days[0].daily_shwe, 0.0);
    }

    #[test]
    fn test_overnight_window_splits_across_dates() {
        // Strong wind only from 22:00 on day 1 to 05:00 on day 2
        let days = run(&series(1, 48, |i| if (22..30).contains(&i) { 30.0 } else { 0.0 }));
        // Day 1 sees 22-23 (2 h * 20), day 2 sees 0-5 (6 h * 20)
        assert!((days[0].daily_shwe - 40.0).abs() < 1e-9);
        assert!((days[1].daily_shwe - 120.0).abs() < 1e-9);
        assert!(days[0].flags.no_recovery_day);
        assert!(days[1].flags.no_recovery_day);
    }

    #[test]
    fn test_gap_dates_are_absent() {
        let mut observations = series(1, 24, |_| 5.0);
        observations.extend(series(4, 24, |_| 5.0));
        let days = run(&observations);
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_flag_thresholds_are_strict() {
        let config = AggregationConfig::default();
        let at = day_flags(50.0, 20.0, 10.0, 10.0, &config);
        assert!(!at.high_wind_day);
        assert!(!at.failed_recovery_night);
        assert!(!at.no_recovery_day);
        let above = day_flags(50.1, 20.1, 10.1, 10.0, &config);
        assert!(above.high_wind_day && above.failed_recovery_night && above.compound);
        assert!(above.no_recovery_day);
    }
}
