//! Consecutive-day streak tracking over the four day flags

use crate::types::{DailyAggregate, DayFlags, DayStreaks, StreakDay};

/// Running count of consecutive `true` values, reset to 0 on `false`.
///
/// The value before the first element is 0, so a leading `true` yields 1.
pub fn streak<I>(series: I) -> Vec<u32>
where
    I: IntoIterator<Item = bool>,
{
    series
        .into_iter()
        .scan(0u32, |count, value| {
            *count = if value { *count + 1 } else { 0 };
            Some(*count)
        })
        .collect()
}

/// Advance one counter by one day.
fn step(previous: u32, flag: bool) -> u32 {
    if flag {
        previous + 1
    } else {
        0
    }
}

impl DayStreaks {
    /// Streak counters for a day, given the previous day's counters.
    pub fn advance(&self, flags: &DayFlags) -> Self {
        Self {
            consecutive_no_recovery_days: step(self.consecutive_no_recovery_days, flags.no_recovery_day),
            consecutive_high_wind_days: step(self.consecutive_high_wind_days, flags.high_wind_day),
            consecutive_failed_recovery_nights: step(
                self.consecutive_failed_recovery_nights,
                flags.failed_recovery_night,
            ),
            consecutive_compound_cycles: step(self.consecutive_compound_cycles, flags.compound),
        }
    }
}

/// Attach the four streak counters to each day in a single ordered pass.
///
/// Days must already be in chronological order. Each series is tracked
/// independently; a gap in dates does not reset a streak, only a `false`
/// flag does.
pub fn track_streaks(days: &[DailyAggregate]) -> Vec<StreakDay> {
    days.iter()
        .scan(DayStreaks::default(), |carry, day| {
            *carry = carry.advance(&day.flags);
            Some(StreakDay {
                aggregate: day.clone(),
                streaks: *carry,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(offset: u32, flags: DayFlags) -> DailyAggregate {
        DailyAggregate {
            date: NaiveDate::from_ymd_opt(2024, 3, 1 + offset).unwrap(),
            hours: 24,
            daily_cwl: 0.0,
            daily_shwe: 0.0,
            cumulative_cwl: 0.0,
            cumulative_shwe: 0.0,
            max_recovery_ews: 0.0,
            flags,
        }
    }

    fn compound(value: bool) -> DayFlags {
        DayFlags {
            no_recovery_day: value,
            high_wind_day: value,
            failed_recovery_night: value,
            compound: value,
        }
    }

    #[test]
    fn test_streak_basic() {
        assert_eq!(streak([true, true, false]), vec![1, 2, 0]);
        assert_eq!(streak([false, true, true, true, false, true]), vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_streak_empty() {
        assert!(streak(Vec::<bool>::new()).is_empty());
    }

    #[test]
    fn test_streak_recurrence_property() {
        let series: Vec<bool> = (0..200).map(|i| (i * 7 + i / 3) % 5 != 0).collect();
        let counts = streak(series.iter().copied());
        for (i, &flag) in series.iter().enumerate() {
            let expected = match (flag, i) {
                (false, _) => 0,
                (true, 0) => 1,
                (true, _) => counts[i - 1] + 1,
            };
            assert_eq!(counts[i], expected, "position {i}");
        }
    }

    #[test]
    fn test_track_streaks_compound_cycles() {
        let days = vec![day(0, compound(true)), day(1, compound(true)), day(2, compound(false))];
        let tracked = track_streaks(&days);
        let cycles: Vec<u32> = tracked.iter().map(|d| d.streaks.consecutive_compound_cycles).collect();
        assert_eq!(cycles, vec![1, 2, 0]);
    }

    #[test]
    fn test_date_gap_does_not_reset_streak() {
        // Mar 1, Mar 2, then nothing until Mar 5
        let days = vec![day(0, compound(true)), day(1, compound(true)), day(4, compound(true))];
        let tracked = track_streaks(&days);
        let cycles: Vec<u32> = tracked.iter().map(|d| d.streaks.consecutive_compound_cycles).collect();
        assert_eq!(cycles, vec![1, 2, 3]);
        assert_eq!(tracked[2].streaks.consecutive_high_wind_days, 3);
    }

    #[test]
    fn test_series_are_independent() {
        let flags = [
            DayFlags { no_recovery_day: true, high_wind_day: true, failed_recovery_night: false, compound: false },
            DayFlags { no_recovery_day: true, high_wind_day: false, failed_recovery_night: true, compound: false },
            DayFlags { no_recovery_day: false, high_wind_day: true, failed_recovery_night: true, compound: true },
        ];
        let days: Vec<DailyAggregate> = flags.iter().enumerate().map(|(i, f)| day(i as u32, *f)).collect();
        let s: Vec<DayStreaks> = track_streaks(&days).into_iter().map(|d| d.streaks).collect();

        assert_eq!(s.iter().map(|x| x.consecutive_no_recovery_days).collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(s.iter().map(|x| x.consecutive_high_wind_days).collect::<Vec<_>>(), vec![1, 0, 1]);
        assert_eq!(s.iter().map(|x| x.consecutive_failed_recovery_nights).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(s.iter().map(|x| x.consecutive_compound_cycles).collect::<Vec<_>>(), vec![0, 0, 1]);
    }

    #[test]
    fn test_track_streaks_matches_streak_helper() {
        let pattern = [true, false, true, true, true, false, false, true];
        let days: Vec<DailyAggregate> = pattern.iter().enumerate().map(|(i, &v)| day(i as u32, compound(v))).collect();
        let tracked: Vec<u32> = track_streaks(&days).iter().map(|d| d.streaks.consecutive_high_wind_days).collect();
        assert_eq!(tracked, streak(pattern));
    }
}
