//! Stress Engine Module
//!
//! Deterministic wind-stress calculations. Pure arithmetic over the hourly
//! series, no fitted models.
//!
//! ## Stages
//! - `compute_hourly()` - EWS, CWL_hour, SHWe_hour per row (data parallel)
//! - `aggregate_daily()` - calendar-day sums, cumulative totals, day flags
//! - `track_streaks()` - consecutive-day counters for the four flags

pub mod aggregation;
pub mod hourly;
pub mod streaks;

pub use aggregation::{aggregate_daily, day_flags};
pub use hourly::{
    compute_hourly, cwl_hour, effective_wind_stress, score_hour, shwe_hour, RecoveryWindow,
};
pub use streaks::{streak, track_streaks};
