//! Shared data model for the wind compound risk pipeline
//!
//! Split by pipeline stage:
//! - `hourly`: raw observations and per-hour stress scores
//! - `daily`: calendar-day aggregates, streaks, and classified days
//! - `state`: the `RiskState` ordinal
//! - `thresholds`: built-in baselines and gates

mod daily;
mod hourly;
mod state;
pub mod thresholds;

pub use daily::*;
pub use hourly::*;
pub use state::*;
pub use thresholds::{aggregation_thresholds, risk_thresholds, stress_thresholds};
