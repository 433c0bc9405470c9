//! Wind Compound Risk: multi-day wind stress and risk-state pipeline
//!
//! Turns an hourly wind series into per-day stress metrics, consecutive-day
//! streaks, and a three-level risk state.
//!
//! ## Architecture
//!
//! - **Acquisition**: CSV ingestion, timestamp normalization to UTC
//! - **Stress Engine**: hourly EWS/CWL/SHWe scoring, daily aggregation, streaks
//! - **Classifier**: Stable / Straining / Failure plus a continuous multiplier
//! - **Pipeline**: input contract checks and stage wiring
//! - **Report**: console summary, CSV and JSON exports
//! - **Sample Data**: seeded synthetic cyclone and fire-weather scenarios

pub mod acquisition;
pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod sample_data;
pub mod stress_engine;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, RiskConfig};

// Re-export commonly used types
pub use types::{
    DailyAggregate, DailyRecord, DayFlags, DayStreaks, HourlyObservation, HourlyRecord, HourlyStress,
    RiskAssessment, RiskState, StreakDay,
};

// Re-export stages
pub use classifier::{classify_risk_state, compute_risk_states, risk_multiplier};
pub use pipeline::{run, PipelineError, PipelineOutput, StateHistogram};
pub use stress_engine::{aggregate_daily, compute_hourly, track_streaks};

// Re-export I/O
pub use acquisition::LoadError;
pub use report::ReportError;
pub use sample_data::{GeneratorError, SampleDataset};
