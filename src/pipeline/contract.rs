//! Input contract checks for the hourly series
//!
//! The stages downstream are order-dependent: a single out-of-order or
//! non-finite row would shift every later cumulative sum and streak. These
//! checks run before any computation and abort the whole run on failure.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::HourlyObservation;

/// Contract violations in the series handed to the pipeline
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("Hourly series is empty")]
    EmptySeries,

    #[error("Timestamps must be strictly increasing: row {index} ({current}) does not follow {previous}")]
    NonMonotonicTimestamp {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("Non-finite {field} at row {index}: {value}")]
    NonFiniteValue {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Validate the hourly series: non-empty, strictly increasing timestamps,
/// finite wind and gust values.
pub fn validate_series(observations: &[HourlyObservation]) -> Result<(), PipelineError> {
    if observations.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    for (index, obs) in observations.iter().enumerate() {
        for (field, value) in [("wind_speed_ms", obs.wind_speed_ms), ("gust_ms", obs.gust_ms)] {
            if !value.is_finite() {
                return Err(PipelineError::NonFiniteValue { index, field, value });
            }
        }
    }

    for (offset, pair) in observations.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(PipelineError::NonMonotonicTimestamp {
                index: offset + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }

    Ok(())
}
