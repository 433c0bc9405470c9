//! Reporting: console summary and file exports

mod summary;
mod writer;

pub use summary::{banner, render_summary, render_table};
pub use writer::{sanitize_label, write_all, write_daily_csv, write_hourly_csv, write_json, DAILY_COLUMNS};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
