//! Wind data acquisition module
//!
//! Handles ingestion of hourly wind series from CSV files.

pub mod csv_loader;

pub use csv_loader::{load, load_from_reader, parse_timestamp, LoadError};
