//! Risk Configuration Module
//!
//! Loads stress baselines and risk gates from TOML, replacing the built-in
//! constants with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `WINDRISK_CONFIG` environment variable (path to TOML file)
//! 2. `risk_config.toml` in the current working directory
//! 3. Built-in defaults (`types::thresholds`)
//!
//! ## Usage
//!
//! The pipeline functions take `&RiskConfig` explicitly. Binaries may also
//! publish the config once for code that has no natural way to receive it:
//!
//! ```ignore
//! // In main():
//! config::init(RiskConfig::load());
//!
//! // Anywhere:
//! let gate = config::get().classifier.cwl_failure;
//! ```

mod risk_config;
pub mod defaults;
pub mod validation;

pub use risk_config::*;

use std::sync::OnceLock;

/// Global risk configuration, initialized once at startup.
static RISK_CONFIG: OnceLock<RiskConfig> = OnceLock::new();

/// Initialize the global risk configuration.
///
/// A second call is ignored with a warning.
pub fn init(config: RiskConfig) {
    if RISK_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global risk configuration.
///
/// Panics if `init()` has not been called. A missing config is a startup
/// bug, not a recoverable condition.
#[allow(clippy::expect_used)]
pub fn get() -> &'static RiskConfig {
    RISK_CONFIG
        .get()
        .expect("config::get() called before config::init(), this is a startup bug")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    RISK_CONFIG.get().is_some()
}
