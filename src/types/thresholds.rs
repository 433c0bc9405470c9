//! Built-in stress baselines and risk thresholds
//!
//! These are the default values behind every `RiskConfig` section. The
//! aggregation flag thresholds and the classifier gates are separate sets of
//! constants and are not meant to be unified.

/// Per-hour stress scoring constants
pub mod stress_thresholds {
    /// Weight of the gust excess over sustained wind in EWS
    pub const GUST_WEIGHT: f64 = 0.3;
    /// Daytime load baseline (m/s); EWS above this accrues CWL
    pub const BASELINE_WIND: f64 = 20.0;
    /// Overnight recovery baseline (m/s); EWS above this accrues SHWe
    pub const BASELINE_RECOVERY: f64 = 10.0;
    /// UTC hours-of-day forming the overnight recovery window
    pub const RECOVERY_HOURS: [u32; 8] = [0, 1, 2, 3, 4, 5, 22, 23];
}

/// Calendar-day flag thresholds
pub mod aggregation_thresholds {
    /// daily_CWL above this marks a high-wind day
    pub const HIGH_WIND_DAY_CWL: f64 = 50.0;
    /// daily_SHWe above this marks a failed recovery night
    pub const FAILED_RECOVERY_NIGHT_SHWE: f64 = 20.0;
}

/// Risk state gates and escalation gauge scaling
pub mod risk_thresholds {
    // === Straining gate ===
    /// daily_CWL at or above this is Straining
    pub const CWL_STRAIN: f64 = 80.0;
    /// daily_SHWe at or above this is Straining
    pub const SHWE_STRAIN: f64 = 40.0;
    /// Compound streak at or above this is Straining
    pub const COMPOUND_STRAIN: u32 = 2;

    // === Failure gate (takes precedence) ===
    /// daily_CWL at or above this is Failure
    pub const CWL_FAIL: f64 = 160.0;
    /// daily_SHWe at or above this is Failure
    pub const SHWE_FAIL: f64 = 80.0;
    /// Compound streak at or above this is Failure
    pub const COMPOUND_FAIL: u32 = 4;

    // === Escalation gauge ===
    /// daily_CWL divisor in the risk multiplier
    pub const CWL_SCALE: f64 = 80.0;
    /// daily_SHWe divisor in the risk multiplier
    pub const SHWE_SCALE: f64 = 40.0;
    /// Multiplier increment per consecutive compound cycle
    pub const COMPOUND_WEIGHT: f64 = 0.5;
}
