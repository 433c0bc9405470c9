//! Risk classification and the nonlinear escalation gauge
//!
//! Each day is classified independently from its own aggregates and its own
//! compound streak. Day-to-day memory lives in the streak counters, not here.
//!
//! ## Gates (priority order, first match wins)
//! 1. Failure: CWL >= 160 OR SHWe >= 80 OR compound streak >= 4
//! 2. Straining: CWL >= 80 OR SHWe >= 40 OR compound streak >= 2
//! 3. Stable otherwise
//!
//! ## Escalation gauge
//! `risk_multiplier = 1 + CWL/80 + SHWe/40 + streak * 0.5`

use crate::config::ClassifierConfig;
use crate::types::{DailyRecord, RiskAssessment, RiskState, StreakDay};

/// Risk state for a single day.
pub fn classify_risk_state(cwl: f64, shwe: f64, compound_streak: u32, gates: &ClassifierConfig) -> RiskState {
    if cwl >= gates.cwl_failure || shwe >= gates.shwe_failure || compound_streak >= gates.compound_failure {
        return RiskState::Failure;
    }
    if cwl >= gates.cwl_strain || shwe >= gates.shwe_strain || compound_streak >= gates.compound_strain {
        return RiskState::Straining;
    }
    RiskState::Stable
}

/// Continuous escalation score, 1.0 on a calm day and unbounded above.
pub fn risk_multiplier(cwl: f64, shwe: f64, compound_streak: u32, gates: &ClassifierConfig) -> f64 {
    1.0 + cwl / gates.cwl_scale
        + shwe / gates.shwe_scale
        + f64::from(compound_streak) * gates.compound_weight
}

/// State and multiplier together.
pub fn assess(cwl: f64, shwe: f64, compound_streak: u32, gates: &ClassifierConfig) -> RiskAssessment {
    RiskAssessment {
        risk_state: classify_risk_state(cwl, shwe, compound_streak, gates),
        risk_multiplier: risk_multiplier(cwl, shwe, compound_streak, gates),
    }
}

/// Classify every day, appending state, ordinal and multiplier.
pub fn compute_risk_states(days: &[StreakDay], gates: &ClassifierConfig) -> Vec<DailyRecord> {
    days.iter()
        .map(|day| {
            let assessment = assess(
                day.aggregate.daily_cwl,
                day.aggregate.daily_shwe,
                day.streaks.consecutive_compound_cycles,
                gates,
            );
            DailyRecord::new(day.clone(), assessment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gates() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn test_calm_day_is_stable() {
        let a = assess(0.0, 0.0, 0, &gates());
        assert_eq!(a.risk_state, RiskState::Stable);
        assert!((a.risk_multiplier - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cwl_strain_gate() {
        let a = assess(90.0, 0.0, 0, &gates());
        assert_eq!(a.risk_state, RiskState::Straining);
        assert!((a.risk_multiplier - 2.125).abs() < 1e-12);
    }

    #[test]
    fn test_compound_streak_failure_gate() {
        let a = assess(0.0, 0.0, 4, &gates());
        assert_eq!(a.risk_state, RiskState::Failure);
        assert!((a.risk_multiplier - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_gates_are_inclusive() {
        let g = gates();
        assert_eq!(classify_risk_state(79.999, 0.0, 0, &g), RiskState::Stable);
        assert_eq!(classify_risk_state(80.0, 0.0, 0, &g), RiskState::Straining);
        assert_eq!(classify_risk_state(0.0, 40.0, 0, &g), RiskState::Straining);
        assert_eq!(classify_risk_state(0.0, 0.0, 2, &g), RiskState::Straining);
        assert_eq!(classify_risk_state(160.0, 0.0, 0, &g), RiskState::Failure);
        assert_eq!(classify_risk_state(0.0, 80.0, 0, &g), RiskState::Failure);
    }

    #[test]
    fn test_failure_takes_precedence() {
        // Straining holds on SHWe and streak, Failure on CWL
        assert_eq!(classify_risk_state(200.0, 50.0, 3, &gates()), RiskState::Failure);
    }

    #[test]
    fn test_state_monotone_in_cwl() {
        let g = gates();
        for shwe in [0.0, 39.0, 45.0, 85.0] {
            for streak in 0..6 {
                let mut previous = RiskState::Stable;
                for step in 0..400 {
                    let cwl = f64::from(step) * 0.5;
                    let state = classify_risk_state(cwl, shwe, streak, &g);
                    assert!(state >= previous, "cwl={cwl} shwe={shwe} streak={streak}");
                    previous = state;
                }
            }
        }
    }

    #[test]
    fn test_multiplier_strictly_increasing_in_each_input() {
        let g = gates();
        let base = risk_multiplier(10.0, 10.0, 1, &g);
        assert!(risk_multiplier(10.5, 10.0, 1, &g) > base);
        assert!(risk_multiplier(10.0, 10.5, 1, &g) > base);
        assert!(risk_multiplier(10.0, 10.0, 2, &g) > base);
    }

    #[test]
    fn test_custom_gates() {
        let g = ClassifierConfig { cwl_strain: 10.0, cwl_failure: 20.0, ..ClassifierConfig::default() };
        assert_eq!(classify_risk_state(15.0, 0.0, 0, &g), RiskState::Straining);
        assert_eq!(classify_risk_state(25.0, 0.0, 0, &g), RiskState::Failure);
    }
}
