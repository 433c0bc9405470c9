//! Risk state: the three-level ordinal day classification

use serde::{Deserialize, Serialize};

/// Daily risk state, ordered from least to most severe
///
/// The derived `Ord` follows declaration order, so `Stable < Straining < Failure`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum RiskState {
    #[default]
    Stable,
    Straining,
    Failure,
}

impl RiskState {
    /// All states in ordinal order
    pub const ALL: [RiskState; 3] = [RiskState::Stable, RiskState::Straining, RiskState::Failure];

    /// Integer encoding for ordinal plotting: Stable=0, Straining=1, Failure=2
    pub fn ordinal(&self) -> u8 {
        match self {
            RiskState::Stable => 0,
            RiskState::Straining => 1,
            RiskState::Failure => 2,
        }
    }

    /// Band colour for chart renderers, carried in the JSON export legend
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskState::Stable => "#4CAF50",
            RiskState::Straining => "#FFC107",
            RiskState::Failure => "#F44336",
        }
    }
}

impl std::fmt::Display for RiskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskState::Stable => write!(f, "Stable"),
            RiskState::Straining => write!(f, "Straining"),
            RiskState::Failure => write!(f, "Failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_encoding() {
        assert_eq!(RiskState::Stable.ordinal(), 0);
        assert_eq!(RiskState::Straining.ordinal(), 1);
        assert_eq!(RiskState::Failure.ordinal(), 2);
        let ordinals: Vec<u8> = RiskState::ALL.iter().map(RiskState::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn test_band_colors_distinct() {
        assert_eq!(RiskState::Stable.color_hex(), "#4CAF50");
        assert_eq!(RiskState::Failure.color_hex(), "#F44336");
        let mut colors: Vec<&str> = RiskState::ALL.iter().map(RiskState::color_hex).collect();
        colors.dedup();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_ordering_matches_severity() {
        assert!(RiskState::Stable < RiskState::Straining);
        assert!(RiskState::Straining < RiskState::Failure);
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&RiskState::Straining).unwrap();
        assert_eq!(json, "\"Straining\"");
    }
}
