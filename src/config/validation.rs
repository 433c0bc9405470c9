//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for RiskConfig.
///
/// Maintained by hand to match the struct hierarchy in risk_config.rs.
/// Any new field added to RiskConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [dataset]
        "dataset",
        "dataset.label",
        // [stress]
        "stress",
        "stress.gust_weight",
        "stress.baseline_wind_ms",
        "stress.baseline_recovery_ms",
        "stress.recovery_hours",
        // [aggregation]
        "aggregation",
        "aggregation.high_wind_day_cwl",
        "aggregation.failed_recovery_night_shwe",
        // [classifier]
        "classifier",
        "classifier.cwl_strain",
        "classifier.cwl_failure",
        "classifier.shwe_strain",
        "classifier.shwe_failure",
        "classifier.compound_strain",
        "classifier.compound_failure",
        "classifier.cwl_scale",
        "classifier.shwe_scale",
        "classifier.compound_weight",
        // [output]
        "output",
        "output.directory",
        "output.write_daily_csv",
        "output.write_hourly_csv",
        "output.write_json",
        "output.json_include_hourly",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so suggestions are
/// stable across runs.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Does NOT fail on unknown keys; parse errors are left for serde to report.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed RiskConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must stop
/// the run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::RiskConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let s = &config.stress;

    // Wind baselines are speeds and cannot be negative
    if s.baseline_wind_ms < 0.0 {
        errors.push(format!(
            "stress.baseline_wind_ms = {:.1} cannot be negative",
            s.baseline_wind_ms
        ));
    }
    if s.baseline_recovery_ms < 0.0 {
        errors.push(format!(
            "stress.baseline_recovery_ms = {:.1} cannot be negative",
            s.baseline_recovery_ms
        ));
    }

    // Flag thresholds are sums of clipped scores
    let a = &config.aggregation;
    if a.high_wind_day_cwl < 0.0 {
        errors.push(format!(
            "aggregation.high_wind_day_cwl = {:.1} cannot be negative",
            a.high_wind_day_cwl
        ));
    }
    if a.failed_recovery_night_shwe < 0.0 {
        errors.push(format!(
            "aggregation.failed_recovery_night_shwe = {:.1} cannot be negative",
            a.failed_recovery_night_shwe
        ));
    }

    // EWS interpolates between sustained wind (0) and gust (1)
    if !(0.0..=1.0).contains(&s.gust_weight) {
        warnings.push(ValidationWarning {
            field: "stress.gust_weight".to_string(),
            message: format!(
                "gust_weight = {:.2} is outside the interpolating range (0-1)",
                s.gust_weight
            ),
            suggestion: None,
        });
    }

    // A recovery baseline above the load baseline means nights are judged
    // more leniently than days
    if s.baseline_recovery_ms > s.baseline_wind_ms {
        warnings.push(ValidationWarning {
            field: "stress.baseline_recovery_ms".to_string(),
            message: format!(
                "baseline_recovery_ms ({:.1}) exceeds baseline_wind_ms ({:.1})",
                s.baseline_recovery_ms, s.baseline_wind_ms
            ),
            suggestion: None,
        });
    }

    // Duplicate hours are harmless but usually a typo
    let unique: HashSet<u32> = s.recovery_hours.iter().copied().collect();
    if unique.len() != s.recovery_hours.len() {
        warnings.push(ValidationWarning {
            field: "stress.recovery_hours".to_string(),
            message: "recovery_hours lists the same hour more than once".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("stress", "stress"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("clasifier", "classifier"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [classifier]
            cwl_strain = 80.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"classifier".to_string()));
        assert!(keys.contains(&"classifier.cwl_strain".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[classifier]
cwl_stain = 70.0
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("cwl_stain"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("classifier.cwl_strain")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[dataset]
label = "Cyclone Event"

[stress]
recovery_hours = [0, 1, 2, 3, 4, 5, 22, 23]

[output]
write_json = true
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_physical_range_defaults_clean() {
        let config = crate::config::RiskConfig::default();
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty(), "Defaults should produce no errors: {:?}", errors);
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {:?}", warnings);
    }

    #[test]
    fn test_negative_baseline_is_error() {
        let mut config = crate::config::RiskConfig::default();
        config.stress.baseline_wind_ms = -1.0;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("baseline_wind_ms")));
    }

    #[test]
    fn test_gust_weight_outside_unit_interval_warns() {
        let mut config = crate::config::RiskConfig::default();
        config.stress.gust_weight = 1.5;
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "stress.gust_weight"));
    }

    #[test]
    fn test_duplicate_recovery_hours_warn() {
        let mut config = crate::config::RiskConfig::default();
        config.stress.recovery_hours = vec![0, 1, 1];
        let (_, warnings) = validate_physical_ranges(&config);
        assert!(warnings.iter().any(|w| w.field == "stress.recovery_hours"));
    }
}
