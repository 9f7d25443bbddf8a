use super::super::domain::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Heuristic constants driving every evaluator.
///
/// The defaults are placeholders pending calibration against outcome data.
/// Any field omitted from a rules file keeps its default, so a file only
/// needs to name the values it overrides. Probabilities are expressed in
/// whole percentage points.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub severity: SeverityThresholds,
    pub signals: SignalThresholds,
    pub scoring: ScoringRules,
    pub approach: ApproachRules,
    pub uncertainty: UncertaintyThresholds,
}

/// Largest magnitude accepted for any baseline, offset or shift. Eight such
/// terms summed still fit in an `i16`.
pub const MAX_RULE_MAGNITUDE: i16 = 1_000;

impl RuleConfig {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RuleConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleConfigError> {
        Self::parse(raw, "<inline>")
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, RuleConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| RuleConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects ranges and magnitudes the evaluators cannot apply.
    pub fn validate(&self) -> Result<(), RuleConfigError> {
        let severity = &self.severity;
        if severity.moderate_min_mjoa > severity.mild_min_mjoa {
            return Err(RuleConfigError::invalid(format!(
                "severity.moderate_min_mjoa ({}) exceeds severity.mild_min_mjoa ({})",
                severity.moderate_min_mjoa, severity.mild_min_mjoa
            )));
        }

        let uncertainty = &self.uncertainty;
        if uncertainty.moderate_min_gap > uncertainty.low_min_gap {
            return Err(RuleConfigError::invalid(format!(
                "uncertainty.moderate_min_gap ({}) exceeds uncertainty.low_min_gap ({})",
                uncertainty.moderate_min_gap, uncertainty.low_min_gap
            )));
        }

        let scoring = &self.scoring;
        check_bounds("scoring.risk_bounds", scoring.risk_bounds)?;
        check_bounds("scoring.benefit_bounds", scoring.benefit_bounds)?;
        for (name, delta) in [
            ("scoring.base.mild", scoring.base.mild),
            ("scoring.base.moderate", scoring.base.moderate),
            ("scoring.base.severe", scoring.base.severe),
            ("scoring.chronic", scoring.chronic),
            ("scoring.recent", scoring.recent),
            ("scoring.t2_bright", scoring.t2_bright),
            ("scoring.t2_multilevel", scoring.t2_multilevel),
            ("scoring.high_canal", scoring.high_canal),
            ("scoring.opll", scoring.opll),
        ] {
            check_magnitude(name, &[delta.risk, delta.benefit])?;
        }

        let approach = &self.approach;
        check_bounds("approach.bounds", approach.bounds)?;
        check_magnitude(
            "approach.base",
            &[approach.base.mild, approach.base.moderate, approach.base.severe],
        )?;
        check_magnitude(
            "approach.circumferential_offset",
            &[approach.circumferential_offset],
        )?;
        for (name, shift) in [
            ("approach.focal_mild", approach.focal_mild),
            ("approach.extensive_disease", approach.extensive_disease),
            ("approach.opll_high_canal", approach.opll_high_canal),
            ("approach.opll_mid_canal", approach.opll_mid_canal),
            ("approach.opll_low_canal", approach.opll_low_canal),
            ("approach.multilevel_t2", approach.multilevel_t2),
            ("approach.chronic_compression", approach.chronic_compression),
            ("approach.high_burden", approach.high_burden),
        ] {
            check_magnitude(
                name,
                &[shift.anterior, shift.posterior, shift.circumferential],
            )?;
        }

        Ok(())
    }
}

fn check_bounds(name: &str, bounds: Bounds) -> Result<(), RuleConfigError> {
    if bounds.min > bounds.max {
        return Err(RuleConfigError::invalid(format!(
            "{name} has min {} above max {}",
            bounds.min, bounds.max
        )));
    }
    Ok(())
}

fn check_magnitude(name: &str, values: &[i16]) -> Result<(), RuleConfigError> {
    match values.iter().find(|value| value.unsigned_abs() > MAX_RULE_MAGNITUDE.unsigned_abs()) {
        Some(value) => Err(RuleConfigError::invalid(format!(
            "{name} value {value} is outside +/-{MAX_RULE_MAGNITUDE}"
        ))),
        None => Ok(()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid rules in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("rules rejected: {reason}")]
    Invalid { reason: String },
}

impl RuleConfigError {
    fn invalid(reason: String) -> Self {
        Self::Invalid { reason }
    }
}

/// Per-severity triple used for score and probability baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySeverity<T> {
    pub mild: T,
    pub moderate: T,
    pub severe: T,
}

impl<T: Copy> BySeverity<T> {
    pub fn get(&self, severity: Severity) -> T {
        match severity {
            Severity::Mild => self.mild,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }
}

/// Inclusive clamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i16,
    pub max: i16,
}

impl Bounds {
    /// Never panics; an inverted range resolves to `max`.
    pub fn clamp(self, value: i16) -> i16 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(self, value: i16) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    /// Lowest mJOA still classified as mild.
    pub mild_min_mjoa: u8,
    /// Lowest mJOA still classified as moderate.
    pub moderate_min_mjoa: u8,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            mild_min_mjoa: 15,
            moderate_min_mjoa: 12,
        }
    }
}

/// Cut-offs behind the shared clinical predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub long_symptom_months: u32,
    pub very_long_symptom_months: u32,
    pub multilevel_min_levels: u32,
    pub high_burden_min_age: i32,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            long_symptom_months: 6,
            very_long_symptom_months: 12,
            multilevel_min_levels: 3,
            high_burden_min_age: 75,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub risk: i16,
    pub benefit: i16,
}

impl ScoreDelta {
    pub const fn new(risk: i16, benefit: i16) -> Self {
        Self { risk, benefit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base: BySeverity<ScoreDelta>,
    pub chronic_min_months: u32,
    pub chronic: ScoreDelta,
    /// Exclusive upper bound for the recent-onset adjustment.
    pub recent_max_months: u32,
    pub recent: ScoreDelta,
    pub t2_bright: ScoreDelta,
    pub t2_multilevel: ScoreDelta,
    pub high_canal: ScoreDelta,
    pub opll: ScoreDelta,
    pub risk_bounds: Bounds,
    pub benefit_bounds: Bounds,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base: BySeverity {
                mild: ScoreDelta::new(20, 40),
                moderate: ScoreDelta::new(40, 65),
                severe: ScoreDelta::new(60, 80),
            },
            chronic_min_months: 12,
            chronic: ScoreDelta::new(5, 3),
            recent_max_months: 3,
            recent: ScoreDelta::new(-3, 2),
            t2_bright: ScoreDelta::new(5, 3),
            t2_multilevel: ScoreDelta::new(10, 5),
            high_canal: ScoreDelta::new(5, 3),
            opll: ScoreDelta::new(3, 2),
            risk_bounds: Bounds { min: 5, max: 95 },
            benefit_bounds: Bounds { min: 10, max: 95 },
        }
    }
}

/// Percentage-point shift applied to each approach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachShift {
    pub anterior: i16,
    pub posterior: i16,
    pub circumferential: i16,
}

impl ApproachShift {
    pub const fn new(anterior: i16, posterior: i16, circumferential: i16) -> Self {
        Self {
            anterior,
            posterior,
            circumferential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachRules {
    pub base: BySeverity<i16>,
    /// Offset of the circumferential baseline from the shared base.
    pub circumferential_offset: i16,
    pub focal_mild: ApproachShift,
    pub extensive_disease: ApproachShift,
    pub opll_high_canal: ApproachShift,
    pub opll_mid_canal: ApproachShift,
    pub opll_low_canal: ApproachShift,
    pub multilevel_t2: ApproachShift,
    pub chronic_compression: ApproachShift,
    pub high_burden: ApproachShift,
    pub bounds: Bounds,
}

impl Default for ApproachRules {
    fn default() -> Self {
        Self {
            base: BySeverity {
                mild: 65,
                moderate: 55,
                severe: 45,
            },
            circumferential_offset: -3,
            focal_mild: ApproachShift::new(5, 0, -2),
            extensive_disease: ApproachShift::new(-2, 5, 2),
            opll_high_canal: ApproachShift::new(10, 3, 0),
            opll_mid_canal: ApproachShift::new(3, 3, 0),
            opll_low_canal: ApproachShift::new(2, 5, 0),
            multilevel_t2: ApproachShift::new(-1, 3, 1),
            chronic_compression: ApproachShift::new(-1, -1, 0),
            high_burden: ApproachShift::new(-3, -3, -3),
            bounds: Bounds { min: 25, max: 90 },
        }
    }
}

/// Minimum gap (percentage points) between the two leading approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyThresholds {
    pub low_min_gap: i16,
    pub moderate_min_gap: i16,
}

impl Default for UncertaintyThresholds {
    fn default() -> Self {
        Self {
            low_min_gap: 15,
            moderate_min_gap: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rules_file_keeps_remaining_defaults() {
        let config = RuleConfig::from_json_str(
            r#"{ "approach": { "bounds": { "min": 20, "max": 95 } },
                 "severity": { "mild_min_mjoa": 16 } }"#,
        )
        .expect("partial config parses");

        assert_eq!(config.approach.bounds, Bounds { min: 20, max: 95 });
        assert_eq!(config.approach.base.mild, 65);
        assert_eq!(config.severity.mild_min_mjoa, 16);
        assert_eq!(config.severity.moderate_min_mjoa, 12);
        assert_eq!(config.scoring, ScoringRules::default());
    }

    fn rejection(raw: &str) -> String {
        match RuleConfig::from_json_str(raw) {
            Err(RuleConfigError::Invalid { reason }) => reason,
            other => panic!("expected invalid rules, got {other:?}"),
        }
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let reason = rejection(r#"{ "approach": { "bounds": { "min": 90, "max": 25 } } }"#);
        assert!(reason.contains("approach.bounds"));

        let reason = rejection(r#"{ "scoring": { "risk_bounds": { "min": 96, "max": 95 } } }"#);
        assert!(reason.contains("scoring.risk_bounds"));

        let reason = rejection(r#"{ "scoring": { "benefit_bounds": { "min": 50, "max": 10 } } }"#);
        assert!(reason.contains("scoring.benefit_bounds"));
    }

    #[test]
    fn oversized_baselines_and_shifts_are_rejected() {
        let reason = rejection(
            r#"{ "approach": { "base": { "mild": 32767, "moderate": 55, "severe": 45 } } }"#,
        );
        assert!(reason.contains("approach.base"));

        let reason = rejection(
            r#"{ "approach": { "high_burden": { "anterior": -32768 } } }"#,
        );
        assert!(reason.contains("approach.high_burden"));

        let reason = rejection(r#"{ "scoring": { "opll": { "risk": 5000, "benefit": 0 } } }"#);
        assert!(reason.contains("scoring.opll"));

        assert!(RuleConfig::from_json_str(
            r#"{ "approach": { "circumferential_offset": -1000 } }"#
        )
        .is_ok());
    }

    #[test]
    fn inverted_severity_and_uncertainty_cutoffs_are_rejected() {
        let reason = rejection(r#"{ "severity": { "mild_min_mjoa": 10 } }"#);
        assert!(reason.contains("moderate_min_mjoa"));

        let reason = rejection(r#"{ "uncertainty": { "moderate_min_gap": 20 } }"#);
        assert!(reason.contains("moderate_min_gap"));
    }

    #[test]
    fn rejected_rules_file_fails_at_load() {
        let path = std::env::temp_dir().join(format!("dcm-bad-rules-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "approach": { "bounds": { "min": 90, "max": 25 } } }"#)
            .expect("rules written");

        let result = RuleConfig::from_json_path(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(RuleConfigError::Invalid { .. })));
    }

    #[test]
    fn clamp_tolerates_an_inverted_range() {
        let inverted = Bounds { min: 90, max: 25 };
        assert_eq!(inverted.clamp(50), 25);
        assert_eq!(Bounds { min: 5, max: 95 }.clamp(120), 95);
        assert_eq!(Bounds { min: 5, max: 95 }.clamp(-3), 5);
    }

    #[test]
    fn missing_rules_file_reports_path() {
        let error = RuleConfig::from_json_path("./no-such-rules.json").expect_err("missing file");
        assert!(error.to_string().contains("no-such-rules.json"));
    }
}
