mod approach;
mod config;
mod policy;
mod scoring;
mod severity;
mod signals;
mod uncertainty;

pub use approach::{ApproachAdjustment, ApproachProbabilities, ApproachRule};
pub use config::{
    ApproachRules, ApproachShift, BySeverity, Bounds, RuleConfig, RuleConfigError, ScoreDelta,
    ScoringRules, SeverityThresholds, SignalThresholds, UncertaintyThresholds,
};
pub use policy::RiskGroup;
pub use scoring::{RiskBenefitScores, ScoreComponent, ScoreFactor};
pub use uncertainty::UncertaintyError;

use super::domain::{Approach, PatientRecord, RecommendationLabel, Severity, UncertaintyTier};
use serde::Serialize;
use signals::ClinicalSignals;
use tracing::debug;

/// Stateless evaluator applying a [`RuleConfig`] to patient records.
#[derive(Debug, Clone, Default)]
pub struct AssessmentEngine {
    config: RuleConfig,
}

impl AssessmentEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn severity(&self, mjoa: u8) -> Severity {
        severity::classify_severity(mjoa, &self.config.severity)
    }

    pub fn risk_benefit(&self, record: &PatientRecord, severity: Severity) -> RiskBenefitScores {
        scoring::score_risk_benefit(record, severity, &self.config.scoring)
    }

    pub fn risk_group(&self, record: &PatientRecord, severity: Severity) -> RiskGroup {
        let signals = ClinicalSignals::derive(record, &self.config.signals);
        policy::classify_risk_group(severity, &signals)
    }

    pub fn approach_probabilities(
        &self,
        record: &PatientRecord,
        severity: Severity,
    ) -> ApproachProbabilities {
        let signals = ClinicalSignals::derive(record, &self.config.signals);
        let estimate = approach::estimate_approaches(severity, &signals, &self.config.approach);
        ApproachProbabilities::from_points(&estimate.points)
    }

    /// Confidence tier for an arbitrary probability set; fewer than two is an error.
    pub fn uncertainty(&self, probabilities: &[f64]) -> Result<UncertaintyTier, UncertaintyError> {
        uncertainty::classify_probabilities(probabilities, &self.config.uncertainty)
    }

    /// Runs the full pipeline for one patient.
    pub fn assess(&self, record: &PatientRecord) -> RecommendationResult {
        let severity = self.severity(record.mjoa);
        let signals = ClinicalSignals::derive(record, &self.config.signals);

        let group = policy::classify_risk_group(severity, &signals);
        let scores = scoring::score_risk_benefit(record, severity, &self.config.scoring);
        let estimate = approach::estimate_approaches(severity, &signals, &self.config.approach);
        let uncertainty_tier =
            uncertainty::classify_points(&estimate.points, &self.config.uncertainty);
        let recommended_approach = approach::leading_of(estimate.points.entries());

        debug!(
            label = group.label.label(),
            severity = severity.label(),
            risk = scores.risk_score,
            benefit = scores.benefit_score,
            approach = recommended_approach.label(),
            "patient assessed"
        );

        RecommendationResult {
            severity,
            label: group.label,
            decision_rule: group.rule,
            risk_text: group.risk_text,
            benefit_text: group.benefit_text,
            risk_score: scores.risk_score,
            benefit_score: scores.benefit_score,
            approach_probabilities: ApproachProbabilities::from_points(&estimate.points),
            recommended_approach,
            uncertainty_tier,
            score_components: scores.components,
            approach_adjustments: estimate.adjustments,
        }
    }

    /// Label and leading approach only, as needed for batch tallies.
    pub(crate) fn triage(&self, record: &PatientRecord) -> (RecommendationLabel, Approach) {
        let severity = self.severity(record.mjoa);
        let signals = ClinicalSignals::derive(record, &self.config.signals);
        let group = policy::classify_risk_group(severity, &signals);
        let estimate = approach::estimate_approaches(severity, &signals, &self.config.approach);
        (group.label, approach::leading_of(estimate.points.entries()))
    }
}

/// Complete recommendation for one patient, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub severity: Severity,
    pub label: RecommendationLabel,
    pub decision_rule: &'static str,
    pub risk_text: &'static str,
    pub benefit_text: &'static str,
    pub risk_score: i16,
    pub benefit_score: i16,
    pub approach_probabilities: ApproachProbabilities,
    pub recommended_approach: Approach,
    pub uncertainty_tier: UncertaintyTier,
    pub score_components: Vec<ScoreComponent>,
    pub approach_adjustments: Vec<ApproachAdjustment>,
}
