use super::super::domain::{RecommendationLabel, Severity};
use super::signals::ClinicalSignals;
use serde::Serialize;

/// One row of the recommendation table.
pub(crate) struct DecisionRule {
    pub name: &'static str,
    pub applies: fn(Severity, &ClinicalSignals) -> bool,
    pub label: RecommendationLabel,
}

/// Evaluated top-down; the first matching row decides. The final row always
/// matches, so every patient receives exactly one label. Reordering rows
/// changes clinical behavior.
pub(crate) static DECISION_TABLE: [DecisionRule; 3] = [
    DecisionRule {
        name: "operative_indication",
        applies: |severity, signals| {
            severity.is_at_least_moderate()
                && (signals.cord_signal
                    || signals.long_symptoms
                    || signals.high_canal
                    || signals.multilevel)
        },
        label: RecommendationLabel::SurgeryRecommended,
    },
    DecisionRule {
        name: "mild_with_progression_markers",
        applies: |severity, signals| {
            severity == Severity::Mild && (signals.cord_signal || signals.long_symptoms)
        },
        label: RecommendationLabel::ConsiderSurgery,
    },
    DecisionRule {
        name: "default_non_operative",
        applies: |_, _| true,
        label: RecommendationLabel::NonOperativeTrial,
    },
];

/// Label plus the narrative shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskGroup {
    pub label: RecommendationLabel,
    pub rule: &'static str,
    pub risk_text: &'static str,
    pub benefit_text: &'static str,
}

pub(crate) fn classify_risk_group(severity: Severity, signals: &ClinicalSignals) -> RiskGroup {
    let rule = DECISION_TABLE
        .iter()
        .find(|rule| (rule.applies)(severity, signals))
        .unwrap_or(&DECISION_TABLE[DECISION_TABLE.len() - 1]);

    RiskGroup {
        label: rule.label,
        rule: rule.name,
        risk_text: rule.label.risk_text(),
        benefit_text: rule.label.benefit_text(),
    }
}
