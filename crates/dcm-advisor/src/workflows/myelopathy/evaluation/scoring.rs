use super::super::domain::{CanalRatio, PatientRecord, Severity, T2Signal};
use super::config::{ScoreDelta, ScoringRules};
use serde::{Deserialize, Serialize};

/// Clinical factor behind a risk/benefit adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    ChronicSymptoms,
    RecentOnset,
    T2Bright,
    T2Multilevel,
    HighCanalRatio,
    Opll,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChronicSymptoms => "Chronic symptoms",
            Self::RecentOnset => "Recent onset",
            Self::T2Bright => "Focal T2 signal",
            Self::T2Multilevel => "Multilevel T2 signal",
            Self::HighCanalRatio => "Canal occupying ratio >60%",
            Self::Opll => "OPLL",
        }
    }
}

/// Discrete contribution to the risk and benefit scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub risk: i16,
    pub benefit: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBenefitScores {
    pub risk_score: i16,
    pub benefit_score: i16,
    pub components: Vec<ScoreComponent>,
}

pub(crate) fn score_risk_benefit(
    record: &PatientRecord,
    severity: Severity,
    rules: &ScoringRules,
) -> RiskBenefitScores {
    let base = rules.base.get(severity);
    let mut risk = base.risk;
    let mut benefit = base.benefit;
    let mut components = Vec::new();

    let mut apply = |factor: ScoreFactor, delta: ScoreDelta, notes: String| {
        risk = risk.saturating_add(delta.risk);
        benefit = benefit.saturating_add(delta.benefit);
        components.push(ScoreComponent {
            factor,
            risk: delta.risk,
            benefit: delta.benefit,
            notes,
        });
    };

    if record.duration_months >= rules.chronic_min_months {
        apply(
            ScoreFactor::ChronicSymptoms,
            rules.chronic,
            format!(
                "symptoms for {} months (>= {})",
                record.duration_months, rules.chronic_min_months
            ),
        );
    } else if record.duration_months < rules.recent_max_months {
        apply(
            ScoreFactor::RecentOnset,
            rules.recent,
            format!(
                "symptoms for {} months (< {})",
                record.duration_months, rules.recent_max_months
            ),
        );
    }

    match record.t2_signal {
        T2Signal::Bright => apply(
            ScoreFactor::T2Bright,
            rules.t2_bright,
            "focal intramedullary T2 hyperintensity".to_string(),
        ),
        T2Signal::Multilevel => apply(
            ScoreFactor::T2Multilevel,
            rules.t2_multilevel,
            "T2 hyperintensity across multiple levels".to_string(),
        ),
        T2Signal::None => {}
    }

    if record.canal_ratio == CanalRatio::AboveSixty {
        apply(
            ScoreFactor::HighCanalRatio,
            rules.high_canal,
            "canal occupying ratio above 60%".to_string(),
        );
    }

    if record.opll {
        apply(
            ScoreFactor::Opll,
            rules.opll,
            "ossification of the posterior longitudinal ligament".to_string(),
        );
    }

    RiskBenefitScores {
        risk_score: rules.risk_bounds.clamp(risk),
        benefit_score: rules.benefit_bounds.clamp(benefit),
        components,
    }
}
