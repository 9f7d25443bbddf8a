use super::super::domain::{Approach, Severity};
use super::config::{ApproachRules, ApproachShift};
use super::signals::ClinicalSignals;
use serde::{Deserialize, Serialize};

/// Rule in the approach adjustment stack, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproachRule {
    FocalMildDisease,
    ExtensiveDisease,
    OpllHighCanal,
    OpllMidCanal,
    OpllLowCanal,
    MultilevelT2Signal,
    ChronicCompression,
    HighBurden,
}

impl ApproachRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FocalMildDisease => "Focal mild disease without OPLL",
            Self::ExtensiveDisease => "Multilevel or long-standing disease",
            Self::OpllHighCanal => "OPLL with canal occupying ratio >60%",
            Self::OpllMidCanal => "OPLL with canal occupying ratio 50-60%",
            Self::OpllLowCanal => "OPLL with canal occupying ratio <50%",
            Self::MultilevelT2Signal => "Multilevel T2 signal change",
            Self::ChronicCompression => "Long-standing compression without OPLL",
            Self::HighBurden => "Frailty or cord injury markers",
        }
    }
}

/// Audit entry for one fired approach rule, in percentage points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachAdjustment {
    pub rule: ApproachRule,
    pub anterior: i16,
    pub posterior: i16,
    pub circumferential: i16,
}

/// Probability of meaningful improvement per approach, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachProbabilities {
    pub anterior: f64,
    pub posterior: f64,
    pub circumferential: f64,
}

impl ApproachProbabilities {
    pub(crate) fn from_points(points: &ApproachPoints) -> Self {
        Self {
            anterior: f64::from(points.anterior) / 100.0,
            posterior: f64::from(points.posterior) / 100.0,
            circumferential: f64::from(points.circumferential) / 100.0,
        }
    }

    pub fn get(&self, approach: Approach) -> f64 {
        match approach {
            Approach::Anterior => self.anterior,
            Approach::Posterior => self.posterior,
            Approach::Circumferential => self.circumferential,
        }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> [(Approach, f64); 3] {
        Approach::ordered().map(|approach| (approach, self.get(approach)))
    }

    /// Highest-probability approach; ties go to the earlier-declared approach.
    pub fn leading(&self) -> Approach {
        leading_of(self.entries())
    }
}

/// Integer working representation; one point is 0.01 probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ApproachPoints {
    pub anterior: i16,
    pub posterior: i16,
    pub circumferential: i16,
}

impl ApproachPoints {
    fn shift(&mut self, shift: ApproachShift) {
        self.anterior = self.anterior.saturating_add(shift.anterior);
        self.posterior = self.posterior.saturating_add(shift.posterior);
        self.circumferential = self.circumferential.saturating_add(shift.circumferential);
    }

    pub(crate) fn entries(&self) -> [(Approach, i16); 3] {
        [
            (Approach::Anterior, self.anterior),
            (Approach::Posterior, self.posterior),
            (Approach::Circumferential, self.circumferential),
        ]
    }
}

pub(crate) fn leading_of<T: PartialOrd + Copy>(entries: [(Approach, T); 3]) -> Approach {
    let mut best = entries[0];
    for entry in &entries[1..] {
        if entry.1 > best.1 {
            best = *entry;
        }
    }
    best.0
}

pub(crate) struct ApproachEstimate {
    pub points: ApproachPoints,
    pub adjustments: Vec<ApproachAdjustment>,
}

pub(crate) fn estimate_approaches(
    severity: Severity,
    signals: &ClinicalSignals,
    rules: &ApproachRules,
) -> ApproachEstimate {
    let base = rules.base.get(severity);
    let mut points = ApproachPoints {
        anterior: base,
        posterior: base,
        circumferential: base.saturating_add(rules.circumferential_offset),
    };
    let mut adjustments = Vec::new();

    let mut apply = |rule: ApproachRule, shift: ApproachShift| {
        points.shift(shift);
        adjustments.push(ApproachAdjustment {
            rule,
            anterior: shift.anterior,
            posterior: shift.posterior,
            circumferential: shift.circumferential,
        });
    };

    if severity == Severity::Mild && !signals.opll && !signals.multilevel && !signals.high_canal {
        apply(ApproachRule::FocalMildDisease, rules.focal_mild);
    }

    if signals.multilevel || signals.very_long_symptoms {
        apply(ApproachRule::ExtensiveDisease, rules.extensive_disease);
    }

    if signals.opll {
        if signals.high_canal {
            apply(ApproachRule::OpllHighCanal, rules.opll_high_canal);
        } else if signals.mid_canal {
            apply(ApproachRule::OpllMidCanal, rules.opll_mid_canal);
        } else {
            apply(ApproachRule::OpllLowCanal, rules.opll_low_canal);
        }
    }

    if signals.multilevel_t2 {
        apply(ApproachRule::MultilevelT2Signal, rules.multilevel_t2);
    }

    if signals.long_symptoms && !signals.opll && severity.is_at_least_moderate() {
        apply(ApproachRule::ChronicCompression, rules.chronic_compression);
    }

    if signals.high_burden {
        apply(ApproachRule::HighBurden, rules.high_burden);
    }

    points.anterior = rules.bounds.clamp(points.anterior);
    points.posterior = rules.bounds.clamp(points.posterior);
    points.circumferential = rules.bounds.clamp(points.circumferential);

    ApproachEstimate {
        points,
        adjustments,
    }
}
