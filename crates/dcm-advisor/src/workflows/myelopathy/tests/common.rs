use proptest::prelude::*;

use crate::workflows::myelopathy::domain::{CanalRatio, PatientRecord, Sex, T2Signal};
use crate::workflows::myelopathy::evaluation::{AssessmentEngine, RuleConfig};

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::new(RuleConfig::default())
}

/// Baseline patient with no risk markers; tests override what they exercise.
pub(super) fn patient() -> PatientRecord {
    PatientRecord {
        age: 55,
        sex: Sex::Female,
        mjoa: 16,
        duration_months: 4,
        t2_signal: T2Signal::None,
        levels: 1,
        canal_ratio: CanalRatio::BelowFifty,
        opll: false,
        t1_hypo: false,
        smoker: false,
    }
}

/// Moderate myelopathy with focal cord signal over three levels.
pub(super) fn scenario_moderate_multilevel() -> PatientRecord {
    PatientRecord {
        mjoa: 13,
        duration_months: 12,
        t2_signal: T2Signal::Bright,
        levels: 3,
        canal_ratio: CanalRatio::BelowFifty,
        opll: false,
        ..patient()
    }
}

/// Mild myelopathy of recent onset and a normal cord.
pub(super) fn scenario_mild_recent() -> PatientRecord {
    PatientRecord {
        mjoa: 16,
        duration_months: 2,
        t2_signal: T2Signal::None,
        levels: 1,
        canal_ratio: CanalRatio::BelowFifty,
        ..patient()
    }
}

/// Mild myelopathy with eight months of symptoms and cord signal.
pub(super) fn scenario_mild_progressing() -> PatientRecord {
    PatientRecord {
        mjoa: 16,
        duration_months: 8,
        t2_signal: T2Signal::Bright,
        levels: 1,
        canal_ratio: CanalRatio::BelowFifty,
        ..patient()
    }
}

pub(super) fn any_patient() -> impl Strategy<Value = PatientRecord> {
    (
        (18i32..=95, prop_oneof![Just(Sex::Male), Just(Sex::Female)], 0u8..=18, 0u32..=240),
        (
            prop_oneof![
                Just(T2Signal::None),
                Just(T2Signal::Bright),
                Just(T2Signal::Multilevel)
            ],
            1u32..=8,
            prop_oneof![
                Just(CanalRatio::BelowFifty),
                Just(CanalRatio::FiftyToSixty),
                Just(CanalRatio::AboveSixty)
            ],
        ),
        (any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |((age, sex, mjoa, duration_months), (t2_signal, levels, canal_ratio), (opll, t1_hypo, smoker))| {
                PatientRecord {
                    age,
                    sex,
                    mjoa,
                    duration_months,
                    t2_signal,
                    levels,
                    canal_ratio,
                    opll,
                    t1_hypo,
                    smoker,
                }
            },
        )
}
