use super::super::domain::{CanalRatio, PatientRecord, T2Signal};
use super::config::SignalThresholds;

/// Boolean predicates shared by the classifier and the approach model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClinicalSignals {
    pub cord_signal: bool,
    pub multilevel_t2: bool,
    pub long_symptoms: bool,
    pub very_long_symptoms: bool,
    pub high_canal: bool,
    pub mid_canal: bool,
    pub multilevel: bool,
    pub opll: bool,
    pub high_burden: bool,
}

impl ClinicalSignals {
    pub(crate) fn derive(record: &PatientRecord, thresholds: &SignalThresholds) -> Self {
        let cord_signal = record.t2_signal != T2Signal::None;

        Self {
            cord_signal,
            multilevel_t2: record.t2_signal == T2Signal::Multilevel,
            long_symptoms: record.duration_months >= thresholds.long_symptom_months,
            very_long_symptoms: record.duration_months >= thresholds.very_long_symptom_months,
            high_canal: record.canal_ratio == CanalRatio::AboveSixty,
            mid_canal: record.canal_ratio == CanalRatio::FiftyToSixty,
            multilevel: record.levels >= thresholds.multilevel_min_levels,
            opll: record.opll,
            high_burden: record.age >= thresholds.high_burden_min_age
                || record.smoker
                || record.t1_hypo
                || cord_signal,
        }
    }
}
