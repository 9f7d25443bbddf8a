//! Surgical decision support for degenerative cervical myelopathy.
//!
//! Every evaluator is a pure function of a [`PatientRecord`] and the active
//! [`RuleConfig`]; nothing is cached between calls.

pub mod batch;
pub mod domain;
pub mod evaluation;
pub mod input;

#[cfg(test)]
mod tests;

pub use batch::{BatchAggregator, BatchSummary, BatchSummaryView, CategoryCount};
pub use domain::{
    Approach, CanalRatio, PatientRecord, RecommendationLabel, Severity, Sex, T2Signal,
    UncertaintyTier,
};
pub use evaluation::{
    ApproachAdjustment, ApproachProbabilities, ApproachRule, AssessmentEngine,
    RecommendationResult, RuleConfig, RuleConfigError, ScoreComponent, ScoreFactor,
    UncertaintyError,
};
pub use input::{
    FallbackPolicy, FieldFallback, InputError, ParsedPatient, PatientField, PatientInput,
};
