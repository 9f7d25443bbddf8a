use proptest::prelude::*;

use super::common::*;
use crate::workflows::myelopathy::batch::BatchAggregator;
use crate::workflows::myelopathy::domain::Severity;

proptest! {
    #[test]
    fn property_scores_stay_within_bounds(record in any_patient()) {
        let result = engine().assess(&record);
        prop_assert!((5..=95).contains(&result.risk_score));
        prop_assert!((10..=95).contains(&result.benefit_score));
    }

    #[test]
    fn property_probabilities_stay_within_bounds(record in any_patient()) {
        let result = engine().assess(&record);
        for (_, probability) in result.approach_probabilities.entries() {
            prop_assert!((0.25..=0.90).contains(&probability));
        }
    }

    #[test]
    fn property_assessment_is_deterministic(record in any_patient()) {
        let engine = engine();
        let first = serde_json::to_string(&engine.assess(&record));
        let second = serde_json::to_string(&engine.assess(&record));
        prop_assert!(first.is_ok());
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn property_severity_is_monotonic(low in 0u8..=18, high in 0u8..=18) {
        prop_assume!(low <= high);
        let engine = engine();
        let worse: Severity = engine.severity(low);
        let better: Severity = engine.severity(high);
        prop_assert!(better <= worse);
    }

    #[test]
    fn property_batches_conserve_totals(records in prop::collection::vec(any_patient(), 0..40)) {
        let engine = engine();
        let summary = BatchAggregator::new(&engine).aggregate(&records);
        prop_assert_eq!(summary.total, records.len());
        prop_assert!(summary.is_balanced());
    }

    #[test]
    fn property_recommended_approach_has_highest_probability(record in any_patient()) {
        let result = engine().assess(&record);
        let best = result.approach_probabilities.get(result.recommended_approach);
        for (_, probability) in result.approach_probabilities.entries() {
            prop_assert!(best >= probability);
        }
    }
}
