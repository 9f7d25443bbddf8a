use dcm_advisor::workflows::myelopathy::{
    Approach, AssessmentEngine, FallbackPolicy, InputError, PatientField, PatientInput,
    PatientRecord, RecommendationLabel, RuleConfig, RuleConfigError, Severity,
};

fn form() -> PatientInput {
    PatientInput {
        age: Some("58".to_string()),
        sex: Some("female".to_string()),
        mjoa: Some("13".to_string()),
        duration_months: Some("12".to_string()),
        t2_signal: Some("bright".to_string()),
        levels: Some("3".to_string()),
        canal_ratio: Some("<50%".to_string()),
        ..PatientInput::default()
    }
}

#[test]
fn form_input_flows_through_the_engine() {
    let parsed = PatientRecord::from_input(&form(), FallbackPolicy::Lenient).expect("parses");
    assert!(parsed.is_clean());

    let result = AssessmentEngine::default().assess(&parsed.record);

    assert_eq!(result.severity, Severity::Moderate);
    assert_eq!(result.label, RecommendationLabel::SurgeryRecommended);
    assert_eq!(result.recommended_approach, Approach::Posterior);
    assert_eq!(result.decision_rule, "operative_indication");
}

#[test]
fn json_form_values_may_be_numbers_or_strings() {
    let input: PatientInput = serde_json::from_str(
        r#"{"age": 58, "sex": "F", "mjoa": 13.0, "duration_months": "12",
            "t2_signal": "bright", "levels": 3, "canal_ratio": "<50%", "smoker": true}"#,
    )
    .expect("form deserializes");

    let parsed = PatientRecord::from_input(&input, FallbackPolicy::Strict).expect("parses");

    assert_eq!(parsed.record.mjoa, 13);
    assert!(parsed.record.smoker);
    assert!(!parsed.record.opll);
}

#[test]
fn strict_policy_reports_missing_scalars() {
    let input = PatientInput {
        mjoa: None,
        ..form()
    };

    let error = PatientRecord::from_input(&input, FallbackPolicy::Strict).expect_err("rejected");
    assert_eq!(
        error,
        InputError::MissingField {
            field: PatientField::Mjoa
        }
    );

    let parsed = PatientRecord::from_input(&input, FallbackPolicy::Lenient).expect("defaults");
    assert_eq!(parsed.record.mjoa, PatientRecord::DEFAULT_MJOA);
    assert_eq!(parsed.fallbacks.len(), 1);
}

#[test]
fn rules_file_retunes_thresholds() {
    let path = std::env::temp_dir().join(format!("dcm-rules-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "scoring": { "base": {
            "mild": { "risk": 20, "benefit": 40 },
            "moderate": { "risk": 30, "benefit": 70 },
            "severe": { "risk": 60, "benefit": 80 }
        } } }"#,
    )
    .expect("rules written");

    let config = RuleConfig::from_json_path(&path).expect("rules load");
    std::fs::remove_file(&path).ok();

    let parsed = PatientRecord::from_input(&form(), FallbackPolicy::Lenient).expect("parses");
    let result = AssessmentEngine::new(config).assess(&parsed.record);
    assert_eq!(result.risk_score, 40);
    assert_eq!(result.benefit_score, 76);

    std::fs::write(&path, r#"{ "severity": 3 }"#).expect("rules written");
    let error = RuleConfig::from_json_path(&path).expect_err("bad rules");
    std::fs::remove_file(&path).ok();
    assert!(matches!(error, RuleConfigError::Parse { .. }));
}
