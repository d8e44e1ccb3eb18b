use std::sync::Arc;

use chrono::NaiveDate;
use kitsusa::evaluation::{
    EngineOptions, EvaluationEngine, EvaluationError, EvaluationRequest, FactorKind, MatrixSet,
    RiskLevel, StandardsCatalog, StandardsError, Subdimension, ThreeKIndex, WorkTimeClass,
};

fn press_line_request() -> EvaluationRequest {
    serde_json::from_str(include_str!("../fixtures/press_line_request.json"))
        .expect("fixture parses")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn form_submission_is_scored_end_to_end() {
    let engine = EvaluationEngine::with_embedded_data(EngineOptions::default())
        .expect("embedded data loads");

    let outcome = engine
        .evaluate(&press_line_request())
        .expect("evaluation succeeds");

    assert_eq!(outcome.evaluation_id, "EV-2024-031");
    assert_eq!(outcome.physical.score, 7);
    assert_eq!(outcome.physical.factor(Subdimension::Weight), Some(7));
    assert_eq!(outcome.physical.factor(Subdimension::Posture), Some(7));
    assert_eq!(outcome.mental.score, 6);
    assert_eq!(outcome.mental.factor(Subdimension::PsychologicalStress), Some(4));
    assert_eq!(outcome.environmental.score, 4);
    assert_eq!(outcome.environmental.factor(Subdimension::Substances), Some(2));
    assert_eq!(outcome.hazard.score, 4);

    let work_time = outcome.work_time.expect("work hours were given");
    assert_eq!(work_time.class, WorkTimeClass::B);

    let result = &outcome.result;
    assert_eq!(result.physical_score, 8);
    assert_eq!(result.mental_score, 7);
    assert_eq!(result.environmental_score, 5);
    assert_eq!(result.hazard_score, 5);
    assert_eq!(result.final_kitsusa_score, 8);
    assert_eq!(result.final_3k_index, ThreeKIndex::A);
    assert!(outcome.missing_data.is_empty());
    assert!(outcome.warnings.is_empty());

    let summary = outcome.summary();
    assert_eq!(summary.risk_level, RiskLevel::Critical);
    assert_eq!(summary.recommendations.len(), 4);
}

#[test]
fn outcome_serializes_for_downstream_reports() {
    let engine = EvaluationEngine::with_embedded_data(EngineOptions::default())
        .expect("embedded data loads");
    let outcome = engine
        .evaluate(&press_line_request())
        .expect("evaluation succeeds");

    let value = serde_json::to_value(&outcome).expect("outcome serializes");

    assert_eq!(value["result"]["final_3k_index"], "A");
    assert_eq!(value["result"]["final_kitsusa_score"], 8);
    assert_eq!(value["work_time"]["class"], "B");
    assert_eq!(value["physical"]["factors"]["weight"], 7);
    assert_eq!(value["hazard"]["details"][0]["calculation_method"], "matrix");
}

#[test]
fn unknown_form_label_is_rejected_at_parse_time() {
    let raw = include_str!("../fixtures/press_line_request.json").replace("やや汚い", "grimy");

    let parsed = serde_json::from_str::<EvaluationRequest>(&raw);

    assert!(parsed.is_err());
}

#[test]
fn validation_failures_surface_every_problem() {
    let engine = EvaluationEngine::with_embedded_data(EngineOptions::default())
        .expect("embedded data loads");
    let mut request = press_line_request();
    request.updated_by.clear();
    request.work_hours = Some(-1.0);
    if let Some(hazard) = request.hazard.as_mut() {
        hazard.hazard_events[0].harm_severity = 0;
    }

    let Err(EvaluationError::Invalid(report)) = engine.evaluate(&request) else {
        panic!("expected validation failure");
    };

    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().any(|e| e.contains("updated_by")));
    assert!(report.errors.iter().any(|e| e.contains("work_hours")));
    assert!(report.errors.iter().any(|e| e.contains("harm_severity")));
}

#[test]
fn standards_version_is_chosen_by_effective_date() {
    let embedded = StandardsCatalog::embedded().expect("embedded standards load");
    let original = embedded.latest().clone();
    let mut revised = original.clone();
    revised.version = "2.0".to_string();
    revised.effective_date = date(2025, 4, 1);
    for band in &mut revised.environmental.noise.bands {
        band.threshold -= 5.0;
    }

    let catalog =
        StandardsCatalog::new(vec![revised, original]).expect("two versions validate");
    let matrices = Arc::new(MatrixSet::embedded().expect("embedded matrices load"));
    let request = press_line_request();

    let before = catalog.effective_on(date(2024, 12, 31)).expect("1.0 applies");
    assert_eq!(before.version, "1.0");
    let after = catalog.effective_on(date(2025, 6, 1)).expect("2.0 applies");
    assert_eq!(after.version, "2.0");

    let options = EngineOptions::default();
    let old_rules = EvaluationEngine::new(before, Arc::clone(&matrices), options);
    let new_rules = EvaluationEngine::new(after, matrices, options);

    let old_outcome = old_rules.evaluate(&request).expect("evaluation succeeds");
    let new_outcome = new_rules.evaluate(&request).expect("evaluation succeeds");
    assert_eq!(old_outcome.environmental.factor(Subdimension::Noise), Some(4));
    assert_eq!(new_outcome.environmental.factor(Subdimension::Noise), Some(7));
    assert_eq!(new_outcome.environmental.score, 7);

    assert!(matches!(
        catalog.effective_on(date(2020, 1, 1)),
        Err(StandardsError::NoneEffective(_))
    ));
}

#[test]
fn disabling_matrices_keeps_traditional_scores_in_range() {
    let engine = EvaluationEngine::with_embedded_data(EngineOptions {
        use_matrix: false,
        ..EngineOptions::default()
    })
    .expect("embedded data loads");

    let outcome = engine
        .evaluate(&press_line_request())
        .expect("evaluation succeeds");

    for factor in FactorKind::ALL {
        let result = outcome.factor(factor);
        assert!((1..=10).contains(&result.score), "{factor} out of range");
        assert!(result
            .details
            .iter()
            .all(|component| component.calculation_method
                == kitsusa::evaluation::CalculationMethod::Traditional));
    }
    assert_eq!(outcome.physical.factor(Subdimension::Posture), Some(4));
    assert_eq!(outcome.environmental.factor(Subdimension::Substances), Some(1));
}
