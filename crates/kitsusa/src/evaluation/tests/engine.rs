use std::thread;

use super::common::*;
use crate::evaluation::aggregate::ThreeKIndex;
use crate::evaluation::domain::{HazardDetails, RiskLevel};
use crate::evaluation::engine::{EngineOptions, EvaluationEngine, EvaluationError};
use crate::evaluation::safety::{OngoingRisk, PotentialImpact, RecurrenceProbability, RiskStatus};
use crate::evaluation::standards::WorkTimeClass;
use crate::evaluation::FactorKind;

#[test]
fn work_time_factor_is_applied_once_by_default() {
    let engine = engine(EngineOptions::default());

    let outcome = engine
        .evaluate(&mixed_request("EV-100"))
        .expect("evaluation succeeds");

    assert_eq!(outcome.physical.score, 4);
    assert_eq!(outcome.mental.score, 1);
    assert_eq!(outcome.environmental.score, 4);
    assert_eq!(outcome.hazard.score, 2);
    let work_time = outcome.work_time.expect("work hours were given");
    assert_eq!(work_time.class, WorkTimeClass::C);
    assert_eq!(outcome.work_time_factor, 1.3);

    let result = &outcome.result;
    assert_eq!(result.physical_score, 6);
    assert_eq!(result.mental_score, 2);
    assert_eq!(result.environmental_score, 6);
    assert_eq!(result.hazard_score, 3);
    assert_eq!(result.final_kitsusa_score, 6);
    assert_eq!(result.final_3k_index, ThreeKIndex::B);
    assert_eq!(outcome.missing_data, vec![FactorKind::Mental]);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn compounding_applies_work_time_in_calculators_too() {
    let engine = engine(EngineOptions {
        compound_work_time: true,
        ..EngineOptions::default()
    });

    let outcome = engine
        .evaluate(&mixed_request("EV-101"))
        .expect("evaluation succeeds");

    assert_eq!(outcome.physical.score, 6);
    assert_eq!(outcome.result.physical_score, 8);
    assert_eq!(outcome.result.final_3k_index, ThreeKIndex::A);
}

#[test]
fn request_can_disable_matrix_lookups() {
    let engine = engine(EngineOptions::default());
    let mut request = request("EV-102");
    request.hazard = Some(HazardDetails {
        hazard_events: vec![hazard_event("hand tools", 1, 1, 1, 1)],
        ..HazardDetails::default()
    });

    let with_matrix = engine.evaluate(&request).expect("evaluation succeeds");
    assert_eq!(with_matrix.hazard.score, 1);
    assert_eq!(with_matrix.result.final_3k_index, ThreeKIndex::D);
    assert_eq!(with_matrix.work_time, None);
    assert_eq!(with_matrix.work_time_factor, 1.0);

    request.use_matrix = Some(false);
    let traditional = engine.evaluate(&request).expect("evaluation succeeds");
    assert_eq!(traditional.hazard.score, 2);
    assert_eq!(traditional.result.final_3k_index, ThreeKIndex::C);
}

#[test]
fn unresolved_risks_surface_as_priority_actions() {
    let engine = engine(EngineOptions::default());
    let mut request = request("EV-105");
    request.hazard = Some(HazardDetails {
        hazard_events: vec![hazard_event("press", 1, 1, 1, 1)],
        ongoing_risks: vec![OngoingRisk {
            description: "worn die clamp".to_string(),
            recurrence_probability: RecurrenceProbability::High,
            potential_impact: PotentialImpact::Major,
            status: RiskStatus::Unaddressed,
            mitigation_actions: Vec::new(),
        }],
        ..HazardDetails::default()
    });

    let outcome = engine.evaluate(&request).expect("evaluation succeeds");

    assert_eq!(outcome.hazard.score, 10);
    assert_eq!(
        outcome.urgent_actions,
        vec!["Unresolved risk: worn die clamp".to_string()]
    );
    let summary = outcome.summary();
    let mentions = summary
        .priority_actions
        .iter()
        .filter(|action| action.as_str() == "Unresolved risk: worn die clamp")
        .count();
    assert_eq!(mentions, 1);
}

#[test]
fn postures_alone_count_as_physical_data() {
    let engine = engine(EngineOptions::default());
    let mut request = request("EV-103");
    request.postures = vec![posture("overhead reach", 5, 3)];

    let outcome = engine.evaluate(&request).expect("evaluation succeeds");

    assert_eq!(outcome.physical.score, 7);
    assert_eq!(outcome.result.final_3k_index, ThreeKIndex::A);
    assert!(!outcome.missing_data.contains(&FactorKind::Physical));
}

#[test]
fn empty_request_scores_lowest_band() {
    let engine = engine(EngineOptions::default());

    let outcome = engine
        .evaluate(&request("EV-104"))
        .expect("evaluation succeeds");

    assert_eq!(outcome.result.final_kitsusa_score, 1);
    assert_eq!(outcome.result.final_3k_index, ThreeKIndex::D);
    assert_eq!(outcome.missing_data, FactorKind::ALL.to_vec());
    assert_eq!(outcome.summary().risk_level, RiskLevel::Low);
}

#[test]
fn invalid_request_is_rejected_with_report() {
    let engine = engine(EngineOptions::default());
    let mut request = mixed_request("");
    request.postures = vec![posture("kneel", 9, 2)];

    let err = engine.evaluate(&request).expect_err("validation fails");

    match err {
        EvaluationError::Invalid(report) => {
            assert!(!report.is_valid);
            assert_eq!(report.errors.len(), 2);
            assert!(report.errors.iter().any(|e| e.contains("evaluation_id")));
            assert!(report.errors.iter().any(|e| e.contains("RULA")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn summary_recommends_for_demanding_factors() {
    let engine = engine(EngineOptions::default());
    let outcome = engine
        .evaluate(&mixed_request("EV-105"))
        .expect("evaluation succeeds");

    let summary = outcome.summary();

    assert_eq!(summary.risk_level, RiskLevel::High);
    assert_eq!(summary.priority_actions.len(), 3);
    assert!(summary.summary.contains("3K index B"));
    let factors: Vec<FactorKind> = summary
        .recommendations
        .iter()
        .map(|recommendation| recommendation.factor)
        .collect();
    assert_eq!(factors, vec![FactorKind::Physical, FactorKind::Environmental]);
    assert!(summary
        .recommendations
        .iter()
        .all(|recommendation| !recommendation.actions.is_empty()));
}

#[test]
fn repeated_and_concurrent_evaluations_agree() {
    let engine = engine(EngineOptions::default());
    let request = mixed_request("EV-106");
    let expected = engine.evaluate(&request).expect("evaluation succeeds");

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.evaluate(&request)))
            .collect();
        for handle in handles {
            let outcome = handle
                .join()
                .expect("worker thread completes")
                .expect("evaluation succeeds");
            assert_eq!(outcome, expected);
        }
    });
}

#[test]
fn exposes_matrix_information_and_csv() {
    let engine = EvaluationEngine::with_embedded_data(EngineOptions::default())
        .expect("embedded data loads");
    assert_eq!(engine.standards().version, "1.0");

    let information = engine
        .matrix_information(FactorKind::Hazard)
        .expect("hazard matrix present");
    assert_eq!(information.statistics.total_cells, 25);
    assert_eq!(information.matrix.category, FactorKind::Hazard);

    let csv = engine
        .export_matrix(FactorKind::Environmental)
        .expect("csv export succeeds");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("y_axis,x_axis,score,level,color"));
    assert_eq!(lines.count(), 20);
}

#[test]
fn individual_factor_matches_full_evaluation() {
    let engine = engine(EngineOptions::default());
    let request = mixed_request("EV-107");

    let outcome = engine.evaluate(&request).expect("evaluation succeeds");
    let physical = engine
        .calculate_individual_factor(FactorKind::Physical, &request, outcome.work_time_factor)
        .expect("physical computes");

    assert_eq!(&physical, outcome.factor(FactorKind::Physical));
}
