use super::common::*;
use crate::evaluation::domain::{HazardDetails, HazardEvent};
use crate::evaluation::hazard::calculate_hazard_score;
use crate::evaluation::safety::{
    AccidentRecord, AccidentSeverity, ComplianceLevel, IncidentReporting, OngoingRisk,
    PotentialImpact, RecurrenceProbability, RiskAssessmentFrequency, RiskStatus, SafetyGap,
    SafetyManagement, TrainingAdequacy,
};
use crate::evaluation::score::{CalculationContext, CalculationMethod, InputError, Subdimension};
use crate::evaluation::{FactorKind, RiskLevel};
use chrono::NaiveDate;

fn events(events: Vec<HazardEvent>) -> HazardDetails {
    HazardDetails {
        hazard_events: events,
        ..HazardDetails::default()
    }
}

#[test]
fn frequent_severe_event_scores_ten_either_way() {
    let standards = standards();
    let matrices = matrices();
    let details = events(vec![hazard_event("press pinch point", 5, 4, 4, 4)]);

    let ctx = CalculationContext::new(&standards, &matrices);
    let matrix = calculate_hazard_score(&ctx, &details).expect("hazard score computes");
    assert_eq!(matrix.score, 10);

    let traditional = calculate_hazard_score(&ctx.with_matrix(false), &details)
        .expect("hazard score computes");
    assert_eq!(traditional.score, 10);
    assert_eq!(
        traditional.details[0].calculation_method,
        CalculationMethod::Traditional
    );
}

#[test]
fn worst_event_determines_the_score() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);
    let details = events(vec![
        hazard_event("slippery floor", 3, 2, 2, 2),
        hazard_event("overhead crane", 2, 3, 2, 4),
        hazard_event("paper cut", 1, 1, 1, 1),
    ]);

    let result = calculate_hazard_score(&ctx, &details).expect("hazard score computes");

    assert_eq!(result.score, 7);
    assert_eq!(result.factor(Subdimension::Hazard), Some(7));
    assert_eq!(result.components(Subdimension::Hazard).count(), 3);
}

#[test]
fn missing_cell_matches_traditional_result() {
    let standards = standards();
    let details = events(vec![hazard_event("conveyor", 3, 3, 3, 3)]);

    let embedded = matrices();
    let traditional = CalculationContext::new(&standards, &embedded).with_matrix(false);
    let expected = calculate_hazard_score(&traditional, &details).expect("traditional computes");
    assert_eq!(expected.score, 4);

    let trimmed = matrices_without_cell(FactorKind::Hazard, "3", "3");
    let fallback = CalculationContext::new(&standards, &trimmed);
    let actual = calculate_hazard_score(&fallback, &details).expect("fallback computes");

    assert_eq!(actual, expected);
}

#[test]
fn work_time_factor_is_left_to_the_aggregator() {
    let standards = standards();
    let matrices = matrices();
    let details = events(vec![hazard_event("grinder", 3, 3, 3, 2)]);

    let base = CalculationContext::new(&standards, &matrices);
    let plain = calculate_hazard_score(&base, &details).expect("hazard score computes");
    let long_shift = calculate_hazard_score(&base.with_work_time_factor(2.5), &details)
        .expect("hazard score computes");

    assert_eq!(plain.score, 4);
    assert_eq!(plain, long_shift);
}

#[test]
fn no_events_scores_one() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);

    let result = calculate_hazard_score(&ctx, &HazardDetails::default()).expect("empty computes");

    assert_eq!(result.score, 1);
    assert!(result.details.is_empty());
}

#[test]
fn rejects_axes_outside_one_to_five() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);
    let details = events(vec![hazard_event("lathe", 2, 6, 2, 2)]);

    let err = calculate_hazard_score(&ctx, &details).expect_err("axis 6 rejected");

    assert_eq!(
        err,
        InputError::HazardAxisOutOfRange {
            event: "lathe".to_string(),
            axis: "danger_possibility",
            value: 6,
        }
    );
}

#[test]
fn encounter_frequency_does_not_move_the_matrix_cell() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);

    let daily = calculate_hazard_score(&ctx, &events(vec![hazard_event("press", 5, 2, 1, 1)]))
        .expect("hazard score computes");
    let rare = calculate_hazard_score(&ctx, &events(vec![hazard_event("press", 1, 2, 1, 1)]))
        .expect("hazard score computes");

    assert_eq!(daily.score, 1);
    assert_eq!(daily.details[0].calculation_method, CalculationMethod::Matrix);
    assert_eq!(daily, rare);
}

fn accident(kind: &str, severity: AccidentSeverity, year: i32) -> AccidentRecord {
    AccidentRecord {
        accident_type: kind.to_string(),
        severity,
        accident_date: NaiveDate::from_ymd_opt(year, 5, 20).expect("valid date"),
        root_cause: "guard bypassed".to_string(),
        preventive_measures: Vec::new(),
        effectiveness: None,
    }
}

#[test]
fn recurring_accidents_raise_a_quiet_hazard_to_ten() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);
    let details = HazardDetails {
        hazard_events: vec![hazard_event("press", 1, 1, 1, 1)],
        accident_history: vec![
            accident("caught in press", AccidentSeverity::Minor, 2022),
            accident("caught in press", AccidentSeverity::Minor, 2024),
        ],
        ..HazardDetails::default()
    };

    let result = calculate_hazard_score(&ctx, &details).expect("hazard score computes");

    assert_eq!(result.factor(Subdimension::Hazard), Some(1));
    assert_eq!(result.factor(Subdimension::AccidentHistory), Some(10));
    assert_eq!(result.score, 10);
}

#[test]
fn safety_management_and_ongoing_risks_are_sub_dimensions() {
    let standards = standards();
    let matrices = matrices();
    let ctx = CalculationContext::new(&standards, &matrices);
    let details = HazardDetails {
        safety_management: Some(SafetyManagement {
            compliance: ComplianceLevel::PartiallyCompliant,
            training: TrainingAdequacy::Adequate,
            incident_reporting: IncidentReporting::Basic,
            risk_assessment: RiskAssessmentFrequency::Annual,
            gaps: vec![SafetyGap {
                description: "no lockout procedure".to_string(),
                risk_level: RiskLevel::Medium,
                legal_requirement: false,
            }],
        }),
        ongoing_risks: vec![OngoingRisk {
            description: "worn die clamp".to_string(),
            recurrence_probability: RecurrenceProbability::High,
            potential_impact: PotentialImpact::Major,
            status: RiskStatus::Monitored,
            mitigation_actions: vec!["weekly clamp check".to_string()],
        }],
        ..HazardDetails::default()
    };

    let result = calculate_hazard_score(&ctx, &details).expect("hazard score computes");

    assert_eq!(result.factor(Subdimension::SafetyManagement), Some(10));
    assert_eq!(result.factor(Subdimension::OngoingRisk), Some(4));
    assert_eq!(result.factor(Subdimension::AccidentHistory), None);
    let risk = result
        .components(Subdimension::OngoingRisk)
        .next()
        .expect("ongoing risk recorded");
    assert_eq!(risk.subject.as_deref(), Some("worn die clamp"));
    assert_eq!(risk.calculation_method, CalculationMethod::Traditional);
    assert_eq!(result.score, 10);
}
