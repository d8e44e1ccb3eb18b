use std::sync::Arc;

use crate::evaluation::domain::{
    EnvironmentalDetails, EnvironmentalSubstance, EvaluationRequest, HazardDetails, HazardEvent,
    PhysicalCheckboxes, PhysicalDetails, Posture, TargetWeight,
};
use crate::evaluation::engine::{EngineOptions, EvaluationEngine};
use crate::evaluation::matrix::MatrixSet;
use crate::evaluation::standards::{Standards, StandardsCatalog};
use crate::evaluation::FactorKind;

pub(super) fn standards() -> Standards {
    StandardsCatalog::embedded()
        .expect("embedded standards load")
        .latest()
        .clone()
}

pub(super) fn matrices() -> MatrixSet {
    MatrixSet::embedded().expect("embedded matrices load")
}

/// The embedded matrices with one cell of `category` removed.
pub(super) fn matrices_without_cell(category: FactorKind, y: &str, x: &str) -> MatrixSet {
    let set = matrices();
    let matrices = set
        .iter()
        .cloned()
        .map(|mut matrix| {
            if matrix.category == category {
                if let Some(row) = matrix.matrix.get_mut(y) {
                    row.remove(x);
                }
            }
            matrix
        })
        .collect();
    MatrixSet::new(matrices).expect("trimmed matrices stay valid")
}

pub(super) fn engine(options: EngineOptions) -> EvaluationEngine {
    EvaluationEngine::new(Arc::new(standards()), Arc::new(matrices()), options)
}

pub(super) fn both_hands(kg: f64) -> PhysicalDetails {
    PhysicalDetails {
        target_weight: Some(TargetWeight {
            both_hands_kg: Some(kg),
            single_hand_kg: None,
        }),
        checkboxes: PhysicalCheckboxes {
            weight_both: true,
            ..PhysicalCheckboxes::default()
        },
        ..PhysicalDetails::default()
    }
}

pub(super) fn posture(name: &str, rula_score: u8, owas_category: u8) -> Posture {
    Posture {
        posture_name: name.to_string(),
        rula_score,
        owas_category,
    }
}

pub(super) fn substance(
    name: &str,
    measured_value: f64,
    permissible_concentration: Option<f64>,
    exposure_hours: Option<f64>,
) -> EnvironmentalSubstance {
    EnvironmentalSubstance {
        substance_name: name.to_string(),
        measured_value,
        permissible_concentration,
        threshold_value: None,
        unit: Some("ppm".to_string()),
        exposure_hours,
    }
}

pub(super) fn hazard_event(
    name: &str,
    encounter_frequency: u8,
    danger_possibility: u8,
    occurrence_possibility: u8,
    harm_severity: u8,
) -> HazardEvent {
    HazardEvent {
        hazard_event: name.to_string(),
        encounter_frequency,
        danger_possibility,
        occurrence_possibility,
        harm_severity,
    }
}

/// A complete header with no factor blocks.
pub(super) fn request(id: &str) -> EvaluationRequest {
    EvaluationRequest {
        evaluation_id: id.to_string(),
        work_name: "Pallet loading".to_string(),
        factory_name: "Hamamatsu plant".to_string(),
        process_name: "Shipping".to_string(),
        updated_by: "safety-officer".to_string(),
        ..EvaluationRequest::default()
    }
}

/// Physical 4, mental absent, environmental 4, hazard 2, two working hours.
pub(super) fn mixed_request(id: &str) -> EvaluationRequest {
    EvaluationRequest {
        physical: Some(both_hands(20.0)),
        environmental: Some(EnvironmentalDetails {
            noise_db: Some(82.0),
            ..EnvironmentalDetails::default()
        }),
        hazard: Some(HazardDetails {
            hazard_events: vec![hazard_event("forklift traffic", 2, 2, 2, 2)],
            ..HazardDetails::default()
        }),
        work_hours: Some(2.0),
        ..request(id)
    }
}
