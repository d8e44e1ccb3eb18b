use serde::{Deserialize, Serialize};

use super::domain::{EvaluationRequest, FactorKind};
use super::hazard::out_of_range_axes;
use super::standards::Standards;

/// Findings from the pre-scoring pass over a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub missing_data: Vec<FactorKind>,
}

/// Collects every error and warning instead of stopping at the first.
pub fn validate_evaluation_data(
    request: &EvaluationRequest,
    standards: &Standards,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let required = [
        ("evaluation_id", &request.evaluation_id),
        ("work_name", &request.work_name),
        ("factory_name", &request.factory_name),
        ("process_name", &request.process_name),
        ("updated_by", &request.updated_by),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("{field} is required"));
        }
    }

    if let Some(hours) = request.work_hours {
        if !hours.is_finite() || hours < 0.0 {
            errors.push(format!("work_hours must be a non-negative number (got {hours})"));
        }
    }

    if let Some(physical) = &request.physical {
        let checkboxes = &physical.checkboxes;
        let target = physical.target_weight.unwrap_or_default();
        if checkboxes.weight_both && target.both_hands_kg.is_none() {
            warnings.push("both-hands weight is checked but no weight was entered".to_string());
        }
        if checkboxes.weight_single && target.single_hand_kg.is_none() {
            warnings.push("single-hand weight is checked but no weight was entered".to_string());
        }
    }

    for (index, posture) in request.postures.iter().enumerate() {
        let position = index + 1;
        if posture.posture_name.trim().is_empty() {
            warnings.push(format!("posture {position}: name is missing"));
        }
        if !(1..=7).contains(&posture.rula_score) {
            errors.push(format!(
                "posture {position}: RULA score must be between 1 and 7 (got {})",
                posture.rula_score
            ));
        }
        if !(1..=4).contains(&posture.owas_category) {
            errors.push(format!(
                "posture {position}: OWAS category must be between 1 and 4 (got {})",
                posture.owas_category
            ));
        }
    }

    for (index, substance) in request.substances.iter().enumerate() {
        let position = index + 1;
        let name = substance.substance_name.trim();
        if name.is_empty() {
            errors.push(format!("substance {position}: name is required"));
        } else if standards.chemical(name).is_none() {
            warnings.push(format!(
                "substance {position}: '{name}' is not in the chemical registry"
            ));
        }
        if !substance.measured_value.is_finite() || substance.measured_value < 0.0 {
            errors.push(format!(
                "substance {position}: measured value must be non-negative (got {})",
                substance.measured_value
            ));
        }
        if substance
            .unit
            .as_deref()
            .map_or(true, |unit| unit.trim().is_empty())
        {
            warnings.push(format!("substance {position}: measurement unit is missing"));
        }
    }

    if let Some(hazard) = &request.hazard {
        for (index, event) in hazard.hazard_events.iter().enumerate() {
            let position = index + 1;
            if event.hazard_event.trim().is_empty() {
                errors.push(format!("hazard event {position}: name is required"));
            }
            for (axis, value) in out_of_range_axes(event) {
                errors.push(format!(
                    "hazard event {position}: {axis} must be between 1 and 5 (got {value})"
                ));
            }
        }
        for (index, record) in hazard.accident_history.iter().enumerate() {
            if record.accident_type.trim().is_empty() {
                warnings.push(format!(
                    "accident {}: type is missing, recurrence cannot be detected",
                    index + 1
                ));
            }
        }
        for (index, risk) in hazard.ongoing_risks.iter().enumerate() {
            if risk.description.trim().is_empty() {
                warnings.push(format!("ongoing risk {}: description is missing", index + 1));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        missing_data: request.missing_factors(),
    }
}
