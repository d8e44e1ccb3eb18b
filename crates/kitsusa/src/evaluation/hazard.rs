use super::domain::{FactorKind, HazardDetails, HazardEvent};
use super::matrix::coordinates;
use super::safety::integrated_hazard_stress;
use super::score::{
    matrix_or_formula, CalculationContext, CalculationMethod, InputError, ScoreResult,
    ScoreSheet, Subdimension,
};
use super::stress::five_stage_to_factor_score;

/// Hazard factor: worst per-event risk, accident history, safety management
/// and ongoing risk. The work-time factor is not applied here.
pub fn calculate_hazard_score(
    ctx: &CalculationContext<'_>,
    details: &HazardDetails,
) -> Result<ScoreResult, InputError> {
    ctx.checked_work_time_factor()?;
    check_events(&details.hazard_events)?;

    let mut sheet = ScoreSheet::default();
    for event in &details.hazard_events {
        let (score, method, notes) = event_score(ctx, event);
        sheet.record(
            Subdimension::Hazard,
            Some(event.hazard_event.clone()),
            score,
            method,
            notes,
        );
    }

    if let Some(stress) = integrated_hazard_stress(details) {
        if let Some(history) = &stress.accident_history {
            sheet.traditional(
                Subdimension::AccidentHistory,
                five_stage_to_factor_score(history.five_stage_score),
                format!(
                    "{} accident(s), {} recurrence risk, five-stage {}",
                    history.total_accidents,
                    history.recurrence_risk.label(),
                    history.five_stage_score
                ),
            );
        }
        if let Some(safety) = &stress.safety_management {
            sheet.traditional(
                Subdimension::SafetyManagement,
                five_stage_to_factor_score(safety.five_stage_score),
                format!("five-stage {}", safety.five_stage_score),
            );
        }
        for risk in &stress.ongoing_risks {
            sheet.record(
                Subdimension::OngoingRisk,
                Some(risk.description.clone()),
                five_stage_to_factor_score(risk.five_stage_score),
                CalculationMethod::Traditional,
                format!(
                    "five-stage {}, {:?} monitoring",
                    risk.five_stage_score, risk.monitoring
                ),
            );
        }
    }

    Ok(sheet.finish(1.0))
}

fn event_score(
    ctx: &CalculationContext<'_>,
    event: &HazardEvent,
) -> (u8, CalculationMethod, String) {
    matrix_or_formula(
        ctx,
        FactorKind::Hazard,
        Subdimension::Hazard,
        Some(coordinates::hazard(event)),
        || {
            let occurrence = event.occurrence_possibility;
            let severity = event.harm_severity;
            (
                ctx.standards.risk_score(occurrence, severity),
                format!(
                    "risk point {} (occurrence {occurrence} x severity {severity})",
                    u16::from(occurrence) * u16::from(severity)
                ),
            )
        },
    )
}

pub(crate) fn out_of_range_axes(event: &HazardEvent) -> Vec<(&'static str, u8)> {
    [
        ("encounter_frequency", event.encounter_frequency),
        ("danger_possibility", event.danger_possibility),
        ("occurrence_possibility", event.occurrence_possibility),
        ("harm_severity", event.harm_severity),
    ]
    .into_iter()
    .filter(|(_, value)| !(1..=5).contains(value))
    .collect()
}

fn check_events(events: &[HazardEvent]) -> Result<(), InputError> {
    for event in events {
        if let Some((axis, value)) = out_of_range_axes(event).into_iter().next() {
            return Err(InputError::HazardAxisOutOfRange {
                event: event.hazard_event.clone(),
                axis,
                value,
            });
        }
    }
    Ok(())
}
