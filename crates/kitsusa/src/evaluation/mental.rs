use std::fmt::Debug;

use super::domain::{FactorKind, FailureAssessment, LevelScore, MentalDetails, TimedLevel};
use super::matrix::coordinates;
use super::score::{
    check_measurement, manual_input_score, matrix_or_formula, scale_score, CalculationContext,
    CalculationMethod, InputError, ScoreResult, ScoreSheet, Subdimension,
};
use super::stress::{
    five_stage_to_factor_score, harassment_stress, integrated_stress, overtime_stress,
};

/// Mental factor: worst of the work-quality ratings, manual input and stress
/// assessments, scaled by the work-time factor.
pub fn calculate_mental_score(
    ctx: &CalculationContext<'_>,
    details: &MentalDetails,
) -> Result<ScoreResult, InputError> {
    let work_time_factor = ctx.checked_work_time_factor()?;
    let overtime_hours = details
        .monthly_overtime_hours
        .map(|hours| check_measurement("monthly_overtime_hours", hours))
        .transpose()?;

    let mut sheet = ScoreSheet::default();

    if let Some(quality) = &details.work_quality {
        if let Some(failure) = &quality.failure {
            let (score, method, notes) = failure_score(ctx, failure);
            sheet.record(Subdimension::Failure, None, score, method, notes);
        }
        record_timed(&mut sheet, Subdimension::Concentration, quality.concentration);
        record_timed(&mut sheet, Subdimension::Cognitive, quality.cognitive_load);
        record_timed(&mut sheet, Subdimension::Emotional, quality.emotional_burden);
        record_timed(&mut sheet, Subdimension::Skill, quality.skill_utilization);
        record_timed(&mut sheet, Subdimension::Control, quality.work_control);
    }

    if let Some(manual) = &details.manual_input {
        sheet.traditional(
            Subdimension::ManualInput,
            manual_input_score(manual),
            format!("{:?} exertion for {}", manual.strength, manual.duration.label()),
        );
    }

    if let Some(stress) = integrated_stress(&details.stress_events) {
        sheet.traditional(
            Subdimension::PsychologicalStress,
            five_stage_to_factor_score(stress.total_score),
            format!(
                "{} event(s), {} dominant, five-stage {}",
                details.stress_events.len(),
                stress.highest_intensity.label(),
                stress.total_score
            ),
        );
    }

    if let Some(hours) = overtime_hours {
        let overtime = overtime_stress(hours);
        sheet.traditional(
            Subdimension::Overtime,
            five_stage_to_factor_score(overtime.five_stage_score),
            format!(
                "{hours} h monthly overtime, {} load",
                overtime.intensity.label()
            ),
        );
    }

    if let Some(assessment) = details.harassment.filter(|assessment| assessment.occurred) {
        let harassment = harassment_stress(&assessment);
        sheet.traditional(
            Subdimension::Harassment,
            five_stage_to_factor_score(harassment.five_stage_score),
            format!(
                "{} harassment, five-stage {}",
                harassment.intensity.label(),
                harassment.five_stage_score
            ),
        );
    }

    Ok(sheet.finish(work_time_factor))
}

fn failure_score(
    ctx: &CalculationContext<'_>,
    failure: &FailureAssessment,
) -> (u8, CalculationMethod, String) {
    matrix_or_formula(
        ctx,
        FactorKind::Mental,
        Subdimension::Failure,
        Some(coordinates::mental(failure)),
        || {
            (
                scale_score(f64::from(failure.level.score()), failure.duration.factor()),
                format!("{:?} failures for {}", failure.level, failure.duration.label()),
            )
        },
    )
}

fn record_timed<L: LevelScore + Debug>(
    sheet: &mut ScoreSheet,
    subdimension: Subdimension,
    rating: Option<TimedLevel<L>>,
) {
    if let Some(rating) = rating {
        let score = scale_score(f64::from(rating.level.score()), rating.duration.factor());
        sheet.traditional(
            subdimension,
            score,
            format!("{:?} for {}", rating.level, rating.duration.label()),
        );
    }
}
