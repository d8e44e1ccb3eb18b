use super::domain::{FactorKind, HandType, PhysicalDetails, Posture};
use super::matrix::coordinates;
use super::score::{
    check_measurement, manual_input_score, matrix_or_formula, CalculationContext,
    CalculationMethod, InputError, ScoreResult, ScoreSheet, Subdimension,
};

/// Physical factor: worst of weight, force, gear, eye strain, postures and
/// manual input, scaled by the work-time factor.
pub fn calculate_physical_score(
    ctx: &CalculationContext<'_>,
    details: &PhysicalDetails,
    postures: &[Posture],
) -> Result<ScoreResult, InputError> {
    let work_time_factor = ctx.checked_work_time_factor()?;
    check_postures(postures)?;

    let standards = ctx.standards;
    let checkboxes = &details.checkboxes;
    let mut sheet = ScoreSheet::default();

    if let Some(target) = &details.target_weight {
        let mut score = 1;
        let mut notes = Vec::new();
        if let (true, Some(kg)) = (checkboxes.weight_both, target.both_hands_kg) {
            let kg = check_measurement("target_weight.both_hands_kg", kg)?;
            let both = standards.weight_score(kg, HandType::BothHands, &details.weight_conditions);
            notes.push(format!("both hands {kg} kg -> {both}"));
            score = score.max(both);
        }
        if let (true, Some(kg)) = (checkboxes.weight_single, target.single_hand_kg) {
            let kg = check_measurement("target_weight.single_hand_kg", kg)?;
            let single =
                standards.weight_score(kg, HandType::SingleHand, &details.weight_conditions);
            notes.push(format!("single hand {kg} kg -> {single}"));
            score = score.max(single);
        }
        if notes.is_empty() {
            notes.push("no checked load".to_string());
        }
        sheet.traditional(Subdimension::Weight, score, notes.join("; "));
    }

    if let (true, Some(kg)) = (checkboxes.muscle, details.muscle_force_kg) {
        let kg = check_measurement("muscle_force_kg", kg)?;
        let score = standards.muscle_force_score(kg);
        sheet.traditional(Subdimension::Muscle, score, format!("muscle force {kg} kg"));
    }

    if let (true, Some(pct)) = (checkboxes.gear, details.protective_gear_pct) {
        let pct = check_measurement("protective_gear_pct", pct)?;
        let score = standards.protective_gear_score(pct);
        sheet.traditional(
            Subdimension::Gear,
            score,
            format!("protective gear worn {pct}% of the time"),
        );
    }

    if let (true, Some(pct)) = (checkboxes.eye, details.eye_strain_pct) {
        let pct = check_measurement("eye_strain_pct", pct)?;
        let score = standards.eye_strain_score(pct);
        sheet.traditional(
            Subdimension::Eye,
            score,
            format!("close visual work {pct}% of the time"),
        );
    }

    for posture in postures {
        let (score, method, notes) = posture_score(ctx, details, posture);
        sheet.record(
            Subdimension::Posture,
            Some(posture.posture_name.clone()),
            score,
            method,
            notes,
        );
    }

    if let Some(manual) = &details.manual_input {
        let score = manual_input_score(manual);
        sheet.traditional(
            Subdimension::ManualInput,
            score,
            format!("{:?} exertion for {}", manual.strength, manual.duration.label()),
        );
    }

    Ok(sheet.finish(work_time_factor))
}

fn posture_score(
    ctx: &CalculationContext<'_>,
    details: &PhysicalDetails,
    posture: &Posture,
) -> (u8, CalculationMethod, String) {
    let coordinate = details
        .manual_input
        .as_ref()
        .map(|manual| coordinates::physical(posture, manual));

    matrix_or_formula(
        ctx,
        FactorKind::Physical,
        Subdimension::Posture,
        coordinate,
        || {
            // Ranges were checked up front, so both lookups resolve.
            let rula = ctx
                .standards
                .rula_evaluation(posture.rula_score)
                .map_or(1, |evaluation| evaluation.score);
            let owas = ctx
                .standards
                .owas_evaluation(posture.owas_category)
                .map_or(1, |evaluation| evaluation.score);
            (
                rula.max(owas),
                format!(
                    "RULA {} -> {rula}, OWAS {} -> {owas}",
                    posture.rula_score, posture.owas_category
                ),
            )
        },
    )
}

pub(crate) fn check_postures(postures: &[Posture]) -> Result<(), InputError> {
    for posture in postures {
        if !(1..=7).contains(&posture.rula_score) {
            return Err(InputError::RulaOutOfRange {
                posture: posture.posture_name.clone(),
                value: posture.rula_score,
            });
        }
        if !(1..=4).contains(&posture.owas_category) {
            return Err(InputError::OwasOutOfRange {
                posture: posture.posture_name.clone(),
                value: posture.owas_category,
            });
        }
    }
    Ok(())
}
