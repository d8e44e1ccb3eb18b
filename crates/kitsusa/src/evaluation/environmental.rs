use super::domain::{EnvironmentalDetails, EnvironmentalSubstance, FactorKind};
use super::matrix::coordinates;
use super::score::{
    check_measurement, matrix_or_formula, CalculationContext, CalculationMethod, InputError,
    ScoreResult, ScoreSheet, Subdimension,
};

/// Environmental factor: worst of substances and physical conditions. The
/// work-time factor is not applied here.
pub fn calculate_environmental_score(
    ctx: &CalculationContext<'_>,
    details: &EnvironmentalDetails,
    substances: &[EnvironmentalSubstance],
) -> Result<ScoreResult, InputError> {
    ctx.checked_work_time_factor()?;
    check_substances(substances)?;

    let standards = ctx.standards;
    let mut sheet = ScoreSheet::default();

    for substance in substances {
        let (score, method, notes) = substance_score(ctx, substance);
        sheet.record(
            Subdimension::Substances,
            Some(substance.substance_name.clone()),
            score,
            method,
            notes,
        );
    }

    if let Some(celsius) = details.temperature_c {
        if !celsius.is_finite() {
            return Err(InputError::InvalidMeasurement {
                field: "temperature_c".to_string(),
                value: celsius,
            });
        }
        sheet.traditional(
            Subdimension::Temperature,
            standards.temperature_score(celsius),
            format!("{celsius} °C"),
        );
    }

    if let Some(db) = details.noise_db {
        let db = check_measurement("noise_db", db)?;
        sheet.traditional(
            Subdimension::Noise,
            standards.noise_score(db),
            format!("{db} dB"),
        );
    }

    if let Some(dust) = details.dust_mg_m3 {
        let dust = check_measurement("dust_mg_m3", dust)?;
        sheet.traditional(
            Subdimension::Dust,
            standards.dust_score(dust),
            format!("{dust} mg/m3"),
        );
    }

    if let Some(vibration) = details.vibration_m_s2 {
        let vibration = check_measurement("vibration_m_s2", vibration)?;
        sheet.traditional(
            Subdimension::Vibration,
            standards.vibration_score(vibration),
            format!("{vibration} m/s2"),
        );
    }

    if let Some(level) = details.contamination {
        sheet.traditional(
            Subdimension::Contamination,
            standards.contamination_score(level),
            format!("{level:?}"),
        );
    }

    Ok(sheet.finish(1.0))
}

fn substance_score(
    ctx: &CalculationContext<'_>,
    substance: &EnvironmentalSubstance,
) -> (u8, CalculationMethod, String) {
    matrix_or_formula(
        ctx,
        FactorKind::Environmental,
        Subdimension::Substances,
        coordinates::environmental(substance),
        || {
            let standards = ctx.standards;
            let measured = substance.measured_value;
            if standards.chemical(&substance.substance_name).is_some() {
                (
                    standards.chemical_score(&substance.substance_name, measured),
                    format!("registry thresholds, measured {measured}"),
                )
            } else {
                (
                    standards.chemical_ratio_score(measured, substance.permissible_concentration),
                    format!("concentration ratio, measured {measured}"),
                )
            }
        },
    )
}

fn check_substances(substances: &[EnvironmentalSubstance]) -> Result<(), InputError> {
    for substance in substances {
        check_measurement(
            &format!("{} measured_value", substance.substance_name),
            substance.measured_value,
        )?;
        if let Some(hours) = substance.exposure_hours {
            check_measurement(&format!("{} exposure_hours", substance.substance_name), hours)?;
        }
    }
    Ok(())
}
