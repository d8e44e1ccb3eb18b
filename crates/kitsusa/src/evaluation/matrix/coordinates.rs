//! Bucketing of raw observations into matrix axis ids.

use serde::{Deserialize, Serialize};

use super::MatrixCoordinate;
use crate::evaluation::domain::{
    EnvironmentalSubstance, FailureAssessment, HazardEvent, ManualInput, Posture,
};

/// Exposure assumed when a substance has no recorded exposure time.
pub const DEFAULT_EXPOSURE_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureQuality {
    Good,
    Bad,
    VeryBad,
}

impl PostureQuality {
    pub fn from_scores(rula: u8, owas: u8) -> Self {
        if rula <= 2 && owas <= 1 {
            PostureQuality::Good
        } else if rula <= 4 && owas <= 2 {
            PostureQuality::Bad
        } else {
            PostureQuality::VeryBad
        }
    }

    pub const fn order(self) -> u8 {
        match self {
            PostureQuality::Good => 1,
            PostureQuality::Bad => 2,
            PostureQuality::VeryBad => 3,
        }
    }
}

/// Y: posture quality and exertion duration, X: perceived strength.
pub fn physical(posture: &Posture, manual: &ManualInput) -> MatrixCoordinate {
    let quality = PostureQuality::from_scores(posture.rula_score, posture.owas_category);
    MatrixCoordinate::new(
        format!("{}-{}", quality.order(), manual.duration.bucket()),
        manual.strength.order().to_string(),
    )
}

/// Y: failure frequency and short/long share, X: impact (moderate when unstated).
pub fn mental(failure: &FailureAssessment) -> MatrixCoordinate {
    let duration = if failure.duration.is_long() { 2 } else { 1 };
    let impact = failure.impact.unwrap_or_default();
    MatrixCoordinate::new(
        format!("{}-{}", failure.level.order(), duration),
        impact.order().to_string(),
    )
}

/// Y: concentration band, X: exposure band.
///
/// Returns `None` when the substance has no usable permissible concentration.
pub fn environmental(substance: &EnvironmentalSubstance) -> Option<MatrixCoordinate> {
    let permissible = substance
        .permissible_concentration
        .filter(|value| value.is_finite() && *value > 0.0)?;
    let ratio_pct = substance.measured_value / permissible * 100.0;
    let concentration = concentration_band(ratio_pct);
    let exposure = exposure_band(substance.exposure_hours.unwrap_or(DEFAULT_EXPOSURE_HOURS));
    Some(MatrixCoordinate::new(
        concentration.to_string(),
        exposure.to_string(),
    ))
}

/// Y: occurrence possibility, X: harm severity. These are the same two axes
/// that `Standards::risk_score` multiplies.
pub fn hazard(event: &HazardEvent) -> MatrixCoordinate {
    MatrixCoordinate::new(
        event.occurrence_possibility.to_string(),
        event.harm_severity.to_string(),
    )
}

pub fn concentration_band(ratio_pct: f64) -> u8 {
    if ratio_pct < 25.0 {
        1
    } else if ratio_pct < 50.0 {
        2
    } else if ratio_pct < 75.0 {
        3
    } else if ratio_pct <= 100.0 {
        4
    } else {
        5
    }
}

pub fn exposure_band(hours: f64) -> u8 {
    if hours < 1.0 {
        1
    } else if hours <= 4.0 {
        2
    } else if hours <= 8.0 {
        3
    } else {
        4
    }
}
