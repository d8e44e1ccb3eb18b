use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{FactorKind, ManualInput};
use super::matrix::{MatrixCoordinate, MatrixSet};
use super::standards::Standards;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Named sub-dimensions contributing to a factor score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subdimension {
    Weight,
    Muscle,
    Gear,
    Eye,
    Posture,
    ManualInput,
    Failure,
    Concentration,
    Cognitive,
    Emotional,
    Skill,
    Control,
    PsychologicalStress,
    Overtime,
    Harassment,
    Substances,
    Temperature,
    Noise,
    Dust,
    Vibration,
    Contamination,
    Hazard,
    AccidentHistory,
    SafetyManagement,
    OngoingRisk,
}

/// Whether a sub-score came from a matrix cell or from the threshold formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Matrix,
    Traditional,
}

/// Discrete contribution to a factor score, kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub subdimension: Subdimension,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub score: u8,
    pub calculation_method: CalculationMethod,
    pub notes: String,
}

/// Factor score with its per-subdimension maxima and the full trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub factors: BTreeMap<Subdimension, u8>,
    pub details: Vec<ScoreComponent>,
}

impl ScoreResult {
    pub fn factor(&self, subdimension: Subdimension) -> Option<u8> {
        self.factors.get(&subdimension).copied()
    }

    pub fn components(&self, subdimension: Subdimension) -> impl Iterator<Item = &ScoreComponent> {
        self.details
            .iter()
            .filter(move |component| component.subdimension == subdimension)
    }
}

/// Inputs rejected before any scoring happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("RULA score {value} for posture '{posture}' is outside 1..=7")]
    RulaOutOfRange { posture: String, value: u8 },
    #[error("OWAS category {value} for posture '{posture}' is outside 1..=4")]
    OwasOutOfRange { posture: String, value: u8 },
    #[error("{axis} {value} for hazard '{event}' is outside 1..=5")]
    HazardAxisOutOfRange {
        event: String,
        axis: &'static str,
        value: u8,
    },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidMeasurement { field: String, value: f64 },
    #[error("work-time factor must be finite and positive (got {0})")]
    InvalidWorkTimeFactor(f64),
    #[error("{factor} score {value} is outside 1..=10")]
    ScoreOutOfRange { factor: &'static str, value: u8 },
}

/// Shared, read-only inputs for the factor calculators.
#[derive(Debug, Clone, Copy)]
pub struct CalculationContext<'a> {
    pub standards: &'a Standards,
    pub matrices: &'a MatrixSet,
    pub work_time_factor: f64,
    pub use_matrix: bool,
}

impl<'a> CalculationContext<'a> {
    pub fn new(standards: &'a Standards, matrices: &'a MatrixSet) -> Self {
        Self {
            standards,
            matrices,
            work_time_factor: 1.0,
            use_matrix: true,
        }
    }

    pub fn with_work_time_factor(mut self, factor: f64) -> Self {
        self.work_time_factor = factor;
        self
    }

    pub fn with_matrix(mut self, use_matrix: bool) -> Self {
        self.use_matrix = use_matrix;
        self
    }

    pub(crate) fn checked_work_time_factor(&self) -> Result<f64, InputError> {
        check_work_time_factor(self.work_time_factor)
    }
}

pub(crate) fn check_work_time_factor(factor: f64) -> Result<f64, InputError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(InputError::InvalidWorkTimeFactor(factor))
    }
}

pub(crate) fn check_measurement(field: &str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputError::InvalidMeasurement {
            field: field.to_string(),
            value,
        })
    }
}

/// `ceil(base × factor)` clamped to the score range.
///
/// A small epsilon keeps products such as `10 × 0.7` from rounding up past
/// their exact value.
pub fn scale_score(base: f64, factor: f64) -> u8 {
    let scaled = (base * factor - 1e-9).ceil();
    scaled.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

/// Tries the matrix cell at `coordinate` and falls back to `formula` when
/// matrices are disabled, no coordinate could be derived, or the cell is
/// missing.
pub(crate) fn matrix_or_formula(
    ctx: &CalculationContext<'_>,
    category: FactorKind,
    subdimension: Subdimension,
    coordinate: Option<MatrixCoordinate>,
    formula: impl FnOnce() -> (u8, String),
) -> (u8, CalculationMethod, String) {
    if ctx.use_matrix {
        match coordinate {
            Some(coordinate) => {
                match ctx
                    .matrices
                    .lookup(category, &coordinate.y, &coordinate.x)
                {
                    Ok(cell) => {
                        return (
                            cell.value,
                            CalculationMethod::Matrix,
                            format!("matrix cell y={} x={}", coordinate.y, coordinate.x),
                        )
                    }
                    Err(err) => debug!(
                        category = %category,
                        y = %coordinate.y,
                        x = %coordinate.x,
                        subdimension = ?subdimension,
                        error = %err,
                        "matrix lookup failed, using traditional formula"
                    ),
                }
            }
            None => debug!(
                category = %category,
                subdimension = ?subdimension,
                "no matrix coordinate, using traditional formula"
            ),
        }
    }

    let (score, notes) = formula();
    (score, CalculationMethod::Traditional, notes)
}

pub(crate) fn manual_input_score(input: &ManualInput) -> u8 {
    scale_score(f64::from(input.strength.score()), input.duration.factor())
}

/// Accumulates components while a calculator walks its sub-dimensions.
#[derive(Debug, Default)]
pub(crate) struct ScoreSheet {
    factors: BTreeMap<Subdimension, u8>,
    details: Vec<ScoreComponent>,
}

impl ScoreSheet {
    pub(crate) fn record(
        &mut self,
        subdimension: Subdimension,
        subject: Option<String>,
        score: u8,
        calculation_method: CalculationMethod,
        notes: String,
    ) {
        let score = score.clamp(MIN_SCORE, MAX_SCORE);
        self.factors
            .entry(subdimension)
            .and_modify(|current| *current = (*current).max(score))
            .or_insert(score);
        self.details.push(ScoreComponent {
            subdimension,
            subject,
            score,
            calculation_method,
            notes,
        });
    }

    pub(crate) fn traditional(&mut self, subdimension: Subdimension, score: u8, notes: String) {
        self.record(
            subdimension,
            None,
            score,
            CalculationMethod::Traditional,
            notes,
        );
    }

    /// Base score is the worst sub-dimension. An empty sheet scores 1 and is
    /// not scaled.
    pub(crate) fn finish(self, multiplier: f64) -> ScoreResult {
        let score = match self.factors.values().copied().max() {
            Some(base) => scale_score(f64::from(base), multiplier),
            None => MIN_SCORE,
        };
        ScoreResult {
            score,
            factors: self.factors,
            details: self.details,
        }
    }
}
