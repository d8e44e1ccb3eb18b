//! 3K risk evaluation: reference standards, two-axis matrices, the four factor
//! calculators and the final index aggregation.
//!
//! Each calculator tries a matrix cell first and falls back to the threshold
//! formulas in [`Standards`] when a coordinate cannot be resolved.

pub mod aggregate;
pub mod domain;
pub mod engine;
pub mod environmental;
pub mod hazard;
pub mod matrix;
pub mod mental;
pub mod physical;
pub mod safety;
pub mod score;
pub mod standards;
pub mod stress;
pub mod summary;
pub mod validation;

#[cfg(test)]
mod tests;

pub use aggregate::{
    calculate_final_3k_index, AggregationTrace, FactorBreakdown, FinalScoreResult, ThreeKIndex,
};
pub use domain::{
    EnvironmentalDetails, EnvironmentalSubstance, EvaluationRequest, FactorKind, HazardDetails,
    HazardEvent, MentalDetails, PhysicalDetails, Posture, RiskLevel,
};
pub use engine::{
    EmbeddedDataError, EngineOptions, EvaluationEngine, EvaluationError, EvaluationOutcome,
    MatrixInformation,
};
pub use environmental::calculate_environmental_score;
pub use hazard::calculate_hazard_score;
pub use matrix::{
    EvaluationMatrix, InvalidCoordinateError, MatrixCoordinate, MatrixEvaluation,
    MatrixLoadError, MatrixSet, MatrixStatistics,
};
pub use mental::calculate_mental_score;
pub use physical::calculate_physical_score;
pub use safety::{integrated_hazard_stress, IntegratedHazardStress};
pub use score::{
    CalculationContext, CalculationMethod, InputError, ScoreComponent, ScoreResult, Subdimension,
};
pub use standards::{Standards, StandardsCatalog, StandardsError, WorkTimeCategory, WorkTimeClass};
pub use summary::{EvaluationSummary, FactorRecommendation};
pub use validation::{validate_evaluation_data, ValidationReport};
