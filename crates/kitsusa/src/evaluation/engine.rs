use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::aggregate::{calculate_final_3k_index, FinalScoreResult};
use super::domain::{EvaluationRequest, FactorKind};
use super::environmental::calculate_environmental_score;
use super::hazard::calculate_hazard_score;
use super::matrix::{
    EvaluationMatrix, InvalidCoordinateError, MatrixLoadError, MatrixSet, MatrixStatistics,
};
use super::mental::calculate_mental_score;
use super::physical::calculate_physical_score;
use super::safety::integrated_hazard_stress;
use super::score::{CalculationContext, InputError, ScoreResult, ScoreSheet};
use super::standards::{Standards, StandardsCatalog, StandardsError, WorkTimeCategory};
use super::summary::EvaluationSummary;
use super::validation::{validate_evaluation_data, ValidationReport};

/// Toggles for how the engine combines the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Try matrix cells before the threshold formulas. A request may override this.
    pub use_matrix: bool,
    /// Apply the work-time factor in the physical and mental calculators as
    /// well as in the aggregator.
    pub compound_work_time: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            use_matrix: true,
            compound_work_time: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("evaluation data is invalid: {}", .0.errors.join("; "))]
    Invalid(ValidationReport),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Matrix(#[from] InvalidCoordinateError),
    #[error("failed to write matrix csv: {0}")]
    Csv(#[from] csv::Error),
}

/// A matrix together with its cell statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixInformation {
    pub matrix: EvaluationMatrix,
    pub statistics: MatrixStatistics,
}

/// Everything produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub evaluation_id: String,
    pub work_name: String,
    pub physical: ScoreResult,
    pub mental: ScoreResult,
    pub environmental: ScoreResult,
    pub hazard: ScoreResult,
    pub work_time: Option<WorkTimeCategory>,
    pub work_time_factor: f64,
    pub warnings: Vec<String>,
    pub missing_data: Vec<FactorKind>,
    /// Accident, safety-management and ongoing-risk actions that cannot wait.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urgent_actions: Vec<String>,
    pub result: FinalScoreResult,
}

impl EvaluationOutcome {
    pub fn factor(&self, factor: FactorKind) -> &ScoreResult {
        match factor {
            FactorKind::Physical => &self.physical,
            FactorKind::Mental => &self.mental,
            FactorKind::Environmental => &self.environmental,
            FactorKind::Hazard => &self.hazard,
        }
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary::from_outcome(self)
    }
}

/// Stateless orchestrator over one standards version and one matrix set.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    standards: Arc<Standards>,
    matrices: Arc<MatrixSet>,
    options: EngineOptions,
}

impl EvaluationEngine {
    pub fn new(standards: Arc<Standards>, matrices: Arc<MatrixSet>, options: EngineOptions) -> Self {
        Self {
            standards,
            matrices,
            options,
        }
    }

    /// Engine over the reference data compiled into the crate.
    pub fn with_embedded_data(options: EngineOptions) -> Result<Self, EmbeddedDataError> {
        let catalog = StandardsCatalog::embedded()?;
        let matrices = MatrixSet::embedded()?;
        Ok(Self::new(
            catalog.select(None)?,
            Arc::new(matrices),
            options,
        ))
    }

    pub fn standards(&self) -> &Standards {
        &self.standards
    }

    pub fn matrices(&self) -> &MatrixSet {
        &self.matrices
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome, EvaluationError> {
        let report = validate_evaluation_data(request, &self.standards);
        if !report.is_valid {
            debug!(
                evaluation_id = %request.evaluation_id,
                errors = report.errors.len(),
                "evaluation rejected by validation"
            );
            return Err(EvaluationError::Invalid(report));
        }

        let work_time = request
            .work_hours
            .map(|hours| self.standards.work_time_factor(hours));
        let work_time_factor = work_time.map_or(1.0, |category| category.factor);

        let physical =
            self.calculate_individual_factor(FactorKind::Physical, request, work_time_factor)?;
        let mental =
            self.calculate_individual_factor(FactorKind::Mental, request, work_time_factor)?;
        let environmental =
            self.calculate_individual_factor(FactorKind::Environmental, request, work_time_factor)?;
        let hazard =
            self.calculate_individual_factor(FactorKind::Hazard, request, work_time_factor)?;

        let result = calculate_final_3k_index(
            physical.score,
            mental.score,
            environmental.score,
            hazard.score,
            work_time_factor,
        )?;

        let urgent_actions = request
            .hazard
            .as_ref()
            .and_then(integrated_hazard_stress)
            .map(|stress| stress.urgent_actions)
            .unwrap_or_default();

        info!(
            evaluation_id = %request.evaluation_id,
            final_index = %result.final_3k_index,
            kitsusa_score = result.final_kitsusa_score,
            work_time_factor,
            "evaluation completed"
        );

        Ok(EvaluationOutcome {
            evaluation_id: request.evaluation_id.clone(),
            work_name: request.work_name.clone(),
            physical,
            mental,
            environmental,
            hazard,
            work_time,
            work_time_factor,
            warnings: report.warnings,
            missing_data: report.missing_data,
            urgent_actions,
            result,
        })
    }

    /// Scores one factor of a request. Absent factor blocks score 1.
    ///
    /// Physical and mental only receive `work_time_factor` when the engine
    /// compounds work time; otherwise the aggregator applies it once.
    pub fn calculate_individual_factor(
        &self,
        factor: FactorKind,
        request: &EvaluationRequest,
        work_time_factor: f64,
    ) -> Result<ScoreResult, EvaluationError> {
        let calculator_factor = if self.options.compound_work_time {
            work_time_factor
        } else {
            1.0
        };
        let ctx = CalculationContext::new(&self.standards, &self.matrices)
            .with_work_time_factor(calculator_factor)
            .with_matrix(request.use_matrix.unwrap_or(self.options.use_matrix));

        let result = match factor {
            FactorKind::Physical => match &request.physical {
                Some(details) => calculate_physical_score(&ctx, details, &request.postures)?,
                None if !request.postures.is_empty() => {
                    calculate_physical_score(&ctx, &Default::default(), &request.postures)?
                }
                None => ScoreSheet::default().finish(1.0),
            },
            FactorKind::Mental => match &request.mental {
                Some(details) => calculate_mental_score(&ctx, details)?,
                None => ScoreSheet::default().finish(1.0),
            },
            FactorKind::Environmental => {
                if request.environmental.is_none() && request.substances.is_empty() {
                    ScoreSheet::default().finish(1.0)
                } else {
                    let details = request.environmental.clone().unwrap_or_default();
                    calculate_environmental_score(&ctx, &details, &request.substances)?
                }
            }
            FactorKind::Hazard => match &request.hazard {
                Some(details) => calculate_hazard_score(&ctx, details)?,
                None => ScoreSheet::default().finish(1.0),
            },
        };
        Ok(result)
    }

    pub fn matrix_information(&self, factor: FactorKind) -> Option<MatrixInformation> {
        self.matrices.get(factor).map(|matrix| MatrixInformation {
            matrix: matrix.clone(),
            statistics: matrix.statistics(),
        })
    }

    pub fn export_matrix(&self, factor: FactorKind) -> Result<String, EvaluationError> {
        let matrix = self
            .matrices
            .get(factor)
            .ok_or(InvalidCoordinateError::MatrixUnavailable(factor))?;
        Ok(matrix.to_csv()?)
    }
}

/// Failure loading the compiled-in reference data.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddedDataError {
    #[error(transparent)]
    Standards(#[from] StandardsError),
    #[error(transparent)]
    Matrix(#[from] MatrixLoadError),
}
