//! Two-axis risk matrices keyed by discretised coordinates.

pub mod coordinates;
mod insights;

pub use insights::{recommendations, MatrixStatistics};

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{FactorKind, RiskLevel};

const EMBEDDED_MATRICES: &str = include_str!("../../../data/matrices.json");

/// Raised to the calling calculator when a coordinate has no cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCoordinateError {
    #[error("no {0} matrix is loaded")]
    MatrixUnavailable(FactorKind),
    #[error("{category} matrix has no cell at y={y}, x={x}")]
    MissingCell {
        category: FactorKind,
        y: String,
        x: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum MatrixLoadError {
    #[error("failed to parse matrix data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read matrix file: {0}")]
    Io(#[from] std::io::Error),
    #[error("more than one {0} matrix was supplied")]
    DuplicateCategory(FactorKind),
    #[error("matrix {matrix} cell ({y}, {x}) has value {value} outside 1..=10")]
    CellOutOfRange {
        matrix: String,
        y: String,
        x: String,
        value: u8,
    },
    #[error("matrix {matrix} references unknown {axis} level '{id}'")]
    UnknownAxisLevel {
        matrix: String,
        axis: &'static str,
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLevel {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub levels: Vec<AxisLevel>,
}

impl Axis {
    pub fn level(&self, id: &str) -> Option<&AxisLevel> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn ordered(&self) -> Vec<&AxisLevel> {
        let mut levels: Vec<&AxisLevel> = self.levels.iter().collect();
        levels.sort_by_key(|level| level.order);
        levels
    }

    fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.level(id).map_or(id, |level| level.label.as_str())
    }

    fn ids(&self) -> String {
        self.ordered()
            .iter()
            .map(|level| level.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A risk table for one factor: `matrix[y][x]` holds the cell score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMatrix {
    pub id: String,
    pub name: String,
    pub category: FactorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub effective_date: NaiveDate,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub matrix: BTreeMap<String, BTreeMap<String, MatrixCell>>,
    pub color_scheme: BTreeMap<u8, RiskLevel>,
}

impl EvaluationMatrix {
    pub fn cell(&self, y: &str, x: &str) -> Option<&MatrixCell> {
        self.matrix.get(y).and_then(|row| row.get(x))
    }

    pub fn risk_level(&self, score: u8) -> RiskLevel {
        self.color_scheme
            .get(&score)
            .copied()
            .unwrap_or_else(|| RiskLevel::for_score(score))
    }

    /// Cells in axis order, skipping coordinates without a cell.
    pub fn cells(&self) -> impl Iterator<Item = (&AxisLevel, &AxisLevel, &MatrixCell)> + '_ {
        let xs = self.x_axis.ordered();
        self.y_axis.ordered().into_iter().flat_map(move |y| {
            xs.clone()
                .into_iter()
                .filter_map(move |x| self.cell(&y.id, &x.id).map(|cell| (y, x, cell)))
        })
    }

    fn validate(&self) -> Result<(), MatrixLoadError> {
        for (y, row) in &self.matrix {
            if self.y_axis.level(y).is_none() {
                return Err(MatrixLoadError::UnknownAxisLevel {
                    matrix: self.id.clone(),
                    axis: "y",
                    id: y.clone(),
                });
            }
            for (x, cell) in row {
                if self.x_axis.level(x).is_none() {
                    return Err(MatrixLoadError::UnknownAxisLevel {
                        matrix: self.id.clone(),
                        axis: "x",
                        id: x.clone(),
                    });
                }
                if !(1..=10).contains(&cell.value) {
                    return Err(MatrixLoadError::CellOutOfRange {
                        matrix: self.id.clone(),
                        y: y.clone(),
                        x: x.clone(),
                        value: cell.value,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A `(y, x)` pair of axis level ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixCoordinate {
    pub y: String,
    pub x: String,
}

impl MatrixCoordinate {
    pub fn new(y: impl Into<String>, x: impl Into<String>) -> Self {
        Self {
            y: y.into(),
            x: x.into(),
        }
    }
}

/// A looked-up cell with its risk level and follow-up actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixEvaluation {
    pub category: FactorKind,
    pub coordinate: MatrixCoordinate,
    pub score: u8,
    pub level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
struct MatrixFile {
    matrices: Vec<EvaluationMatrix>,
}

/// The loaded matrices, at most one per factor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixSet {
    matrices: BTreeMap<FactorKind, EvaluationMatrix>,
}

impl MatrixSet {
    pub fn new(matrices: Vec<EvaluationMatrix>) -> Result<Self, MatrixLoadError> {
        let mut set = Self::default();
        for matrix in matrices {
            matrix.validate()?;
            match set.matrices.entry(matrix.category) {
                Entry::Occupied(_) => {
                    return Err(MatrixLoadError::DuplicateCategory(matrix.category))
                }
                Entry::Vacant(slot) => {
                    slot.insert(matrix);
                }
            }
        }
        Ok(set)
    }

    /// Matrices compiled into the crate.
    pub fn embedded() -> Result<Self, MatrixLoadError> {
        Self::from_json(EMBEDDED_MATRICES)
    }

    pub fn from_json(json: &str) -> Result<Self, MatrixLoadError> {
        let file: MatrixFile = serde_json::from_str(json)?;
        Self::new(file.matrices)
    }

    pub fn from_path(path: &Path) -> Result<Self, MatrixLoadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, category: FactorKind) -> Option<&EvaluationMatrix> {
        self.matrices.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvaluationMatrix> {
        self.matrices.values()
    }

    pub fn lookup(
        &self,
        category: FactorKind,
        y: &str,
        x: &str,
    ) -> Result<&MatrixCell, InvalidCoordinateError> {
        let matrix = self
            .get(category)
            .ok_or(InvalidCoordinateError::MatrixUnavailable(category))?;
        matrix
            .cell(y, x)
            .ok_or_else(|| InvalidCoordinateError::MissingCell {
                category,
                y: y.to_string(),
                x: x.to_string(),
            })
    }

    pub fn evaluate(
        &self,
        category: FactorKind,
        coordinate: &MatrixCoordinate,
    ) -> Result<MatrixEvaluation, InvalidCoordinateError> {
        let cell = self.lookup(category, &coordinate.y, &coordinate.x)?;
        let level = self
            .get(category)
            .map_or_else(|| RiskLevel::for_score(cell.value), |m| m.risk_level(cell.value));

        Ok(MatrixEvaluation {
            category,
            coordinate: coordinate.clone(),
            score: cell.value,
            level,
            description: cell.description.clone(),
            recommendations: recommendations(category, cell.value)
                .iter()
                .map(|action| action.to_string())
                .collect(),
        })
    }

    /// Reports every problem with a coordinate rather than the first.
    pub fn validate_coordinate(&self, category: FactorKind, y: &str, x: &str) -> CoordinateValidation {
        let mut errors = Vec::new();
        match self.get(category) {
            None => errors.push(format!("no {category} matrix is loaded")),
            Some(matrix) => {
                if matrix.y_axis.level(y).is_none() {
                    errors.push(format!(
                        "invalid y coordinate '{y}' (valid: {})",
                        matrix.y_axis.ids()
                    ));
                }
                if matrix.x_axis.level(x).is_none() {
                    errors.push(format!(
                        "invalid x coordinate '{x}' (valid: {})",
                        matrix.x_axis.ids()
                    ));
                }
                if errors.is_empty() && matrix.cell(y, x).is_none() {
                    errors.push(format!("no cell defined at y={y}, x={x}"));
                }
            }
        }

        CoordinateValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrices() -> MatrixSet {
        MatrixSet::embedded().expect("embedded matrices load")
    }

    #[test]
    fn embedded_set_has_all_factors() {
        let set = matrices();
        for factor in FactorKind::ALL {
            let matrix = set.get(factor).expect("matrix present");
            assert_eq!(matrix.category, factor);
            assert_eq!(matrix.version, "1.0");
        }
    }

    #[test]
    fn lookup_reads_cells() {
        let set = matrices();
        let cell = set
            .lookup(FactorKind::Physical, "3-3", "1")
            .expect("cell exists");
        assert_eq!(cell.value, 7);
        assert_eq!(
            set.lookup(FactorKind::Mental, "4-2", "1")
                .expect("cell exists")
                .value,
            7
        );
        assert_eq!(
            set.lookup(FactorKind::Environmental, "1", "4")
                .expect("cell exists")
                .value,
            4
        );
    }

    #[test]
    fn lookup_miss_is_typed() {
        let set = matrices();
        assert_eq!(
            set.lookup(FactorKind::Hazard, "6", "1"),
            Err(InvalidCoordinateError::MissingCell {
                category: FactorKind::Hazard,
                y: "6".to_string(),
                x: "1".to_string(),
            })
        );
        assert_eq!(
            MatrixSet::default().lookup(FactorKind::Hazard, "1", "1"),
            Err(InvalidCoordinateError::MatrixUnavailable(FactorKind::Hazard))
        );
    }

    #[test]
    fn evaluate_attaches_level_and_recommendations() {
        let set = matrices();
        let evaluation = set
            .evaluate(FactorKind::Hazard, &MatrixCoordinate::new("4", "4"))
            .expect("cell exists");
        assert_eq!(evaluation.score, 10);
        assert_eq!(evaluation.level, RiskLevel::Critical);
        assert!(!evaluation.recommendations.is_empty());

        let evaluation = set
            .evaluate(FactorKind::Hazard, &MatrixCoordinate::new("1", "1"))
            .expect("cell exists");
        assert_eq!(evaluation.level, RiskLevel::Low);
        assert!(evaluation.recommendations.is_empty());
    }

    #[test]
    fn validate_coordinate_lists_valid_ids() {
        let set = matrices();
        let report = set.validate_coordinate(FactorKind::Mental, "5-1", "9");
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("1-1, 1-2"));

        assert!(set.validate_coordinate(FactorKind::Mental, "2-2", "3").is_valid);
    }

    #[test]
    fn loading_rejects_bad_cells_and_duplicates() {
        let mut matrix = matrices()
            .get(FactorKind::Hazard)
            .cloned()
            .expect("hazard matrix");
        let duplicate = matrix.clone();
        assert!(matches!(
            MatrixSet::new(vec![matrix.clone(), duplicate]),
            Err(MatrixLoadError::DuplicateCategory(FactorKind::Hazard))
        ));

        if let Some(cell) = matrix
            .matrix
            .get_mut("1")
            .and_then(|row| row.get_mut("1"))
        {
            cell.value = 0;
        }
        assert!(matches!(
            MatrixSet::new(vec![matrix]),
            Err(MatrixLoadError::CellOutOfRange { value: 0, .. })
        ));
    }
}
