use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};

use super::EvaluationMatrix;
use crate::evaluation::domain::{FactorKind, RiskLevel};

/// Summary over every defined cell of a matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStatistics {
    pub total_cells: usize,
    pub score_distribution: BTreeMap<u8, usize>,
    pub average_score: f64,
    pub min_score: u8,
    pub max_score: u8,
    pub risk_level_distribution: BTreeMap<RiskLevel, usize>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    y_axis: &'a str,
    x_axis: &'a str,
    score: u8,
    level: &'static str,
    color: &'a str,
}

impl EvaluationMatrix {
    pub fn statistics(&self) -> MatrixStatistics {
        let mut score_distribution = BTreeMap::new();
        let mut risk_level_distribution = BTreeMap::new();
        let mut total_cells = 0usize;
        let mut sum = 0u32;
        let mut min_score = u8::MAX;
        let mut max_score = 0u8;

        for row in self.matrix.values() {
            for cell in row.values() {
                total_cells += 1;
                sum += u32::from(cell.value);
                min_score = min_score.min(cell.value);
                max_score = max_score.max(cell.value);
                *score_distribution.entry(cell.value).or_insert(0) += 1;
                *risk_level_distribution
                    .entry(self.risk_level(cell.value))
                    .or_insert(0) += 1;
            }
        }

        if total_cells == 0 {
            min_score = 0;
        }
        let average_score = if total_cells == 0 {
            0.0
        } else {
            (f64::from(sum) / total_cells as f64 * 100.0).round() / 100.0
        };

        MatrixStatistics {
            total_cells,
            score_distribution,
            average_score,
            min_score,
            max_score,
            risk_level_distribution,
        }
    }

    /// Writes one row per cell with axis labels resolved.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for (y, x, cell) in self.cells() {
            writer.serialize(CsvRow {
                y_axis: self.y_axis.label_for(&y.id),
                x_axis: self.x_axis.label_for(&x.id),
                score: cell.value,
                level: self.risk_level(cell.value).label(),
                color: cell.color.as_deref().unwrap_or(""),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

const PHYSICAL_URGENT: &[&str] = &[
    "Improve working posture immediately",
    "Introduce lifting aids or assistive devices",
    "Schedule regular rest breaks",
];
const PHYSICAL_MODERATE: &[&str] = &[
    "Consider posture improvements",
    "Provide training on safe handling",
];
const MENTAL_URGENT: &[&str] = &[
    "Simplify work procedures",
    "Strengthen double-check arrangements",
    "Reduce workload",
];
const MENTAL_MODERATE: &[&str] = &[
    "Review work procedures",
    "Check proficiency periodically",
];
const ENVIRONMENTAL_URGENT: &[&str] = &[
    "Install local exhaust ventilation",
    "Enforce use of protective equipment",
    "Shorten exposure time",
];
const ENVIRONMENTAL_MODERATE: &[&str] = &[
    "Measure the work environment more often",
    "Inspect ventilation equipment",
];
const HAZARD_URGENT: &[&str] = &[
    "Add safety devices",
    "Fundamentally review work procedures",
    "Prepare emergency response procedures",
];
const HAZARD_MODERATE: &[&str] = &[
    "Strengthen risk management",
    "Hold regular safety training",
];

/// Follow-up actions: urgent from 7, moderate from 4, none below.
pub fn recommendations(category: FactorKind, score: u8) -> &'static [&'static str] {
    let (urgent, moderate) = match category {
        FactorKind::Physical => (PHYSICAL_URGENT, PHYSICAL_MODERATE),
        FactorKind::Mental => (MENTAL_URGENT, MENTAL_MODERATE),
        FactorKind::Environmental => (ENVIRONMENTAL_URGENT, ENVIRONMENTAL_MODERATE),
        FactorKind::Hazard => (HAZARD_URGENT, HAZARD_MODERATE),
    };
    if score >= 7 {
        urgent
    } else if score >= 4 {
        moderate
    } else {
        &[]
    }
}
