use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::FactorKind;
use super::score::{check_work_time_factor, scale_score, InputError, MAX_SCORE, MIN_SCORE};

/// Composite 3K classification, A being the most demanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreeKIndex {
    A,
    B,
    C,
    D,
}

impl ThreeKIndex {
    pub const fn classify(score: u8) -> Self {
        match score {
            7.. => ThreeKIndex::A,
            4..=6 => ThreeKIndex::B,
            2..=3 => ThreeKIndex::C,
            _ => ThreeKIndex::D,
        }
    }

    pub const fn range(self) -> &'static str {
        match self {
            ThreeKIndex::A => "7-10",
            ThreeKIndex::B => "4-6",
            ThreeKIndex::C => "2-3",
            ThreeKIndex::D => "1",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ThreeKIndex::A => "improvement required",
            ThreeKIndex::B => "improvement recommended",
            ThreeKIndex::C => "attention needed",
            ThreeKIndex::D => "good",
        }
    }
}

impl fmt::Display for ThreeKIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ThreeKIndex::A => "A",
            ThreeKIndex::B => "B",
            ThreeKIndex::C => "C",
            ThreeKIndex::D => "D",
        };
        f.write_str(letter)
    }
}

/// One score per factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub physical: u8,
    pub mental: u8,
    pub environmental: u8,
    pub hazard: u8,
}

impl FactorBreakdown {
    pub const fn get(&self, factor: FactorKind) -> u8 {
        match factor {
            FactorKind::Physical => self.physical,
            FactorKind::Mental => self.mental,
            FactorKind::Environmental => self.environmental,
            FactorKind::Hazard => self.hazard,
        }
    }

    fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self {
            physical: f(self.physical),
            mental: f(self.mental),
            environmental: f(self.environmental),
            hazard: f(self.hazard),
        }
    }

    fn max(&self) -> u8 {
        self.physical
            .max(self.mental)
            .max(self.environmental)
            .max(self.hazard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexThreshold {
    pub index: ThreeKIndex,
    pub range: String,
    pub description: String,
}

/// Audit trail of the aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationTrace {
    pub original_scores: FactorBreakdown,
    pub work_time_factor: f64,
    pub adjusted_scores: FactorBreakdown,
    pub max_score: u8,
    pub index_mapping: Vec<IndexThreshold>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScoreResult {
    pub physical_score: u8,
    pub mental_score: u8,
    pub environmental_score: u8,
    pub hazard_score: u8,
    pub work_time_score: f64,
    pub final_3k_index: ThreeKIndex,
    pub final_kitsusa_score: u8,
    pub calculation_details: AggregationTrace,
}

/// Scales each factor by the work-time factor, takes the worst, and classifies it.
pub fn calculate_final_3k_index(
    physical: u8,
    mental: u8,
    environmental: u8,
    hazard: u8,
    work_time_factor: f64,
) -> Result<FinalScoreResult, InputError> {
    let work_time_factor = check_work_time_factor(work_time_factor)?;
    let original = FactorBreakdown {
        physical,
        mental,
        environmental,
        hazard,
    };
    for factor in FactorKind::ALL {
        let value = original.get(factor);
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(InputError::ScoreOutOfRange {
                factor: factor.label(),
                value,
            });
        }
    }

    let adjusted = original.map(|raw| scale_score(f64::from(raw), work_time_factor));
    let final_kitsusa_score = adjusted.max();
    let final_3k_index = ThreeKIndex::classify(final_kitsusa_score);

    let index_mapping = [ThreeKIndex::A, ThreeKIndex::B, ThreeKIndex::C, ThreeKIndex::D]
        .into_iter()
        .map(|index| IndexThreshold {
            index,
            range: index.range().to_string(),
            description: index.label().to_string(),
        })
        .collect();

    Ok(FinalScoreResult {
        physical_score: adjusted.physical,
        mental_score: adjusted.mental,
        environmental_score: adjusted.environmental,
        hazard_score: adjusted.hazard,
        work_time_score: work_time_factor,
        final_3k_index,
        final_kitsusa_score,
        calculation_details: AggregationTrace {
            original_scores: original,
            work_time_factor,
            adjusted_scores: adjusted,
            max_score: final_kitsusa_score,
            index_mapping,
        },
    })
}
