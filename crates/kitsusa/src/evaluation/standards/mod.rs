//! Reference thresholds used by the traditional scoring formulas.
//!
//! Every lookup is a pure function over an immutable [`Standards`] version.
//! Versions are grouped in a [`StandardsCatalog`] and selected by effective date.

mod catalog;

pub use catalog::StandardsCatalog;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ContaminationLevel, HandType, LiftFrequency, PostureCondition, WeightConditions,
    WorkIntensity,
};

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("standards catalog contains no versions")]
    Empty,
    #[error("no standards version is effective on {0}")]
    NoneEffective(NaiveDate),
    #[error("standards version {version}: {reason}")]
    Invalid { version: String, reason: String },
    #[error("failed to parse standards data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read standards file: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub threshold: f64,
    pub score: u8,
}

/// Ordered thresholds checked first to last; `otherwise` applies when none match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<Band>,
    pub otherwise: u8,
}

impl BandTable {
    pub fn at_or_above(&self, value: f64) -> u8 {
        self.scaled_at_or_above(value, 1.0)
    }

    pub fn at_or_below(&self, value: f64) -> u8 {
        self.bands
            .iter()
            .find(|band| value <= band.threshold)
            .map_or(self.otherwise, |band| band.score)
    }

    fn scaled_at_or_above(&self, value: f64, scale: f64) -> u8 {
        self.bands
            .iter()
            .find(|band| value >= band.threshold * scale)
            .map_or(self.otherwise, |band| band.score)
    }

    /// `at_or_above` tables need falling thresholds, `at_or_below` ones rising.
    fn is_ordered(&self, descending: bool) -> bool {
        self.bands.windows(2).all(|pair| {
            if descending {
                pair[0].threshold > pair[1].threshold
            } else {
                pair[0].threshold < pair[1].threshold
            }
        })
    }

    fn scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.bands
            .iter()
            .map(|band| band.score)
            .chain(std::iter::once(self.otherwise))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLevel {
    Acceptable,
    Investigate,
    ChangeSoon,
    ChangeNow,
}

/// Result of a RULA or OWAS lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureEvaluation {
    pub level: ActionLevel,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulaBand {
    pub min: u8,
    pub max: u8,
    pub level: ActionLevel,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwasCategory {
    pub category: u8,
    pub level: ActionLevel,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkTypeFactors {
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyFactors {
    pub rare: f64,
    pub occasional: f64,
    pub frequent: f64,
    pub continuous: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureFactors {
    pub optimal: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStandards {
    pub both_hands: BandTable,
    pub single_hand: BandTable,
    pub work_type: WorkTypeFactors,
    pub frequency: FrequencyFactors,
    pub posture: PostureFactors,
}

impl WeightStandards {
    /// Product of the condition factors; lower values tighten the bands.
    pub fn adjustment(&self, conditions: &WeightConditions) -> f64 {
        let work = match conditions.work {
            WorkIntensity::Light => self.work_type.light,
            WorkIntensity::Moderate => self.work_type.moderate,
            WorkIntensity::Heavy => self.work_type.heavy,
        };
        let frequency = match conditions.frequency {
            LiftFrequency::Rare => self.frequency.rare,
            LiftFrequency::Occasional => self.frequency.occasional,
            LiftFrequency::Frequent => self.frequency.frequent,
            LiftFrequency::Continuous => self.frequency.continuous,
        };
        let posture = match conditions.posture {
            PostureCondition::Optimal => self.posture.optimal,
            PostureCondition::Good => self.posture.good,
            PostureCondition::Fair => self.posture.fair,
            PostureCondition::Poor => self.posture.poor,
        };
        work * frequency * posture
    }

    fn factors(&self) -> [f64; 11] {
        [
            self.work_type.light,
            self.work_type.moderate,
            self.work_type.heavy,
            self.frequency.rare,
            self.frequency.occasional,
            self.frequency.frequent,
            self.frequency.continuous,
            self.posture.optimal,
            self.posture.good,
            self.posture.fair,
            self.posture.poor,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalStandards {
    pub rula: Vec<RulaBand>,
    pub owas: Vec<OwasCategory>,
    pub weight: WeightStandards,
    pub muscle_force: BandTable,
    pub protective_gear: BandTable,
    pub eye_strain: BandTable,
}

/// Heat applies at or above `heat_from`, cold at or below `cold_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStandards {
    pub heat_from: f64,
    pub heat: BandTable,
    pub cold_from: f64,
    pub cold: BandTable,
    pub comfortable: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContaminationScores {
    pub clean: u8,
    pub slightly_dirty: u8,
    pub somewhat_dirty: u8,
    pub dirty: u8,
    pub extremely_dirty: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChemicalThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub danger: f64,
}

/// A registered substance with its occupational exposure limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemicalStandard {
    pub substance_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub cas_number: Option<String>,
    pub permissible_concentration: f64,
    pub unit: String,
    pub thresholds: ChemicalThresholds,
}

impl ChemicalStandard {
    fn matches(&self, key: &str, name: &str) -> bool {
        key.eq_ignore_ascii_case(name)
            || self.substance_name.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalStandards {
    pub chemicals: BTreeMap<String, ChemicalStandard>,
    pub substance_ratio: BandTable,
    pub default_permissible_concentration: f64,
    pub temperature: TemperatureStandards,
    pub noise: BandTable,
    pub dust: BandTable,
    pub vibration: BandTable,
    pub contamination: ContaminationScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardStandards {
    pub risk_point: BandTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkTimeClass {
    A,
    B,
    C,
    D,
    E,
}

/// Hours strictly `below`, hours `up_to` inclusive, or the open-ended tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTimeBand {
    pub class: WorkTimeClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<f64>,
    pub factor: f64,
}

impl WorkTimeBand {
    fn contains(&self, hours: f64) -> bool {
        match (self.below, self.up_to) {
            (Some(below), _) => hours < below,
            (None, Some(up_to)) => hours <= up_to,
            (None, None) => true,
        }
    }
}

/// Work-time class and the multiplier it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkTimeCategory {
    pub class: WorkTimeClass,
    pub factor: f64,
}

/// One effective-dated version of the reference thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standards {
    pub version: String,
    pub effective_date: NaiveDate,
    pub reference_source: String,
    pub physical: PhysicalStandards,
    pub environmental: EnvironmentalStandards,
    pub hazard: HazardStandards,
    pub work_time: Vec<WorkTimeBand>,
}

impl Standards {
    pub fn rula_evaluation(&self, score: u8) -> Option<PostureEvaluation> {
        self.physical
            .rula
            .iter()
            .find(|band| (band.min..=band.max).contains(&score))
            .map(|band| PostureEvaluation {
                level: band.level,
                score: band.score,
            })
    }

    pub fn owas_evaluation(&self, category: u8) -> Option<PostureEvaluation> {
        self.physical
            .owas
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| PostureEvaluation {
                level: entry.level,
                score: entry.score,
            })
    }

    pub fn weight_score(&self, kg: f64, hand: HandType, conditions: &WeightConditions) -> u8 {
        let weight = &self.physical.weight;
        let table = match hand {
            HandType::BothHands => &weight.both_hands,
            HandType::SingleHand => &weight.single_hand,
        };
        table.scaled_at_or_above(kg, weight.adjustment(conditions))
    }

    pub fn muscle_force_score(&self, kg: f64) -> u8 {
        self.physical.muscle_force.at_or_above(kg)
    }

    pub fn protective_gear_score(&self, percentage: f64) -> u8 {
        self.physical.protective_gear.at_or_above(percentage)
    }

    pub fn eye_strain_score(&self, percentage: f64) -> u8 {
        self.physical.eye_strain.at_or_above(percentage)
    }

    pub fn temperature_score(&self, celsius: f64) -> u8 {
        let temperature = &self.environmental.temperature;
        if celsius >= temperature.heat_from {
            temperature.heat.at_or_above(celsius)
        } else if celsius <= temperature.cold_from {
            temperature.cold.at_or_below(celsius)
        } else {
            temperature.comfortable
        }
    }

    pub fn noise_score(&self, db: f64) -> u8 {
        self.environmental.noise.at_or_above(db)
    }

    pub fn dust_score(&self, mg_per_m3: f64) -> u8 {
        self.environmental.dust.at_or_above(mg_per_m3)
    }

    pub fn vibration_score(&self, m_per_s2: f64) -> u8 {
        self.environmental.vibration.at_or_above(m_per_s2)
    }

    pub fn contamination_score(&self, level: ContaminationLevel) -> u8 {
        let scores = &self.environmental.contamination;
        match level {
            ContaminationLevel::Clean => scores.clean,
            ContaminationLevel::SlightlyDirty => scores.slightly_dirty,
            ContaminationLevel::SomewhatDirty => scores.somewhat_dirty,
            ContaminationLevel::Dirty => scores.dirty,
            ContaminationLevel::ExtremelyDirty => scores.extremely_dirty,
        }
    }

    /// Registry entry by key, display name, or alias (case-insensitive).
    pub fn chemical(&self, name: &str) -> Option<&ChemicalStandard> {
        let name = name.trim();
        self.environmental
            .chemicals
            .iter()
            .find(|(key, standard)| standard.matches(key, name))
            .map(|(_, standard)| standard)
    }

    /// Registry score for a substance; unregistered names score 1.
    pub fn chemical_score(&self, name: &str, measured: f64) -> u8 {
        let Some(standard) = self.chemical(name) else {
            tracing::debug!(substance = name, "substance not registered, using default score");
            return 1;
        };
        let thresholds = &standard.thresholds;
        if measured >= thresholds.danger {
            7
        } else if measured >= thresholds.high {
            4
        } else if measured >= thresholds.medium {
            2
        } else {
            1
        }
    }

    /// Ratio of measured to permissible concentration, banded.
    pub fn chemical_ratio_score(&self, measured: f64, permissible: Option<f64>) -> u8 {
        let permissible = permissible
            .filter(|value| *value > 0.0)
            .unwrap_or(self.environmental.default_permissible_concentration);
        self.environmental
            .substance_ratio
            .at_or_above(measured / permissible)
    }

    /// Canonical hazard formula: occurrence × severity, banded.
    pub fn risk_score(&self, occurrence: u8, severity: u8) -> u8 {
        let risk_point = f64::from(occurrence) * f64::from(severity);
        self.hazard.risk_point.at_or_above(risk_point)
    }

    pub fn work_time_factor(&self, hours: f64) -> WorkTimeCategory {
        self.work_time
            .iter()
            .find(|band| band.contains(hours))
            .or_else(|| self.work_time.last())
            .map_or(
                WorkTimeCategory {
                    class: WorkTimeClass::A,
                    factor: 1.0,
                },
                |band| WorkTimeCategory {
                    class: band.class,
                    factor: band.factor,
                },
            )
    }

    /// Structural checks run once when a version is loaded.
    pub fn validate(&self) -> Result<(), StandardsError> {
        let invalid = |reason: String| StandardsError::Invalid {
            version: self.version.clone(),
            reason,
        };

        // (name, table, thresholds descending)
        let tables = [
            ("weight.both_hands", &self.physical.weight.both_hands, true),
            ("weight.single_hand", &self.physical.weight.single_hand, true),
            ("muscle_force", &self.physical.muscle_force, true),
            ("protective_gear", &self.physical.protective_gear, true),
            ("eye_strain", &self.physical.eye_strain, true),
            ("substance_ratio", &self.environmental.substance_ratio, true),
            ("temperature.heat", &self.environmental.temperature.heat, true),
            ("temperature.cold", &self.environmental.temperature.cold, false),
            ("noise", &self.environmental.noise, true),
            ("dust", &self.environmental.dust, true),
            ("vibration", &self.environmental.vibration, true),
            ("risk_point", &self.hazard.risk_point, true),
        ];
        for (name, table, descending) in tables {
            if let Some(score) = table.scores().find(|score| !(1..=10).contains(score)) {
                return Err(invalid(format!("{name} contains score {score}")));
            }
            if table.bands.iter().any(|band| !band.threshold.is_finite()) {
                return Err(invalid(format!("{name} has a non-finite threshold")));
            }
            if !table.is_ordered(descending) {
                let order = if descending { "descending" } else { "ascending" };
                return Err(invalid(format!("{name} thresholds must be strictly {order}")));
            }
        }

        if !(1..=7).all(|score| self.rula_evaluation(score).is_some()) {
            return Err(invalid("RULA bands must cover scores 1 through 7".into()));
        }
        if !(1..=4).all(|category| self.owas_evaluation(category).is_some()) {
            return Err(invalid("OWAS categories must cover 1 through 4".into()));
        }
        if self
            .physical
            .weight
            .factors()
            .iter()
            .any(|factor| !factor.is_finite() || *factor <= 0.0)
        {
            return Err(invalid("weight condition factors must be positive".into()));
        }
        if self.environmental.default_permissible_concentration <= 0.0 {
            return Err(invalid(
                "default permissible concentration must be positive".into(),
            ));
        }
        match self.work_time.last() {
            Some(band) if band.below.is_none() && band.up_to.is_none() => {}
            _ => {
                return Err(invalid(
                    "work-time bands must end with an open-ended band".into(),
                ))
            }
        }
        if self
            .work_time
            .iter()
            .any(|band| !band.factor.is_finite() || band.factor <= 0.0)
        {
            return Err(invalid("work-time factors must be positive".into()));
        }
        Ok(())
    }
}
