use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::safety::{AccidentRecord, OngoingRisk, SafetyManagement};
use super::stress::{HarassmentAssessment, StressEvent};

/// The four independent risk factors that feed the 3K index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Physical,
    Mental,
    Environmental,
    Hazard,
}

impl FactorKind {
    pub const ALL: [FactorKind; 4] = [
        FactorKind::Physical,
        FactorKind::Mental,
        FactorKind::Environmental,
        FactorKind::Hazard,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FactorKind::Physical => "physical",
            FactorKind::Mental => "mental",
            FactorKind::Environmental => "environmental",
            FactorKind::Hazard => "hazard",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FactorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(Self::Physical),
            "mental" => Ok(Self::Mental),
            "environmental" | "environment" => Ok(Self::Environmental),
            "hazard" | "danger" => Ok(Self::Hazard),
            other => Err(format!(
                "unknown factor '{other}' (expected physical, mental, environmental, or hazard)"
            )),
        }
    }
}

/// Severity bucket shared by matrix colour schemes, stress assessment and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Default bucketing for a 1..=10 score when no colour scheme entry exists.
    pub const fn for_score(score: u8) -> Self {
        match score {
            0..=2 => RiskLevel::Low,
            3..=4 => RiskLevel::Medium,
            5..=7 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Which hands carry a handled load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandType {
    BothHands,
    SingleHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkIntensity {
    Light,
    #[default]
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftFrequency {
    Rare,
    #[default]
    Occasional,
    Frequent,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureCondition {
    Optimal,
    #[default]
    Good,
    Fair,
    Poor,
}

/// Working conditions that tighten or relax the lifting bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeightConditions {
    #[serde(default)]
    pub work: WorkIntensity,
    #[serde(default)]
    pub frequency: LiftFrequency,
    #[serde(default)]
    pub posture: PostureCondition,
}

/// Self-reported exertion for the manual-input sub-dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    #[serde(alias = "軽い")]
    Light,
    #[serde(alias = "少しきつい")]
    SomewhatHard,
    #[serde(alias = "きつい")]
    Hard,
    #[serde(alias = "とてもきつい")]
    VeryHard,
    #[serde(alias = "限界")]
    Limit,
}

impl StrengthLevel {
    pub const fn score(self) -> u8 {
        match self {
            StrengthLevel::Light => 1,
            StrengthLevel::SomewhatHard => 2,
            StrengthLevel::Hard => 4,
            StrengthLevel::VeryHard => 7,
            StrengthLevel::Limit => 10,
        }
    }

    /// Column position on the physical matrix.
    pub const fn order(self) -> u8 {
        match self {
            StrengthLevel::Light => 1,
            StrengthLevel::SomewhatHard => 2,
            StrengthLevel::Hard => 3,
            StrengthLevel::VeryHard => 4,
            StrengthLevel::Limit => 5,
        }
    }
}

/// Share of the shift spent under the reported exertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExertionShare {
    #[serde(alias = "<10%")]
    Short,
    #[serde(alias = "10-50%")]
    Medium,
    #[serde(alias = ">50%")]
    Long,
}

impl ExertionShare {
    pub const fn factor(self) -> f64 {
        match self {
            ExertionShare::Short => 0.7,
            ExertionShare::Medium => 1.0,
            ExertionShare::Long => 1.5,
        }
    }

    pub const fn bucket(self) -> u8 {
        match self {
            ExertionShare::Short => 1,
            ExertionShare::Medium => 2,
            ExertionShare::Long => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExertionShare::Short => "<10%",
            ExertionShare::Medium => "10-50%",
            ExertionShare::Long => ">50%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualInput {
    pub strength: StrengthLevel,
    pub duration: ExertionShare,
}

/// Share of working time a mental load is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeShare {
    #[serde(rename = "5%")]
    Pct5,
    #[serde(rename = "10%")]
    Pct10,
    #[serde(rename = "15%")]
    Pct15,
    #[serde(rename = "20%")]
    Pct20,
    #[serde(rename = "40%")]
    Pct40,
    #[serde(rename = "60%")]
    Pct60,
    #[serde(rename = "80%")]
    Pct80,
}

impl TimeShare {
    pub const fn factor(self) -> f64 {
        match self {
            TimeShare::Pct5 => 0.5,
            TimeShare::Pct10 => 0.7,
            TimeShare::Pct15 => 0.8,
            TimeShare::Pct20 => 0.9,
            TimeShare::Pct40 => 1.0,
            TimeShare::Pct60 => 1.2,
            TimeShare::Pct80 => 1.5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TimeShare::Pct5 => "5%",
            TimeShare::Pct10 => "10%",
            TimeShare::Pct15 => "15%",
            TimeShare::Pct20 => "20%",
            TimeShare::Pct40 => "40%",
            TimeShare::Pct60 => "60%",
            TimeShare::Pct80 => "80%",
        }
    }

    /// Shares of 20% and above count as long exposure on the mental matrix.
    pub const fn is_long(self) -> bool {
        !matches!(self, TimeShare::Pct5 | TimeShare::Pct10 | TimeShare::Pct15)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureFrequency {
    #[serde(alias = "ほとんどない")]
    Rarely,
    #[serde(alias = "稀にある")]
    Seldom,
    #[serde(alias = "時々ある")]
    Sometimes,
    #[serde(alias = "頻繁にある")]
    Frequently,
}

impl FailureFrequency {
    pub const fn score(self) -> u8 {
        match self {
            FailureFrequency::Rarely => 1,
            FailureFrequency::Seldom => 2,
            FailureFrequency::Sometimes => 4,
            FailureFrequency::Frequently => 7,
        }
    }

    pub const fn order(self) -> u8 {
        match self {
            FailureFrequency::Rarely => 1,
            FailureFrequency::Seldom => 2,
            FailureFrequency::Sometimes => 3,
            FailureFrequency::Frequently => 4,
        }
    }
}

/// Consequence of a work failure, the X axis of the mental matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Minimal,
    #[default]
    Moderate,
    Significant,
    Critical,
}

impl ImpactLevel {
    pub const fn order(self) -> u8 {
        match self {
            ImpactLevel::Minimal => 1,
            ImpactLevel::Moderate => 2,
            ImpactLevel::Significant => 3,
            ImpactLevel::Critical => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    #[serde(alias = "ほとんど集中を要しない")]
    Minimal,
    #[serde(alias = "軽度の集中を要する")]
    Light,
    #[serde(alias = "中程度の集中を要する")]
    Moderate,
    #[serde(alias = "高度な集中を要する")]
    High,
    #[serde(alias = "極めて高度な集中を要する")]
    Extreme,
}

/// Presence of a cognitive or emotional burden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurdenLevel {
    #[serde(alias = "ない")]
    Absent,
    #[serde(alias = "あまりない")]
    Slight,
    #[serde(alias = "どちらとも言えない")]
    Neutral,
    #[serde(alias = "比較的ある")]
    Noticeable,
    #[serde(alias = "ある")]
    Present,
}

/// How much latitude the worker has; low autonomy scores high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyLevel {
    #[serde(alias = "高い")]
    High,
    #[serde(alias = "やや高い")]
    FairlyHigh,
    #[serde(alias = "どちらとも言えない")]
    Neutral,
    #[serde(alias = "やや低い")]
    FairlyLow,
    #[serde(alias = "低い")]
    Low,
}

/// Ordinal vocabularies rated on the shared 1/2/4/7/10 scale.
pub trait LevelScore: Copy {
    fn score(self) -> u8;
}

impl LevelScore for ConcentrationLevel {
    fn score(self) -> u8 {
        match self {
            ConcentrationLevel::Minimal => 1,
            ConcentrationLevel::Light => 2,
            ConcentrationLevel::Moderate => 4,
            ConcentrationLevel::High => 7,
            ConcentrationLevel::Extreme => 10,
        }
    }
}

impl LevelScore for BurdenLevel {
    fn score(self) -> u8 {
        match self {
            BurdenLevel::Absent | BurdenLevel::Slight => 1,
            BurdenLevel::Neutral => 2,
            BurdenLevel::Noticeable => 4,
            BurdenLevel::Present => 7,
        }
    }
}

impl LevelScore for AutonomyLevel {
    fn score(self) -> u8 {
        match self {
            AutonomyLevel::High => 1,
            AutonomyLevel::FairlyHigh => 2,
            AutonomyLevel::Neutral => 4,
            AutonomyLevel::FairlyLow => 7,
            AutonomyLevel::Low => 10,
        }
    }
}

/// A level observed for a share of working time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLevel<L> {
    pub level: L,
    pub duration: TimeShare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureAssessment {
    pub level: FailureFrequency,
    pub duration: TimeShare,
    #[serde(default)]
    pub impact: Option<ImpactLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkQuality {
    pub failure: Option<FailureAssessment>,
    pub concentration: Option<TimedLevel<ConcentrationLevel>>,
    pub cognitive_load: Option<TimedLevel<BurdenLevel>>,
    pub emotional_burden: Option<TimedLevel<BurdenLevel>>,
    pub skill_utilization: Option<TimedLevel<AutonomyLevel>>,
    pub work_control: Option<TimedLevel<AutonomyLevel>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContaminationLevel {
    #[serde(alias = "きれい")]
    Clean,
    #[serde(alias = "少し汚い")]
    SlightlyDirty,
    #[serde(alias = "やや汚い")]
    SomewhatDirty,
    #[serde(alias = "汚い")]
    Dirty,
    #[serde(alias = "極めて汚い")]
    ExtremelyDirty,
}

/// Loads handled per hand configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetWeight {
    pub both_hands_kg: Option<f64>,
    pub single_hand_kg: Option<f64>,
}

/// Form checkboxes gating which physical observations count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalCheckboxes {
    #[serde(default)]
    pub weight_both: bool,
    #[serde(default)]
    pub weight_single: bool,
    #[serde(default)]
    pub muscle: bool,
    #[serde(default)]
    pub gear: bool,
    #[serde(default)]
    pub eye: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalDetails {
    pub target_weight: Option<TargetWeight>,
    #[serde(default)]
    pub weight_conditions: WeightConditions,
    pub muscle_force_kg: Option<f64>,
    pub protective_gear_pct: Option<f64>,
    pub eye_strain_pct: Option<f64>,
    pub manual_input: Option<ManualInput>,
    #[serde(default)]
    pub checkboxes: PhysicalCheckboxes,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MentalDetails {
    pub work_quality: Option<WorkQuality>,
    pub manual_input: Option<ManualInput>,
    #[serde(default)]
    pub stress_events: Vec<StressEvent>,
    pub monthly_overtime_hours: Option<f64>,
    pub harassment: Option<HarassmentAssessment>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentalDetails {
    pub temperature_c: Option<f64>,
    pub noise_db: Option<f64>,
    pub dust_mg_m3: Option<f64>,
    pub vibration_m_s2: Option<f64>,
    pub contamination: Option<ContaminationLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HazardDetails {
    #[serde(default)]
    pub hazard_events: Vec<HazardEvent>,
    #[serde(default)]
    pub accident_history: Vec<AccidentRecord>,
    /// Anchors the one-year window for recent accidents.
    pub assessed_on: Option<NaiveDate>,
    pub safety_management: Option<SafetyManagement>,
    #[serde(default)]
    pub ongoing_risks: Vec<OngoingRisk>,
}

/// One observed working posture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posture {
    #[serde(default)]
    pub posture_name: String,
    pub rula_score: u8,
    pub owas_category: u8,
}

/// A measured airborne substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSubstance {
    #[serde(default)]
    pub substance_name: String,
    pub measured_value: f64,
    pub permissible_concentration: Option<f64>,
    pub threshold_value: Option<f64>,
    pub unit: Option<String>,
    pub exposure_hours: Option<f64>,
}

/// A hazardous event rated on four 1..=5 axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardEvent {
    #[serde(default)]
    pub hazard_event: String,
    pub encounter_frequency: u8,
    pub danger_possibility: u8,
    pub occurrence_possibility: u8,
    pub harm_severity: u8,
}

/// Everything observed for one task, as submitted by the evaluation form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub evaluation_id: String,
    #[serde(default)]
    pub work_name: String,
    #[serde(default)]
    pub factory_name: String,
    #[serde(default)]
    pub process_name: String,
    #[serde(default)]
    pub updated_by: String,
    pub physical: Option<PhysicalDetails>,
    #[serde(default)]
    pub postures: Vec<Posture>,
    pub mental: Option<MentalDetails>,
    pub environmental: Option<EnvironmentalDetails>,
    #[serde(default)]
    pub substances: Vec<EnvironmentalSubstance>,
    pub hazard: Option<HazardDetails>,
    pub work_hours: Option<f64>,
    pub use_matrix: Option<bool>,
}

impl EvaluationRequest {
    /// Factor blocks with no observations at all.
    pub fn missing_factors(&self) -> Vec<FactorKind> {
        let mut missing = Vec::new();
        if self.physical.is_none() && self.postures.is_empty() {
            missing.push(FactorKind::Physical);
        }
        if self.mental.is_none() {
            missing.push(FactorKind::Mental);
        }
        if self.environmental.is_none() && self.substances.is_empty() {
            missing.push(FactorKind::Environmental);
        }
        let has_events = self
            .hazard
            .as_ref()
            .is_some_and(|hazard| !hazard.hazard_events.is_empty());
        if !has_events {
            missing.push(FactorKind::Hazard);
        }
        missing
    }
}
