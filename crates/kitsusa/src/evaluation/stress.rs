//! Psychological stress events rated on a five-stage scale and folded into the
//! mental factor.

use serde::{Deserialize, Serialize};

use super::domain::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressIntensity {
    #[serde(alias = "強")]
    Strong,
    #[serde(alias = "中")]
    Moderate,
    #[serde(alias = "弱")]
    Weak,
}

impl StressIntensity {
    /// (minimum, typical, maximum) on the five-stage scale.
    const fn range(self) -> (f64, f64, f64) {
        match self {
            StressIntensity::Strong => (4.0, 5.0, 5.0),
            StressIntensity::Moderate => (2.0, 3.0, 3.0),
            StressIntensity::Weak => (1.0, 1.0, 2.0),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StressIntensity::Strong => "strong",
            StressIntensity::Moderate => "moderate",
            StressIntensity::Weak => "weak",
        }
    }
}

/// A work event carrying psychological load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressEvent {
    #[serde(default)]
    pub event: String,
    pub intensity: StressIntensity,
    #[serde(default)]
    pub mitigating_factors: Vec<String>,
    #[serde(default)]
    pub aggravating_factors: Vec<String>,
    pub duration_days: Option<u32>,
}

impl StressEvent {
    /// Five-stage score after modifiers, kept inside the intensity's own range.
    pub fn five_stage_score(&self) -> f64 {
        let (min, typical, max) = self.intensity.range();
        let mut score = typical;

        if !self.mitigating_factors.is_empty() {
            let reduction = (self.mitigating_factors.len() as f64 * 0.5).min(1.0);
            score = (score - reduction).max(min);
        }
        if !self.aggravating_factors.is_empty() {
            let increase = (self.aggravating_factors.len() as f64 * 0.5).min(1.0);
            score = (score + increase).min(max);
        }
        match self.duration_days {
            Some(days) if days >= 30 => score = (score + 0.5).min(max),
            Some(days) if days >= 7 => score = (score + 0.2).min(max),
            _ => {}
        }

        round_tenth(score.clamp(1.0, 5.0))
    }
}

/// Combined view over every stress event of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedStress {
    pub total_score: f64,
    pub highest_intensity: StressIntensity,
    pub dominant_event: Option<String>,
    pub risk_level: RiskLevel,
}

/// Integrates events by their strongest intensity tier.
///
/// Additional events within the dominant tier raise the score by a small step,
/// capped per tier. Weak events only accumulate in groups of three.
pub fn integrated_stress(events: &[StressEvent]) -> Option<IntegratedStress> {
    if events.is_empty() {
        return None;
    }

    let tier = [
        StressIntensity::Strong,
        StressIntensity::Moderate,
        StressIntensity::Weak,
    ]
    .into_iter()
    .find(|intensity| events.iter().any(|event| event.intensity == *intensity))?;

    let in_tier: Vec<&StressEvent> = events
        .iter()
        .filter(|event| event.intensity == tier)
        .collect();
    let highest = in_tier
        .iter()
        .map(|event| event.five_stage_score())
        .fold(0.0_f64, f64::max);
    let extra = in_tier.len().saturating_sub(1) as f64;

    let total = match tier {
        StressIntensity::Strong => (highest + extra * 0.2).min(5.0),
        StressIntensity::Moderate => (highest + extra * 0.3).min(4.0),
        StressIntensity::Weak if in_tier.len() >= 3 => {
            (highest + (in_tier.len() / 3) as f64 * 0.5).min(3.0)
        }
        StressIntensity::Weak => highest,
    };

    Some(IntegratedStress {
        total_score: round_tenth(total),
        highest_intensity: tier,
        dominant_event: in_tier.first().map(|event| event.event.clone()),
        risk_level: five_stage_risk(total),
    })
}

pub(crate) fn five_stage_risk(score: f64) -> RiskLevel {
    if score >= 4.5 {
        RiskLevel::Critical
    } else if score >= 3.5 {
        RiskLevel::High
    } else if score >= 2.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvertimeStress {
    pub intensity: StressIntensity,
    pub five_stage_score: f64,
}

/// Monthly overtime bands: 100h strong, 80h moderate, 45h weak.
pub fn overtime_stress(monthly_hours: f64) -> OvertimeStress {
    let (intensity, five_stage_score) = if monthly_hours >= 100.0 {
        (StressIntensity::Strong, 5.0)
    } else if monthly_hours >= 80.0 {
        (StressIntensity::Moderate, 3.0)
    } else if monthly_hours >= 45.0 {
        (StressIntensity::Weak, 2.0)
    } else {
        (StressIntensity::Weak, 1.0)
    };
    OvertimeStress {
        intensity,
        five_stage_score,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarassmentSeverity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarassmentFrequency {
    Rare,
    Occasional,
    Frequent,
    Continuous,
}

/// How the organisation handled reported harassment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationalResponse {
    Adequate,
    Partial,
    Inadequate,
    #[serde(rename = "none")]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HarassmentAssessment {
    #[serde(default)]
    pub occurred: bool,
    pub severity: Option<HarassmentSeverity>,
    pub frequency: Option<HarassmentFrequency>,
    pub organizational_response: Option<OrganizationalResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarassmentStress {
    pub intensity: StressIntensity,
    pub five_stage_score: f64,
}

/// Severe or continuous harassment is strong, moderate or frequent is
/// moderate, anything else weak. A missing or inadequate organisational
/// response adds half a stage.
pub fn harassment_stress(assessment: &HarassmentAssessment) -> HarassmentStress {
    if !assessment.occurred {
        return HarassmentStress {
            intensity: StressIntensity::Weak,
            five_stage_score: 1.0,
        };
    }

    let (intensity, mut score) = match (assessment.severity, assessment.frequency) {
        (Some(HarassmentSeverity::Severe), _) | (_, Some(HarassmentFrequency::Continuous)) => {
            (StressIntensity::Strong, 5.0)
        }
        (Some(HarassmentSeverity::Moderate), _) | (_, Some(HarassmentFrequency::Frequent)) => {
            (StressIntensity::Moderate, 3.0)
        }
        _ => (StressIntensity::Weak, 2.0),
    };
    if matches!(
        assessment.organizational_response,
        Some(OrganizationalResponse::Inadequate | OrganizationalResponse::Absent)
    ) {
        score = (score + 0.5_f64).min(5.0);
    }

    HarassmentStress {
        intensity,
        five_stage_score: round_tenth(score),
    }
}

/// Projects a five-stage score onto the 1..=10 factor scale.
pub fn five_stage_to_factor_score(score: f64) -> u8 {
    if score < 1.5 {
        1
    } else if score < 2.5 {
        2
    } else if score < 3.5 {
        4
    } else if score < 4.5 {
        7
    } else {
        10
    }
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
