use serde::{Deserialize, Serialize};

use super::aggregate::ThreeKIndex;
use super::domain::{FactorKind, RiskLevel};
use super::engine::EvaluationOutcome;
use super::matrix::recommendations;

/// Adjusted factor scores at or above this get a recommendation.
const RECOMMENDATION_THRESHOLD: u8 = 4;

const CRITICAL_ACTIONS: &[&str] = &[
    "Consider stopping or restricting the work immediately",
    "Introduce an alternative work method",
    "Add further safety measures",
];
const HIGH_ACTIONS: &[&str] = &[
    "Review the work process",
    "Give workers additional training",
    "Schedule periodic risk assessments",
];
const NO_ACTIONS: &[&str] = &[];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorRecommendation {
    pub factor: FactorKind,
    pub score: u8,
    pub focus: String,
    pub actions: Vec<String>,
}

/// Plain-text digest of an outcome for reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub priority_actions: Vec<String>,
    pub recommendations: Vec<FactorRecommendation>,
}

impl EvaluationSummary {
    pub fn from_outcome(outcome: &EvaluationOutcome) -> Self {
        let result = &outcome.result;
        let index = result.final_3k_index;
        let score = result.final_kitsusa_score;

        let (risk_level, verdict, priority_actions) = match index {
            ThreeKIndex::A => (
                RiskLevel::Critical,
                "immediate improvement is required",
                CRITICAL_ACTIONS,
            ),
            ThreeKIndex::B => (
                RiskLevel::High,
                "prompt improvement is recommended",
                HIGH_ACTIONS,
            ),
            ThreeKIndex::C => (RiskLevel::Medium, "continued monitoring is needed", NO_ACTIONS),
            ThreeKIndex::D => (RiskLevel::Low, "the current state can be maintained", NO_ACTIONS),
        };

        let summary = format!(
            "'{}' is classified as 3K index {index} with a score of {score} ({} risk); {verdict}.",
            outcome.work_name,
            risk_level.label()
        );

        let adjusted = &result.calculation_details.adjusted_scores;
        let recommendations = FactorKind::ALL
            .into_iter()
            .filter_map(|factor| {
                let score = adjusted.get(factor);
                (score >= RECOMMENDATION_THRESHOLD).then(|| FactorRecommendation {
                    factor,
                    score,
                    focus: focus(factor).to_string(),
                    actions: recommendations(factor, score)
                        .iter()
                        .map(|action| action.to_string())
                        .collect(),
                })
            })
            .collect();

        let mut priority_actions: Vec<String> =
            priority_actions.iter().map(|a| a.to_string()).collect();
        for action in &outcome.urgent_actions {
            if !priority_actions.contains(action) {
                priority_actions.push(action.clone());
            }
        }

        Self {
            risk_level,
            summary,
            priority_actions,
            recommendations,
        }
    }
}

fn focus(factor: FactorKind) -> &'static str {
    match factor {
        FactorKind::Physical => "work posture, load handling and rest breaks",
        FactorKind::Mental => "task complexity, check procedures and stressors",
        FactorKind::Environmental => "workplace conditions, protective equipment and monitoring",
        FactorKind::Hazard => "risk management, safety equipment and emergency procedures",
    }
}
