//! Accident history, safety management and unresolved risks, rated on the
//! five-stage scale and folded into the hazard factor.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{HazardDetails, RiskLevel};
use super::stress::{five_stage_risk, round_tenth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccidentSeverity {
    Minor,
    Moderate,
    Serious,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreventionEffectiveness {
    HighlyEffective,
    Effective,
    Partial,
    Ineffective,
}

/// A past occupational accident on this task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccidentRecord {
    #[serde(default)]
    pub accident_type: String,
    pub severity: AccidentSeverity,
    pub accident_date: NaiveDate,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub preventive_measures: Vec<String>,
    pub effectiveness: Option<PreventionEffectiveness>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentHistoryRisk {
    pub total_accidents: usize,
    pub latest_accident: Option<NaiveDate>,
    pub recurrence_risk: RiskLevel,
    pub five_stage_score: f64,
    pub mitigation_measures: Vec<String>,
    pub remaining_risks: Vec<String>,
}

/// Rates a task's accident history.
///
/// A fatal accident or a repeated accident type is critical (5), a serious
/// one high (4), a moderate one or any accident in the year before
/// `assessed_on` medium (3), and anything else low (2). An effective
/// preventive measure takes half a stage off. Recency is ignored when
/// `assessed_on` is unknown.
pub fn accident_history_risk(
    records: &[AccidentRecord],
    assessed_on: Option<NaiveDate>,
) -> AccidentHistoryRisk {
    let Some(worst) = records.iter().map(|record| record.severity).max() else {
        return AccidentHistoryRisk {
            total_accidents: 0,
            latest_accident: None,
            recurrence_risk: RiskLevel::Low,
            five_stage_score: 1.0,
            mitigation_measures: Vec::new(),
            remaining_risks: Vec::new(),
        };
    };

    let recurring = records.iter().enumerate().any(|(index, record)| {
        records[index + 1..]
            .iter()
            .any(|other| other.accident_type == record.accident_type)
    });
    let recent = assessed_on
        .and_then(|date| date.checked_sub_months(Months::new(12)))
        .is_some_and(|cutoff| records.iter().any(|record| record.accident_date > cutoff));

    let (mut score, recurrence_risk) = if worst == AccidentSeverity::Fatal || recurring {
        (5.0, RiskLevel::Critical)
    } else if worst == AccidentSeverity::Serious {
        (4.0, RiskLevel::High)
    } else if worst == AccidentSeverity::Moderate || recent {
        (3.0, RiskLevel::Medium)
    } else {
        (2.0, RiskLevel::Low)
    };

    let prevented = records.iter().any(|record| {
        matches!(
            record.effectiveness,
            Some(PreventionEffectiveness::Effective | PreventionEffectiveness::HighlyEffective)
        )
    });
    if prevented {
        score = (score - 0.5_f64).max(1.0);
    }

    let mut mitigation_measures: Vec<String> = Vec::new();
    for measure in records.iter().flat_map(|record| &record.preventive_measures) {
        if !mitigation_measures.contains(measure) {
            mitigation_measures.push(measure.clone());
        }
    }

    let remaining_risks = records
        .iter()
        .filter(|record| {
            matches!(
                record.effectiveness,
                Some(PreventionEffectiveness::Partial | PreventionEffectiveness::Ineffective)
            )
        })
        .map(|record| format!("{}: {}", record.accident_type, record.root_cause))
        .collect();

    AccidentHistoryRisk {
        total_accidents: records.len(),
        latest_accident: records.iter().map(|record| record.accident_date).max(),
        recurrence_risk,
        five_stage_score: round_tenth(score),
        mitigation_measures,
        remaining_risks,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Excellent,
    Compliant,
    PartiallyCompliant,
    NonCompliant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingAdequacy {
    Excellent,
    Adequate,
    Minimal,
    Inadequate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentReporting {
    Comprehensive,
    Adequate,
    Basic,
    #[serde(rename = "none")]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAssessmentFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    Never,
}

/// A known weakness in the safety management system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyGap {
    #[serde(default)]
    pub description: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub legal_requirement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyManagement {
    pub compliance: ComplianceLevel,
    pub training: TrainingAdequacy,
    pub incident_reporting: IncidentReporting,
    pub risk_assessment: RiskAssessmentFrequency,
    #[serde(default)]
    pub gaps: Vec<SafetyGap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyManagementStress {
    pub five_stage_score: f64,
    pub urgent_improvements: Vec<String>,
}

impl SafetyManagement {
    /// Worst of the four management ratings plus a penalty per gap, capped at 5.
    pub fn assess(&self) -> SafetyManagementStress {
        let compliance = match self.compliance {
            ComplianceLevel::Excellent => 1.0,
            ComplianceLevel::Compliant => 2.0,
            ComplianceLevel::PartiallyCompliant => 4.0,
            ComplianceLevel::NonCompliant => 5.0,
        };
        let training = match self.training {
            TrainingAdequacy::Excellent => 1.0,
            TrainingAdequacy::Adequate => 2.0,
            TrainingAdequacy::Minimal => 3.0,
            TrainingAdequacy::Inadequate => 4.0,
        };
        let reporting = match self.incident_reporting {
            IncidentReporting::Comprehensive => 1.0,
            IncidentReporting::Adequate => 2.0,
            IncidentReporting::Basic => 3.0,
            IncidentReporting::Absent => 5.0,
        };
        let assessment = match self.risk_assessment {
            RiskAssessmentFrequency::Monthly => 1.0,
            RiskAssessmentFrequency::Quarterly => 2.0,
            RiskAssessmentFrequency::SemiAnnual => 3.0,
            RiskAssessmentFrequency::Annual => 4.0,
            RiskAssessmentFrequency::Never => 5.0,
        };
        let penalty: f64 = self
            .gaps
            .iter()
            .map(|gap| match gap.risk_level {
                RiskLevel::Low => 0.2,
                RiskLevel::Medium => 0.5,
                RiskLevel::High => 1.0,
                RiskLevel::Critical => 1.5,
            })
            .sum();

        let worst = [compliance, training, reporting, assessment]
            .into_iter()
            .fold(1.0_f64, f64::max);

        let mut urgent_improvements = Vec::new();
        if self.compliance == ComplianceLevel::NonCompliant {
            urgent_improvements.push("Establish a legal compliance system".to_string());
        }
        if self.training == TrainingAdequacy::Inadequate {
            urgent_improvements.push("Rework the safety training programme".to_string());
        }
        if self.incident_reporting == IncidentReporting::Absent {
            urgent_improvements.push("Set up an incident reporting system".to_string());
        }
        urgent_improvements.extend(
            self.gaps
                .iter()
                .filter(|gap| gap.risk_level == RiskLevel::Critical || gap.legal_requirement)
                .map(|gap| gap.description.clone()),
        );

        SafetyManagementStress {
            five_stage_score: round_tenth((worst + penalty).min(5.0)),
            urgent_improvements,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceProbability {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialImpact {
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Unaddressed,
    InProgress,
    PartiallyMitigated,
    Monitored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringFrequency {
    Daily,
    Weekly,
    Monthly,
}

/// A hazard that is known and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingRisk {
    #[serde(default)]
    pub description: String,
    pub recurrence_probability: RecurrenceProbability,
    pub potential_impact: PotentialImpact,
    pub status: RiskStatus,
    #[serde(default)]
    pub mitigation_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OngoingRiskAssessment {
    pub description: String,
    pub five_stage_score: f64,
    pub monitoring: MonitoringFrequency,
    pub escalation_triggers: Vec<String>,
}

impl OngoingRisk {
    /// `max(probability, impact)` scaled by the handling status and by 0.8
    /// when mitigation actions exist, kept within 1..=5.
    pub fn assess(&self) -> OngoingRiskAssessment {
        let probability = match self.recurrence_probability {
            RecurrenceProbability::VeryLow => 1.0,
            RecurrenceProbability::Low => 2.0,
            RecurrenceProbability::Moderate => 3.0,
            RecurrenceProbability::High => 4.0,
            RecurrenceProbability::VeryHigh => 5.0,
        };
        let impact = match self.potential_impact {
            PotentialImpact::Minor => 1.0,
            PotentialImpact::Moderate => 2.0,
            PotentialImpact::Major => 4.0,
            PotentialImpact::Catastrophic => 5.0,
        };
        let status = match self.status {
            RiskStatus::Unaddressed => 1.5,
            RiskStatus::InProgress => 1.2,
            RiskStatus::PartiallyMitigated => 1.0,
            RiskStatus::Monitored => 0.8,
        };
        let mitigation = if self.mitigation_actions.is_empty() {
            1.0
        } else {
            0.8
        };

        let raw = f64::max(probability, impact) * status * mitigation;
        let score = round_tenth(raw.clamp(1.0, 5.0));
        let monitoring = if score >= 4.5 {
            MonitoringFrequency::Daily
        } else if score >= 2.5 {
            MonitoringFrequency::Weekly
        } else {
            MonitoringFrequency::Monthly
        };

        let mut escalation_triggers = Vec::new();
        if self.potential_impact == PotentialImpact::Catastrophic {
            escalation_triggers.push("Escalate on any change".to_string());
        }
        if self.recurrence_probability == RecurrenceProbability::VeryHigh {
            escalation_triggers.push("Escalate when a similar event occurs".to_string());
        }
        if self.status == RiskStatus::Unaddressed {
            escalation_triggers.push("Escalate if no response starts within 30 days".to_string());
        }

        OngoingRiskAssessment {
            description: self.description.clone(),
            five_stage_score: score,
            monitoring,
            escalation_triggers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardStressSource {
    AccidentHistory,
    SafetyManagement,
    OngoingRisks,
}

/// Combined view over the safety-side hazard assessments of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedHazardStress {
    pub accident_history: Option<AccidentHistoryRisk>,
    pub safety_management: Option<SafetyManagementStress>,
    pub ongoing_risks: Vec<OngoingRiskAssessment>,
    pub total_score: f64,
    pub dominant: HazardStressSource,
    pub risk_level: RiskLevel,
    pub urgent_actions: Vec<String>,
}

/// Assesses whichever of accident history, safety management and ongoing
/// risks are present and keeps the worst. `None` when none are recorded.
pub fn integrated_hazard_stress(details: &HazardDetails) -> Option<IntegratedHazardStress> {
    let accident_history = (!details.accident_history.is_empty())
        .then(|| accident_history_risk(&details.accident_history, details.assessed_on));
    let safety_management = details.safety_management.as_ref().map(SafetyManagement::assess);
    let ongoing_risks: Vec<OngoingRiskAssessment> =
        details.ongoing_risks.iter().map(OngoingRisk::assess).collect();

    let candidates = [
        accident_history
            .as_ref()
            .map(|history| (HazardStressSource::AccidentHistory, history.five_stage_score)),
        safety_management
            .as_ref()
            .map(|safety| (HazardStressSource::SafetyManagement, safety.five_stage_score)),
        ongoing_risks
            .iter()
            .map(|risk| risk.five_stage_score)
            .reduce(f64::max)
            .map(|score| (HazardStressSource::OngoingRisks, score)),
    ];
    // First source wins ties.
    let (dominant, total_score) = candidates
        .into_iter()
        .flatten()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })?;

    let mut urgent_actions = Vec::new();
    if accident_history
        .as_ref()
        .is_some_and(|history| history.five_stage_score >= 4.0)
    {
        urgent_actions.push("Strengthen measures against accident recurrence".to_string());
    }
    if let Some(safety) = safety_management
        .as_ref()
        .filter(|safety| safety.five_stage_score >= 4.0)
    {
        urgent_actions.extend(safety.urgent_improvements.iter().cloned());
    }
    urgent_actions.extend(
        ongoing_risks
            .iter()
            .filter(|risk| risk.five_stage_score >= 4.0)
            .map(|risk| format!("Unresolved risk: {}", risk.description)),
    );

    Some(IntegratedHazardStress {
        accident_history,
        safety_management,
        ongoing_risks,
        total_score,
        dominant,
        risk_level: five_stage_risk(total_score),
        urgent_actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn accident(kind: &str, severity: AccidentSeverity, on: NaiveDate) -> AccidentRecord {
        AccidentRecord {
            accident_type: kind.to_string(),
            severity,
            accident_date: on,
            root_cause: "guard removed".to_string(),
            preventive_measures: vec!["interlock on guard".to_string()],
            effectiveness: None,
        }
    }

    #[test]
    fn repeated_accident_type_is_critical() {
        let mut first = accident("caught in press", AccidentSeverity::Minor, date(2023, 4, 2));
        first.effectiveness = Some(PreventionEffectiveness::Partial);
        let second = accident("caught in press", AccidentSeverity::Minor, date(2024, 9, 14));

        let risk = accident_history_risk(&[first, second], None);

        assert_eq!(risk.five_stage_score, 5.0);
        assert_eq!(risk.recurrence_risk, RiskLevel::Critical);
        assert_eq!(risk.total_accidents, 2);
        assert_eq!(risk.latest_accident, Some(date(2024, 9, 14)));
        assert_eq!(risk.mitigation_measures, vec!["interlock on guard".to_string()]);
        assert_eq!(
            risk.remaining_risks,
            vec!["caught in press: guard removed".to_string()]
        );
    }

    #[test]
    fn effective_prevention_takes_half_a_stage_off() {
        let mut serious = accident(
            "fall from platform",
            AccidentSeverity::Serious,
            date(2022, 1, 10),
        );
        serious.effectiveness = Some(PreventionEffectiveness::Effective);

        let risk = accident_history_risk(&[serious], None);

        assert_eq!(risk.five_stage_score, 3.5);
        assert_eq!(risk.recurrence_risk, RiskLevel::High);
        assert!(risk.remaining_risks.is_empty());
    }

    #[test]
    fn recent_minor_accident_needs_an_assessment_date() {
        let records = [accident("cut", AccidentSeverity::Minor, date(2025, 6, 1))];

        assert_eq!(accident_history_risk(&records, None).five_stage_score, 2.0);
        assert_eq!(
            accident_history_risk(&records, Some(date(2026, 3, 1))).five_stage_score,
            3.0
        );
        assert_eq!(
            accident_history_risk(&records, Some(date(2027, 1, 1))).five_stage_score,
            2.0
        );
        assert_eq!(accident_history_risk(&[], None).five_stage_score, 1.0);
    }

    #[test]
    fn safety_management_adds_gap_penalties() {
        let management = SafetyManagement {
            compliance: ComplianceLevel::PartiallyCompliant,
            training: TrainingAdequacy::Adequate,
            incident_reporting: IncidentReporting::Basic,
            risk_assessment: RiskAssessmentFrequency::Annual,
            gaps: vec![
                SafetyGap {
                    description: "no lockout procedure".to_string(),
                    risk_level: RiskLevel::Medium,
                    legal_requirement: false,
                },
                SafetyGap {
                    description: "missing press inspection record".to_string(),
                    risk_level: RiskLevel::Low,
                    legal_requirement: true,
                },
            ],
        };

        let stress = management.assess();

        assert_eq!(stress.five_stage_score, 4.7);
        assert_eq!(
            stress.urgent_improvements,
            vec!["missing press inspection record".to_string()]
        );

        let exemplary = SafetyManagement {
            compliance: ComplianceLevel::Excellent,
            training: TrainingAdequacy::Excellent,
            incident_reporting: IncidentReporting::Comprehensive,
            risk_assessment: RiskAssessmentFrequency::Monthly,
            gaps: Vec::new(),
        };
        assert_eq!(exemplary.assess().five_stage_score, 1.0);
    }

    #[test]
    fn ongoing_risk_scales_with_status_and_mitigation() {
        let mut risk = OngoingRisk {
            description: "worn die clamp".to_string(),
            recurrence_probability: RecurrenceProbability::High,
            potential_impact: PotentialImpact::Major,
            status: RiskStatus::Unaddressed,
            mitigation_actions: Vec::new(),
        };
        let assessment = risk.assess();
        assert_eq!(assessment.five_stage_score, 5.0);
        assert_eq!(assessment.monitoring, MonitoringFrequency::Daily);
        assert_eq!(assessment.escalation_triggers.len(), 1);

        risk.status = RiskStatus::Monitored;
        risk.mitigation_actions = vec!["weekly clamp check".to_string()];
        let assessment = risk.assess();
        assert_eq!(assessment.five_stage_score, 2.6);
        assert_eq!(assessment.monitoring, MonitoringFrequency::Weekly);
        assert!(assessment.escalation_triggers.is_empty());
    }

    #[test]
    fn integration_keeps_the_worst_source() {
        assert!(integrated_hazard_stress(&HazardDetails::default()).is_none());

        let details = HazardDetails {
            accident_history: vec![accident(
                "cut",
                AccidentSeverity::Moderate,
                date(2024, 2, 2),
            )],
            ongoing_risks: vec![OngoingRisk {
                description: "worn die clamp".to_string(),
                recurrence_probability: RecurrenceProbability::High,
                potential_impact: PotentialImpact::Major,
                status: RiskStatus::Unaddressed,
                mitigation_actions: Vec::new(),
            }],
            ..HazardDetails::default()
        };

        let stress = integrated_hazard_stress(&details).expect("assessments present");

        assert_eq!(stress.dominant, HazardStressSource::OngoingRisks);
        assert_eq!(stress.total_score, 5.0);
        assert_eq!(stress.risk_level, RiskLevel::Critical);
        assert_eq!(
            stress.urgent_actions,
            vec!["Unresolved risk: worn die clamp".to_string()]
        );
        assert_eq!(
            stress.accident_history.map(|history| history.five_stage_score),
            Some(3.0)
        );
    }
}
