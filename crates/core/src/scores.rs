//! Score records
//!
//! Every metric produces a typed detail record plus a normalized sub-score.
//! `ScoreVector` holds exactly one value per metric, so a missing or unknown
//! metric is a construction error rather than a silent default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// The seven scored dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    #[serde(rename = "attention")]
    Attention,
    #[serde(rename = "empathy")]
    Empathy,
    #[serde(rename = "greetings")]
    Greeting,
    #[serde(rename = "ownership")]
    Ownership,
    #[serde(rename = "interruptions")]
    Interruption,
    #[serde(rename = "satisfaction")]
    Satisfaction,
    #[serde(rename = "talk_to_listen")]
    TalkToListen,
}

impl MetricKind {
    /// All metrics in report order
    pub const ALL: [MetricKind; 7] = [
        MetricKind::Attention,
        MetricKind::Empathy,
        MetricKind::Greeting,
        MetricKind::Ownership,
        MetricKind::Interruption,
        MetricKind::Satisfaction,
        MetricKind::TalkToListen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Attention => "attention",
            MetricKind::Empathy => "empathy",
            MetricKind::Greeting => "greetings",
            MetricKind::Ownership => "ownership",
            MetricKind::Interruption => "interruptions",
            MetricKind::Satisfaction => "satisfaction",
            MetricKind::TalkToListen => "talk_to_listen",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attention: lexical overlap plus recency-weighted semantic similarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttentionScore {
    pub keyword_score: f64,
    pub similarity_score: f64,
    pub overall: f64,
}

impl AttentionScore {
    pub fn new(keyword_score: f64, similarity_score: f64) -> Self {
        Self {
            keyword_score,
            similarity_score,
            overall: (keyword_score + similarity_score) / 2.0,
        }
    }
}

/// Greeting detection over the opening agent turns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreetingResult {
    pub greeted: bool,
    /// Index of the agent turn that matched, if any
    pub matched_turn: Option<usize>,
    /// Highest similarity seen across the examined turns
    pub best_similarity: f64,
}

impl GreetingResult {
    pub fn none() -> Self {
        Self {
            greeted: false,
            matched_turn: None,
            best_similarity: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        if self.greeted {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnershipScore {
    pub score: f64,
    pub turns_scored: usize,
}

/// Conversation-level interruption flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterruptionResult {
    pub detected: bool,
    /// Start of the agent turn that triggered the flag
    pub at_ms: Option<u64>,
    /// Signed gap between the customer turn end and the agent turn start
    pub gap_ms: Option<i64>,
}

impl InterruptionResult {
    pub fn none() -> Self {
        Self {
            detected: false,
            at_ms: None,
            gap_ms: None,
        }
    }

    /// 1 when the agent never cut in, 0 otherwise
    pub fn score(&self) -> f64 {
        if self.detected {
            0.0
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionScore {
    pub explicit: f64,
    pub implicit: f64,
    pub overall: f64,
}

impl SatisfactionScore {
    pub fn new(explicit: f64, implicit: f64) -> Self {
        Self {
            explicit,
            implicit,
            overall: (explicit + implicit) / 2.0,
        }
    }
}

/// Speaking-time balance between the two parties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TalkToListen {
    pub customer_ms: u64,
    pub agent_ms: u64,
    /// customer_ms / agent_ms, rounded to 2 decimals (0.0 when the agent never spoke)
    pub ratio: f64,
    pub healthy: bool,
}

impl TalkToListen {
    pub fn score(&self) -> f64 {
        if self.healthy {
            1.0
        } else {
            0.0
        }
    }
}

/// Empathy dimensions returned by the external grader, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmpathySubscores {
    pub emotion_recognition: f64,
    pub emotion_validation: f64,
    pub support_intent: f64,
    #[serde(default)]
    pub final_empathy_score: f64,
}

impl EmpathySubscores {
    pub fn new(emotion_recognition: f64, emotion_validation: f64, support_intent: f64) -> Self {
        let mut scores = Self {
            emotion_recognition,
            emotion_validation,
            support_intent,
            final_empathy_score: 0.0,
        };
        scores.final_empathy_score = scores.normalized();
        scores
    }

    /// Sum of the three dimensions, in [0, 3]
    pub fn raw_sum(&self) -> f64 {
        self.emotion_recognition + self.emotion_validation + self.support_intent
    }

    /// Mean of the three dimensions, in [0, 1]
    pub fn normalized(&self) -> f64 {
        self.raw_sum() / 3.0
    }

    /// Reject dimensions outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("emotion_recognition", self.emotion_recognition),
            ("emotion_validation", self.emotion_validation),
            ("support_intent", self.support_intent),
            ("final_empathy_score", self.final_empathy_score),
        ];
        for (name, value) in dims {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::malformed(
                    "empathy grader",
                    format!("{} = {} is outside [0, 1]", name, value),
                ));
            }
        }
        Ok(())
    }
}

/// One value per metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreVector {
    pub attention: f64,
    pub empathy: f64,
    pub greetings: f64,
    pub ownership: f64,
    pub interruptions: f64,
    pub satisfaction: f64,
    pub talk_to_listen: f64,
}

impl ScoreVector {
    /// Same value for every metric
    pub fn uniform(value: f64) -> Self {
        Self {
            attention: value,
            empathy: value,
            greetings: value,
            ownership: value,
            interruptions: value,
            satisfaction: value,
            talk_to_listen: value,
        }
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Attention => self.attention,
            MetricKind::Empathy => self.empathy,
            MetricKind::Greeting => self.greetings,
            MetricKind::Ownership => self.ownership,
            MetricKind::Interruption => self.interruptions,
            MetricKind::Satisfaction => self.satisfaction,
            MetricKind::TalkToListen => self.talk_to_listen,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: f64) {
        let slot = match kind {
            MetricKind::Attention => &mut self.attention,
            MetricKind::Empathy => &mut self.empathy,
            MetricKind::Greeting => &mut self.greetings,
            MetricKind::Ownership => &mut self.ownership,
            MetricKind::Interruption => &mut self.interruptions,
            MetricKind::Satisfaction => &mut self.satisfaction,
            MetricKind::TalkToListen => &mut self.talk_to_listen,
        };
        *slot = value;
    }

    /// Iterate in report order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, f64)> + '_ {
        MetricKind::ALL.iter().map(move |k| (*k, self.get(*k)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

/// Aggregated score with the per-metric weighted contributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub value: f64,
    pub breakdown: ScoreVector,
}

/// Detail records for every metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    pub attention: AttentionScore,
    pub empathy: EmpathySubscores,
    pub greetings: GreetingResult,
    pub ownership: OwnershipScore,
    pub interruptions: InterruptionResult,
    pub satisfaction: SatisfactionScore,
    pub talk_to_listen: TalkToListen,
}

impl DetailedScores {
    /// Normalized sub-scores fed to the aggregator
    pub fn score_vector(&self) -> ScoreVector {
        ScoreVector {
            attention: self.attention.overall,
            empathy: self.empathy.normalized(),
            greetings: self.greetings.score(),
            ownership: self.ownership.score,
            interruptions: self.interruptions.score(),
            satisfaction: self.satisfaction.overall,
            talk_to_listen: self.talk_to_listen.score(),
        }
    }
}

/// Detail records collected while metric tasks complete
#[derive(Debug, Clone, Default)]
pub struct PartialScores {
    pub attention: Option<AttentionScore>,
    pub empathy: Option<EmpathySubscores>,
    pub greetings: Option<GreetingResult>,
    pub ownership: Option<OwnershipScore>,
    pub interruptions: Option<InterruptionResult>,
    pub satisfaction: Option<SatisfactionScore>,
    pub talk_to_listen: Option<TalkToListen>,
}

impl PartialScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics that have not reported yet
    pub fn missing(&self) -> Vec<MetricKind> {
        let present = [
            (MetricKind::Attention, self.attention.is_some()),
            (MetricKind::Empathy, self.empathy.is_some()),
            (MetricKind::Greeting, self.greetings.is_some()),
            (MetricKind::Ownership, self.ownership.is_some()),
            (MetricKind::Interruption, self.interruptions.is_some()),
            (MetricKind::Satisfaction, self.satisfaction.is_some()),
            (MetricKind::TalkToListen, self.talk_to_listen.is_some()),
        ];
        present
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(k, _)| k)
            .collect()
    }

    /// Complete the record set; any absent metric is a hard failure
    pub fn into_detailed(self) -> Result<DetailedScores> {
        Ok(DetailedScores {
            attention: self.attention.ok_or(Error::MissingScore(MetricKind::Attention))?,
            empathy: self.empathy.ok_or(Error::MissingScore(MetricKind::Empathy))?,
            greetings: self.greetings.ok_or(Error::MissingScore(MetricKind::Greeting))?,
            ownership: self.ownership.ok_or(Error::MissingScore(MetricKind::Ownership))?,
            interruptions: self
                .interruptions
                .ok_or(Error::MissingScore(MetricKind::Interruption))?,
            satisfaction: self
                .satisfaction
                .ok_or(Error::MissingScore(MetricKind::Satisfaction))?,
            talk_to_listen: self
                .talk_to_listen
                .ok_or(Error::MissingScore(MetricKind::TalkToListen))?,
        })
    }

    pub fn into_score_vector(self) -> Result<ScoreVector> {
        Ok(self.into_detailed()?.score_vector())
    }
}

/// Response body of one evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluation_id: String,
    pub evaluated_at: DateTime<Utc>,
    /// Final score rounded to 4 decimals
    pub final_score: f64,
    /// Unweighted sub-scores
    pub score_breakdown: ScoreVector,
    /// Weighted contribution of each metric
    pub weighted_breakdown: ScoreVector,
    pub detailed_scores: DetailedScores,
}

impl EvaluationReport {
    pub fn new(
        evaluation_id: impl Into<String>,
        final_score: FinalScore,
        detailed_scores: DetailedScores,
    ) -> Self {
        Self {
            evaluation_id: evaluation_id.into(),
            evaluated_at: Utc::now(),
            final_score: (final_score.value * 10_000.0).round() / 10_000.0,
            score_breakdown: detailed_scores.score_vector(),
            weighted_breakdown: final_score.breakdown,
            detailed_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_partial() -> PartialScores {
        PartialScores {
            attention: Some(AttentionScore::new(0.5, 0.7)),
            empathy: Some(EmpathySubscores::new(0.9, 0.6, 0.3)),
            greetings: Some(GreetingResult {
                greeted: true,
                matched_turn: Some(0),
                best_similarity: 0.92,
            }),
            ownership: Some(OwnershipScore {
                score: 0.55,
                turns_scored: 4,
            }),
            interruptions: Some(InterruptionResult::none()),
            satisfaction: Some(SatisfactionScore::new(0.4, 0.6)),
            talk_to_listen: Some(TalkToListen {
                customer_ms: 400,
                agent_ms: 600,
                ratio: 0.67,
                healthy: true,
            }),
        }
    }

    #[test]
    fn test_metric_names() {
        let names: Vec<&str> = MetricKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "attention",
                "empathy",
                "greetings",
                "ownership",
                "interruptions",
                "satisfaction",
                "talk_to_listen"
            ]
        );
        assert_eq!(
            serde_json::to_string(&MetricKind::TalkToListen).unwrap(),
            "\"talk_to_listen\""
        );
    }

    #[test]
    fn test_score_vector_get_set() {
        let mut v = ScoreVector::uniform(0.0);
        v.set(MetricKind::Satisfaction, 0.8);
        assert_eq!(v.get(MetricKind::Satisfaction), 0.8);
        assert_eq!(v.iter().count(), 7);
        assert!((v.sum() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_score_vector_rejects_unknown_keys() {
        let json = r#"{"attention":1,"empathy":1,"greetings":1,"ownership":1,"interruptions":1,"satisfaction":1,"talk_to_listen":1,"politeness":1}"#;
        assert!(serde_json::from_str::<ScoreVector>(json).is_err());

        let json = r#"{"attention":1,"empathy":1}"#;
        assert!(serde_json::from_str::<ScoreVector>(json).is_err());
    }

    #[test]
    fn test_partial_scores_complete() {
        let v = full_partial().into_score_vector().unwrap();
        assert!((v.attention - 0.6).abs() < 1e-12);
        assert!((v.empathy - 0.6).abs() < 1e-12);
        assert_eq!(v.greetings, 1.0);
        assert_eq!(v.interruptions, 1.0);
        assert!((v.satisfaction - 0.5).abs() < 1e-12);
        assert_eq!(v.talk_to_listen, 1.0);
    }

    #[test]
    fn test_partial_scores_missing_is_error() {
        let mut partial = full_partial();
        partial.empathy = None;
        assert_eq!(partial.missing(), vec![MetricKind::Empathy]);

        let err = partial.into_score_vector().unwrap_err();
        assert!(matches!(err, Error::MissingScore(MetricKind::Empathy)));
    }

    #[test]
    fn test_empathy_validation() {
        assert!(EmpathySubscores::new(1.0, 0.0, 0.5).validate().is_ok());

        let bad = EmpathySubscores {
            emotion_recognition: 1.4,
            emotion_validation: 0.2,
            support_intent: 0.2,
            final_empathy_score: 0.6,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_report_rounds_final_score() {
        let details = full_partial().into_detailed().unwrap();
        let report = EvaluationReport::new(
            "eval-1",
            FinalScore {
                value: 0.123456,
                breakdown: ScoreVector::uniform(0.0),
            },
            details,
        );
        assert_eq!(report.final_score, 0.1235);
        assert_eq!(report.score_breakdown.greetings, 1.0);
    }
}
