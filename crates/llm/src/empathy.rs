//! Empathy graders
//!
//! The LLM grades every agent response separately. Entries without a reason
//! are discarded and the remaining grades are averaged per dimension.

use async_trait::async_trait;
use serde::Deserialize;

use call_eval_config::FixedEmpathyConfig;
use call_eval_core::{EmpathyGrader, EmpathySubscores, Result};

use crate::json::extract_json;
use crate::ollama::OllamaClient;
use crate::prompts::empathy_prompt;
use crate::LlmError;

const SERVICE: &str = "empathy grader";

/// Grades of one agent response
#[derive(Debug, Clone, Deserialize)]
pub struct TurnEmpathy {
    pub emotion_recognition: f64,
    pub emotion_validation: f64,
    pub support_intent: f64,
    pub final_empathy_score: f64,
    #[serde(rename = "Valid Reason", default)]
    pub valid_reason: String,
}

/// One entry of the grader's reply
#[derive(Debug, Clone, Deserialize)]
pub struct GradedTurn {
    #[serde(rename = "Customer message", default)]
    pub customer_message: String,
    #[serde(rename = "Agent response", default)]
    pub agent_response: String,
    #[serde(rename = "Empathy")]
    pub empathy: TurnEmpathy,
}

fn malformed(message: impl Into<String>) -> LlmError {
    LlmError::Malformed {
        service: SERVICE,
        message: message.into(),
    }
}

/// Average the reasoned grades; every value must lie in [0, 1]
pub fn average_grades(turns: &[GradedTurn]) -> std::result::Result<EmpathySubscores, LlmError> {
    let mut sums = [0.0f64; 4];
    let mut used = 0usize;

    for (i, turn) in turns.iter().enumerate() {
        let e = &turn.empathy;
        let values = [
            e.emotion_recognition,
            e.emotion_validation,
            e.support_intent,
            e.final_empathy_score,
        ];
        if values.iter().any(|v| !v.is_finite() || !(0.0..=1.0).contains(v)) {
            return Err(malformed(format!("entry {} has a score outside [0, 1]", i)));
        }
        if e.valid_reason.trim().is_empty() {
            tracing::debug!(entry = i, "Discarding empathy grade without a reason");
            continue;
        }
        for (sum, v) in sums.iter_mut().zip(values) {
            *sum += v;
        }
        used += 1;
    }

    if used == 0 {
        return Err(malformed("no graded agent responses with a reason"));
    }

    let n = used as f64;
    Ok(EmpathySubscores {
        emotion_recognition: sums[0] / n,
        emotion_validation: sums[1] / n,
        support_intent: sums[2] / n,
        final_empathy_score: sums[3] / n,
    })
}

/// Parse a grader reply into averaged sub-scores
pub fn parse_empathy_reply(reply: &str) -> std::result::Result<EmpathySubscores, LlmError> {
    let value = extract_json(reply, '[', ']').map_err(malformed)?;
    let turns: Vec<GradedTurn> =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
    average_grades(&turns)
}

/// Asks an Ollama model to grade the agent's empathy
pub struct LlmEmpathyGrader {
    client: OllamaClient,
}

impl LlmEmpathyGrader {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmpathyGrader for LlmEmpathyGrader {
    async fn grade(&self, labeled_transcript: &str) -> Result<EmpathySubscores> {
        let reply = self.client.generate(&empathy_prompt(labeled_transcript)).await?;
        let scores = parse_empathy_reply(&reply)?;
        tracing::debug!(
            recognition = scores.emotion_recognition,
            validation = scores.emotion_validation,
            support = scores.support_intent,
            "Empathy graded"
        );
        Ok(scores)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Returns the same grades for every call
#[derive(Debug, Clone)]
pub struct FixedEmpathyGrader {
    scores: EmpathySubscores,
}

impl FixedEmpathyGrader {
    pub fn new(scores: EmpathySubscores) -> Self {
        Self { scores }
    }

    pub fn from_config(config: &FixedEmpathyConfig) -> std::result::Result<Self, LlmError> {
        let scores = EmpathySubscores::new(
            config.emotion_recognition,
            config.emotion_validation,
            config.support_intent,
        );
        scores
            .validate()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self::new(scores))
    }
}

#[async_trait]
impl EmpathyGrader for FixedEmpathyGrader {
    async fn grade(&self, _labeled_transcript: &str) -> Result<EmpathySubscores> {
        Ok(self.scores)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Here is my evaluation:
[{'Customer message': 'My card was blocked and I am stuck at the store',
  'Agent response': "I'm sorry, that must be stressful. I will unblock it now.",
  'Empathy': {"emotion_recognition": 1, "emotion_validation": 1, "support_intent": 1,
              "final_empathy_score": 1, "Valid Reason": "Names the stress and commits to act"}},
 {'Customer message': 'Okay',
  'Agent response': 'Please hold.',
  'Empathy': {"emotion_recognition": 0, "emotion_validation": 0, "support_intent": 0.5,
              "final_empathy_score": 0.17, "Valid Reason": "Only procedural"}},
 {'Customer message': 'Thanks',
  'Agent response': 'Bye.',
  'Empathy': {"emotion_recognition": 0, "emotion_validation": 0, "support_intent": 0,
              "final_empathy_score": 0, "Valid Reason": ""}}
]"#;

    #[test]
    fn test_parse_and_average() {
        let scores = parse_empathy_reply(REPLY).unwrap();
        assert!((scores.emotion_recognition - 0.5).abs() < 1e-9);
        assert!((scores.emotion_validation - 0.5).abs() < 1e-9);
        assert!((scores.support_intent - 0.75).abs() < 1e-9);
        assert!((scores.final_empathy_score - 0.585).abs() < 1e-9);
        assert!(scores.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let reply = r#"[{"Empathy": {"emotion_recognition": 3, "emotion_validation": 1,
            "support_intent": 1, "final_empathy_score": 1, "Valid Reason": "x"}}]"#;
        assert!(matches!(parse_empathy_reply(reply), Err(LlmError::Malformed { .. })));
    }

    #[test]
    fn test_no_reasoned_entries_rejected() {
        let reply = r#"[{"Empathy": {"emotion_recognition": 1, "emotion_validation": 1,
            "support_intent": 1, "final_empathy_score": 1, "Valid Reason": "  "}}]"#;
        assert!(parse_empathy_reply(reply).is_err());
        assert!(parse_empathy_reply("[]").is_err());
        assert!(parse_empathy_reply("I cannot grade this").is_err());
    }

    #[test]
    fn test_missing_dimension_rejected() {
        let reply = r#"[{"Empathy": {"emotion_recognition": 1, "Valid Reason": "x"}}]"#;
        assert!(parse_empathy_reply(reply).is_err());
    }

    #[tokio::test]
    async fn test_fixed_grader() {
        let grader = FixedEmpathyGrader::from_config(&FixedEmpathyConfig::default()).unwrap();
        let scores = grader.grade("Customer: hi\n").await.unwrap();
        assert_eq!(scores.normalized(), 0.5);

        let bad = FixedEmpathyConfig {
            emotion_recognition: 2.0,
            ..FixedEmpathyConfig::default()
        };
        assert!(FixedEmpathyGrader::from_config(&bad).is_err());
    }
}
