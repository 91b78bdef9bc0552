//! Speaker-role classifiers

use async_trait::async_trait;

use call_eval_core::{Result, Role, SpeakerClassifier, SpeakerRoles};

use crate::json::extract_json;
use crate::ollama::OllamaClient;
use crate::prompts::speaker_prompt;
use crate::LlmError;

const SERVICE: &str = "speaker classifier";

/// Parse and validate a classifier reply
pub fn parse_speaker_roles(reply: &str) -> std::result::Result<SpeakerRoles, LlmError> {
    let value = extract_json(reply, '{', '}').map_err(|message| LlmError::Malformed {
        service: SERVICE,
        message,
    })?;

    let roles: SpeakerRoles = serde_json::from_value(value).map_err(|e| LlmError::Malformed {
        service: SERVICE,
        message: e.to_string(),
    })?;

    if roles.speaker_a == roles.speaker_b {
        return Err(LlmError::Malformed {
            service: SERVICE,
            message: format!("both speakers classified as {}", roles.speaker_a),
        });
    }

    Ok(roles)
}

/// Asks an Ollama model who is who
pub struct LlmSpeakerClassifier {
    client: OllamaClient,
}

impl LlmSpeakerClassifier {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeakerClassifier for LlmSpeakerClassifier {
    async fn classify(&self, dialogue: &str) -> Result<SpeakerRoles> {
        let reply = self.client.generate(&speaker_prompt(dialogue)).await?;
        let roles = parse_speaker_roles(&reply)?;

        tracing::info!(
            speaker_a = %roles.speaker_a,
            speaker_b = %roles.speaker_b,
            confidence = ?roles.confidence_percent(),
            "Speakers classified"
        );
        Ok(roles)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Fixed assignment: one configured tag is the agent, the other the customer
#[derive(Debug, Clone)]
pub struct StaticSpeakerClassifier {
    roles: SpeakerRoles,
}

impl StaticSpeakerClassifier {
    pub fn new(agent_tag: &str) -> std::result::Result<Self, LlmError> {
        let (a, b) = match agent_tag.trim() {
            "A" | "a" => (Role::Agent, Role::Customer),
            "B" | "b" => (Role::Customer, Role::Agent),
            other => {
                return Err(LlmError::Config(format!(
                    "static agent tag must be \"A\" or \"B\", got {:?}",
                    other
                )))
            }
        };
        let roles = SpeakerRoles::new(a, b).map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { roles })
    }
}

#[async_trait]
impl SpeakerClassifier for StaticSpeakerClassifier {
    async fn classify(&self, _dialogue: &str) -> Result<SpeakerRoles> {
        Ok(self.roles.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
