//! Speaker-role classification result
//!
//! Maps the two opaque diarization tags to conversation roles. The wire shape
//! is `{"Speaker A": "Customer", "Speaker B": "Customer Service Agent", "Confidence": "92%"}`.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Role};

/// Role assignment for a two-party call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeakerRoles {
    #[serde(rename = "Speaker A")]
    pub speaker_a: Role,

    #[serde(rename = "Speaker B")]
    pub speaker_b: Role,

    /// Free-form confidence as reported by the classifier (e.g. "92%")
    #[serde(rename = "Confidence", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<serde_json::Value>,
}

impl SpeakerRoles {
    /// Create a role assignment, rejecting the degenerate case where both
    /// tags resolve to the same party
    pub fn new(speaker_a: Role, speaker_b: Role) -> Result<Self> {
        let roles = Self {
            speaker_a,
            speaker_b,
            confidence: None,
        };
        roles.validate()?;
        Ok(roles)
    }

    /// Both speakers must play different roles
    pub fn validate(&self) -> Result<()> {
        if self.speaker_a == self.speaker_b {
            return Err(Error::malformed(
                "speaker classifier",
                format!("both speakers classified as {}", self.speaker_a),
            ));
        }
        Ok(())
    }

    /// Resolve a raw diarization tag ("A"/"B", or "Speaker A"/"Speaker B")
    pub fn role_for(&self, tag: &str) -> Option<Role> {
        let tag = tag.trim();
        let tag = tag.strip_prefix("Speaker ").unwrap_or(tag);
        match tag {
            "A" | "a" => Some(self.speaker_a),
            "B" | "b" => Some(self.speaker_b),
            _ => None,
        }
    }

    /// Confidence as a percentage, when the classifier reported one
    pub fn confidence_percent(&self) -> Option<f32> {
        match self.confidence.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64().map(|v| v as f32),
            serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contract() {
        let json = r#"{"Speaker A": "Customer Service Agent", "Speaker B": "Customer", "Confidence": "92%"}"#;
        let roles: SpeakerRoles = serde_json::from_str(json).unwrap();
        assert_eq!(roles.speaker_a, Role::Agent);
        assert_eq!(roles.speaker_b, Role::Customer);
        assert_eq!(roles.confidence_percent(), Some(92.0));
        assert!(roles.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let json = r#"{"Speaker A": "Customer", "Speaker B": "Customer Service Agent", "Speaker C": "Customer"}"#;
        assert!(serde_json::from_str::<SpeakerRoles>(json).is_err());
    }

    #[test]
    fn test_same_role_is_malformed() {
        let err = SpeakerRoles::new(Role::Customer, Role::Customer).unwrap_err();
        assert!(matches!(err, Error::MalformedExternalOutput { .. }));
    }

    #[test]
    fn test_role_for_tag() {
        let roles = SpeakerRoles::new(Role::Agent, Role::Customer).unwrap();
        assert_eq!(roles.role_for("A"), Some(Role::Agent));
        assert_eq!(roles.role_for("Speaker B"), Some(Role::Customer));
        assert_eq!(roles.role_for("C"), None);
    }
}
