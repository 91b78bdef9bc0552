//! Utterance types
//!
//! `RawUtterance` is what the transcription service hands back (opaque speaker
//! tags, `start`/`end` field names). `Utterance` is the role-labelled turn the
//! scorers consume.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{Error, Result};

/// Conversation party after speaker-role classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Agent,
}

impl Role {
    /// Label used in role-classification output and labelled transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Agent => "Customer Service Agent",
        }
    }

    /// Parse a role label, accepting the short and long agent forms
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(Role::Customer),
            "agent" | "customer service agent" | "customer agent" | "service agent" => {
                Some(Role::Agent)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Role::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown role '{}', expected 'Customer' or 'Customer Service Agent'",
                label
            ))
        })
    }
}

/// One spoken turn with a resolved speaker role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Who spoke
    pub speaker: Role,

    /// Transcribed text
    pub text: String,

    /// Start time offset (ms from call start)
    pub start_ms: u64,

    /// End time offset (ms from call start)
    pub end_ms: u64,

    /// Transcription confidence (0.0 - 1.0)
    pub confidence: f32,
}

impl Utterance {
    /// Create an utterance, rejecting inverted time ranges
    pub fn new(
        speaker: Role,
        text: impl Into<String>,
        start_ms: u64,
        end_ms: u64,
        confidence: f32,
    ) -> Result<Self> {
        if start_ms > end_ms {
            return Err(Error::invalid_input(format!(
                "utterance starts at {}ms but ends at {}ms",
                start_ms, end_ms
            )));
        }

        Ok(Self {
            speaker,
            text: text.into(),
            start_ms,
            end_ms,
            confidence,
        })
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Check if the turn carries no text
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Utterance as returned by the transcription service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUtterance {
    /// Opaque diarization tag ("A", "B", ...)
    pub speaker: String,

    /// Transcribed text
    pub text: String,

    /// Start time in milliseconds
    pub start: u64,

    /// End time in milliseconds
    pub end: u64,

    /// Confidence for this utterance
    #[serde(default)]
    pub confidence: f32,
}

impl RawUtterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            start,
            end,
            confidence: 1.0,
        }
    }
}

/// Transcript as returned by the transcription service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTranscript {
    /// Diarized utterances in chronological order
    pub utterances: Vec<RawUtterance>,
}

impl RawTranscript {
    pub fn new(utterances: Vec<RawUtterance>) -> Self {
        Self { utterances }
    }

    /// Render the transcript with opaque tags for the speaker classifier
    pub fn dialogue_text(&self) -> String {
        let mut dialogue = String::new();
        for u in &self.utterances {
            dialogue.push_str(&format!("Speaker {}: {}\n", u.speaker, u.text));
        }
        dialogue
    }

    /// Check if there is nothing to evaluate
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_rejects_inverted_range() {
        let err = Utterance::new(Role::Agent, "hello", 2000, 1000, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let ok = Utterance::new(Role::Agent, "hello", 1000, 1000, 0.9).unwrap();
        assert_eq!(ok.duration_ms(), 0);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::from_label("Customer"), Some(Role::Customer));
        assert_eq!(Role::from_label("Customer Service Agent"), Some(Role::Agent));
        assert_eq!(Role::from_label(" agent "), Some(Role::Agent));
        assert_eq!(Role::from_label("Manager"), None);
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Agent).unwrap();
        assert_eq!(json, "\"Customer Service Agent\"");

        let role: Role = serde_json::from_str("\"Customer\"").unwrap();
        assert_eq!(role, Role::Customer);

        assert!(serde_json::from_str::<Role>("\"Supervisor\"").is_err());
    }

    #[test]
    fn test_raw_transcript_parse() {
        let json = r#"{
            "utterances": [
                {"speaker": "A", "text": "Hello, thank you for calling.", "start": 1200, "end": 3400, "confidence": 0.96},
                {"speaker": "B", "text": "Hi, my internet is down.", "start": 3600, "end": 6800, "confidence": 0.95}
            ]
        }"#;
        let raw: RawTranscript = serde_json::from_str(json).unwrap();
        assert_eq!(raw.utterances.len(), 2);
        assert_eq!(
            raw.dialogue_text(),
            "Speaker A: Hello, thank you for calling.\nSpeaker B: Hi, my internet is down.\n"
        );
    }

    #[test]
    fn test_raw_transcript_requires_utterances() {
        assert!(serde_json::from_str::<RawTranscript>(r#"{"text": "hi"}"#).is_err());
    }
}
