//! Role-labelled transcript and per-role projections

use serde::Serialize;
use std::sync::Arc;

use crate::{Error, RawTranscript, Result, Role, SpeakerRoles, Utterance};

/// Chronologically ordered, immutable sequence of utterances
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    utterances: Vec<Utterance>,
}

/// Turns of one role, in original order, with their joined text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub turns: Vec<Utterance>,
    /// Turn texts joined with "\n"
    pub text: String,
}

impl Projection {
    fn of(utterances: &[Utterance], role: Role) -> Self {
        let turns: Vec<Utterance> = utterances
            .iter()
            .filter(|u| u.speaker == role)
            .cloned()
            .collect();
        let text = turns
            .iter()
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { turns, text }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turn texts in order
    pub fn texts(&self) -> Vec<&str> {
        self.turns.iter().map(|u| u.text.as_str()).collect()
    }

    /// Total speaking time in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.turns
            .iter()
            .fold(0u64, |total, u| total.saturating_add(u.duration_ms()))
    }
}

impl Transcript {
    /// Build a transcript, rejecting out-of-order utterances
    pub fn new(utterances: Vec<Utterance>) -> Result<Self> {
        for (i, pair) in utterances.windows(2).enumerate() {
            if pair[1].start_ms < pair[0].start_ms {
                return Err(Error::invalid_input(format!(
                    "utterance {} starts at {}ms, before utterance {} at {}ms",
                    i + 1,
                    pair[1].start_ms,
                    i,
                    pair[0].start_ms
                )));
            }
        }
        Ok(Self { utterances })
    }

    /// Apply a speaker-role mapping to a raw diarized transcript
    ///
    /// Utterances whose tag is neither speaker A nor B are dropped.
    pub fn from_raw(raw: &RawTranscript, roles: &SpeakerRoles) -> Result<Self> {
        roles.validate()?;

        let mut utterances = Vec::with_capacity(raw.utterances.len());
        for u in &raw.utterances {
            let Some(role) = roles.role_for(&u.speaker) else {
                tracing::warn!(speaker = %u.speaker, "Dropping utterance with unknown speaker tag");
                continue;
            };
            utterances.push(Utterance::new(role, u.text.clone(), u.start, u.end, u.confidence)?);
        }

        Self::new(utterances)
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn customer_turns(&self) -> Projection {
        Projection::of(&self.utterances, Role::Customer)
    }

    pub fn agent_turns(&self) -> Projection {
        Projection::of(&self.utterances, Role::Agent)
    }

    /// Render "Role: text" lines for the empathy grader
    pub fn labeled_text(&self) -> String {
        let mut out = String::new();
        for u in &self.utterances {
            out.push_str(u.speaker.label());
            out.push_str(": ");
            out.push_str(&u.text);
            out.push('\n');
        }
        out
    }

    /// Wrap for sharing across metric tasks
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawUtterance;

    fn utt(role: Role, text: &str, start: u64, end: u64) -> Utterance {
        Utterance::new(role, text, start, end, 0.9).unwrap()
    }

    #[test]
    fn test_rejects_decreasing_start() {
        let err = Transcript::new(vec![
            utt(Role::Agent, "Hello", 1000, 2000),
            utt(Role::Customer, "Hi", 500, 900),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_projections_preserve_order() {
        let t = Transcript::new(vec![
            utt(Role::Agent, "Hello, how may I help you?", 0, 1500),
            utt(Role::Customer, "My card was blocked.", 1800, 3000),
            utt(Role::Agent, "Let me check that for you.", 3200, 4500),
            utt(Role::Customer, "Thanks.", 4800, 5200),
        ])
        .unwrap();

        let customer = t.customer_turns();
        assert_eq!(customer.len(), 2);
        assert_eq!(customer.text, "My card was blocked.\nThanks.");
        assert_eq!(customer.total_duration_ms(), 1200 + 400);

        let agent = t.agent_turns();
        assert_eq!(
            agent.texts(),
            vec!["Hello, how may I help you?", "Let me check that for you."]
        );
    }

    #[test]
    fn test_from_raw_applies_roles() {
        let raw = RawTranscript::new(vec![
            RawUtterance::new("A", "Thank you for calling.", 0, 1000),
            RawUtterance::new("B", "Hi, I need help.", 1200, 2000),
            RawUtterance::new("C", "Background noise.", 2100, 2200),
        ]);
        let roles = SpeakerRoles::new(Role::Agent, Role::Customer).unwrap();

        let t = Transcript::from_raw(&raw, &roles).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.utterances()[0].speaker, Role::Agent);
        assert_eq!(
            t.labeled_text(),
            "Customer Service Agent: Thank you for calling.\nCustomer: Hi, I need help.\n"
        );
    }

    #[test]
    fn test_from_raw_rejects_inverted_range() {
        let raw = RawTranscript::new(vec![RawUtterance::new("A", "Hello", 2000, 1000)]);
        let roles = SpeakerRoles::new(Role::Agent, Role::Customer).unwrap();
        assert!(Transcript::from_raw(&raw, &roles).is_err());
    }

    #[test]
    fn test_total_duration_saturates() {
        let t = Transcript::new(vec![
            utt(Role::Customer, "First", 0, u64::MAX),
            utt(Role::Customer, "Second", 0, u64::MAX),
        ])
        .unwrap();
        assert_eq!(t.customer_turns().total_duration_ms(), u64::MAX);
    }

    #[test]
    fn test_empty_transcript() {
        let t = Transcript::new(Vec::new()).unwrap();
        assert!(t.is_empty());
        assert!(t.customer_turns().is_empty());
        assert_eq!(t.labeled_text(), "");
    }
}
