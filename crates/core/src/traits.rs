//! Collaborator interfaces
//!
//! Scorers receive these as injected services so tests can substitute
//! deterministic doubles.

use async_trait::async_trait;

use crate::{EmpathySubscores, RawTranscript, Result, SpeakerRoles};

/// Text to dense vector
///
/// Implementations are read-only after construction and shared across
/// concurrent metric tasks.
pub trait Embedder: Send + Sync {
    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Output dimension
    fn dim(&self) -> usize;
}

/// Polarity of short text in [-1, 1]
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f32;
}

/// External empathy judge
#[async_trait]
pub trait EmpathyGrader: Send + Sync {
    /// Grade a role-labelled transcript
    async fn grade(&self, labeled_transcript: &str) -> Result<EmpathySubscores>;

    /// Grader name for logs
    fn name(&self) -> &str;
}

/// External speaker-role classifier
#[async_trait]
pub trait SpeakerClassifier: Send + Sync {
    /// Classify a dialogue rendered with opaque "Speaker X:" tags
    async fn classify(&self, dialogue: &str) -> Result<SpeakerRoles>;

    fn name(&self) -> &str;
}

/// External speech-to-text service with diarization
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an uploaded audio file
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<RawTranscript>;

    fn name(&self) -> &str;
}
