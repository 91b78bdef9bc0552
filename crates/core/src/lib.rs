//! Core traits and types for call quality evaluation
//!
//! This crate provides foundational types used across all other crates:
//! - Utterance and transcript types (raw and role-labelled)
//! - Speaker-role mapping
//! - Score records and the evaluation report
//! - Error types
//! - Collaborator traits (embedding, sentiment, empathy grading, speaker
//!   classification, transcription)

pub mod error;
pub mod roles;
pub mod scores;
pub mod traits;
pub mod transcript;
pub mod utterance;

pub use error::{Error, ErrorKind, Result};
pub use roles::SpeakerRoles;
pub use scores::{
    AttentionScore, DetailedScores, EmpathySubscores, EvaluationReport, FinalScore,
    GreetingResult, InterruptionResult, MetricKind, OwnershipScore, PartialScores,
    SatisfactionScore, ScoreVector, TalkToListen,
};
pub use traits::{Embedder, EmpathyGrader, SentimentScorer, SpeakerClassifier, Transcriber};
pub use transcript::{Projection, Transcript};
pub use utterance::{RawTranscript, RawUtterance, Role, Utterance};
