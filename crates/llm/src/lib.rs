//! External collaborators
//!
//! - Ollama-backed speaker classifier and empathy grader
//! - Static/fixed stand-ins selected through configuration
//! - AssemblyAI transcription with speaker diarization

pub mod empathy;
pub mod json;
pub mod ollama;
pub mod prompts;
pub mod speaker;
pub mod transcription;

use std::sync::Arc;

use thiserror::Error;

use call_eval_config::{EmpathyProvider, LlmConfig, SpeakerProvider, TranscriptionConfig};
use call_eval_core::{EmpathyGrader, Error, SpeakerClassifier, Transcriber};

pub use empathy::{average_grades, parse_empathy_reply, FixedEmpathyGrader, LlmEmpathyGrader};
pub use ollama::OllamaClient;
pub use speaker::{parse_speaker_roles, LlmSpeakerClassifier, StaticSpeakerClassifier};
pub use transcription::AssemblyAiTranscriber;

/// Errors raised while talking to an external service
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed output from {service}: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    #[error("{service} timed out after {seconds}s")]
    Timeout { service: &'static str, seconds: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub(crate) fn request(service: &'static str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            tracing::warn!(service, "Request timed out");
        }
        LlmError::Request {
            service,
            message: e.to_string(),
        }
    }
}

impl From<LlmError> for Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Request { service, message } => Error::upstream(service, 0, message),
            LlmError::Status {
                service,
                status,
                body,
            } => Error::upstream(service, status, body),
            LlmError::Malformed { service, message } => Error::malformed(service, message),
            LlmError::Timeout { service, seconds } => {
                Error::upstream(service, 0, format!("timed out after {}s", seconds))
            }
            LlmError::Config(msg) => Error::Config(msg),
        }
    }
}

/// Build the configured speaker classifier
pub fn create_speaker_classifier(
    config: &LlmConfig,
) -> Result<Arc<dyn SpeakerClassifier>, LlmError> {
    let classifier: Arc<dyn SpeakerClassifier> = match config.speaker_provider {
        SpeakerProvider::Ollama => Arc::new(LlmSpeakerClassifier::new(OllamaClient::new(config)?)),
        SpeakerProvider::Static => Arc::new(StaticSpeakerClassifier::new(&config.static_agent_tag)?),
    };
    tracing::info!(provider = classifier.name(), "Speaker classifier ready");
    Ok(classifier)
}

/// Build the configured empathy grader
pub fn create_empathy_grader(config: &LlmConfig) -> Result<Arc<dyn EmpathyGrader>, LlmError> {
    let grader: Arc<dyn EmpathyGrader> = match config.empathy_provider {
        EmpathyProvider::Ollama => Arc::new(LlmEmpathyGrader::new(OllamaClient::new(config)?)),
        EmpathyProvider::Fixed => Arc::new(FixedEmpathyGrader::from_config(&config.fixed_empathy)?),
    };
    tracing::info!(provider = grader.name(), "Empathy grader ready");
    Ok(grader)
}

/// Build the transcriber, or `None` when no API key is configured
pub fn create_transcriber(
    config: &TranscriptionConfig,
) -> Result<Option<Arc<dyn Transcriber>>, LlmError> {
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => {
            let transcriber: Arc<dyn Transcriber> = Arc::new(AssemblyAiTranscriber::new(config, key)?);
            tracing::info!(provider = transcriber.name(), "Transcriber ready");
            Ok(Some(transcriber))
        }
        _ => {
            tracing::warn!("No transcription API key configured, audio evaluation disabled");
            Ok(None)
        }
    }
}
