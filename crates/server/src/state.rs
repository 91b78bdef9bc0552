//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use call_eval_config::Settings;
use call_eval_core::{Result, SpeakerClassifier, Transcriber};
use call_eval_embeddings::create_embedder;
use call_eval_llm::{create_empathy_grader, create_speaker_classifier, create_transcriber};
use call_eval_scoring::{CallEvaluator, ScoringContext};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Scoring engine
    pub evaluator: Arc<CallEvaluator>,
    /// Maps diarization tags to roles
    pub classifier: Arc<dyn SpeakerClassifier>,
    /// Absent when no transcription key is configured
    pub transcriber: Option<Arc<dyn Transcriber>>,
}

impl AppState {
    /// Build every service from configuration
    ///
    /// Canonical phrase embeddings are computed here so the first request
    /// does not pay for them.
    pub fn new(config: Settings) -> Result<Self> {
        let embedder = create_embedder(&config.embedding)?;
        let ctx = ScoringContext::with_embedder(embedder, config.scoring.clone());
        ctx.warm()?;
        tracing::info!(phrase_sets = ctx.bank.len(), "Phrase embeddings cached");

        let grader = create_empathy_grader(&config.llm)?;
        let evaluator = CallEvaluator::from_context(ctx, grader)?;
        let classifier = create_speaker_classifier(&config.llm)?;
        let transcriber = create_transcriber(&config.transcription)?;

        Ok(Self::from_parts(config, evaluator, classifier, transcriber))
    }

    pub fn from_parts(
        config: Settings,
        evaluator: CallEvaluator,
        classifier: Arc<dyn SpeakerClassifier>,
        transcriber: Option<Arc<dyn Transcriber>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            evaluator: Arc::new(evaluator),
            classifier,
            transcriber,
        }
    }
}
