//! Shared, read-only services handed to every scorer

use std::collections::BTreeSet;
use std::sync::Arc;

use call_eval_config::ScoringConfig;
use call_eval_core::{Embedder, Result, SentimentScorer};
use call_eval_embeddings::PhraseBank;
use call_eval_text_processing::{LexicalExtractor, SentimentAnalyzer};

use crate::phrases::{ACCEPTANCE_WORDS, ALL_SETS};

/// Embedding, sentiment and lexical services plus scorer parameters
///
/// Cloning is cheap; all heavy state sits behind `Arc`.
#[derive(Clone)]
pub struct ScoringContext {
    pub bank: Arc<PhraseBank>,
    pub sentiment: Arc<dyn SentimentScorer>,
    pub lexical: LexicalExtractor,
    pub config: Arc<ScoringConfig>,
    acceptance_lemmas: Arc<BTreeSet<String>>,
}

impl ScoringContext {
    pub fn new(
        bank: Arc<PhraseBank>,
        sentiment: Arc<dyn SentimentScorer>,
        config: ScoringConfig,
    ) -> Self {
        let lexical = LexicalExtractor::new();
        let acceptance_lemmas = Arc::new(lexical.extract(&ACCEPTANCE_WORDS.join(" ")));

        Self {
            bank,
            sentiment,
            lexical,
            config: Arc::new(config),
            acceptance_lemmas,
        }
    }

    /// Context with the lexicon sentiment analyzer
    pub fn with_embedder(embedder: Arc<dyn Embedder>, config: ScoringConfig) -> Self {
        Self::new(
            Arc::new(PhraseBank::new(embedder)),
            Arc::new(SentimentAnalyzer::new()),
            config,
        )
    }

    /// Embed every canonical phrase set now rather than on first use
    pub fn warm(&self) -> Result<()> {
        self.bank.warm(&ALL_SETS)
    }

    /// Lemmas of the implicit acceptance word list
    pub fn acceptance_lemmas(&self) -> &BTreeSet<String> {
        &self.acceptance_lemmas
    }
}

impl std::fmt::Debug for ScoringContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringContext")
            .field("bank", &self.bank)
            .field("config", &self.config)
            .field("acceptance_lemmas", &self.acceptance_lemmas.len())
            .finish()
    }
}
