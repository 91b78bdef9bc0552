//! Call quality scoring engine
//!
//! Features:
//! - Attention (keyword overlap + recency-weighted window similarity)
//! - Greeting and ownership detection against canonical phrase sets
//! - Interruption detection from turn timing
//! - Explicit and implicit customer satisfaction
//! - Talk-to-listen balance
//! - Weighted aggregation and concurrent evaluation with an external
//!   empathy grader
//!
//! Every scorer is a plain function of the transcript and the read-only
//! services in [`ScoringContext`].

pub mod aggregator;
pub mod attention;
pub mod context;
pub mod evaluator;
pub mod greeting;
pub mod interruption;
pub mod ownership;
pub mod phrases;
pub mod satisfaction;
pub mod talk_listen;

pub use aggregator::{Aggregator, WeightTable};
pub use attention::{keyword_score, score_attention, similarity_score};
pub use context::ScoringContext;
pub use evaluator::{run_local_metric, CallEvaluator, MetricOutcome, LOCAL_METRICS};
pub use greeting::{detect_greeting, score_greeting};
pub use interruption::{detect_interruption, score_interruption};
pub use ownership::{ownership_score, score_ownership};
pub use satisfaction::{
    explicit_score, has_negative_context, implicit_score, score_satisfaction, tail_start,
};
pub use talk_listen::{score_talk_to_listen, talk_to_listen};

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use call_eval_config::ScoringConfig;
    use call_eval_core::{Role, Transcript, Utterance};
    use call_eval_embeddings::HashingEmbedder;

    use crate::ScoringContext;

    pub fn context() -> ScoringContext {
        ScoringContext::with_embedder(Arc::new(HashingEmbedder::default()), ScoringConfig::default())
    }

    pub fn transcript(turns: &[(Role, &str, u64, u64)]) -> Transcript {
        let utterances = turns
            .iter()
            .map(|(role, text, start, end)| Utterance::new(*role, *text, *start, *end, 1.0).unwrap())
            .collect();
        Transcript::new(utterances).unwrap()
    }
}
