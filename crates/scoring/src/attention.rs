//! Attention scorer
//!
//! Measures whether the agent engages with what the customer says:
//! - keyword score: share of customer content lemmas the agent echoes
//! - similarity score: cosine similarity of three-turn windows, later windows
//!   weighted more heavily

use call_eval_core::{AttentionScore, Result, Transcript};
use call_eval_embeddings::cosine_similarity;
use call_eval_text_processing::LexicalExtractor;

use crate::context::ScoringContext;
use crate::round_to;

/// `|customer ∩ agent| / |customer|` over content lemmas; 0.0 without customer lemmas
pub fn keyword_score(extractor: &LexicalExtractor, customer_text: &str, agent_text: &str) -> f64 {
    let customer = extractor.extract(customer_text);
    if customer.is_empty() {
        tracing::debug!("No customer content words, keyword score is 0");
        return 0.0;
    }
    let agent = extractor.extract(agent_text);
    let shared = customer.intersection(&agent).count();
    shared as f64 / customer.len() as f64
}

/// Recency-weighted window similarity mapped to [0, 1], rounded to 2 decimals
///
/// Windows are centred on every interior index of the common prefix of the
/// two turn lists. The window centred on index i carries weight i + 1.
/// Returns 0.0 when there are fewer than three turns per side.
pub fn similarity_score(ctx: &ScoringContext, customer: &[&str], agent: &[&str]) -> Result<f64> {
    let n = customer.len().min(agent.len());
    if n < 3 {
        tracing::debug!(turns = n, "Too few paired turns for window similarity");
        return Ok(0.0);
    }

    let mut weighted = 0.0f64;
    let mut total_weight = 0.0f64;

    for i in 1..n - 1 {
        let customer_window = customer[i - 1..=i + 1].join(" ");
        let agent_window = agent[i - 1..=i + 1].join(" ");

        let a = ctx.bank.embed(&customer_window)?;
        let b = ctx.bank.embed(&agent_window)?;
        let weight = (i + 1) as f64;

        weighted += weight * f64::from(cosine_similarity(&a, &b));
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Ok(0.0);
    }

    let mean = weighted / total_weight;
    Ok(round_to((mean + 1.0) / 2.0, 2))
}

/// Keyword and similarity sub-signals and their mean
pub fn score_attention(ctx: &ScoringContext, transcript: &Transcript) -> Result<AttentionScore> {
    let customer = transcript.customer_turns();
    let agent = transcript.agent_turns();

    let keyword = keyword_score(&ctx.lexical, &customer.text, &agent.text);
    let similarity = similarity_score(ctx, &customer.texts(), &agent.texts())?;

    let score = AttentionScore::new(keyword, similarity);
    tracing::debug!(
        keyword = score.keyword_score,
        similarity = score.similarity_score,
        overall = score.overall,
        "Attention scored"
    );
    Ok(score)
}
