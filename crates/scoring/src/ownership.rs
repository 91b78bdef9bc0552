//! Ownership detector
//!
//! Scores how consistently the agent speaks in the register of someone who
//! owns the problem. Each turn is compared with every phrase of the pooled
//! strong/action/support set and the mean (not the max) similarity is kept.

use call_eval_core::{OwnershipScore, Result, Transcript};
use call_eval_embeddings::mean_similarity;

use crate::context::ScoringContext;
use crate::phrases::OWNERSHIP;

pub fn ownership_score(ctx: &ScoringContext, agent_turns: &[&str]) -> Result<OwnershipScore> {
    if agent_turns.is_empty() {
        tracing::debug!("No agent turns, ownership is 0");
        return Ok(OwnershipScore {
            score: 0.0,
            turns_scored: 0,
        });
    }

    let phrases = ctx.bank.embeddings(&OWNERSHIP)?;

    let mut total = 0.0f64;
    for text in agent_turns {
        let embedding = ctx.bank.embed(text)?;
        total += f64::from(mean_similarity(&embedding, &phrases));
    }
    let mean = total / agent_turns.len() as f64;

    Ok(OwnershipScore {
        score: ((mean + 1.0) / 2.0).clamp(0.0, 1.0),
        turns_scored: agent_turns.len(),
    })
}

pub fn score_ownership(ctx: &ScoringContext, transcript: &Transcript) -> Result<OwnershipScore> {
    ownership_score(ctx, &transcript.agent_turns().texts())
}
