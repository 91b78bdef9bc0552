//! Greeting detector

use call_eval_core::{GreetingResult, Result, Transcript};
use call_eval_embeddings::max_similarity;

use crate::context::ScoringContext;
use crate::phrases::GREETINGS;

/// Scan the opening agent turns for a canonical greeting
///
/// A turn counts when its best similarity against the greeting set exceeds
/// `threshold`. Scanning stops at the first hit.
pub fn detect_greeting(
    ctx: &ScoringContext,
    agent_turns: &[&str],
    threshold: f32,
    max_turns: usize,
) -> Result<GreetingResult> {
    if agent_turns.is_empty() {
        tracing::debug!("No agent turns, no greeting");
        return Ok(GreetingResult::none());
    }

    let greetings = ctx.bank.embeddings(&GREETINGS)?;
    let mut best = f32::MIN;

    for (i, text) in agent_turns.iter().take(max_turns).enumerate() {
        let embedding = ctx.bank.embed(text)?;
        let similarity = max_similarity(&embedding, &greetings);
        best = best.max(similarity);

        if similarity > threshold {
            return Ok(GreetingResult {
                greeted: true,
                matched_turn: Some(i),
                best_similarity: f64::from(similarity),
            });
        }
    }

    Ok(GreetingResult {
        greeted: false,
        matched_turn: None,
        best_similarity: f64::from(best),
    })
}

pub fn score_greeting(ctx: &ScoringContext, transcript: &Transcript) -> Result<GreetingResult> {
    let agent = transcript.agent_turns();
    detect_greeting(
        ctx,
        &agent.texts(),
        ctx.config.greeting_threshold,
        ctx.config.greeting_max_turns,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    #[test]
    fn test_exact_greeting_detected() {
        let ctx = context();
        let result = detect_greeting(&ctx, &["Hello, how may I help you?"], 0.65, 3).unwrap();
        assert!(result.greeted);
        assert_eq!(result.matched_turn, Some(0));
        assert_eq!(result.score(), 1.0);
        assert!(result.best_similarity > 0.99);
    }

    #[test]
    fn test_unrelated_turns_not_greeting() {
        let ctx = context();
        let turns = ["The weather is nice today."; 3];
        let result = detect_greeting(&ctx, &turns, 0.65, 3).unwrap();
        assert!(!result.greeted);
        assert_eq!(result.score(), 0.0);
        assert!(result.best_similarity < 0.65);
    }

    #[test]
    fn test_only_first_turns_examined() {
        let ctx = context();
        let turns = [
            "Let me pull up your account",
            "One moment please",
            "I see the charge here",
            "Hello, how may I help you?",
        ];
        let result = detect_greeting(&ctx, &turns, 0.65, 3).unwrap();
        assert!(!result.greeted);

        let result = detect_greeting(&ctx, &turns, 0.65, 4).unwrap();
        assert_eq!(result.matched_turn, Some(3));
    }

    #[test]
    fn test_empty_agent_turns() {
        let ctx = context();
        assert_eq!(detect_greeting(&ctx, &[], 0.65, 3).unwrap(), GreetingResult::none());
    }
}
