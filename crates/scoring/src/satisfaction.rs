//! Satisfaction scorer
//!
//! Looks at the closing share of customer turns, where satisfaction (or its
//! absence) shows. Two halves, averaged:
//!
//! - **explicit**: best similarity of each tail turn against statements such
//!   as "that solved my issue", averaged over the tail
//! - **implicit**: per-turn fusion of semantic similarity to casual acceptance
//!   patterns, acceptance-word overlap and context-adjusted sentiment, with
//!   later turns weighted more heavily

use once_cell::sync::Lazy;
use regex::Regex;

use call_eval_core::{Result, SatisfactionScore, Transcript};
use call_eval_embeddings::max_similarity;

use crate::context::ScoringContext;
use crate::phrases::{EXPLICIT_SATISFACTION, IMPLICIT_SATISFACTION, NEGATIVE_CONTEXT_INDICATORS};
use crate::round_to;

static NEGATIVE_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    let alternation = NEGATIVE_CONTEXT_INDICATORS
        .iter()
        .map(|w| indicator_pattern(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).unwrap()
});

/// Single content words also match their inflections ("problems",
/// "doubted"); short function words and phrases match exactly.
fn indicator_pattern(indicator: &str) -> String {
    let escaped = regex::escape(indicator);
    let inflectable = indicator.len() > 3
        && indicator.chars().all(|c| c.is_ascii_alphabetic());
    if inflectable {
        format!("{}(?:s|es|d|ed|ing)?", escaped)
    } else {
        escaped
    }
}

/// Sentiment below which a complaining turn is dropped outright
const COMPLAINT_POLARITY: f32 = -0.3;

const SEMANTIC_GATE: f64 = 0.3;
const KEYWORD_GATE: f64 = 0.1;
const SENTIMENT_GATE: f64 = 0.5;

const SEMANTIC_WEIGHT: f64 = 0.40;
const SENTIMENT_WEIGHT: f64 = 0.35;
const KEYWORD_WEIGHT: f64 = 0.25;

/// Weighted turn score counted as a strong signal
const STRONG_SIGNAL: f64 = 0.5;

/// Index of the first turn in the closing `portion` of `len` turns
pub fn tail_start(len: usize, portion: f64) -> usize {
    ((len as f64) * (1.0 - portion)).floor() as usize
}

/// True when the text contains a complaint marker as a word, an inflection
/// of one, or a phrase
pub fn has_negative_context(text: &str) -> bool {
    let normalized = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    NEGATIVE_CONTEXT.is_match(&normalized)
}

/// Mean of the best explicit-statement similarity per tail turn, floored at 0
pub fn explicit_score(ctx: &ScoringContext, customer_turns: &[&str], portion: f64) -> Result<f64> {
    let tail = &customer_turns[tail_start(customer_turns.len(), portion).min(customer_turns.len())..];
    if tail.is_empty() {
        tracing::debug!("No customer tail turns, explicit satisfaction is 0");
        return Ok(0.0);
    }

    let statements = ctx.bank.embeddings(&EXPLICIT_SATISFACTION)?;
    let mut total = 0.0f64;
    for text in tail {
        let embedding = ctx.bank.embed(text)?;
        total += f64::from(max_similarity(&embedding, &statements));
    }

    Ok((total / tail.len() as f64).max(0.0))
}

/// Sentiment of a turn, adjusted for complaint markers and the previous turn
///
/// `previous` is the raw polarity of the immediately preceding tail turn,
/// absent for the first turn or when that turn is blank.
fn contextual_sentiment(raw: f32, negative_context: bool, previous: Option<f32>) -> f64 {
    let mut sentiment = f64::from(raw);
    if negative_context {
        sentiment *= 0.5;
    }
    if let Some(prev) = previous {
        if prev < 0.0 && sentiment > 0.0 {
            sentiment *= 1.2;
        } else if prev > 0.0 && sentiment > 0.0 {
            sentiment *= 1.1;
        }
    }
    ((sentiment + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Multi-signal implicit satisfaction, rounded to 4 decimals
pub fn implicit_score(ctx: &ScoringContext, customer_turns: &[&str], portion: f64) -> Result<f64> {
    let tail = &customer_turns[tail_start(customer_turns.len(), portion).min(customer_turns.len())..];
    if tail.is_empty() {
        tracing::debug!("No customer tail turns, implicit satisfaction is 0");
        return Ok(0.0);
    }

    let patterns = ctx.bank.embeddings(&IMPLICIT_SATISFACTION)?;
    let acceptance = ctx.acceptance_lemmas();
    let count = tail.len() as f64;
    let mut scores = Vec::with_capacity(tail.len());

    for (i, turn) in tail.iter().enumerate() {
        let text = turn.trim();
        if text.is_empty() {
            continue;
        }

        let raw = ctx.sentiment.polarity(text);
        let negative = has_negative_context(text);
        if negative && raw < COMPLAINT_POLARITY {
            tracing::debug!(turn = i, polarity = raw, "Skipping complaint turn");
            continue;
        }

        let embedding = ctx.bank.embed(text)?;
        let semantic = f64::from(max_similarity(&embedding, &patterns)).max(0.0);

        let keyword = if acceptance.is_empty() {
            0.0
        } else {
            let shared = ctx.lexical.extract(text).intersection(acceptance).count();
            (2.0 * shared as f64 / acceptance.len() as f64).min(1.0)
        };

        let previous = i
            .checked_sub(1)
            .map(|p| tail[p].trim())
            .filter(|p| !p.is_empty())
            .map(|p| ctx.sentiment.polarity(p));
        let sentiment = contextual_sentiment(raw, negative, previous);

        if semantic > SEMANTIC_GATE || keyword > KEYWORD_GATE || sentiment > SENTIMENT_GATE {
            let combined =
                SEMANTIC_WEIGHT * semantic + SENTIMENT_WEIGHT * sentiment + KEYWORD_WEIGHT * keyword;
            let position = (i + 1) as f64 / count;
            scores.push(combined * (0.7 + 0.3 * position));
        }
    }

    if scores.is_empty() {
        return Ok(0.0);
    }

    let mut mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let max = scores.iter().cloned().fold(f64::MIN, f64::max);
    if scores.len() >= 2 {
        mean = (mean * 1.15).min(1.0);
    }

    let mut combined = 0.7 * mean + 0.3 * max;
    let strong = scores.iter().filter(|s| **s > STRONG_SIGNAL).count();
    if combined > 0.0 && strong >= 2 {
        combined = (combined * 1.1).min(1.0);
    }

    Ok(round_to(combined.clamp(0.0, 1.0), 4))
}

pub fn score_satisfaction(ctx: &ScoringContext, transcript: &Transcript) -> Result<SatisfactionScore> {
    let customer = transcript.customer_turns();
    let texts = customer.texts();
    let portion = ctx.config.satisfaction_portion;

    let explicit = explicit_score(ctx, &texts, portion)?;
    let implicit = implicit_score(ctx, &texts, portion)?;

    let score = SatisfactionScore::new(explicit, implicit);
    tracing::debug!(explicit, implicit, overall = score.overall, "Satisfaction scored");
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    #[test]
    fn test_tail_start() {
        assert_eq!(tail_start(10, 0.3), 7);
        assert_eq!(tail_start(1, 0.3), 0);
        assert_eq!(tail_start(0, 0.3), 0);
        assert_eq!(tail_start(4, 1.0), 0);
    }

    #[test]
    fn test_negative_context_word_boundaries() {
        assert!(has_negative_context("But it still fails"));
        assert!(has_negative_context("It doesn\u{2019}t work at all"));
        assert!(has_negative_context("there is an error"));
        // substrings of longer words do not count
        assert!(!has_negative_context("I love the butter"));
        assert!(!has_negative_context("Thanks, that was painless"));
        assert!(!has_negative_context("okay thank you"));
    }

    #[test]
    fn test_negative_context_inflections() {
        assert!(has_negative_context("There are two problems left"));
        assert!(has_negative_context("These issues remain"));
        assert!(has_negative_context("I have my doubts"));
        assert!(has_negative_context("It errored again"));
        assert!(has_negative_context("I was doubting it"));
        // function words stay exact
        assert!(!has_negative_context("Buts and maybes aside, thanks"));
        assert!(!has_negative_context("Yesterday it was fine"));
    }

    #[test]
    fn test_explicit_exact_phrase() {
        let ctx = context();
        let score = explicit_score(&ctx, &["thank you so much"], 0.3).unwrap();
        assert!(score > 0.99);
    }

    #[test]
    fn test_explicit_unrelated_text() {
        let ctx = context();
        let score = explicit_score(&ctx, &["Sunny weather expected tomorrow"], 0.3).unwrap();
        assert!(score < 0.2);
    }

    #[test]
    fn test_explicit_only_tail() {
        let ctx = context();
        let turns = [
            "thank you so much",
            "my router is broken",
            "the lights keep blinking",
            "it happens every evening",
        ];
        // tail_start(4, 0.3) = 2: the thank-you is outside the tail
        let score = explicit_score(&ctx, &turns, 0.3).unwrap();
        assert!(score < 0.5);
        assert_eq!(explicit_score(&ctx, &[], 0.3).unwrap(), 0.0);
    }

    #[test]
    fn test_contextual_sentiment() {
        assert!((contextual_sentiment(0.0, false, None) - 0.5).abs() < 1e-9);
        assert!((contextual_sentiment(0.5, true, None) - 0.625).abs() < 1e-6);
        // recovery boost
        assert!((contextual_sentiment(0.5, false, Some(-0.4)) - 0.8).abs() < 1e-6);
        // reinforcement boost
        assert!((contextual_sentiment(0.5, false, Some(0.4)) - 0.775).abs() < 1e-6);
        // negative turns are not boosted
        assert!((contextual_sentiment(-0.5, false, Some(0.4)) - 0.25).abs() < 1e-6);
        assert_eq!(contextual_sentiment(1.0, false, Some(1.0)), 1.0);
    }

    #[test]
    fn test_implicit_acceptance_scores() {
        let ctx = context();
        let score = implicit_score(&ctx, &["okay thanks", "sounds good, that works"], 1.0).unwrap();
        assert!(score > 0.5, "score = {}", score);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_implicit_complaint_excluded() {
        let ctx = context();
        let score = implicit_score(
            &ctx,
            &["This is terrible, it still doesn't work and I am very frustrated"],
            1.0,
        )
        .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_implicit_plural_complaint_excluded() {
        let ctx = context();
        let plural = implicit_score(&ctx, &["These errors are terrible and awful"], 1.0).unwrap();
        let singular = implicit_score(&ctx, &["This error is terrible and awful"], 1.0).unwrap();
        assert_eq!(plural, 0.0);
        assert_eq!(singular, 0.0);
    }

    #[test]
    fn test_implicit_empty_tail() {
        let ctx = context();
        assert_eq!(implicit_score(&ctx, &[], 0.3).unwrap(), 0.0);
        assert_eq!(implicit_score(&ctx, &["   "], 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_implicit_rounded() {
        let ctx = context();
        let score = implicit_score(&ctx, &["okay thank you", "great"], 1.0).unwrap();
        assert_eq!(score, round_to(score, 4));
    }
}
