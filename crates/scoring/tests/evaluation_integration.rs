//! End-to-end scoring of raw transcripts
//!
//! Raw diarized input → speaker roles → transcript → concurrent evaluation.

use std::sync::Arc;

use async_trait::async_trait;

use call_eval_config::{MetricWeights, ScoringConfig};
use call_eval_core::{
    EmpathyGrader, EmpathySubscores, RawTranscript, RawUtterance, Result, Role, SpeakerRoles,
    Transcript, Utterance,
};
use call_eval_embeddings::HashingEmbedder;
use call_eval_scoring::{CallEvaluator, ScoringContext};

struct FixedGrader;

#[async_trait]
impl EmpathyGrader for FixedGrader {
    async fn grade(&self, labeled_transcript: &str) -> Result<EmpathySubscores> {
        assert!(labeled_transcript.contains("Customer Service Agent: "));
        Ok(EmpathySubscores::new(0.8, 0.7, 0.9))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Grades any input, including transcripts with a single party
struct LenientGrader;

#[async_trait]
impl EmpathyGrader for LenientGrader {
    async fn grade(&self, _labeled_transcript: &str) -> Result<EmpathySubscores> {
        Ok(EmpathySubscores::new(1.0, 0.0, 0.5))
    }

    fn name(&self) -> &str {
        "lenient"
    }
}

fn context(config: ScoringConfig) -> ScoringContext {
    let ctx = ScoringContext::with_embedder(Arc::new(HashingEmbedder::default()), config);
    ctx.warm().unwrap();
    ctx
}

fn raw_call() -> RawTranscript {
    RawTranscript::new(vec![
        RawUtterance::new("B", "Hi, thanks for calling. How may I help you today?", 0, 3000),
        RawUtterance::new("A", "My internet connection keeps dropping every night", 3600, 7000),
        RawUtterance::new("B", "I understand, let me look into this for you", 7500, 9500),
        RawUtterance::new("A", "It started last week after the storm", 10000, 12500),
        RawUtterance::new("B", "I see an outage after the storm, I will reset your line", 13000, 17000),
        RawUtterance::new("A", "Okay thanks, that works", 17500, 19000),
        RawUtterance::new("B", "Is there anything else I can help with?", 19500, 21000),
        RawUtterance::new("A", "No, that solved my issue, thank you so much", 21600, 24000),
    ])
}

fn roles() -> SpeakerRoles {
    SpeakerRoles::new(Role::Customer, Role::Agent).unwrap()
}

#[tokio::test]
async fn test_raw_call_end_to_end() {
    let transcript = Transcript::from_raw(&raw_call(), &roles()).unwrap();
    assert_eq!(transcript.customer_turns().len(), 4);
    assert_eq!(transcript.agent_turns().len(), 4);

    let evaluator =
        CallEvaluator::from_context(context(ScoringConfig::default()), Arc::new(FixedGrader))
            .unwrap();
    let report = evaluator.evaluate(transcript.into_shared()).await.unwrap();

    let detail = &report.detailed_scores;
    assert!(detail.greetings.greeted);
    assert!(!detail.interruptions.detected);
    assert!(detail.attention.keyword_score > 0.0);
    assert!(detail.satisfaction.explicit > 0.3);
    assert!(detail.satisfaction.implicit > 0.3);
    assert_eq!(detail.empathy.final_empathy_score, EmpathySubscores::new(0.8, 0.7, 0.9).normalized());

    for (kind, value) in report.score_breakdown.iter() {
        assert!((0.0..=1.0).contains(&value), "{} = {}", kind, value);
    }
    assert!(report.final_score > 0.5, "final = {}", report.final_score);
}

#[tokio::test]
async fn test_fast_agent_reply_counts_as_interruption() {
    let mut raw = raw_call();
    // agent replies 100ms after the customer stops
    raw.utterances[2].start = 7100;

    let transcript = Transcript::from_raw(&raw, &roles()).unwrap();
    let evaluator =
        CallEvaluator::from_context(context(ScoringConfig::default()), Arc::new(FixedGrader))
            .unwrap();
    let report = evaluator.evaluate(transcript.into_shared()).await.unwrap();

    assert!(report.detailed_scores.interruptions.detected);
    assert_eq!(report.detailed_scores.interruptions.at_ms, Some(7100));
    assert_eq!(report.score_breakdown.interruptions, 0.0);
}

#[tokio::test]
async fn test_custom_weights_change_final_score() {
    let transcript = Transcript::from_raw(&raw_call(), &roles()).unwrap().into_shared();

    let default_eval =
        CallEvaluator::from_context(context(ScoringConfig::default()), Arc::new(FixedGrader))
            .unwrap();
    let empathy_only = ScoringConfig {
        weights: MetricWeights {
            attention: 0.0,
            empathy: 1.0,
            greetings: 0.0,
            ownership: 0.0,
            interruptions: 0.0,
            satisfaction: 0.0,
            talk_to_listen: 0.0,
        },
        ..ScoringConfig::default()
    };
    let empathy_eval =
        CallEvaluator::from_context(context(empathy_only), Arc::new(FixedGrader)).unwrap();

    let report = empathy_eval.evaluate(transcript.clone()).await.unwrap();
    assert!((report.final_score - 0.8).abs() < 1e-4);

    let report = default_eval.evaluate(transcript).await.unwrap();
    assert!((report.final_score - 0.8).abs() > 1e-4);
}

#[test]
fn test_invalid_weights_fail_at_construction() {
    let config = ScoringConfig {
        weights: MetricWeights {
            empathy: 0.9,
            ..MetricWeights::default()
        },
        ..ScoringConfig::default()
    };
    let ctx = ScoringContext::with_embedder(Arc::new(HashingEmbedder::default()), config);
    let err = CallEvaluator::from_context(ctx, Arc::new(FixedGrader)).unwrap_err();
    assert!(matches!(err, call_eval_core::Error::Config(_)));
}

fn shaped(turns: &[(Role, &str, u64, u64)]) -> Arc<Transcript> {
    let utterances = turns
        .iter()
        .map(|(role, text, start, end)| Utterance::new(*role, *text, *start, *end, 1.0).unwrap())
        .collect();
    Transcript::new(utterances).unwrap().into_shared()
}

fn alternating(turns: u64) -> Vec<(Role, &'static str, u64, u64)> {
    (0..turns)
        .map(|i| {
            let (role, text) = if i % 2 == 0 {
                (Role::Agent, "Thank you for calling, I will sort this out for you")
            } else {
                (Role::Customer, "Great, thanks, that fixed my billing problem")
            };
            (role, text, i * 1000, i * 1000 + 800)
        })
        .collect()
}

#[tokio::test]
async fn test_scores_stay_in_unit_range_for_degenerate_calls() {
    let long = alternating(40);
    let cases: Vec<(&str, Vec<(Role, &str, u64, u64)>)> = vec![
        (
            "agent only",
            vec![
                (Role::Agent, "Hello, thanks for calling", 0, 1000),
                (Role::Agent, "Are you still there?", 1500, 2500),
            ],
        ),
        (
            "customer only",
            vec![
                (Role::Customer, "Hello? Is anyone there?", 0, 1000),
                (Role::Customer, "This is not working, unfortunately", 1500, 2500),
            ],
        ),
        (
            "one turn each",
            vec![
                (Role::Agent, "Good morning, how can I help?", 0, 1000),
                (Role::Customer, "Thanks, all sorted", 1200, 2000),
            ],
        ),
        ("long alternating", long),
        (
            "overlapping",
            vec![
                (Role::Customer, "My card keeps getting declined", 0, 5000),
                (Role::Agent, "Let me check that for you", 100, 6000),
                (Role::Customer, "Still an error", 200, 300),
                (Role::Agent, "I have reset it now", 200, 9000),
                (Role::Customer, "Okay, thank you", 250, 9500),
            ],
        ),
        ("blank text", vec![(Role::Agent, "   ", 0, 0), (Role::Customer, "", 0, 0)]),
    ];

    let evaluator =
        CallEvaluator::from_context(context(ScoringConfig::default()), Arc::new(LenientGrader))
            .unwrap();

    for (name, turns) in cases {
        let report = evaluator.evaluate(shaped(&turns)).await.unwrap();
        for (kind, value) in report.score_breakdown.iter() {
            assert!((0.0..=1.0).contains(&value), "{}: {} = {}", name, kind, value);
        }
        assert!(
            (0.0..=1.0).contains(&report.final_score),
            "{}: final = {}",
            name,
            report.final_score
        );
    }
}
