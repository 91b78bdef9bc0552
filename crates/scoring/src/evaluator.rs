//! Concurrent evaluation of one transcript
//!
//! Six scorers are CPU-bound and run on the blocking pool; empathy awaits the
//! external grader. Every task is joined before aggregation and the first
//! failure fails the whole evaluation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use call_eval_core::{
    AttentionScore, EmpathyGrader, EmpathySubscores, Error, EvaluationReport, GreetingResult,
    InterruptionResult, MetricKind, OwnershipScore, PartialScores, Result, SatisfactionScore,
    TalkToListen, Transcript,
};

use crate::aggregator::{Aggregator, WeightTable};
use crate::context::ScoringContext;
use crate::{attention, greeting, interruption, ownership, satisfaction, talk_listen};

/// Metrics computed locally, without the grader
pub const LOCAL_METRICS: [MetricKind; 6] = [
    MetricKind::Attention,
    MetricKind::Greeting,
    MetricKind::Ownership,
    MetricKind::Interruption,
    MetricKind::Satisfaction,
    MetricKind::TalkToListen,
];

/// Detail record produced by one metric task
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    Attention(AttentionScore),
    Empathy(EmpathySubscores),
    Greeting(GreetingResult),
    Ownership(OwnershipScore),
    Interruption(InterruptionResult),
    Satisfaction(SatisfactionScore),
    TalkToListen(TalkToListen),
}

impl MetricOutcome {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricOutcome::Attention(_) => MetricKind::Attention,
            MetricOutcome::Empathy(_) => MetricKind::Empathy,
            MetricOutcome::Greeting(_) => MetricKind::Greeting,
            MetricOutcome::Ownership(_) => MetricKind::Ownership,
            MetricOutcome::Interruption(_) => MetricKind::Interruption,
            MetricOutcome::Satisfaction(_) => MetricKind::Satisfaction,
            MetricOutcome::TalkToListen(_) => MetricKind::TalkToListen,
        }
    }

    fn record(self, partial: &mut PartialScores) {
        match self {
            MetricOutcome::Attention(s) => partial.attention = Some(s),
            MetricOutcome::Empathy(s) => partial.empathy = Some(s),
            MetricOutcome::Greeting(s) => partial.greetings = Some(s),
            MetricOutcome::Ownership(s) => partial.ownership = Some(s),
            MetricOutcome::Interruption(s) => partial.interruptions = Some(s),
            MetricOutcome::Satisfaction(s) => partial.satisfaction = Some(s),
            MetricOutcome::TalkToListen(s) => partial.talk_to_listen = Some(s),
        }
    }
}

/// Run one locally computed metric
pub fn run_local_metric(
    kind: MetricKind,
    ctx: &ScoringContext,
    transcript: &Transcript,
) -> Result<MetricOutcome> {
    let config = &ctx.config;
    let outcome = match kind {
        MetricKind::Attention => MetricOutcome::Attention(attention::score_attention(ctx, transcript)?),
        MetricKind::Greeting => MetricOutcome::Greeting(greeting::score_greeting(ctx, transcript)?),
        MetricKind::Ownership => MetricOutcome::Ownership(ownership::score_ownership(ctx, transcript)?),
        MetricKind::Interruption => MetricOutcome::Interruption(interruption::score_interruption(
            transcript,
            config.interruption_tolerance_ms,
        )),
        MetricKind::Satisfaction => {
            MetricOutcome::Satisfaction(satisfaction::score_satisfaction(ctx, transcript)?)
        }
        MetricKind::TalkToListen => MetricOutcome::TalkToListen(talk_listen::score_talk_to_listen(
            transcript,
            config.talk_listen_min,
            config.talk_listen_max,
        )),
        MetricKind::Empathy => {
            return Err(Error::MetricFailed {
                metric: kind,
                message: "empathy is scored by the empathy grader".to_string(),
            })
        }
    };
    Ok(outcome)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_string()
    }
}

/// Scores a transcript along all seven metrics and aggregates the result
pub struct CallEvaluator {
    ctx: ScoringContext,
    aggregator: Aggregator,
    grader: Arc<dyn EmpathyGrader>,
}

impl CallEvaluator {
    pub fn new(ctx: ScoringContext, aggregator: Aggregator, grader: Arc<dyn EmpathyGrader>) -> Self {
        Self {
            ctx,
            aggregator,
            grader,
        }
    }

    /// Build with the weights held in the context's scoring config
    pub fn from_context(ctx: ScoringContext, grader: Arc<dyn EmpathyGrader>) -> Result<Self> {
        let table = WeightTable::new(&ctx.config.weights)?;
        Ok(Self::new(ctx, Aggregator::new(table), grader))
    }

    pub fn context(&self) -> &ScoringContext {
        &self.ctx
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn grader_name(&self) -> &str {
        self.grader.name()
    }

    /// Run every metric concurrently and aggregate
    pub async fn evaluate(&self, transcript: Arc<Transcript>) -> Result<EvaluationReport> {
        let started = Instant::now();
        let evaluation_id = Uuid::new_v4().to_string();
        tracing::info!(
            evaluation_id = %evaluation_id,
            utterances = transcript.len(),
            "Starting evaluation"
        );

        let mut tasks: JoinSet<Result<MetricOutcome>> = JoinSet::new();

        for kind in LOCAL_METRICS {
            let ctx = self.ctx.clone();
            let transcript = Arc::clone(&transcript);
            let span = tracing::info_span!("metric", metric = %kind);

            tasks.spawn_blocking(move || {
                let _entered = span.enter();
                let metric_started = Instant::now();
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    run_local_metric(kind, &ctx, &transcript)
                }))
                .unwrap_or_else(|payload| {
                    Err(Error::MetricFailed {
                        metric: kind,
                        message: panic_message(payload),
                    })
                });
                tracing::debug!(elapsed_ms = metric_started.elapsed().as_millis() as u64, "Metric done");
                outcome
            });
        }

        let grader = Arc::clone(&self.grader);
        let labeled = transcript.labeled_text();
        let grading = async move {
            let scores = grader.grade(&labeled).await?;
            scores.validate()?;
            Ok(MetricOutcome::Empathy(scores))
        };
        tasks.spawn(
            AssertUnwindSafe(grading)
                .catch_unwind()
                .map(|result| {
                    result.unwrap_or_else(|payload| {
                        Err(Error::MetricFailed {
                            metric: MetricKind::Empathy,
                            message: panic_message(payload),
                        })
                    })
                })
                .instrument(tracing::info_span!("metric", metric = %MetricKind::Empathy)),
        );

        let mut partial = PartialScores::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| Error::other(format!("metric task did not complete: {}", e)))?;
            match outcome {
                Ok(outcome) => outcome.record(&mut partial),
                Err(e) => {
                    tracing::error!(evaluation_id = %evaluation_id, error = %e, "Metric failed");
                    // dropping the set aborts whatever is still running
                    return Err(e);
                }
            }
        }

        let detailed = partial.into_detailed()?;
        let final_score = self.aggregator.aggregate(&detailed.score_vector());
        let report = EvaluationReport::new(evaluation_id, final_score, detailed);

        tracing::info!(
            evaluation_id = %report.evaluation_id,
            final_score = report.final_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Evaluation complete"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for CallEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallEvaluator")
            .field("ctx", &self.ctx)
            .field("aggregator", &self.aggregator)
            .field("grader", &self.grader.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, transcript};
    use async_trait::async_trait;
    use call_eval_core::Role;

    struct StubGrader(EmpathySubscores);

    #[async_trait]
    impl EmpathyGrader for StubGrader {
        async fn grade(&self, _labeled_transcript: &str) -> Result<EmpathySubscores> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingGrader;

    #[async_trait]
    impl EmpathyGrader for FailingGrader {
        async fn grade(&self, _labeled_transcript: &str) -> Result<EmpathySubscores> {
            Err(Error::upstream("ollama", 503, "model loading"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingGrader;

    #[async_trait]
    impl EmpathyGrader for PanickingGrader {
        async fn grade(&self, _labeled_transcript: &str) -> Result<EmpathySubscores> {
            panic!("grader blew up")
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn call() -> Arc<Transcript> {
        transcript(&[
            (Role::Agent, "Hello, how may I help you?", 0, 1500),
            (Role::Customer, "My card payment was declined twice", 2000, 4000),
            (Role::Agent, "I will check this for you", 4500, 6000),
            (Role::Customer, "Thanks, the card is new", 6500, 7500),
            (Role::Agent, "I see the payment block, I will remove it", 8000, 10000),
            (Role::Customer, "thank you so much", 10500, 11500),
        ])
        .into_shared()
    }

    #[tokio::test]
    async fn test_evaluate_report() {
        let grader = Arc::new(StubGrader(EmpathySubscores::new(0.9, 0.6, 0.3)));
        let evaluator = CallEvaluator::from_context(context(), grader).unwrap();

        let report = evaluator.evaluate(call()).await.unwrap();
        let scores = report.score_breakdown;

        assert_eq!(scores.greetings, 1.0);
        assert_eq!(scores.interruptions, 1.0);
        assert!((scores.empathy - 0.6).abs() < 1e-9);
        for (kind, value) in scores.iter() {
            assert!((0.0..=1.0).contains(&value), "{} = {}", kind, value);
        }
        assert!((0.0..=1.0).contains(&report.final_score));
        assert!(Uuid::parse_str(&report.evaluation_id).is_ok());
        assert!((report.weighted_breakdown.sum() - report.final_score).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_grader_error_propagates() {
        let evaluator = CallEvaluator::from_context(context(), Arc::new(FailingGrader)).unwrap();
        let err = evaluator.evaluate(call()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_grader_panic_names_metric() {
        let evaluator = CallEvaluator::from_context(context(), Arc::new(PanickingGrader)).unwrap();
        let err = evaluator.evaluate(call()).await.unwrap_err();
        match err {
            Error::MetricFailed { metric, message } => {
                assert_eq!(metric, MetricKind::Empathy);
                assert!(message.contains("blew up"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_empathy_rejected() {
        let bad = EmpathySubscores {
            emotion_recognition: 1.4,
            emotion_validation: 0.5,
            support_intent: 0.5,
            final_empathy_score: 0.8,
        };
        let evaluator = CallEvaluator::from_context(context(), Arc::new(StubGrader(bad))).unwrap();
        let err = evaluator.evaluate(call()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedExternalOutput { .. }));
    }

    #[tokio::test]
    async fn test_empty_transcript_degenerates() {
        let grader = Arc::new(StubGrader(EmpathySubscores::new(0.0, 0.0, 0.0)));
        let evaluator = CallEvaluator::from_context(context(), grader).unwrap();

        let report = evaluator.evaluate(transcript(&[]).into_shared()).await.unwrap();
        let scores = report.score_breakdown;
        assert_eq!(scores.attention, 0.0);
        assert_eq!(scores.greetings, 0.0);
        assert_eq!(scores.ownership, 0.0);
        assert_eq!(scores.satisfaction, 0.0);
        assert_eq!(scores.talk_to_listen, 0.0);
        // nobody interrupted anybody
        assert_eq!(scores.interruptions, 1.0);
        assert!((report.final_score - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_local_metric_rejects_empathy() {
        let ctx = context();
        let t = transcript(&[]);
        assert!(run_local_metric(MetricKind::Empathy, &ctx, &t).is_err());
        let outcome = run_local_metric(MetricKind::TalkToListen, &ctx, &t).unwrap();
        assert_eq!(outcome.kind(), MetricKind::TalkToListen);
    }
}
