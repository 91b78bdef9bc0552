//! Scoring engine benchmarks
//!
//! Run with: cargo bench -p call-eval-scoring --bench scoring_bench

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use call_eval_config::ScoringConfig;
use call_eval_core::{Role, Transcript, Utterance};
use call_eval_embeddings::HashingEmbedder;
use call_eval_scoring::{run_local_metric, ScoringContext, LOCAL_METRICS};

fn build_transcript(turns: usize) -> Transcript {
    let customer = [
        "My card payment was declined at the store",
        "It happened twice this morning",
        "Okay thanks, that works",
    ];
    let agent = [
        "I will check this for you right away",
        "I see a fraud block on the card",
        "I have removed the block, please try again",
    ];

    let utterances = (0..turns)
        .map(|i| {
            let (role, text) = if i % 2 == 0 {
                (Role::Agent, agent[i / 2 % agent.len()])
            } else {
                (Role::Customer, customer[i / 2 % customer.len()])
            };
            let start = i as u64 * 2000;
            Utterance::new(role, text, start, start + 1500, 1.0).unwrap()
        })
        .collect();
    Transcript::new(utterances).unwrap()
}

fn bench_metrics(c: &mut Criterion) {
    let ctx = ScoringContext::with_embedder(
        Arc::new(HashingEmbedder::default()),
        ScoringConfig::default(),
    );
    ctx.warm().unwrap();

    let mut group = c.benchmark_group("metrics");
    for turns in [10usize, 50, 200] {
        let transcript = build_transcript(turns);
        group.throughput(Throughput::Elements(turns as u64));
        for kind in LOCAL_METRICS {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), turns), &transcript, |b, t| {
                b.iter(|| run_local_metric(kind, &ctx, t).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_embedding(c: &mut Criterion) {
    let embedder = HashingEmbedder::default();
    c.bench_function("hashing_embed_sentence", |b| {
        b.iter(|| embedder.embed_text("I will take full responsibility for this issue"))
    });
}

criterion_group!(benches, bench_metrics, bench_embedding);
criterion_main!(benches);
