//! Talk-to-listen ratio

use call_eval_core::{TalkToListen, Transcript};

use crate::round_to;

/// Classify speaking-time balance from per-role totals
///
/// The ratio is rounded to 2 decimals before classification. An agent who
/// never spoke yields ratio 0.0, classified unhealthy.
pub fn talk_to_listen(customer_ms: u64, agent_ms: u64, min: f64, max: f64) -> TalkToListen {
    if agent_ms == 0 {
        tracing::debug!(customer_ms, "Agent never spoke");
        return TalkToListen {
            customer_ms,
            agent_ms,
            ratio: 0.0,
            healthy: false,
        };
    }

    let ratio = round_to(customer_ms as f64 / agent_ms as f64, 2);
    TalkToListen {
        customer_ms,
        agent_ms,
        ratio,
        healthy: (min..=max).contains(&ratio),
    }
}

pub fn score_talk_to_listen(transcript: &Transcript, min: f64, max: f64) -> TalkToListen {
    talk_to_listen(
        transcript.customer_turns().total_duration_ms(),
        transcript.agent_turns().total_duration_ms(),
        min,
        max,
    )
}
