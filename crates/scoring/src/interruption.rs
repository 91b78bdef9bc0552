//! Interruption detector
//!
//! Flags the conversation when an agent turn starts less than the tolerance
//! after a customer turn ends. Negative gaps (overlap) and short positive
//! gaps are treated alike; the first occurrence decides.

use call_eval_core::{InterruptionResult, Role, Transcript, Utterance};

/// Signed distance from `end` to `start`, clamped to the i64 range
fn gap_ms(end: u64, start: u64) -> i64 {
    (i128::from(start) - i128::from(end)).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

pub fn detect_interruption(utterances: &[Utterance], tolerance_ms: i64) -> InterruptionResult {
    for pair in utterances.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.speaker != Role::Customer || next.speaker != Role::Agent {
            continue;
        }

        let gap = gap_ms(current.end_ms, next.start_ms);
        if gap < tolerance_ms {
            tracing::debug!(at_ms = next.start_ms, gap_ms = gap, "Agent interrupted customer");
            return InterruptionResult {
                detected: true,
                at_ms: Some(next.start_ms),
                gap_ms: Some(gap),
            };
        }
    }

    InterruptionResult::none()
}

pub fn score_interruption(transcript: &Transcript, tolerance_ms: i64) -> InterruptionResult {
    detect_interruption(transcript.utterances(), tolerance_ms)
}
