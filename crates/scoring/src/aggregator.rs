//! Weighted aggregation of metric sub-scores

use call_eval_config::{ConfigError, MetricWeights};
use call_eval_core::{FinalScore, MetricKind, ScoreVector};

/// Validated per-metric weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
    weights: ScoreVector,
}

impl WeightTable {
    /// Build from configured weights; they must be non-negative and sum to 1.0
    pub fn new(weights: &MetricWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self::from_weights(weights))
    }

    fn from_weights(weights: &MetricWeights) -> Self {
        Self {
            weights: ScoreVector {
                attention: weights.attention,
                empathy: weights.empathy,
                greetings: weights.greetings,
                ownership: weights.ownership,
                interruptions: weights.interruptions,
                satisfaction: weights.satisfaction,
                talk_to_listen: weights.talk_to_listen,
            },
        }
    }

    pub fn weight(&self, kind: MetricKind) -> f64 {
        self.weights.get(kind)
    }

    pub fn as_vector(&self) -> &ScoreVector {
        &self.weights
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::from_weights(&MetricWeights::default())
    }
}

/// Linear combination of the seven sub-scores
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    table: WeightTable,
}

impl Aggregator {
    pub fn new(table: WeightTable) -> Self {
        Self { table }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.table
    }

    /// Weighted sum plus each metric's contribution
    ///
    /// Sub-scores outside [0, 1] are logged and used as given.
    pub fn aggregate(&self, scores: &ScoreVector) -> FinalScore {
        let mut breakdown = ScoreVector::uniform(0.0);

        for (kind, value) in scores.iter() {
            if !(0.0..=1.0).contains(&value) {
                tracing::warn!(metric = %kind, value, "Sub-score outside [0, 1]");
            }
            breakdown.set(kind, self.table.weight(kind) * value);
        }

        FinalScore {
            value: breakdown.sum(),
            breakdown,
        }
    }
}
