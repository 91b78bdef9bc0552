//! Scoring configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Per-metric weights of the final score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricWeights {
    #[serde(default = "default_attention_weight")]
    pub attention: f64,

    #[serde(default = "default_empathy_weight")]
    pub empathy: f64,

    #[serde(default = "default_greetings_weight")]
    pub greetings: f64,

    #[serde(default = "default_ownership_weight")]
    pub ownership: f64,

    #[serde(default = "default_interruptions_weight")]
    pub interruptions: f64,

    #[serde(default = "default_satisfaction_weight")]
    pub satisfaction: f64,

    #[serde(default = "default_talk_to_listen_weight")]
    pub talk_to_listen: f64,
}

fn default_attention_weight() -> f64 {
    0.15
}
fn default_empathy_weight() -> f64 {
    0.20
}
fn default_greetings_weight() -> f64 {
    0.10
}
fn default_ownership_weight() -> f64 {
    0.15
}
fn default_interruptions_weight() -> f64 {
    0.10
}
fn default_satisfaction_weight() -> f64 {
    0.20
}
fn default_talk_to_listen_weight() -> f64 {
    0.10
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            attention: default_attention_weight(),
            empathy: default_empathy_weight(),
            greetings: default_greetings_weight(),
            ownership: default_ownership_weight(),
            interruptions: default_interruptions_weight(),
            satisfaction: default_satisfaction_weight(),
            talk_to_listen: default_talk_to_listen_weight(),
        }
    }
}

impl MetricWeights {
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("attention", self.attention),
            ("empathy", self.empathy),
            ("greetings", self.greetings),
            ("ownership", self.ownership),
            ("interruptions", self.interruptions),
            ("satisfaction", self.satisfaction),
            ("talk_to_listen", self.talk_to_listen),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    /// Weights must be finite, non-negative and sum to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in self.entries() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::invalid(
                    format!("scoring.weights.{}", name),
                    format!("weight must be a non-negative number, got {}", weight),
                ));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::invalid(
                "scoring.weights",
                format!("weights must sum to 1.0, got {:.4}", sum),
            ));
        }

        Ok(())
    }
}

/// Thresholds and parameters of the individual scorers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: MetricWeights,

    /// Agent reply gap below which the customer counts as interrupted (ms)
    #[serde(default = "default_interruption_tolerance")]
    pub interruption_tolerance_ms: i64,

    /// Tail share of customer turns examined for satisfaction
    #[serde(default = "default_satisfaction_portion")]
    pub satisfaction_portion: f64,

    /// Cosine similarity a turn must exceed to count as a greeting
    #[serde(default = "default_greeting_threshold")]
    pub greeting_threshold: f32,

    /// Number of opening agent turns checked for a greeting
    #[serde(default = "default_greeting_max_turns")]
    pub greeting_max_turns: usize,

    /// Lower bound of the healthy talk-to-listen band
    #[serde(default = "default_talk_listen_min")]
    pub talk_listen_min: f64,

    /// Upper bound of the healthy talk-to-listen band
    #[serde(default = "default_talk_listen_max")]
    pub talk_listen_max: f64,
}

fn default_interruption_tolerance() -> i64 {
    300
}
fn default_satisfaction_portion() -> f64 {
    0.3
}
fn default_greeting_threshold() -> f32 {
    0.65
}
fn default_greeting_max_turns() -> usize {
    3
}
fn default_talk_listen_min() -> f64 {
    0.3
}
fn default_talk_listen_max() -> f64 {
    0.7
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            interruption_tolerance_ms: default_interruption_tolerance(),
            satisfaction_portion: default_satisfaction_portion(),
            greeting_threshold: default_greeting_threshold(),
            greeting_max_turns: default_greeting_max_turns(),
            talk_listen_min: default_talk_listen_min(),
            talk_listen_max: default_talk_listen_max(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        if !(self.satisfaction_portion > 0.0 && self.satisfaction_portion <= 1.0) {
            return Err(ConfigError::invalid(
                "scoring.satisfaction_portion",
                format!("must be in (0, 1], got {}", self.satisfaction_portion),
            ));
        }

        if !(-1.0..=1.0).contains(&self.greeting_threshold) {
            return Err(ConfigError::invalid(
                "scoring.greeting_threshold",
                format!("must be in [-1, 1], got {}", self.greeting_threshold),
            ));
        }

        if self.interruption_tolerance_ms < 0 {
            return Err(ConfigError::invalid(
                "scoring.interruption_tolerance_ms",
                "must not be negative",
            ));
        }

        if self.talk_listen_min > self.talk_listen_max {
            return Err(ConfigError::invalid(
                "scoring.talk_listen_min",
                format!(
                    "healthy band is empty: {} > {}",
                    self.talk_listen_min, self.talk_listen_max
                ),
            ));
        }

        Ok(())
    }
}
