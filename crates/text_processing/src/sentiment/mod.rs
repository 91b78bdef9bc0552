//! Sentiment analysis for call transcripts
//!
//! Lexicon valence model producing a compound polarity in [-1, 1]:
//! - word valences from a fixed lexicon
//! - intensity boosters and dampeners within three words
//! - negation within three words flips and shrinks the valence
//! - contrastive "but" halves what precedes it and amplifies what follows
//! - exclamation marks add emphasis
//!
//! # Example
//!
//! ```
//! use call_eval_text_processing::sentiment::{SentimentAnalyzer, Sentiment};
//!
//! let analyzer = SentimentAnalyzer::new();
//! let result = analyzer.analyze("This is very helpful, thank you!");
//!
//! assert_eq!(result.sentiment, Sentiment::Satisfied);
//! assert!(result.confidence > 0.7);
//! ```

mod lexicon;

use call_eval_core::SentimentScorer;
use serde::{Deserialize, Serialize};

use crate::lexical::tokenize;
use lexicon::{BOOSTERS, BOOSTER_INCREMENT, NEGATION_SCALAR, NEGATORS, VALENCE};

/// Normalization constant of the compound score
const NORMALIZATION_ALPHA: f32 = 15.0;

/// Emphasis added per exclamation mark
const EXCLAMATION_BOOST: f32 = 0.292;

/// Sentiment categories for customer turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sentiment {
    /// Customer is positive, agreeable
    Positive,
    /// Customer is negative, unhappy
    Negative,
    #[default]
    Neutral,
    /// Strongly negative (subset of Negative)
    Frustrated,
    /// Strongly positive (subset of Positive)
    Satisfied,
}

impl Sentiment {
    /// Check if sentiment is generally positive
    pub fn is_positive(&self) -> bool {
        matches!(self, Sentiment::Positive | Sentiment::Satisfied)
    }

    /// Check if sentiment is generally negative
    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative | Sentiment::Frustrated)
    }
}

/// Result of sentiment analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Detected sentiment
    pub sentiment: Sentiment,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Lexicon words that contributed to the score
    pub matched_patterns: Vec<String>,
    /// Compound polarity (-1.0 to 1.0)
    pub polarity: f32,
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 0.5,
            matched_patterns: Vec::new(),
            polarity: 0.0,
        }
    }
}

/// Configuration for sentiment analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Compound magnitude below which text is neutral
    pub neutral_threshold: f32,
    /// Compound magnitude at which text is satisfied/frustrated
    pub strong_threshold: f32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            neutral_threshold: 0.05,
            strong_threshold: 0.6,
        }
    }
}

/// Sentiment analyzer for short conversational text
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    config: SentimentConfig,
}

impl SentimentAnalyzer {
    /// Create a new sentiment analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sentiment analyzer with custom configuration
    pub fn with_config(config: SentimentConfig) -> Self {
        Self { config }
    }

    /// Analyze text and return sentiment result
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let (polarity, matched_patterns) = self.compound(text);
        let magnitude = polarity.abs();

        let sentiment = if magnitude < self.config.neutral_threshold {
            Sentiment::Neutral
        } else if polarity >= self.config.strong_threshold {
            Sentiment::Satisfied
        } else if polarity > 0.0 {
            Sentiment::Positive
        } else if polarity <= -self.config.strong_threshold {
            Sentiment::Frustrated
        } else {
            Sentiment::Negative
        };

        let confidence = if sentiment == Sentiment::Neutral {
            0.5
        } else {
            (magnitude * 0.7 + 0.3).min(0.95)
        };

        SentimentResult {
            sentiment,
            confidence,
            matched_patterns,
            polarity,
        }
    }

    /// Compound polarity and the lexicon words that produced it
    fn compound(&self, text: &str) -> (f32, Vec<String>) {
        let tokens = tokenize(text);
        let mut valences = vec![0.0f32; tokens.len()];
        let mut matched = Vec::new();

        for (i, word) in tokens.iter().enumerate() {
            if BOOSTERS.contains_key(word.as_str()) {
                continue;
            }
            let Some(&base) = VALENCE.get(word.as_str()) else {
                continue;
            };
            // "no" in front of a scored word only negates it
            if word == "no"
                && tokens
                    .get(i + 1)
                    .is_some_and(|next| VALENCE.contains_key(next.as_str()))
            {
                continue;
            }

            let mut valence = base;
            for (distance, decay) in [(1usize, 1.0f32), (2, 0.95), (3, 0.9)] {
                if i < distance {
                    break;
                }
                if let Some(direction) = BOOSTERS.get(tokens[i - distance].as_str()) {
                    let scalar = BOOSTER_INCREMENT * direction * decay;
                    valence += if valence < 0.0 { -scalar } else { scalar };
                }
            }

            let negated = (1..=3)
                .filter(|d| i >= *d)
                .any(|d| NEGATORS.contains(tokens[i - d].as_str()));
            if negated {
                valence *= NEGATION_SCALAR;
            }

            valences[i] = valence;
            matched.push(word.clone());
        }

        if let Some(pivot) = tokens.iter().position(|t| t == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        let mut sum: f32 = valences.iter().sum();
        let emphasis = text.matches('!').count().min(4) as f32 * EXCLAMATION_BOOST;
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
        (compound.clamp(-1.0, 1.0), matched)
    }
}

impl SentimentScorer for SentimentAnalyzer {
    fn polarity(&self, text: &str) -> f32 {
        self.compound(text).0
    }
}
