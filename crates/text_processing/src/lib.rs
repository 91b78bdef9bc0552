//! Text processing for call evaluation
//!
//! This crate provides:
//! - **Lexical extraction**: lemmatized content words (nouns, verbs, adjectives)
//! - **Sentiment scoring**: lexicon-based polarity in [-1, 1]
//!
//! # Example
//!
//! ```
//! use call_eval_text_processing::{LexicalExtractor, SentimentAnalyzer};
//!
//! let keywords = LexicalExtractor::new().extract("My payments were declined twice");
//! assert!(keywords.contains("payment"));
//!
//! let result = SentimentAnalyzer::new().analyze("Thanks, that was really helpful!");
//! assert!(result.polarity > 0.5);
//! ```

pub mod lexical;
pub mod sentiment;

pub use lexical::{lemmatize, tokenize, LexicalExtractor};
pub use sentiment::{Sentiment, SentimentAnalyzer, SentimentConfig, SentimentResult};
