//! Lexical extractor
//!
//! Turns free text into the set of lowercase lemmas of its content words
//! (nouns, verbs, adjectives). Stop words, punctuation, numbers and
//! closed-class words are dropped. Stop-word checks use the surface form, so
//! "got" survives as "get" while "get" itself is filtered.

mod lemmatizer;
mod stopwords;

pub use lemmatizer::lemmatize;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use stopwords::{CLOSED_CLASS, LY_CONTENT_WORDS, STOP_WORDS};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap());

/// Split text into lowercase word tokens, separating contractions
///
/// "Doesn't" becomes `["does", "n't"]`, "I'm" becomes `["i", "'m"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let mut tokens = Vec::new();

    for m in TOKEN_PATTERN.find_iter(&normalized) {
        let token = m.as_str();
        if let Some(base) = token.strip_suffix("n't") {
            let base = match base {
                "ca" => "can",
                "wo" => "will",
                "sha" => "shall",
                other => other,
            };
            if !base.is_empty() {
                tokens.push(base.to_string());
            }
            tokens.push("n't".to_string());
        } else if let Some(idx) = token.find('\'') {
            tokens.push(token[..idx].to_string());
            tokens.push(token[idx..].to_string());
        } else {
            tokens.push(token.to_string());
        }
    }

    tokens
}

/// Content-word extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalExtractor;

impl LexicalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Lemmas of the content words in `text`; empty for empty input
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| is_content_word(t))
            .map(|t| lemmatize(&t))
            .filter(|lemma| lemma.len() > 1)
            .collect()
    }
}

fn is_content_word(token: &str) -> bool {
    if token.len() < 2 || token.starts_with('\'') || token == "n't" {
        return false;
    }
    if !token.bytes().any(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    if token.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if STOP_WORDS.contains(token) || CLOSED_CLASS.contains(token) {
        return false;
    }
    // -ly adverbs
    if token.len() > 4 && token.ends_with("ly") && !LY_CONTENT_WORDS.contains(token) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_contractions() {
        assert_eq!(tokenize("Doesn't work"), vec!["does", "n't", "work"]);
        assert_eq!(tokenize("I’m fine"), vec!["i", "'m", "fine"]);
        assert_eq!(tokenize("Can't, won't!"), vec!["can", "n't", "will", "n't"]);
    }

    #[test]
    fn test_extract_content_words() {
        let extractor = LexicalExtractor::new();
        let words = extractor.extract("My internet connection keeps dropping every night.");
        assert_eq!(words, set(&["internet", "connection", "keep", "drop", "night"]));
        assert!(words.contains("internet"));
        assert!(words.contains("connection"));
        assert!(words.contains("drop"));
        assert!(!words.contains("my"));
        assert!(!words.contains("every"));
    }

    #[test]
    fn test_extract_lemmatizes() {
        let extractor = LexicalExtractor::new();
        let words = extractor.extract("The payments were declined and the cards got blocked");
        assert_eq!(words, set(&["payment", "decline", "card", "get", "block"]));
    }

    #[test]
    fn test_extract_empty_and_function_words() {
        let extractor = LexicalExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("Yes. Okay, hmm... so what about it?").is_empty());
        assert!(extractor.extract("12 345 !!!").is_empty());
    }

    #[test]
    fn test_extract_drops_adverbs() {
        let extractor = LexicalExtractor::new();
        let words = extractor.extract("That was extremely helpful, honestly");
        assert_eq!(words, set(&["helpful"]));
    }
}
