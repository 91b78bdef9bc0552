//! Canonical phrase sets and word lists
//!
//! Bump a set's version whenever its phrases change so cached embeddings
//! are recomputed.

use call_eval_embeddings::PhraseSet;

const GREETING_PHRASES: &[&str] = &[
    "Hello, how may I help you?",
    "Hi, how can I assist you today?",
    "Good morning, thank you for contacting support",
    "Good afternoon, how may I help?",
    "Good evening, how can I help you?",
    "Welcome to customer support",
    "Thank you for calling customer service",
    "Hello and welcome",
    "Hi there, how may I assist?",
    "Thanks for reaching out to us",
    "Thank you for contacting us today",
    "Hello, thank you for getting in touch",
    "Welcome, how may I assist you?",
    "Hi, thanks for calling",
    "Good morning, how can I assist you today?",
    "Good afternoon, thank you for reaching out",
    "Good evening, thank you for contacting us",
    "Hello, I\u{2019}ll be happy to assist you",
    "Hi, I\u{2019}m here to help you",
    "Welcome, thank you for calling",
    "Hello, how can I support you?",
    "Thank you for reaching customer support",
    "Hi, how may I help you today?",
    "Good morning and welcome",
    "Good afternoon and welcome",
    "Good evening and welcome",
    "Hello, thanks for contacting support",
    "Hi, thank you for reaching out to support",
    "Welcome to our support team",
    "Thank you for calling, how may I help?",
];

/// Strong commitment, investigative action, then supportive reassurance
const OWNERSHIP_PHRASES: &[&str] = &[
    "I will take full responsibility for this issue",
    "I will personally handle this for you",
    "I will take care of this matter",
    "I will ensure this gets resolved",
    "I will make sure this is fixed",
    "I am responsible for resolving this issue",
    "I will see this through until it is resolved",
    "I will own this issue",
    "I will personally follow up on this",
    "I will handle this end to end",
    "I will check this for you",
    "Let me look into this for you",
    "I will investigate this issue",
    "I will work on resolving this",
    "I will get this checked immediately",
    "I will review this right away",
    "I am checking this now",
    "Let me verify the details for you",
    "I will examine what went wrong",
    "I will look into the cause of this issue",
    "I understand your concern and will help you",
    "I understand the issue you are facing",
    "I can help you with this",
    "Let me help you resolve this",
    "I am here to assist you with this",
    "I see why this is frustrating",
    "I understand how this impacts you",
    "I will assist you with this issue",
    "I am here to support you",
    "I understand your issue and will help",
];

const EXPLICIT_SATISFACTION_PHRASES: &[&str] = &[
    "that solved my issue",
    "this solved my problem",
    "my issue is resolved",
    "the problem is resolved now",
    "that fixed it",
    "it\u{2019}s working now",
    "everything is working fine now",
    "the issue is fixed",
    "this has been resolved",
    "my problem is fixed now",
    "that works",
    "this works for me",
    "that solution works",
    "this makes sense now",
    "i understand it now",
    "that answers my question",
    "this clears things up",
    "that helps a lot",
    "this is helpful",
    "that was helpful",
    "thanks for your help",
    "thank you for helping me",
    "i appreciate your help",
    "thanks, that was helpful",
    "thank you, that solves it",
    "appreciate the support",
    "thanks, that works",
    "thank you so much",
    "thanks for explaining",
    "thanks for resolving this",
    "i\u{2019}m happy with the solution",
    "i\u{2019}m satisfied with the support",
    "i\u{2019}m satisfied now",
    "i\u{2019}m happy now",
    "this is much better",
    "that\u{2019}s great",
    "perfect, thank you",
    "that\u{2019}s exactly what i needed",
    "i\u{2019}m glad that\u{2019}s sorted",
    "that resolved my concern",
    "that\u{2019}s all i needed",
    "no further questions",
    "that\u{2019}s everything, thanks",
    "i don\u{2019}t need anything else",
    "that\u{2019}s all from my side",
    "okay, thank you",
    "alright, thanks for the help",
    "that will be all",
    "i\u{2019}m good now",
    "we\u{2019}re good now",
];

const IMPLICIT_SATISFACTION_PHRASES: &[&str] = &[
    "okay thanks",
    "okay thank you",
    "alright thanks",
    "sure thanks",
    "got it thanks",
    "that works",
    "sounds good",
    "that makes sense",
    "i understand",
    "i see",
    "that helps",
    "that's clear",
    "makes sense",
    "i got it",
    "understood",
    "that's fine",
    "that's good",
    "sounds fine",
    "that's okay",
    "works for me",
    "no problem",
    "no worries",
    "all good",
    "i'm good",
    "we're good",
    "that's all",
    "that's everything",
    "nothing else",
    "no more questions",
    "perfect",
    "great",
    "excellent",
    "wonderful",
    "awesome",
];

pub static GREETINGS: PhraseSet = PhraseSet::new("greetings", 1, GREETING_PHRASES);

/// Strong, action and support ownership statements pooled together
pub static OWNERSHIP: PhraseSet = PhraseSet::new("ownership", 1, OWNERSHIP_PHRASES);

pub static EXPLICIT_SATISFACTION: PhraseSet =
    PhraseSet::new("explicit_satisfaction", 1, EXPLICIT_SATISFACTION_PHRASES);

pub static IMPLICIT_SATISFACTION: PhraseSet =
    PhraseSet::new("implicit_satisfaction", 1, IMPLICIT_SATISFACTION_PHRASES);

/// Every set the scorers use
pub static ALL_SETS: [&PhraseSet; 4] = [
    &GREETINGS,
    &OWNERSHIP,
    &EXPLICIT_SATISFACTION,
    &IMPLICIT_SATISFACTION,
];

/// Short words of acknowledgement and acceptance
pub const ACCEPTANCE_WORDS: &[&str] = &[
    "okay", "ok", "alright", "right", "sure", "fine", "understood", "understand", "got",
    "gotcha", "see", "yes", "yeah", "yep", "correct", "exactly", "true", "fair", "cool",
    "great", "perfect", "thanks", "thank", "appreciate", "noted", "acknowledged", "accepted",
    "agree", "agreed", "confirm", "confirmed", "sounds", "works", "working", "clear",
    "clarified", "resolved", "fixed", "done", "completed", "helpful", "useful", "good",
    "better",
];

/// Markers that a turn carries a lingering complaint
pub const NEGATIVE_CONTEXT_INDICATORS: &[&str] = &[
    "but",
    "however",
    "still",
    "yet",
    "unfortunately",
    "disappointed",
    "frustrated",
    "confused",
    "not working",
    "doesn't work",
    "can't",
    "won't",
    "unable",
    "problem",
    "issue",
    "error",
    "wrong",
    "incorrect",
    "unsure",
    "doubt",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_sizes() {
        assert_eq!(GREETINGS.len(), 30);
        assert_eq!(OWNERSHIP.len(), 30);
        assert_eq!(EXPLICIT_SATISFACTION.len(), 50);
        assert_eq!(IMPLICIT_SATISFACTION.len(), 34);
        assert_eq!(ACCEPTANCE_WORDS.len(), 44);
        assert_eq!(NEGATIVE_CONTEXT_INDICATORS.len(), 20);
    }

    #[test]
    fn test_set_ids_unique() {
        let mut ids: Vec<_> = ALL_SETS.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), ALL_SETS.len());
    }
}
