//! Valence lexicon
//!
//! Word valences on a -4..+4 scale, plus intensity modifiers and negators.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Scalar added (or subtracted) by an intensity modifier
pub(crate) const BOOSTER_INCREMENT: f32 = 0.293;

/// Multiplier applied to a negated valence
pub(crate) const NEGATION_SCALAR: f32 = -0.74;

pub(crate) static VALENCE: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        // positive
        ("thank", 1.5),
        ("thanks", 1.9),
        ("thankful", 2.7),
        ("grateful", 2.0),
        ("appreciate", 1.7),
        ("appreciated", 2.3),
        ("help", 1.7),
        ("helped", 1.7),
        ("helping", 1.2),
        ("helpful", 1.8),
        ("useful", 1.9),
        ("perfect", 2.7),
        ("perfectly", 3.2),
        ("great", 3.1),
        ("good", 1.9),
        ("nice", 1.8),
        ("fine", 0.8),
        ("okay", 0.9),
        ("ok", 0.9),
        ("alright", 1.0),
        ("cool", 1.3),
        ("happy", 2.7),
        ("glad", 2.0),
        ("pleased", 1.9),
        ("satisfied", 1.8),
        ("excellent", 2.7),
        ("wonderful", 2.7),
        ("amazing", 2.8),
        ("awesome", 3.1),
        ("fantastic", 2.6),
        ("brilliant", 2.8),
        ("love", 3.2),
        ("like", 1.5),
        ("best", 3.2),
        ("better", 1.9),
        ("clear", 1.6),
        ("resolved", 1.4),
        ("solved", 1.1),
        ("fixed", 1.0),
        ("works", 0.9),
        ("working", 0.5),
        ("sure", 1.3),
        ("yes", 1.7),
        ("yeah", 1.2),
        ("agree", 1.5),
        ("agreed", 1.1),
        ("welcome", 2.0),
        ("kind", 2.4),
        ("friendly", 2.2),
        ("patient", 1.4),
        ("patience", 1.6),
        ("easy", 1.9),
        ("quick", 1.0),
        ("fast", 0.9),
        ("relief", 2.1),
        ("relieved", 1.5),
        ("success", 2.7),
        ("successful", 2.8),
        ("smooth", 1.5),
        ("pleasure", 2.7),
        ("lovely", 2.8),
        ("correct", 1.4),
        ("fair", 1.3),
        ("hope", 1.9),
        ("benefit", 1.6),
        ("care", 2.2),
        ("excited", 1.4),
        ("enjoy", 2.2),
        ("sorted", 1.2),
        ("valuable", 2.1),
        ("reasonable", 1.5),
        ("recommend", 1.5),
        ("understood", 1.1),
        ("understanding", 1.3),
        // negative
        ("problem", -1.7),
        ("problems", -1.7),
        ("issue", -0.9),
        ("issues", -0.9),
        ("error", -1.4),
        ("errors", -1.4),
        ("frustrated", -2.0),
        ("frustrating", -2.2),
        ("frustration", -2.1),
        ("bad", -2.5),
        ("worse", -2.1),
        ("worst", -3.1),
        ("wrong", -2.1),
        ("incorrect", -1.3),
        ("terrible", -2.1),
        ("horrible", -2.5),
        ("awful", -2.0),
        ("disappointed", -1.9),
        ("disappointing", -2.2),
        ("angry", -2.3),
        ("annoyed", -1.6),
        ("annoying", -1.8),
        ("upset", -1.6),
        ("confused", -1.3),
        ("confusing", -0.9),
        ("unhappy", -1.8),
        ("useless", -1.8),
        ("unacceptable", -2.0),
        ("ridiculous", -1.1),
        ("broken", -1.6),
        ("fail", -2.5),
        ("failed", -2.3),
        ("failure", -2.3),
        ("unable", -1.2),
        ("unfortunately", -1.5),
        ("sorry", -0.3),
        ("worried", -1.2),
        ("worry", -1.9),
        ("doubt", -1.5),
        ("unsure", -1.0),
        ("waste", -1.8),
        ("wasted", -2.2),
        ("slow", -0.7),
        ("delay", -1.3),
        ("delayed", -0.9),
        ("hate", -2.7),
        ("poor", -2.1),
        ("complaint", -1.5),
        ("complain", -1.5),
        ("stuck", -1.0),
        ("trouble", -1.7),
        ("difficult", -1.5),
        ("hard", -0.4),
        ("mess", -1.5),
        ("stupid", -2.4),
        ("no", -1.2),
        ("never", -0.5),
        ("cancel", -0.8),
        ("charged", -0.4),
        ("overcharged", -1.6),
        ("scam", -2.5),
        ("rude", -2.0),
        ("ignored", -1.6),
        ("lost", -1.3),
        ("missing", -1.2),
        ("damaged", -1.9),
        ("declined", -1.0),
        ("blocked", -0.9),
        ("denied", -1.7),
        ("fraud", -2.5),
        ("crash", -1.7),
        ("crashed", -1.9),
    ]
    .into_iter()
    .collect()
});

/// Intensity modifiers: +1 increases magnitude, -1 dampens it
pub(crate) static BOOSTERS: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        ("very", 1.0),
        ("really", 1.0),
        ("so", 1.0),
        ("extremely", 1.0),
        ("absolutely", 1.0),
        ("totally", 1.0),
        ("completely", 1.0),
        ("incredibly", 1.0),
        ("super", 1.0),
        ("truly", 1.0),
        ("most", 1.0),
        ("much", 1.0),
        ("highly", 1.0),
        ("especially", 1.0),
        ("quite", 1.0),
        ("too", 1.0),
        ("barely", -1.0),
        ("hardly", -1.0),
        ("slightly", -1.0),
        ("somewhat", -1.0),
        ("kinda", -1.0),
        ("little", -1.0),
        ("bit", -1.0),
        ("partly", -1.0),
        ("marginally", -1.0),
    ]
    .into_iter()
    .collect()
});

pub(crate) static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "n't", "no", "never", "nothing", "nowhere", "none", "nobody", "neither", "nor",
        "cannot", "without", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "werent",
        "cant", "couldnt", "wont", "wouldnt", "shouldnt", "havent", "hasnt", "hadnt", "aint",
    ]
    .into_iter()
    .collect()
});
