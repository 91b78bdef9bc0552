//! Rule-based English lemmatizer
//!
//! Irregular forms come from a lookup table; regular inflections are undone
//! with suffix rules. The goal is that inflected variants of one word collapse
//! to the same lemma, e.g. "works", "working" and "worked" all map to "work".

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("went", "go"),
        ("gone", "go"),
        ("going", "go"),
        ("got", "get"),
        ("gotten", "get"),
        ("getting", "get"),
        ("paid", "pay"),
        ("said", "say"),
        ("making", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("gave", "give"),
        ("given", "give"),
        ("bought", "buy"),
        ("sent", "send"),
        ("told", "tell"),
        ("thought", "think"),
        ("felt", "feel"),
        ("found", "find"),
        ("knew", "know"),
        ("known", "know"),
        ("left", "leave"),
        ("kept", "keep"),
        ("came", "come"),
        ("saw", "see"),
        ("seen", "see"),
        ("ran", "run"),
        ("broke", "break"),
        ("broken", "break"),
        ("brought", "bring"),
        ("spent", "spend"),
        ("lost", "lose"),
        ("understood", "understand"),
        ("heard", "hear"),
        ("held", "hold"),
        ("meant", "mean"),
        ("met", "meet"),
        ("sold", "sell"),
        ("spoke", "speak"),
        ("spoken", "speak"),
        ("wrote", "write"),
        ("written", "write"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("forgot", "forget"),
        ("forgotten", "forget"),
        ("agreed", "agree"),
        ("guaranteed", "guarantee"),
        ("freed", "free"),
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
    ]
    .into_iter()
    .collect()
});

/// Stems whose base form ends in a silent "e" ("mak" -> "make")
static E_RESTORE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mak", "tak", "giv", "us", "com", "writ", "lov", "mov", "hop", "car", "shar", "compar",
        "declar", "prepar", "clos", "charg", "chang", "arrang", "manag", "issu", "continu",
        "purchas", "releas", "increas", "decreas", "excus", "refus", "confus", "advis",
        "realiz", "organiz", "apologiz", "recogniz", "authoriz", "pric", "plac", "replac",
        "produc", "reduc", "introduc", "experienc", "notic", "practic", "serv", "sav", "solv",
        "resolv", "involv", "receiv", "believ", "achiev", "deserv", "observ", "reserv",
        "provid", "decid", "guid", "divid", "includ", "conclud", "exclud", "declin", "combin",
        "determin", "examin", "defin", "liv", "leav", "activ", "creat", "updat", "operat",
        "rat", "stat", "dat", "locat", "separat", "indicat", "communicat", "investigat",
        "appreciat", "escalat", "calculat", "generat", "validat", "negotiat", "assum",
        "consum", "resum", "tim", "nam", "stor", "scor", "ignor", "explor", "restor", "requir",
        "acquir", "inquir", "hir", "fir", "tir", "retir", "desir", "cur", "secur", "ensur",
        "measur", "captur", "featur", "lik", "wak", "invok", "revok", "typ", "wip", "swip",
        "escap", "shap", "argu", "pursu", "rescu", "valu", "queu", "not", "vot", "quot",
        "complet", "delet", "acknowledg", "judg", "oblig", "engag", "encourag", "dam", "fac",
        "trac", "rac", "forc", "enforc", "danc", "balanc", "financ", "announc", "pronounc",
        "sourc", "caus", "paus", "abus", "promis", "surpris", "compris", "rais", "prais",
        "pleas", "emerg", "merg", "urg", "purg", "welcom", "becom", "overcom", "hav",
    ]
    .into_iter()
    .collect()
});

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(s: &str) -> bool {
    s.bytes().any(|c| is_vowel(c) || c == b'y')
}

/// Rebuild the base form from a stem left after removing -ing/-ed
fn repair_stem(stem: &str) -> String {
    if E_RESTORE.contains(stem) || stem.ends_with('v') {
        return format!("{}e", stem);
    }

    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 3 {
        let (a, b) = (bytes[n - 2], bytes[n - 1]);
        if a == b && !is_vowel(b) && !matches!(b, b'l' | b's' | b'z' | b'f') {
            return stem[..n - 1].to_string();
        }
    }

    stem.to_string()
}

/// Reduce a lowercase word to its lemma
pub fn lemmatize(word: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(word) {
        return (*lemma).to_string();
    }

    let n = word.len();
    if n <= 3 || !word.is_ascii() {
        return word.to_string();
    }

    // -ing
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 && has_vowel(stem) {
            return repair_stem(stem);
        }
        return word.to_string();
    }

    // -ied / -ies
    if let Some(stem) = word.strip_suffix("ied").or_else(|| word.strip_suffix("ies")) {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
        return word.to_string();
    }

    // -ed
    if let Some(stem) = word.strip_suffix("ed") {
        if word.ends_with("eed") {
            return word.to_string();
        }
        if stem.len() >= 2 && has_vowel(stem) {
            return repair_stem(stem);
        }
        return word.to_string();
    }

    // plurals and third person -s
    if word.ends_with('s') {
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }
        for suffix in ["sses", "shes", "ches", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..n - 2].to_string();
            }
        }
        return word[..n - 1].to_string();
    }

    word.to_string()
}
