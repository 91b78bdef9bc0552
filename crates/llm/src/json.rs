//! Pulling JSON out of free-form model replies
//!
//! Models wrap their answer in prose and code fences, and often emit Python
//! literals (single quotes, `True`/`None`) instead of JSON.

use serde_json::Value;

/// Convert a Python-style literal to JSON
///
/// Single-quoted strings become double-quoted, `True`/`False`/`None` become
/// `true`/`false`/`null`, and trailing commas before `]` or `}` are dropped.
/// Text that is already JSON passes through unchanged.
pub fn python_literal_to_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let quote = c;
                out.push('"');
                i += 1;
                while i < chars.len() && chars[i] != quote {
                    match chars[i] {
                        '\\' if i + 1 < chars.len() => {
                            let next = chars[i + 1];
                            if next == '\'' {
                                out.push('\'');
                            } else {
                                out.push('\\');
                                out.push(next);
                            }
                            i += 2;
                            continue;
                        }
                        '"' => out.push_str("\\\""),
                        '\n' => out.push_str("\\n"),
                        other => out.push(other),
                    }
                    i += 1;
                }
                out.push('"');
                i += 1;
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j >= chars.len() || !matches!(chars[j], ']' | '}') {
                    out.push(',');
                }
                i += 1;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => &word,
                });
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    out
}

/// Slice from the first `open` to the last `close`
fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the outermost `{...}` or `[...]` span of a reply
pub fn extract_json(text: &str, open: char, close: char) -> Result<Value, String> {
    let span = outermost(text, open, close)
        .ok_or_else(|| format!("no {}...{} block in reply", open, close))?;

    match serde_json::from_str(span) {
        Ok(value) => Ok(value),
        Err(strict) => serde_json::from_str(&python_literal_to_json(span))
            .map_err(|e| format!("{} (as python literal: {})", strict, e)),
    }
}
