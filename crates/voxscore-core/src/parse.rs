//! JSON recovery parser: strict decode with failure classification.
//!
//! Never raises past its boundary. A decode failure is classified as
//! truncated or malformed and the stripped text is preserved verbatim so
//! the continuation controller can seed a second attempt with it.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::extract::ExtractedText;
use crate::provider::FinishReason;

/// Why a strict decode failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailReason {
    /// Output was cut off mid-structure (or the provider said so).
    Truncated,
    /// Syntactically invalid despite looking complete.
    Malformed,
}

impl ParseFailReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFailReason::Truncated => "truncated",
            ParseFailReason::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for ParseFailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Value),
    Failed {
        reason: ParseFailReason,
        /// Stripped text, preserved verbatim for seeding and inspection.
        partial: String,
    },
}

/// Fenced block anywhere in the text, e.g. prose followed by ```json {...} ```.
fn fenced_json_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?si)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced JSON pattern compiles")
    })
}

/// Remove surrounding whitespace and a leading/trailing markdown fence
/// without altering interior content.
fn strip_wrapping(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the info string ("json") through the first newline.
        let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        return body.trim().to_string();
    }
    trimmed.to_string()
}

/// Largest balanced top-level `{...}` block, skipping surrounding prose.
/// Brace counting is string-aware so quoted braces do not confuse it.
fn balanced_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;
    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Structural truncation heuristic: unbalanced braces/brackets outside
/// strings, an unterminated string, or a dangling `,`/`:` at the end.
/// Deliberately not a full JSON-prefix validator.
fn ends_mid_structure(text: &str) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escape = false;
    for c in text.chars() {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
    }
    if in_string || depth > 0 {
        return true;
    }
    matches!(text.trim_end().chars().last(), Some(',') | Some(':'))
}

/// Attempt a strict decode of the extracted text.
///
/// Stripping, then direct decode, then the balanced-block and fenced-block
/// fallbacks for replies that wrap the object in prose. Failure classifies
/// as truncated when `finish` says the budget was hit or the text ends
/// mid-structure; malformed otherwise.
pub fn parse(extracted: &ExtractedText) -> ParseOutcome {
    let stripped = strip_wrapping(&extracted.text);

    if let Ok(value) = serde_json::from_str::<Value>(&stripped) {
        return ParseOutcome::Parsed(value);
    }

    if let Some(block) = balanced_json_block(&stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            return ParseOutcome::Parsed(value);
        }
    }

    if let Some(caps) = fenced_json_pattern().captures(&extracted.text) {
        if let Ok(value) = serde_json::from_str::<Value>(&caps[1]) {
            return ParseOutcome::Parsed(value);
        }
    }

    let reason = if extracted.finish == FinishReason::Length || ends_mid_structure(&stripped) {
        ParseFailReason::Truncated
    } else {
        ParseFailReason::Malformed
    };
    debug!(reason = reason.as_str(), chars = stripped.len(), "strict JSON decode failed");

    ParseOutcome::Failed {
        reason,
        partial: stripped,
    }
}
