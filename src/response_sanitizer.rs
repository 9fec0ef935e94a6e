//! Turns chatty model output into a JSON value.
//!
//! Models wrap JSON in markdown fences, prefix it with prose, or leave
//! trailing commas. Parsing is attempted on progressively repaired text.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```json\s*").expect("fence pattern is valid"));
static BARE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*").expect("fence pattern is valid"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("Unable to parse JSON from model response: {0}")]
    Unparseable(#[from] serde_json::Error),
}

/// Removes markdown code fences anywhere in the text.
pub fn strip_markdown_fences(raw: &str) -> String {
    let without_json_fences = JSON_FENCE.replace_all(raw, "");
    BARE_FENCE.replace_all(&without_json_fences, "").trim().to_string()
}

/// Parses model output, repairing it step by step: fences stripped, then the
/// first balanced object/array extracted, then trailing commas removed.
pub fn sanitize_and_parse_json(raw: &str) -> Result<Value, SanitizeError> {
    let stripped = strip_markdown_fences(raw);

    if let Ok(value) = serde_json::from_str(&stripped) {
        return Ok(value);
    }

    let balanced = extract_first_balanced_json(&stripped);
    if let Some(block) = balanced {
        if let Ok(value) = serde_json::from_str(block) {
            debug!("parsed model output after extracting balanced JSON block");
            return Ok(value);
        }
    }

    let candidate = balanced.unwrap_or(&stripped);
    let without_trailing_commas = TRAILING_COMMA.replace_all(candidate, "$1");
    let value = serde_json::from_str(&without_trailing_commas)?;
    debug!("parsed model output after removing trailing commas");
    Ok(value)
}

/// Finds the first balanced `{...}` or `[...]` block. Brackets inside string
/// literals are not special-cased.
pub fn extract_first_balanced_json(text: &str) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        match ch {
            '{' | '[' => {
                if stack.is_empty() {
                    start = Some(idx);
                }
                stack.push(ch);
            }
            '}' | ']' => {
                let expected = if ch == '}' { '{' } else { '[' };
                if stack.last() == Some(&expected) {
                    stack.pop();
                    if stack.is_empty() {
                        if let Some(start) = start {
                            return Some(&text[start..=idx]);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    None
}
