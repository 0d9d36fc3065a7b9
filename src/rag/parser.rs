//! Extraction and validation of the model's JSON verdict.
//!
//! Parsing is all-or-nothing: either the three required keys are present
//! and non-empty, or the caller gets an error carrying the raw text.

use serde_json::Map;
use serde_json::Value;

use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::models::FeedbackResult;

pub const REQUIRED_KEYS: [&str; 3] = ["error_type", "error_subtype", "personalized_feedback"];

/// Parser for raw completion text
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(&self, raw_text: &str) -> Result<FeedbackResult> {
        parse_feedback(raw_text)
    }
}

/// Strip code fences, extract the first balanced object, parse and validate it
pub fn parse_feedback(raw_text: &str) -> Result<FeedbackResult> {
    let cleaned = strip_code_fences(raw_text);

    let Some(candidate) = extract_json_object(&cleaned) else {
        return Err(FeedbackError::NoJsonFound {
            raw: raw_text.to_string(),
        });
    };

    let value: Value = serde_json::from_str(candidate).map_err(|e| FeedbackError::MalformedJson {
        reason: e.to_string(),
        raw: raw_text.to_string(),
    })?;

    validate(value).map_err(|reason| FeedbackError::SchemaValidation {
        reason,
        raw: raw_text.to_string(),
    })
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Return the first complete top-level `{...}` in `text`.
///
/// Depth is tracked outside JSON string literals only, so braces inside
/// feedback text do not unbalance the scan. If the first `{` never closes,
/// scanning resumes at the next `{` after it. When several balanced objects
/// exist the first one wins.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = matching_brace(&text[start..]) {
            return Some(&text[start..=start + end]);
        }
        search_from = start + 1;
    }
    None
}

/// Byte offset of the `}` closing the `{` at offset 0
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate(value: Value) -> std::result::Result<FeedbackResult, String> {
    let Value::Object(mut map) = value else {
        return Err("response is not a JSON object".to_string());
    };

    let extra: Vec<&String> = map
        .keys()
        .filter(|k| !REQUIRED_KEYS.contains(&k.as_str()))
        .collect();
    if !extra.is_empty() {
        return Err(format!("unexpected keys: {extra:?}"));
    }

    Ok(FeedbackResult {
        error_type: take_required(&mut map, "error_type")?,
        error_subtype: take_required(&mut map, "error_subtype")?,
        personalized_feedback: take_required(&mut map, "personalized_feedback")?,
    })
}

fn take_required(map: &mut Map<String, Value>, key: &str) -> std::result::Result<String, String> {
    match map.remove(key) {
        None => Err(format!("missing required key `{key}`")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(format!("`{key}` is empty")),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!("`{key}` must be a string, got {other}")),
    }
}
