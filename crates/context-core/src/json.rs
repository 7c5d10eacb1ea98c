//! Cleanup and tolerant decoding of model output.
//!
//! Models are asked to "only return valid JSON" but regularly wrap it in Markdown
//! fences or add a sentence in front. Everything that decodes model output goes
//! through [`parse_model_json`]; DTO fields use the `lenient*` helpers so that a
//! single malformed field degrades to `None` instead of failing the whole decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

const SNIPPET_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unparseable model output: {source} (output: {snippet})")]
    Unparseable {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },

    #[error("unexpected model output shape: {0}")]
    UnexpectedShape(String),

    #[error("missing field in model output: {0}")]
    MissingField(&'static str),
}

/// Strips surrounding whitespace and a Markdown code fence (```` ```json ```` or ```` ``` ````).
///
/// Applying it twice yields the same result as applying it once.
pub fn clean_json_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = strip_fence_tag(rest);
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

fn strip_fence_tag(rest: &str) -> &str {
    if let Some(idx) = rest.find('\n') {
        let tag = rest[..idx].trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return &rest[idx + 1..];
        }
    }

    match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    }
}

/// Cleans and decodes model output into `T`.
///
/// When the cleaned text does not decode, the outermost `{...}` or `[...]` block is
/// tried before giving up with [`ExtractionError::Unparseable`].
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionError> {
    let cleaned = clean_json_response(raw);

    match serde_json::from_str::<T>(cleaned) {
        Ok(value) => Ok(value),
        Err(source) => {
            if let Some(block) = outermost_json_block(cleaned) {
                if block.len() != cleaned.len() {
                    if let Ok(value) = serde_json::from_str::<T>(block) {
                        log::debug!("Recovered JSON block from surrounding model prose");
                        return Ok(value);
                    }
                }
            }

            Err(ExtractionError::Unparseable {
                source,
                snippet: cleaned.chars().take(SNIPPET_LEN).collect(),
            })
        }
    }
}

/// Like [`parse_model_json`] but requires a JSON object at the top level.
pub fn parse_model_object(raw: &str) -> Result<serde_json::Map<String, Value>, ExtractionError> {
    match parse_model_json::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(ExtractionError::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn outermost_json_block(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field deserializer: any value that does not decode as `T` becomes `None`.
///
/// Use together with `#[serde(default)]` so missing fields are `None` as well.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Field deserializer for lists: keeps the elements that decode as `T`, drops the rest.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Field deserializer for scores: numbers, or strings holding a number (`"4.5"`, `"87%"`).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_like))
}

/// Field deserializer for counts: non-negative integers, integral floats, numeric strings.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_like)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}
