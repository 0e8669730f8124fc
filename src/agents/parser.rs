//! Completion reply normalization.
//!
//! Models often wrap their JSON in a markdown code fence, or add a sentence
//! around it. [`extract_structured`] is the single place that turns such a
//! reply into a JSON object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

static OPEN_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json|JSON)?[ \t]*\r?\n?").unwrap());
static CLOSE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```$").unwrap());

/// A reply that does not contain a JSON object.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Nothing left after trimming and removing fences.
    #[error("empty completion reply")]
    Empty,

    /// No JSON value could be parsed from the reply.
    #[error("no JSON value found in reply: {0}")]
    NoJsonValue(#[source] serde_json::Error),

    /// A JSON value was found but it is not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// The object does not match the expected result shape.
    #[error("unexpected result shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, each only if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let start = OPEN_FENCE.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    let end = CLOSE_FENCE.find(body).map_or(body.len(), |m| m.start());
    body[..end].trim()
}

/// Best-effort extraction of the first JSON object in a possibly fenced reply.
///
/// The fence-stripped body is parsed as a whole first. If that fails, the
/// first JSON value starting at the first `{` is parsed and anything after it
/// is ignored.
pub fn extract_structured(text: &str) -> Result<Map<String, Value>, ParseError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(whole_err) => match body.find('{') {
            Some(start) => first_value(&body[start..]).ok_or(ParseError::NoJsonValue(whole_err))?,
            None => return Err(ParseError::NoJsonValue(whole_err)),
        },
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::NotAnObject(json_type_name(&other))),
    }
}

fn first_value(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
