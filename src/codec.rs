//! Wire codec for conversation turns
//!
//! Builds the outbound request from the stored history and decodes the
//! model's structured reply. Every reply must be a JSON object carrying the
//! answer text and up to four follow-up suggestions.

#[cfg(test)]
mod proptests;

use crate::conversation::{Speaker, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of suggestions kept from a reply
pub const MAX_SUGGESTIONS: usize = 4;

const RESPONSE_FIELD: &str = "response";
const SUGGESTIONS_FIELD: &str = "suggestions";
const CODE_FENCE: &str = "```";

// ============================================================================
// Wire request
// ============================================================================

/// Outbound request: ordered role-tagged content blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRequest {
    pub contents: Vec<WireContent>,
}

/// One role-tagged block of the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireContent {
    pub role: WireRole,
    pub parts: Vec<WirePart>,
}

impl WireContent {
    fn text(role: WireRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![WirePart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Role names understood by the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<Speaker> for WireRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => WireRole::User,
            Speaker::Assistant => WireRole::Model,
        }
    }
}

impl From<WireRole> for Speaker {
    fn from(role: WireRole) -> Self {
        match role {
            WireRole::User => Speaker::User,
            WireRole::Model => Speaker::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePart {
    pub text: String,
}

/// Build the request for a new user turn.
///
/// The instruction always occupies the first block, posing as user-authored
/// text; the new user text is the last block. `history` must not already
/// contain the new user turn.
#[must_use]
pub fn build_request(history: &[Turn], instruction: &str, new_user_text: &str) -> WireRequest {
    let mut contents = Vec::with_capacity(history.len() + 2);
    contents.push(WireContent::text(WireRole::User, instruction));
    contents.extend(
        history
            .iter()
            .map(|turn| WireContent::text(turn.speaker().into(), turn.text())),
    );
    contents.push(WireContent::text(WireRole::User, new_user_text));
    WireRequest { contents }
}

/// Recover the history portion of a request built by [`build_request`].
///
/// Drops the leading instruction block and the trailing user block.
#[must_use]
pub fn history_from_request(request: &WireRequest) -> Vec<Turn> {
    let len = request.contents.len();
    if len < 2 {
        return Vec::new();
    }
    request
        .contents
        .iter()
        .skip(1)
        .take(len - 2)
        .map(|block| Turn::new(block.role.into(), block.joined_text()))
        .collect()
}

// ============================================================================
// Structured reply
// ============================================================================

/// Validated decoding of a model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredReply {
    response_text: String,
    suggestions: Vec<String>,
}

impl StructuredReply {
    #[must_use]
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.response_text, self.suggestions)
    }
}

/// Why a reply could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Reply is not a JSON object: {0}")]
    MalformedPayload(String),
    #[error("Reply is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("Reply field `{field}` must be {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// Short label used in log records
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedPayload(_) => "malformed_payload",
            DecodeError::MissingField(_) => "missing_field",
            DecodeError::WrongShape { .. } => "wrong_shape",
        }
    }
}

/// Decode the raw reply text into a [`StructuredReply`].
///
/// Code fences around the payload are stripped first. If the remaining text
/// does not parse, the span from the first `{` to the last `}` is tried, which
/// recovers replies where the model wrapped the object in prose.
///
/// # Errors
///
/// [`DecodeError::MalformedPayload`] when no JSON object can be read,
/// [`DecodeError::MissingField`] or [`DecodeError::WrongShape`] when the
/// object lacks `response`/`suggestions` or holds the wrong types.
pub fn decode_reply(raw: &str) -> Result<StructuredReply, DecodeError> {
    let cleaned = strip_fences(raw);
    let value = parse_json(cleaned)?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::MalformedPayload(format!(
                "expected an object, found {}",
                json_type_name(&other)
            )))
        }
    };

    let response_text = match object.get(RESPONSE_FIELD) {
        None => return Err(DecodeError::MissingField(RESPONSE_FIELD)),
        Some(Value::String(text)) => text.clone(),
        Some(_) => {
            return Err(DecodeError::WrongShape {
                field: RESPONSE_FIELD,
                expected: "a string",
            })
        }
    };

    let mut suggestions = match object.get(SUGGESTIONS_FIELD) {
        None => return Err(DecodeError::MissingField(SUGGESTIONS_FIELD)),
        Some(value) => string_array(value).ok_or(DecodeError::WrongShape {
            field: SUGGESTIONS_FIELD,
            expected: "an array of strings",
        })?,
    };

    if suggestions.len() > MAX_SUGGESTIONS {
        tracing::warn!(
            count = suggestions.len(),
            kept = MAX_SUGGESTIONS,
            "Reply carried too many suggestions, truncating"
        );
        suggestions.truncate(MAX_SUGGESTIONS);
    }

    log_extra_fields(&object);

    Ok(StructuredReply {
        response_text,
        suggestions,
    })
}

/// Strip a leading and trailing code fence, with or without a language tag.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(CODE_FENCE) {
        // Skip the language tag (e.g. `json`) up to the end of the fence line
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = rest.get(tag_len..).unwrap_or_default();
    }
    if let Some(rest) = text.trim_end().strip_suffix(CODE_FENCE) {
        text = rest;
    }

    text.trim()
}

fn parse_json(text: &str) -> Result<Value, DecodeError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let recovered = embedded_object(text)
                .and_then(|span| serde_json::from_str::<Value>(span).ok());
            match recovered {
                Some(value) => {
                    tracing::debug!("Recovered JSON object embedded in reply text");
                    Ok(value)
                }
                None => Err(DecodeError::MalformedPayload(first_err.to_string())),
            }
        }
    }
}

/// Span from the first `{` to the last `}`, if any.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(ToString::to_string))
        .collect()
}

fn log_extra_fields(object: &Map<String, Value>) {
    let extra: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|k| *k != RESPONSE_FIELD && *k != SUGGESTIONS_FIELD)
        .collect();
    if !extra.is_empty() {
        tracing::debug!(fields = ?extra, "Ignoring unexpected reply fields");
    }
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
