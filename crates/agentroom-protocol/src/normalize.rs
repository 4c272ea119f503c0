//! Reply normalization.
//!
//! A chatroom process answers with a loosely structured JSON document that
//! holds zero or more messages, each with its own tags and payload. The
//! normalizer picks the message that answers the request and flattens it
//! into a [`NormalizedReply`]. It never fails: anything it cannot interpret
//! becomes an `Error` reply describing why.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::{ACTION_TAG, RESPONSE_ACTIONS, STATUS_TAG};
use crate::types::{NormalizedReply, RawReply, ReplyStatus};

#[derive(Debug, Deserialize)]
struct WireTag {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Value", default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(rename = "Tags", alias = "tags", default)]
    tags: Vec<WireTag>,
    #[serde(rename = "Data", alias = "data", default)]
    data: Value,
}

impl WireMessage {
    fn tag(&self, name: &str) -> Option<String> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.name == name)
            .map(|t| value_text(&t.value))
    }
}

/// Normalize a raw reply. Total: never panics, never errors.
pub fn normalize(raw: &RawReply) -> NormalizedReply {
    match try_normalize(raw.value()) {
        Ok(reply) => reply,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Reply could not be interpreted");
            NormalizedReply::error(format!("parse failure: {reason}"))
        }
    }
}

fn try_normalize(value: &Value) -> Result<NormalizedReply, String> {
    let messages = locate_messages(value)?;
    if messages.is_empty() {
        return Ok(NormalizedReply::no_messages());
    }

    let decoded = messages
        .iter()
        .map(WireMessage::deserialize)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let selected = decoded
        .iter()
        .find(|m| {
            m.tag(ACTION_TAG)
                .is_some_and(|action| RESPONSE_ACTIONS.contains(&action.as_str()))
        })
        .or_else(|| decoded.last())
        .ok_or_else(|| "message list vanished".to_string())?;

    let status = selected
        .tag(STATUS_TAG)
        .map(|s| ReplyStatus::parse(&s))
        .unwrap_or(ReplyStatus::Success);

    let mut extra_tags = BTreeMap::new();
    for tag in &selected.tags {
        if tag.name != ACTION_TAG && tag.name != STATUS_TAG {
            extra_tags.insert(tag.name.clone(), value_text(&tag.value));
        }
    }

    Ok(NormalizedReply {
        action: selected.tag(ACTION_TAG).unwrap_or_default(),
        data: value_text(&selected.data),
        status,
        extra_tags,
    })
}

/// Messages live at `Messages` or, for wrapped results, `result.Messages`.
/// The first non-empty list wins.
fn locate_messages(value: &Value) -> Result<&[Value], String> {
    let primary = message_list(value)?;
    if !primary.is_empty() {
        return Ok(primary);
    }
    match value.get("result").or_else(|| value.get("Result")) {
        Some(nested) => message_list(nested),
        None => Ok(&[]),
    }
}

fn message_list(value: &Value) -> Result<&[Value], String> {
    match value.get("Messages").or_else(|| value.get("messages")) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(format!("Messages is {}, expected an array", kind(other))),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
