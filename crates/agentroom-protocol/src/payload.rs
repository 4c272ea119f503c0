//! JSON payloads carried in the `data` field of chatroom replies.
//!
//! Chatroom processes are not strict about numbers: counts and prices
//! arrive as JSON numbers or as numeric strings. Decoding coerces both and
//! falls back to zero instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::RemoteTarget;
use crate::ProtocolError;

/// Chatroom summary answered by `GetInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatroomInfo {
    pub target: RemoteTarget,
    pub access_price: u64,
    pub member_count: u64,
    pub data_count: u64,
    pub token_process: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoWire {
    #[serde(default, deserialize_with = "lenient_u64")]
    access_price: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    member_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    data_count: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    token_process: String,
}

impl ChatroomInfo {
    /// Decode the JSON object held in a `GetInfo` reply's data.
    pub fn from_reply_data(target: RemoteTarget, data: &str) -> Result<Self, ProtocolError> {
        let wire: InfoWire = serde_json::from_value(expect_object(serde_json::from_str(data)?)?)?;
        Ok(Self {
            target,
            access_price: wire.access_price,
            member_count: wire.member_count,
            data_count: wire.data_count,
            token_process: wire.token_process,
        })
    }
}

/// One entry posted to a chatroom, as listed by `ListData`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub data_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sender: String,
    /// Milliseconds since the Unix epoch.
    #[serde(deserialize_with = "lenient_u64")]
    pub timestamp: u64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub content: Option<String>,
}

impl DataEntry {
    /// Decode the JSON array held in a `ListData` reply's data.
    pub fn list_from_reply_data(data: &str) -> Result<Vec<Self>, ProtocolError> {
        let Value::Array(items) = serde_json::from_str::<Value>(data)? else {
            return Err(ProtocolError::UnexpectedShape("array"));
        };
        items
            .into_iter()
            .map(|item| -> Result<Self, ProtocolError> {
                Ok(serde_json::from_value(expect_object(item)?)?)
            })
            .collect()
    }
}

/// Derived struct deserializers also accept sequences; payloads must be objects.
fn expect_object(value: Value) -> Result<Value, ProtocolError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(ProtocolError::UnexpectedShape("object"))
    }
}

/// Data categories the dashboard knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Subgraph,
    Signal,
    Analysis,
    News,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [Self::Subgraph, Self::Signal, Self::Analysis, Self::News];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subgraph => "subgraph",
            Self::Signal => "signal",
            Self::Analysis => "analysis",
            Self::News => "news",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

/// Coerce a JSON number or numeric string to `u64`.
///
/// Negative, fractional, non-finite and non-numeric values yield `None`.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_f64)),
        Value::String(s) => coerce_u64_str(s),
        _ => None,
    }
}

/// Coerce a numeric string, such as a tag value, to `u64`.
pub fn coerce_u64_str(s: &str) -> Option<u64> {
    let s = s.trim();
    s.parse::<u64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(whole_f64))
}

fn whole_f64(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_u64(&value).unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
