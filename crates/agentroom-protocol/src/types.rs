use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_TAG, NO_MESSAGES};
use crate::ProtocolError;

/// Opaque identifier of a remote chatroom or agent process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteTarget(String);

impl RemoteTarget {
    pub fn new(id: impl Into<String>) -> Result<Self, ProtocolError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ProtocolError::EmptyTarget);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RemoteTarget {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteTarget> for String {
    fn from(target: RemoteTarget) -> Self {
        target.0
    }
}

impl std::str::FromStr for RemoteTarget {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A name/value pair attached to a request or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Value")]
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Actions a chatroom process accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    GetInfo,
    ListData,
    JoinRequest,
    PostData,
    CheckMembership,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetInfo => "GetInfo",
            Self::ListData => "ListData",
            Self::JoinRequest => "JoinRequest",
            Self::PostData => "PostData",
            Self::CheckMembership => "CheckMembership",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request to a remote process.
///
/// The `Action` tag is never stored in `tags`; it is derived from `action`
/// when the request is turned into wire tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    target: RemoteTarget,
    action: RequestAction,
    tags: BTreeMap<String, String>,
    payload: String,
}

impl Request {
    pub fn new(target: RemoteTarget, action: RequestAction) -> Self {
        Self {
            target,
            action,
            tags: BTreeMap::new(),
            payload: String::new(),
        }
    }

    /// Add an auxiliary tag. Rejects empty names and the reserved `Action` tag.
    pub fn with_tag(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProtocolError::InvalidTag("tag name must not be empty".into()));
        }
        if name.eq_ignore_ascii_case(ACTION_TAG) {
            return Err(ProtocolError::ReservedTag(name));
        }
        self.tags.insert(name, value.into());
        Ok(self)
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn target(&self) -> &RemoteTarget {
        &self.target
    }

    pub fn action(&self) -> RequestAction {
        self.action
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Tags as sent on the wire: `Action` first, then the auxiliary tags.
    pub fn wire_tags(&self) -> Vec<Tag> {
        std::iter::once(Tag::new(ACTION_TAG, self.action.as_str()))
            .chain(self.tags.iter().map(|(k, v)| Tag::new(k.clone(), v.clone())))
            .collect()
    }
}

/// Unstructured reply returned by a transport. Treated as untrusted input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReply(pub serde_json::Value);

impl RawReply {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for RawReply {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Outcome carried in a reply's `Status` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyStatus {
    Success,
    PaymentRequired,
    Member,
    NotMember,
    Error,
}

impl ReplyStatus {
    /// Parse a wire status. Anything outside the known set is an error.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Success" => Self::Success,
            "PaymentRequired" => Self::PaymentRequired,
            "Member" => Self::Member,
            "NotMember" => Self::NotMember,
            _ => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::PaymentRequired => "PaymentRequired",
            Self::Member => "Member",
            Self::NotMember => "NotMember",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical form of a reply after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReply {
    pub action: String,
    pub data: String,
    pub status: ReplyStatus,
    pub extra_tags: BTreeMap<String, String>,
}

impl NormalizedReply {
    /// Synthetic error reply with a descriptive message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            action: String::new(),
            data: message.into(),
            status: ReplyStatus::Error,
            extra_tags: BTreeMap::new(),
        }
    }

    pub fn no_messages() -> Self {
        Self::error(NO_MESSAGES)
    }

    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }

    pub fn extra_tag(&self, name: &str) -> Option<&str> {
        self.extra_tags.get(name).map(String::as_str)
    }

    /// `data` when non-empty, otherwise the given fallback.
    pub fn data_or(&self, fallback: &str) -> String {
        if self.data.is_empty() {
            fallback.to_string()
        } else {
            self.data.clone()
        }
    }
}
