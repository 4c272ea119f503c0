//! Pure mappings between typed domain calls and the request/reply shape.
//!
//! Builders turn domain inputs into a [`Request`]; decoders turn a
//! [`NormalizedReply`] into the typed result. Neither side does I/O.

use rand::Rng;

use agentroom_protocol::payload::coerce_u64_str;
use agentroom_protocol::{
    ChatroomInfo, DataEntry, NormalizedReply, ProtocolError, RemoteTarget, ReplyStatus, Request,
    RequestAction, AGENT_ID_TAG, AMOUNT_TAG, DATA_ID_TAG, DATA_TYPE_TAG, SOURCE_TAG,
    TOKEN_PROCESS_TAG,
};

use crate::api::{Outcome, PaymentDemand};

const JOINED: &str = "Successfully joined chatroom";
const JOIN_PAYMENT: &str = "Payment required to join";
const JOIN_FAILED: &str = "Failed to join chatroom";
const POSTED: &str = "Data posted successfully";
const POST_FAILED: &str = "Failed to post data";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn info_request(target: &RemoteTarget) -> Request {
    Request::new(target.clone(), RequestAction::GetInfo)
}

pub fn list_request(target: &RemoteTarget) -> Request {
    Request::new(target.clone(), RequestAction::ListData)
}

pub fn join_request(target: &RemoteTarget) -> Request {
    Request::new(target.clone(), RequestAction::JoinRequest)
}

pub fn post_request(
    target: &RemoteTarget,
    payload: &str,
    data_type: &str,
    source: &str,
    data_id: &str,
) -> Result<Request, ProtocolError> {
    Ok(Request::new(target.clone(), RequestAction::PostData)
        .with_tag(DATA_ID_TAG, data_id)?
        .with_tag(DATA_TYPE_TAG, data_type)?
        .with_tag(SOURCE_TAG, source)?
        .with_payload(payload))
}

pub fn membership_request(target: &RemoteTarget, agent_id: &str) -> Result<Request, ProtocolError> {
    Request::new(target.clone(), RequestAction::CheckMembership).with_tag(AGENT_ID_TAG, agent_id)
}

/// Fresh id for a posted entry: `data_<epoch-ms>_<8 base36 chars>`.
pub fn new_data_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("data_{}_{suffix}", chrono::Utc::now().timestamp_millis())
}

pub fn decode_info(target: &RemoteTarget, reply: &NormalizedReply) -> Option<ChatroomInfo> {
    if reply.status != ReplyStatus::Success || reply.data.is_empty() {
        tracing::debug!(process = %target, status = %reply.status, data = %reply.data, "No chatroom info");
        return None;
    }
    match ChatroomInfo::from_reply_data(target.clone(), &reply.data) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(process = %target, error = %e, "Malformed chatroom info");
            None
        }
    }
}

pub fn decode_data(target: &RemoteTarget, reply: &NormalizedReply) -> Vec<DataEntry> {
    if reply.status != ReplyStatus::Success || reply.data.is_empty() {
        tracing::debug!(process = %target, status = %reply.status, "No chatroom data");
        return Vec::new();
    }
    DataEntry::list_from_reply_data(&reply.data).unwrap_or_else(|e| {
        tracing::warn!(process = %target, error = %e, "Malformed chatroom data list");
        Vec::new()
    })
}

pub fn decode_join(reply: &NormalizedReply) -> Outcome<String> {
    match reply.status {
        ReplyStatus::Success => Outcome::Success(reply.data_or(JOINED)),
        ReplyStatus::PaymentRequired => Outcome::PaymentRequired(PaymentDemand {
            message: reply.data_or(JOIN_PAYMENT),
            amount: reply.extra_tag(AMOUNT_TAG).and_then(coerce_u64_str),
            token_process: reply.extra_tag(TOKEN_PROCESS_TAG).map(str::to_string),
        }),
        _ => Outcome::Failure(reply.data_or(JOIN_FAILED)),
    }
}

pub fn decode_post(reply: &NormalizedReply) -> Outcome<String> {
    match reply.status {
        ReplyStatus::Success => Outcome::Success(reply.data_or(POSTED)),
        _ => Outcome::Failure(reply.data_or(POST_FAILED)),
    }
}

/// `Member` and `Success` both count as membership; anything else does not.
pub fn decode_membership(reply: &NormalizedReply) -> bool {
    matches!(reply.status, ReplyStatus::Member | ReplyStatus::Success)
}
