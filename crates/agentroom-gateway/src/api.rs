//! The chatroom operations interface and its result types.
//!
//! Two implementations exist: [`RemoteChatrooms`](crate::remote::RemoteChatrooms)
//! talks to real chatroom processes through the dispatcher, and
//! [`DemoChatrooms`](crate::demo::DemoChatrooms) serves fixtures for
//! development. Callers hold an `Arc<dyn ChatroomApi>` and cannot tell them
//! apart.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use agentroom_protocol::{ChatroomInfo, DataEntry, RemoteTarget};

/// Boxed future returned by [`ChatroomApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a chatroom asks for before admitting a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDemand {
    pub message: String,
    pub amount: Option<u64>,
    pub token_process: Option<String>,
}

/// Result of a state-changing chatroom operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success(T),
    PaymentRequired(PaymentDemand),
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_payment_required(&self) -> bool {
        matches!(self, Self::PaymentRequired(_))
    }

    pub fn payment(&self) -> Option<&PaymentDemand> {
        match self {
            Self::PaymentRequired(demand) => Some(demand),
            _ => None,
        }
    }
}

impl Outcome<String> {
    /// The human-readable message to show, whatever the outcome.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
            Self::PaymentRequired(demand) => &demand.message,
        }
    }
}

/// Typed chatroom operations.
///
/// Every method is infallible from the caller's point of view: failures are
/// folded into `None`, empty lists, `false` or [`Outcome::Failure`].
pub trait ChatroomApi: Send + Sync {
    /// Summary of a chatroom, or `None` when it could not be fetched.
    fn get_chatroom_info<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Option<ChatroomInfo>>;

    /// Entries posted to a chatroom, in the order the process lists them.
    fn get_chatroom_data<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Vec<DataEntry>>;

    /// Ask to join. A paid chatroom answers with [`Outcome::PaymentRequired`].
    fn join_chatroom<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Outcome<String>>;

    /// Post a payload tagged with its data type and source.
    fn post_data<'a>(
        &'a self,
        target: &'a RemoteTarget,
        payload: &'a str,
        data_type: &'a str,
        source: &'a str,
    ) -> ApiFuture<'a, Outcome<String>>;

    /// Whether `agent_id` is a member. Fails closed.
    fn check_membership<'a>(&'a self, target: &'a RemoteTarget, agent_id: &'a str) -> ApiFuture<'a, bool>;
}
