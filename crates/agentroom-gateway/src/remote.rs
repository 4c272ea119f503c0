//! [`ChatroomApi`] backed by real chatroom processes.

use agentroom_protocol::{ChatroomInfo, DataEntry, RemoteTarget};

use crate::api::{ApiFuture, ChatroomApi, Outcome};
use crate::dispatcher::Dispatcher;
use crate::ops;

/// Chatroom operations sent through a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct RemoteChatrooms {
    dispatcher: Dispatcher,
}

impl RemoteChatrooms {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl ChatroomApi for RemoteChatrooms {
    fn get_chatroom_info<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Option<ChatroomInfo>> {
        Box::pin(async move {
            let reply = self.dispatcher.dispatch(ops::info_request(target)).await;
            ops::decode_info(target, &reply)
        })
    }

    fn get_chatroom_data<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Vec<DataEntry>> {
        Box::pin(async move {
            let reply = self.dispatcher.dispatch(ops::list_request(target)).await;
            ops::decode_data(target, &reply)
        })
    }

    fn join_chatroom<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Outcome<String>> {
        Box::pin(async move {
            let reply = self.dispatcher.dispatch(ops::join_request(target)).await;
            let outcome = ops::decode_join(&reply);
            tracing::info!(
                process = %target,
                success = outcome.is_success(),
                payment_required = outcome.is_payment_required(),
                "Join request answered"
            );
            outcome
        })
    }

    fn post_data<'a>(
        &'a self,
        target: &'a RemoteTarget,
        payload: &'a str,
        data_type: &'a str,
        source: &'a str,
    ) -> ApiFuture<'a, Outcome<String>> {
        Box::pin(async move {
            let data_id = ops::new_data_id();
            let request = match ops::post_request(target, payload, data_type, source, &data_id) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(process = %target, error = %e, "Could not build post request");
                    return Outcome::Failure(format!("Error posting data: {e}"));
                }
            };
            let reply = self.dispatcher.dispatch(request).await;
            ops::decode_post(&reply)
        })
    }

    fn check_membership<'a>(&'a self, target: &'a RemoteTarget, agent_id: &'a str) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            let request = match ops::membership_request(target, agent_id) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(process = %target, error = %e, "Could not build membership request");
                    return false;
                }
            };
            let reply = self.dispatcher.dispatch(request).await;
            ops::decode_membership(&reply)
        })
    }
}
