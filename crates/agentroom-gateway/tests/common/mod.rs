//! Shared fakes for gateway integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use agentroom_gateway::agentroom_protocol::{RawReply, RemoteTarget};
use agentroom_gateway::{SignedMessage, Transport, TransportError};
use serde_json::json;

type Handler = dyn Fn(&SignedMessage) -> Result<RawReply, TransportError> + Send + Sync;

/// Transport that answers from a closure and records what it was sent.
pub struct ScriptedTransport {
    connected: AtomicBool,
    hang: bool,
    handler: Box<Handler>,
    sent: Mutex<Vec<SignedMessage>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&SignedMessage) -> Result<RawReply, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            hang: false,
            handler: Box::new(handler),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// A transport whose sends never complete.
    pub fn hung() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            hang: true,
            handler: Box::new(|_| Ok(RawReply::default())),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SignedMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send_signed<'a>(
        &'a self,
        message: &'a SignedMessage,
    ) -> Pin<Box<dyn Future<Output = Result<RawReply, TransportError>> + Send + 'a>> {
        self.sent.lock().unwrap().push(message.clone());
        let result = (self.handler)(message);
        let hang = self.hang;
        Box::pin(async move {
            if hang {
                std::future::pending::<()>().await;
            }
            result
        })
    }
}

/// Single-message reply in the process wire shape.
pub fn reply(action: &str, status: Option<&str>, data: &str, extra: &[(&str, &str)]) -> RawReply {
    let mut tags = vec![json!({ "name": "Action", "value": action })];
    if let Some(status) = status {
        tags.push(json!({ "name": "Status", "value": status }));
    }
    for (name, value) in extra {
        tags.push(json!({ "name": name, "value": value }));
    }
    RawReply::new(json!({ "Messages": [{ "Tags": tags, "Data": data }] }))
}

pub fn target(id: &str) -> RemoteTarget {
    RemoteTarget::new(id).unwrap()
}
