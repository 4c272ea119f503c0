//! Request dispatch: one signed send per call, raced against a timeout.

use std::time::Duration;

use agentroom_protocol::{normalize, NormalizedReply, RawReply, Request, DEFAULT_REQUEST_TIMEOUT_MS};

use crate::error::GatewayError;
use crate::transport::{SignedMessage, TransportSlot};

/// Sends requests through the configured transport and normalizes replies.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: TransportSlot,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: TransportSlot, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &TransportSlot {
        &self.transport
    }

    /// Send `request` and return its normalized reply.
    ///
    /// Never fails: a missing or disconnected transport, a transport error
    /// and a timeout all come back as an `Error` reply.
    pub async fn dispatch(&self, request: Request) -> NormalizedReply {
        let target = request.target().clone();
        let action = request.action();

        match self.send(&request).await {
            Ok(raw) => {
                let reply = normalize(&raw);
                tracing::debug!(
                    process = %target,
                    action = %action,
                    status = %reply.status,
                    "Reply received"
                );
                reply
            }
            Err(e) => {
                tracing::warn!(process = %target, action = %action, error = %e, "Dispatch failed");
                NormalizedReply::error(e.to_string())
            }
        }
    }

    async fn send(&self, request: &Request) -> Result<RawReply, GatewayError> {
        let transport = self
            .transport
            .current()
            .ok_or_else(|| GatewayError::TransportUnavailable("wallet not connected".into()))?;
        if !transport.is_connected() {
            return Err(GatewayError::TransportUnavailable(
                "wallet reports disconnected".into(),
            ));
        }

        let message = SignedMessage::from(request);
        tracing::debug!(
            process = %message.target,
            action = %request.action(),
            tags = message.tags.len(),
            payload_bytes = message.data.len(),
            "Sending signed message"
        );

        match tokio::time::timeout(self.timeout, transport.send_signed(&message)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(GatewayError::Timeout(self.timeout)),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(
            TransportSlot::new(),
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }
}
