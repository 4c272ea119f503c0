//! Transport seam: the wallet capability that signs and sends messages.
//!
//! The gateway never implements signing itself. The host application hands
//! in an implementation of [`Transport`] (usually backed by a browser or
//! desktop wallet) through a [`TransportSlot`], which may be filled, swapped
//! or cleared as the wallet connects and disconnects.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use agentroom_protocol::{RawReply, RemoteTarget, Request, Tag};

use crate::error::TransportError;

/// A request in the shape the wallet signs and sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    pub target: RemoteTarget,
    pub tags: Vec<Tag>,
    pub data: String,
}

impl From<&Request> for SignedMessage {
    fn from(request: &Request) -> Self {
        Self {
            target: request.target().clone(),
            tags: request.wire_tags(),
            data: request.payload().to_string(),
        }
    }
}

impl SignedMessage {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }
}

/// Signing/sending capability supplied by the host application.
pub trait Transport: Send + Sync {
    /// Whether the wallet behind this transport is currently connected.
    fn is_connected(&self) -> bool;

    /// Sign `message`, deliver it to its target and return the raw result.
    fn send_signed<'a>(
        &'a self,
        message: &'a SignedMessage,
    ) -> Pin<Box<dyn Future<Output = Result<RawReply, TransportError>> + Send + 'a>>;
}

/// Shared, swappable holder for the current transport.
#[derive(Clone, Default)]
pub struct TransportSlot {
    inner: Arc<RwLock<Option<Arc<dyn Transport>>>>,
}

impl TransportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let slot = Self::new();
        slot.configure(transport);
        slot
    }

    /// Install (or replace) the transport.
    pub fn configure(&self, transport: Arc<dyn Transport>) {
        let connected = transport.is_connected();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(transport);
        tracing::info!(connected, "Wallet transport configured");
    }

    /// Remove the transport. Returns whether one was installed.
    pub fn clear(&self) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let had = guard.take().is_some();
        if had {
            tracing::info!("Wallet transport cleared");
        }
        had
    }

    pub fn current(&self) -> Option<Arc<dyn Transport>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.current().is_some_and(|t| t.is_connected())
    }
}

impl std::fmt::Debug for TransportSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportSlot")
            .field("configured", &self.current().is_some())
            .finish()
    }
}
