use std::time::Duration;

use agentroom_protocol::ProtocolError;

/// Errors surfaced by the gateway crate.
///
/// Transport failures never leave the dispatcher as `Err`; they are logged
/// and turned into an error reply. The remaining variants come from
/// configuration and request construction.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("transport timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Failure reported by a [`Transport`](crate::transport::Transport) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
