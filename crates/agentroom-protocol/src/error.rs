/// Errors raised while building protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("remote target must not be empty")]
    EmptyTarget,

    #[error("tag '{0}' is reserved and set by the dispatcher")]
    ReservedTag(String),

    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("expected a JSON {0}")]
    UnexpectedShape(&'static str),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
