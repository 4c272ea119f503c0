//! Agentroom Protocol - request, reply and payload types
//!
//! Describes the tagged message shape exchanged with chatroom processes:
//! outbound requests carry an `Action` tag plus auxiliary tags and a string
//! payload; inbound replies are untrusted JSON that is normalized into a
//! canonical `{action, data, status}` record.

pub mod constants;
pub mod error;
pub mod normalize;
pub mod payload;
pub mod types;

pub use constants::*;
pub use error::*;
pub use normalize::normalize;
pub use payload::{ChatroomInfo, DataEntry, DataKind};
pub use types::*;
