//! Agentroom Gateway - remote chatroom process gateway
//!
//! Sends tagged requests to chatroom processes through a wallet-supplied
//! transport, normalizes whatever comes back, and exposes typed chatroom
//! operations plus periodic monitoring to UI collaborators.

pub mod api;
pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod ops;
pub mod registry;
pub mod remote;
pub mod service;
pub mod transport;

pub use api::{ApiFuture, ChatroomApi, Outcome, PaymentDemand};
pub use config::{Backend, ChatroomEntry, DemoConfig, GatewayConfig};
pub use demo::DemoChatrooms;
pub use dispatcher::Dispatcher;
pub use error::{GatewayError, Result, TransportError};
pub use monitor::{Monitor, MonitorSnapshot, SnapshotCallback};
pub use registry::{ChatroomRegistry, RegisteredChatroom};
pub use remote::RemoteChatrooms;
pub use service::{ChatroomListing, ChatroomService};
pub use transport::{SignedMessage, Transport, TransportSlot};

pub use agentroom_protocol;
