//! The gateway facade handed to UI collaborators.
//!
//! One `ChatroomService` is built at application start and shared by
//! reference (typically inside an `Arc`). The wallet transport is attached
//! and detached explicitly through [`ChatroomService::configure_wallet`] and
//! [`ChatroomService::disconnect_wallet`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use agentroom_protocol::{ChatroomInfo, DataEntry, RemoteTarget};

use crate::api::{ChatroomApi, Outcome};
use crate::config::{Backend, GatewayConfig};
use crate::demo::DemoChatrooms;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::monitor::{Monitor, MonitorSnapshot};
use crate::registry::ChatroomRegistry;
use crate::remote::RemoteChatrooms;
use crate::transport::{Transport, TransportSlot};

/// A registered chatroom together with its current data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatroomListing {
    pub slug: String,
    pub title: Option<String>,
    pub target: RemoteTarget,
    pub info: Option<ChatroomInfo>,
    pub messages: Vec<DataEntry>,
}

pub struct ChatroomService {
    api: Arc<dyn ChatroomApi>,
    registry: ChatroomRegistry,
    monitor: Monitor,
    transport: TransportSlot,
    backend: Backend,
}

impl ChatroomService {
    /// Build the service selected by `config.backend`.
    pub fn from_config(config: &GatewayConfig, transport: TransportSlot) -> Result<Self> {
        config.validate()?;
        let registry = ChatroomRegistry::from_entries(&config.chatrooms)?;
        let api: Arc<dyn ChatroomApi> = match config.backend {
            Backend::Remote => Arc::new(RemoteChatrooms::new(Dispatcher::new(
                transport.clone(),
                config.request_timeout(),
            ))),
            Backend::Demo => Arc::new(DemoChatrooms::new(&config.demo)?),
        };
        tracing::info!(
            backend = ?config.backend,
            chatrooms = registry.len(),
            timeout_ms = config.request_timeout_ms,
            "Chatroom service ready"
        );
        Ok(Self {
            monitor: Monitor::new(Arc::clone(&api), config.poll_interval())?,
            api,
            registry,
            transport,
            backend: config.backend,
        })
    }

    /// Build around an existing [`ChatroomApi`] implementation.
    ///
    /// Fails when `poll_interval` is zero.
    pub fn with_api(
        api: Arc<dyn ChatroomApi>,
        registry: ChatroomRegistry,
        poll_interval: Duration,
        transport: TransportSlot,
    ) -> Result<Self> {
        Ok(Self {
            monitor: Monitor::new(Arc::clone(&api), poll_interval)?,
            api,
            registry,
            transport,
            backend: Backend::Remote,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn api(&self) -> &Arc<dyn ChatroomApi> {
        &self.api
    }

    pub fn registry(&self) -> &ChatroomRegistry {
        &self.registry
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn target_for(&self, slug: &str) -> Option<&RemoteTarget> {
        self.registry.target_for(slug)
    }

    pub fn configure_wallet(&self, transport: Arc<dyn Transport>) {
        if self.backend == Backend::Demo {
            tracing::debug!("Wallet attached while serving demo data; it will not be used");
        }
        self.transport.configure(transport);
    }

    pub fn disconnect_wallet(&self) -> bool {
        self.transport.clear()
    }

    pub fn wallet_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub async fn get_chatroom_info(&self, target: &RemoteTarget) -> Option<ChatroomInfo> {
        self.api.get_chatroom_info(target).await
    }

    pub async fn get_chatroom_data(&self, target: &RemoteTarget) -> Vec<DataEntry> {
        self.api.get_chatroom_data(target).await
    }

    pub async fn join_chatroom(&self, target: &RemoteTarget) -> Outcome<String> {
        self.api.join_chatroom(target).await
    }

    pub async fn post_data(
        &self,
        target: &RemoteTarget,
        payload: &str,
        data_type: &str,
        source: &str,
    ) -> Outcome<String> {
        self.api.post_data(target, payload, data_type, source).await
    }

    pub async fn check_membership(&self, target: &RemoteTarget, agent_id: &str) -> bool {
        self.api.check_membership(target, agent_id).await
    }

    /// Registered chatrooms `agent_id` belongs to, in registry order.
    pub async fn get_joined_chatrooms(&self, agent_id: &str) -> Vec<RemoteTarget> {
        let mut joined = Vec::new();
        for target in self.registry.targets() {
            if self.api.check_membership(target, agent_id).await {
                joined.push(target.clone());
            }
        }
        tracing::debug!(
            agent = agent_id,
            joined = joined.len(),
            checked = self.registry.len(),
            "Resolved joined chatrooms"
        );
        joined
    }

    /// Fetch info and entries for every registered chatroom.
    pub async fn load_listings(&self) -> Vec<ChatroomListing> {
        let mut listings = Vec::with_capacity(self.registry.len());
        for entry in self.registry.entries() {
            let (info, messages) = tokio::join!(
                self.api.get_chatroom_info(&entry.target),
                self.api.get_chatroom_data(&entry.target)
            );
            listings.push(ChatroomListing {
                slug: entry.slug.clone(),
                title: entry.title.clone(),
                target: entry.target.clone(),
                info,
                messages,
            });
        }
        listings
    }

    pub fn start_monitoring<F>(&self, target: RemoteTarget, callback: F)
    where
        F: Fn(MonitorSnapshot) + Send + Sync + 'static,
    {
        self.monitor.start(target, callback);
    }

    pub fn stop_monitoring(&self, target: &RemoteTarget) -> bool {
        self.monitor.stop(target)
    }
}
