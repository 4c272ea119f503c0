//! Gateway configuration, loaded from TOML.
//!
//! ```toml
//! backend = "remote"
//! request_timeout_ms = 5000
//! poll_interval_secs = 30
//!
//! [[chatrooms]]
//! slug = "trading-alpha"
//! target = "vyd3NOTV75D3ZEJ1bEpmbAKDuZ56GwnfeTsesK2uUtY"
//! title = "Trading Alpha"
//!
//! [demo]
//! featured_target = "vyd3NOTV75D3ZEJ1bEpmbAKDuZ56GwnfeTsesK2uUtY"
//! featured_member = "4MNslKqJBo3d3t4PjKc2YGPjx_PXugfZyVGHaGAJA8o"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use agentroom_protocol::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_MS};

use crate::error::{GatewayError, Result};

/// Which implementation serves chatroom operations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Real chatroom processes through the wallet transport.
    #[default]
    Remote,
    /// Local fixtures; no transport involved.
    Demo,
}

/// One row of the slug → process lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatroomEntry {
    pub slug: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Fixtures used by the demo backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Chatroom answered with stable data instead of random values.
    pub featured_target: Option<String>,
    /// Agent reported as a member of the featured chatroom.
    pub featured_member: Option<String>,
    /// Token process quoted in info and payment replies.
    pub token_process: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            featured_target: None,
            featured_member: None,
            token_process: "hvM1eUc1_cGPlpguN55VqM9W7tWoakvYyhNrdWd5V50".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub backend: Backend,
    /// Upper bound on a single transport call.
    pub request_timeout_ms: u64,
    /// Period between monitor ticks.
    pub poll_interval_secs: u64,
    pub chatrooms: Vec<ChatroomEntry>,
    pub demo: DemoConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            chatrooms: Vec::new(),
            demo: DemoConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), chatrooms = config.chatrooms.len(), "Loaded gateway config");
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(GatewayError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No gateway config, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// `<config dir>/agentroom/gateway.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agentroom").join("gateway.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(GatewayError::Config("request_timeout_ms must be positive".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(GatewayError::Config("poll_interval_secs must be positive".into()));
        }

        let mut slugs = HashSet::new();
        let mut targets = HashSet::new();
        for entry in &self.chatrooms {
            if entry.slug.trim().is_empty() {
                return Err(GatewayError::Config("chatroom slug must not be empty".into()));
            }
            if entry.target.trim().is_empty() {
                return Err(GatewayError::Config(format!(
                    "chatroom '{}' has an empty target",
                    entry.slug
                )));
            }
            if !slugs.insert(entry.slug.as_str()) {
                return Err(GatewayError::Config(format!("duplicate chatroom slug '{}'", entry.slug)));
            }
            if !targets.insert(entry.target.as_str()) {
                return Err(GatewayError::Config(format!(
                    "target '{}' listed under more than one slug",
                    entry.target
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
