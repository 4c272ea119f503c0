//! Known chatrooms: the slug → process lookup table.

use agentroom_protocol::RemoteTarget;

use crate::config::ChatroomEntry;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredChatroom {
    pub slug: String,
    pub title: Option<String>,
    pub target: RemoteTarget,
}

/// Ordered table of chatrooms the dashboard knows about.
#[derive(Debug, Clone, Default)]
pub struct ChatroomRegistry {
    entries: Vec<RegisteredChatroom>,
}

impl ChatroomRegistry {
    pub fn from_entries(entries: &[ChatroomEntry]) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|e| -> Result<RegisteredChatroom> {
                Ok(RegisteredChatroom {
                    slug: e.slug.clone(),
                    title: e.title.clone(),
                    target: RemoteTarget::new(e.target.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn target_for(&self, slug: &str) -> Option<&RemoteTarget> {
        self.entries.iter().find(|e| e.slug == slug).map(|e| &e.target)
    }

    pub fn slug_for(&self, target: &RemoteTarget) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.target == target)
            .map(|e| e.slug.as_str())
    }

    /// Resolve a slug, or treat the input as a raw process id.
    pub fn resolve(&self, slug_or_target: &str) -> Result<RemoteTarget> {
        match self.target_for(slug_or_target) {
            Some(target) => Ok(target.clone()),
            None => Ok(RemoteTarget::new(slug_or_target)?),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &RemoteTarget> {
        self.entries.iter().map(|e| &e.target)
    }

    pub fn entries(&self) -> &[RegisteredChatroom] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
