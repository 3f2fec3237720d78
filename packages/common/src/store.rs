//! Persistence collaborator traits.
//!
//! The editor core does not own storage; it talks to these contracts.
//! Concrete implementations (HTTP API clients, file stores) live outside
//! this workspace. Tests provide in-memory fakes.

use crate::content::SiteContent;
use crate::value::{ChangeKind, ContentValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A draft value being written back to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    pub element_id: String,
    pub kind: ChangeKind,
    pub value: ContentValue,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("site not found: {0}")]
    SiteNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Content persistence API: load, save drafts, publish.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load the full persisted document for a site.
    async fn load(&self, site_id: &str) -> Result<SiteContent, PersistenceError>;

    /// Save draft values. Partial: only the given updates are written.
    async fn save(&self, site_id: &str, updates: &[DraftUpdate]) -> Result<(), PersistenceError>;

    /// Promote the given changes to published.
    async fn publish(&self, site_id: &str, changes: &[DraftUpdate])
        -> Result<(), PersistenceError>;
}

/// Asset upload API: accepts file bytes, returns a stable public path.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, name: &str) -> Result<String, PersistenceError>;
}
