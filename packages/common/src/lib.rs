//! # Sitecanvas Common
//!
//! Shared types for the sitecanvas editing engine:
//!
//! - The persisted content document (`SiteContent`) and its block values
//! - The scalar value type carried by edits and messages (`ContentValue`)
//! - The kind tag attached to content changes (`ChangeKind`)
//! - Persistence collaborator traits (`ContentStore`, `AssetStore`)
//! - Id and timestamp helpers

mod content;
mod id;
mod store;
mod value;

pub use content::{
    BlockRecord, BlockStatus, BlockValue, ImageBlock, SiteConfig, SiteContent, SiteInfo,
};
pub use id::{next_message_id, now_millis};
pub use store::{AssetStore, ContentStore, DraftUpdate, PersistenceError};
pub use value::{ChangeKind, ContentValue};
