//! The persisted content document.
//!
//! This mirrors what the content persistence API stores on disk: site
//! identity, site-level config, pages of content blocks, and the draft
//! overlay that has been saved but not yet published.
//!
//! Blocks are addressed by an opaque element id of the form
//! `"<pageSlug>.<blockKey>"`; the editor core never parses it back apart.

use crate::value::ContentValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Site identity, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// Site-level configuration toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub brand_color: String,
    pub cta_enabled: bool,
}

/// An image content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Discriminator on the wire; always `"image"`.
    #[serde(rename = "type", default = "image_type")]
    pub block_type: String,
}

fn image_type() -> String {
    "image".to_string()
}

impl ImageBlock {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            srcset: None,
            alt: None,
            block_type: image_type(),
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

/// One content block: plain text or an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockValue {
    Image(ImageBlock),
    Text(String),
}

impl BlockValue {
    /// The scalar the editor works with: the text itself, or the image src.
    pub fn as_content_value(&self) -> ContentValue {
        match self {
            BlockValue::Text(s) => ContentValue::Text(s.clone()),
            BlockValue::Image(img) => ContentValue::Text(img.src.clone()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, BlockValue::Image(_))
    }
}

impl From<&str> for BlockValue {
    fn from(s: &str) -> Self {
        BlockValue::Text(s.to_string())
    }
}

/// The full persisted document for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub site: SiteInfo,
    pub config: SiteConfig,
    /// Published content: page slug → block key → value.
    pub pages: BTreeMap<String, BTreeMap<String, BlockValue>>,
    /// Saved-but-unpublished values, keyed by element id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub drafts: BTreeMap<String, BlockValue>,
    /// Last persisted write per element id, millis since epoch.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub updated_at: BTreeMap<String, i64>,
}

impl SiteContent {
    /// Element id for a block: `"<pageSlug>.<blockKey>"`.
    pub fn element_id(page: &str, block: &str) -> String {
        format!("{}.{}", page, block)
    }

    /// Collapse pages + drafts into per-block records for reconciliation.
    pub fn block_records(&self) -> BTreeMap<String, BlockRecord> {
        let mut records: BTreeMap<String, BlockRecord> = BTreeMap::new();

        for (page, blocks) in &self.pages {
            for (key, value) in blocks {
                let id = Self::element_id(page, key);
                records.entry(id).or_default().published = Some(value.clone());
            }
        }

        for (id, value) in &self.drafts {
            records.entry(id.clone()).or_default().draft = Some(value.clone());
        }

        for (id, record) in records.iter_mut() {
            record.updated_at = self.updated_at.get(id).copied();
        }

        records
    }
}

/// Published/draft staging of one block, the unit reconciliation consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRecord {
    pub published: Option<BlockValue>,
    pub draft: Option<BlockValue>,
    pub updated_at: Option<i64>,
}

/// Classification of a block's staging state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// Only a published value exists.
    Published,
    /// A draft value exists and differs from (or has no) published value.
    Draft,
    /// Neither value exists.
    Empty,
}

impl BlockRecord {
    pub fn status(&self) -> BlockStatus {
        match (&self.published, &self.draft) {
            (None, None) => BlockStatus::Empty,
            (_, Some(draft)) if self.published.as_ref() != Some(draft) => BlockStatus::Draft,
            _ => BlockStatus::Published,
        }
    }
}
