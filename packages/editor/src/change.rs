//! Content changes: the atomic unit of editing.

use serde::{Deserialize, Serialize};
use sitecanvas_common::{now_millis, ChangeKind, ContentValue};

/// Metadata attached to image changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// One atomic edit to a content block.
///
/// Immutable once created: a later edit to the same element supersedes it
/// with a new `ContentChange`, it is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub element_id: String,
    pub kind: ChangeKind,
    pub old_value: ContentValue,
    pub new_value: ContentValue,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageMeta>,
}

impl ContentChange {
    pub fn new(
        element_id: impl Into<String>,
        kind: ChangeKind,
        old_value: ContentValue,
        new_value: ContentValue,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            kind,
            old_value,
            new_value,
            timestamp: now_millis(),
            image: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_image(mut self, image: ImageMeta) -> Self {
        self.image = Some(image);
        self
    }

    /// Superseding copy carrying a different working value. Used when undo
    /// rewrites a draft entry back to the change's old value.
    pub fn superseded_with(&self, new_value: ContentValue) -> Self {
        Self {
            new_value,
            ..self.clone()
        }
    }

    /// Human-readable summary, used for undo/redo labels.
    pub fn describe(&self) -> String {
        match self.kind {
            ChangeKind::Text => format!("Edit text in {}", self.element_id),
            ChangeKind::Image => format!("Replace image in {}", self.element_id),
            ChangeKind::Toggle => format!("Toggle {}", self.element_id),
            ChangeKind::Config => format!("Update setting {}", self.element_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_serialization() {
        let change = ContentChange::new(
            "home.headline",
            ChangeKind::Text,
            ContentValue::Text("Hello".into()),
            ContentValue::Text("World".into()),
        );

        let json = serde_json::to_string(&change).unwrap();
        let back: ContentChange = serde_json::from_str(&json).unwrap();
        assert_eq!(change, back);
    }

    #[test]
    fn test_image_change_carries_meta() {
        let change = ContentChange::new(
            "home.hero",
            ChangeKind::Image,
            ContentValue::Text("/img/old.jpg".into()),
            ContentValue::Text("/img/new.jpg".into()),
        )
        .with_image(ImageMeta {
            asset_id: Some("asset-9".into()),
            optimized_path: Some("/opt/new.webp".into()),
            alt: Some("New hero".into()),
        });

        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["image"]["assetId"], "asset-9");
    }

    #[test]
    fn test_describe() {
        let change = ContentChange::new(
            "home.cta",
            ChangeKind::Toggle,
            ContentValue::Flag(false),
            ContentValue::Flag(true),
        );
        assert_eq!(change.describe(), "Toggle home.cta");
    }
}
