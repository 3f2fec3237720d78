//! Message families and the shapes they carry.

use serde::{Deserialize, Serialize};
use sitecanvas_common::{ChangeKind, ContentValue};
use std::collections::HashMap;

/// An element's bounding box in the previewed document's own coordinate
/// space. The editor translates this by the frame offset; the agent has no
/// knowledge of how the frame is positioned in the host page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The fixed attribute set reported for a selected element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl DescriptorAttributes {
    /// Pick the fixed set out of a raw attribute map.
    pub fn from_map(attributes: &HashMap<String, String>) -> Self {
        Self {
            id: attributes.get("id").cloned(),
            kind: attributes.get("type").cloned(),
            page: attributes.get("data-page").cloned(),
            src: attributes.get("src").cloned(),
            alt: attributes.get("alt").cloned(),
        }
    }
}

/// Snapshot of a selected element, produced by the preview-side agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub element_id: String,
    pub tag: String,
    pub text: String,
    pub attributes: DescriptorAttributes,
    pub rect: Rect,
}

/// Editor → preview commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum EditorMessage {
    /// The editor is attached; carries site identity.
    EditorReady { site_id: String },

    /// Apply a new value to a content block, unconditionally.
    UpdateContent {
        element_id: String,
        content: ContentValue,
    },

    /// Select an element by selector string.
    SelectElement { selector: String },

    /// Make the target block directly editable in place.
    EnterEditMode { element_id: String },

    /// Force-commit any element currently in inline-edit state.
    ExitEditMode { element_id: String },
}

/// Preview → editor reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PreviewMessage {
    /// The agent has attached and is ready to receive commands.
    IframeReady,

    /// Result of a `SELECT_ELEMENT` command.
    ElementSelected(ElementDescriptor),

    /// A user click landed on a content block.
    ElementClicked(ElementDescriptor),

    /// A content block's value changed inside the frame.
    ContentChanged {
        element_id: String,
        content: ContentValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<ContentValue>,
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<ChangeKind>,
    },

    ElementDeselected,

    Error { message: String },
}

/// Discriminant of [`EditorMessage`], used to key handler registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorMessageKind {
    EditorReady,
    UpdateContent,
    SelectElement,
    EnterEditMode,
    ExitEditMode,
}

impl EditorMessage {
    pub fn kind(&self) -> EditorMessageKind {
        match self {
            EditorMessage::EditorReady { .. } => EditorMessageKind::EditorReady,
            EditorMessage::UpdateContent { .. } => EditorMessageKind::UpdateContent,
            EditorMessage::SelectElement { .. } => EditorMessageKind::SelectElement,
            EditorMessage::EnterEditMode { .. } => EditorMessageKind::EnterEditMode,
            EditorMessage::ExitEditMode { .. } => EditorMessageKind::ExitEditMode,
        }
    }
}

/// Discriminant of [`PreviewMessage`], used to key handler registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewMessageKind {
    IframeReady,
    ElementSelected,
    ElementClicked,
    ContentChanged,
    ElementDeselected,
    Error,
}

impl PreviewMessage {
    pub fn kind(&self) -> PreviewMessageKind {
        match self {
            PreviewMessage::IframeReady => PreviewMessageKind::IframeReady,
            PreviewMessage::ElementSelected(_) => PreviewMessageKind::ElementSelected,
            PreviewMessage::ElementClicked(_) => PreviewMessageKind::ElementClicked,
            PreviewMessage::ContentChanged { .. } => PreviewMessageKind::ContentChanged,
            PreviewMessage::ElementDeselected => PreviewMessageKind::ElementDeselected,
            PreviewMessage::Error { .. } => PreviewMessageKind::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_message_wire_names() {
        let msg = EditorMessage::UpdateContent {
            element_id: "home.headline".into(),
            content: ContentValue::Text("Hi".into()),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "UPDATE_CONTENT");
        assert_eq!(value["payload"]["elementId"], "home.headline");
        assert_eq!(value["payload"]["content"], "Hi");
    }

    #[test]
    fn test_preview_message_wire_names() {
        let msg = PreviewMessage::ContentChanged {
            element_id: "home.headline".into(),
            content: ContentValue::Text("New".into()),
            previous: Some(ContentValue::Text("Old".into())),
            kind: Some(ChangeKind::Text),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "CONTENT_CHANGED");
        assert_eq!(value["payload"]["previous"], "Old");
        assert_eq!(value["payload"]["kind"], "text");
    }

    #[test]
    fn test_unit_variant_round_trip() {
        let msg = PreviewMessage::IframeReady;
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "IFRAME_READY");
        let back: PreviewMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_descriptor_attributes_from_map() {
        let mut raw = HashMap::new();
        raw.insert("id".to_string(), "headline".to_string());
        raw.insert("src".to_string(), "/img/a.png".to_string());
        raw.insert("class".to_string(), "ignored".to_string());

        let attrs = DescriptorAttributes::from_map(&raw);
        assert_eq!(attrs.id.as_deref(), Some("headline"));
        assert_eq!(attrs.src.as_deref(), Some("/img/a.png"));
        assert_eq!(attrs.page, None);
    }
}
