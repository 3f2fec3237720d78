//! Command handling and event reporting.

use crate::dom::{DomNode, PreviewDocument};
use crate::{EDITABLE_ATTR, INTERACTIVE_ATTR, SELECTED_ATTR};
use sitecanvas_common::{ChangeKind, ContentValue};
use sitecanvas_protocol::{
    DescriptorAttributes, EditorMessage, ElementDescriptor, Envelope, PreviewMessage,
};
use thiserror::Error;
use tracing::debug;

/// Outbound transport back to the editor.
pub trait AgentHost: Send {
    fn post(&self, message: Envelope<PreviewMessage>);
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("content block not found: {0}")]
    BlockNotFound(String),

    #[error("no content block matches selector: {0}")]
    SelectorUnmatched(String),

    #[error("invalid value for {element_id}: expected {expected}")]
    InvalidValue {
        element_id: String,
        expected: &'static str,
    },
}

/// What the click handler decided about the event's default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default click/navigation must be suppressed.
    Suppress,
    /// Let the page handle the click normally.
    Default,
}

/// A key event as seen inside an inline-edit block.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    pub key: String,
    /// A modifier requesting a literal newline instead of a commit.
    pub newline_modifier: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: "Enter".into(),
            newline_modifier: false,
        }
    }

    pub fn enter_with_modifier() -> Self {
        Self {
            key: "Enter".into(),
            newline_modifier: true,
        }
    }
}

struct InlineEdit {
    element_id: String,
    original_text: String,
}

/// The preview-side agent: one per previewed document.
pub struct PreviewAgent {
    document: PreviewDocument,
    host: Box<dyn AgentHost>,
    /// False when the document is not embedded; every entry point no-ops.
    active: bool,
    marked_interactive: bool,
    selected: Option<String>,
    editing: Option<InlineEdit>,
}

impl PreviewAgent {
    /// Attach to a document.
    ///
    /// If the document is not embedded the agent stays fully inactive and
    /// announces nothing. If embedded, announces `IFRAME_READY`.
    pub fn attach(document: PreviewDocument, host: Box<dyn AgentHost>) -> Self {
        let active = document.embedded;
        let agent = Self {
            document,
            host,
            active,
            marked_interactive: false,
            selected: None,
            editing: None,
        };
        if agent.active {
            agent.post(PreviewMessage::IframeReady);
        } else {
            debug!("document not embedded; agent inactive");
        }
        agent
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn document(&self) -> &PreviewDocument {
        &self.document
    }

    /// The host calls this when element rects change (resize, reflow).
    pub fn replace_rects(&mut self, mut update: impl FnMut(&mut DomNode)) {
        if !self.active {
            return;
        }
        self.document.for_each_block_mut(&mut update);
    }

    /// Handle one inbound editor command.
    pub fn handle_message(&mut self, envelope: Envelope<EditorMessage>) {
        if !self.active {
            return;
        }

        let result = match envelope.message {
            EditorMessage::EditorReady { .. } => {
                self.mark_interactive();
                Ok(())
            }
            EditorMessage::UpdateContent {
                element_id,
                content,
            } => self.apply_update(&element_id, &content),
            EditorMessage::SelectElement { selector } => self.select_by_selector(&selector),
            EditorMessage::EnterEditMode { element_id } => self.enter_edit_mode(&element_id),
            EditorMessage::ExitEditMode { .. } => {
                self.commit_edit();
                Ok(())
            }
        };

        if let Err(err) = result {
            self.post(PreviewMessage::Error {
                message: err.to_string(),
            });
        }
    }

    /// One-time pass marking every content block as interactive, triggered
    /// by the first `EDITOR_READY`.
    fn mark_interactive(&mut self) {
        if self.marked_interactive {
            return;
        }
        self.document
            .for_each_block_mut(|node| node.set_attr(INTERACTIVE_ATTR, "true"));
        self.marked_interactive = true;
    }

    fn apply_update(
        &mut self,
        element_id: &str,
        content: &ContentValue,
    ) -> Result<(), AgentError> {
        let node = self
            .document
            .find_block_mut(element_id)
            .ok_or_else(|| AgentError::BlockNotFound(element_id.to_string()))?;

        let (previous, kind) = if node.tag() == Some("img") {
            let src = content
                .as_text()
                .ok_or_else(|| AgentError::InvalidValue {
                    element_id: element_id.to_string(),
                    expected: "image source string",
                })?;
            let previous = node.attr("src").unwrap_or_default().to_string();
            node.set_attr("src", src);
            (previous, ChangeKind::Image)
        } else {
            let previous = node.text_content();
            node.set_text_content(content.to_string());
            (previous, ChangeKind::Text)
        };

        self.post(PreviewMessage::ContentChanged {
            element_id: element_id.to_string(),
            content: content.clone(),
            previous: Some(ContentValue::Text(previous)),
            kind: Some(kind),
        });
        Ok(())
    }

    fn select_by_selector(&mut self, selector: &str) -> Result<(), AgentError> {
        let element_id = self
            .document
            .resolve_selector(selector)
            .ok_or_else(|| AgentError::SelectorUnmatched(selector.to_string()))?;
        let descriptor = self.mark_selected(&element_id)?;
        self.post(PreviewMessage::ElementSelected(descriptor));
        Ok(())
    }

    /// A click somewhere in the previewed document.
    ///
    /// `target` is the block id the click landed on, or `None` for a
    /// background area. Clicking an interactive block selects it and
    /// suppresses the default behavior; a background click deselects.
    pub fn handle_click(&mut self, target: Option<&str>) -> ClickOutcome {
        if !self.active {
            return ClickOutcome::Default;
        }

        let Some(element_id) = target else {
            self.deselect();
            return ClickOutcome::Default;
        };

        let is_interactive = self
            .document
            .find_block(element_id)
            .map(|node| node.attr(INTERACTIVE_ATTR).is_some())
            .unwrap_or(false);
        if !is_interactive {
            self.deselect();
            return ClickOutcome::Default;
        }

        match self.mark_selected(element_id) {
            Ok(descriptor) => {
                self.post(PreviewMessage::ElementClicked(descriptor));
                ClickOutcome::Suppress
            }
            Err(err) => {
                self.post(PreviewMessage::Error {
                    message: err.to_string(),
                });
                ClickOutcome::Default
            }
        }
    }

    /// Swap the selection marker: clear the previous element's first, then
    /// mark the new one. At no point are two elements marked.
    fn mark_selected(&mut self, element_id: &str) -> Result<ElementDescriptor, AgentError> {
        if let Some(previous) = self.selected.take() {
            if let Some(node) = self.document.find_block_mut(&previous) {
                node.remove_attr(SELECTED_ATTR);
            }
        }

        let node = self
            .document
            .find_block_mut(element_id)
            .ok_or_else(|| AgentError::BlockNotFound(element_id.to_string()))?;
        node.set_attr(SELECTED_ATTR, "true");
        let descriptor = describe(node, element_id);
        self.selected = Some(element_id.to_string());
        Ok(descriptor)
    }

    fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(node) = self.document.find_block_mut(&previous) {
                node.remove_attr(SELECTED_ATTR);
            }
            self.post(PreviewMessage::ElementDeselected);
        }
    }

    fn enter_edit_mode(&mut self, element_id: &str) -> Result<(), AgentError> {
        // A previous edit in another block commits first.
        let other_block_editing = self
            .editing
            .as_ref()
            .is_some_and(|e| e.element_id != element_id);
        if other_block_editing {
            self.commit_edit();
        }

        let node = self
            .document
            .find_block_mut(element_id)
            .ok_or_else(|| AgentError::BlockNotFound(element_id.to_string()))?;
        node.set_attr(EDITABLE_ATTR, "true");
        let original_text = node.text_content();
        // Focus and select-all are browser affordances; the agent only
        // tracks the pre-edit text it needs for the commit report.
        self.editing = Some(InlineEdit {
            element_id: element_id.to_string(),
            original_text,
        });
        Ok(())
    }

    /// Typing inside the block currently in inline-edit mode.
    pub fn input_text(&mut self, text: &str) {
        if !self.active {
            return;
        }
        let Some(editing) = &self.editing else {
            return;
        };
        let element_id = editing.element_id.clone();
        if let Some(node) = self.document.find_block_mut(&element_id) {
            node.set_text_content(text);
        }
    }

    /// A key press inside the inline-edit block. Returns the outcome for the
    /// event's default behavior: Enter without a newline modifier commits
    /// and must be suppressed.
    pub fn handle_key(&mut self, key: KeyPress) -> ClickOutcome {
        if !self.active || self.editing.is_none() {
            return ClickOutcome::Default;
        }
        if key.key == "Enter" && !key.newline_modifier {
            self.commit_edit();
            return ClickOutcome::Suppress;
        }
        ClickOutcome::Default
    }

    /// The inline-edit block lost focus.
    pub fn handle_blur(&mut self) {
        if !self.active {
            return;
        }
        self.commit_edit();
    }

    /// Commit any in-flight inline edit: drop the editable affordance and
    /// report the final text.
    fn commit_edit(&mut self) {
        let Some(editing) = self.editing.take() else {
            return;
        };
        let Some(node) = self.document.find_block_mut(&editing.element_id) else {
            return;
        };
        node.remove_attr(EDITABLE_ATTR);
        let text = node.text_content();
        self.post(PreviewMessage::ContentChanged {
            element_id: editing.element_id,
            content: ContentValue::Text(text),
            previous: Some(ContentValue::Text(editing.original_text)),
            kind: Some(ChangeKind::Text),
        });
    }

    fn post(&self, message: PreviewMessage) {
        self.host.post(Envelope::new(message));
    }
}

fn describe(node: &DomNode, element_id: &str) -> ElementDescriptor {
    let attributes = node
        .attributes()
        .map(DescriptorAttributes::from_map)
        .unwrap_or_default();
    ElementDescriptor {
        element_id: element_id.to_string(),
        tag: node.tag().unwrap_or_default().to_string(),
        text: node.text_content(),
        attributes,
        rect: node.rect(),
    }
}
