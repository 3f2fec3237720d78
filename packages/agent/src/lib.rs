//! # Sitecanvas Agent
//!
//! The preview-side half of the editing protocol. Runs inside the previewed
//! document: translates editor commands into DOM effects and DOM events into
//! protocol reports.
//!
//! ## Design
//!
//! - The agent is inert unless the document is embedded in a host frame, so
//!   the previewed site behaves identically to a normal page outside the
//!   editor
//! - Selection is recorded via a dedicated marker attribute, never by
//!   mutating inline styles; visual highlighting is the editor overlay's
//!   job, layered outside the frame
//! - Every applied content update is confirmed with exactly one outbound
//!   `CONTENT_CHANGED` report

mod agent;
mod dom;

pub use agent::{AgentError, AgentHost, ClickOutcome, KeyPress, PreviewAgent};
pub use dom::{DomNode, PreviewDocument};

/// Attribute naming a content block; its value is the block's element id.
pub const BLOCK_ID_ATTR: &str = "data-block-id";
/// Marker set on blocks during the one-time interactive pass.
pub const INTERACTIVE_ATTR: &str = "data-editor-interactive";
/// Marker recording the (single) selected element.
pub const SELECTED_ATTR: &str = "data-editor-selected";
/// Set while a block is in inline-edit mode.
pub const EDITABLE_ATTR: &str = "contenteditable";
