//! # Sitecanvas Protocol
//!
//! The typed message contract between the editor and the previewed frame.
//!
//! Two disjoint families flow in opposite directions:
//!
//! - [`EditorMessage`]: commands from the editor to the preview
//! - [`PreviewMessage`]: reports from the preview back to the editor
//!
//! Every message travels inside an [`Envelope`] carrying a locally unique
//! `messageId` and a `timestamp`. The protocol is fire-and-forget: there is
//! no request/response correlation, the id exists for traceability.
//!
//! Receivers must tolerate garbage: [`decode`] returns `None` for anything
//! structurally malformed or of unknown type, and never errors.

mod envelope;
mod messages;

pub use envelope::{decode, Envelope};
pub use messages::{
    DescriptorAttributes, EditorMessage, EditorMessageKind, ElementDescriptor, PreviewMessage,
    PreviewMessageKind, Rect,
};
