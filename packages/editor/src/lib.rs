//! # Sitecanvas Editor
//!
//! The editor-side state engine: change history with undo/redo, draft vs
//! published staging, and the session layer that ties the store to the
//! frame bridge and to persistence.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ bridge: commands to / reports from preview  │
//! └─────────────────────────────────────────────┘
//!                     ↕
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorStore + EditorSession         │
//! │  - Record every change as an undoable unit  │
//! │  - Track original/published/draft values    │
//! │  - Undo/redo with outward propagation       │
//! │  - Save drafts / publish / reconcile        │
//! └─────────────────────────────────────────────┘
//!                     ↕
//! ┌─────────────────────────────────────────────┐
//! │ persistence: ContentStore collaborator      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **One recording path**: editor-initiated and frame-reported changes
//!    both funnel through `record_change`; only the former also propagate
//!    an `UPDATE_CONTENT` outward
//! 2. **Linear undo**: a new edit discards the redo branch
//! 3. **History is session-scoped**: only draft values persist
//! 4. **Saving is not publishing**: the two flags have independent lifecycles

mod change;
mod history;
mod reconcile;
mod session;
mod store;

pub use change::{ContentChange, ImageMeta};
pub use history::{History, HistoryEntry};
pub use reconcile::{reconcile_blocks, ReconcileOutcome};
pub use session::{BridgeEffects, EditorSession};
pub use store::{ChangeEffects, EditorStore};

// Re-export the kinds/values changes are made of.
pub use sitecanvas_common::{ChangeKind, ContentValue};
