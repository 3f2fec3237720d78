//! # Editor State Store
//!
//! The change-history and draft-tracking engine. All mutation happens
//! synchronously within a message/event handler; there is exactly one actor
//! driving it, so the only mutual-exclusion mechanism is the advisory
//! `is_executing_command` flag that suppresses frame echoes during
//! undo/redo replay.

use crate::change::ContentChange;
use crate::history::{History, HistoryEntry};
use crate::reconcile::ReconcileOutcome;
use sitecanvas_common::{now_millis, ChangeKind, ContentValue, DraftUpdate};
use std::collections::BTreeMap;
use tracing::debug;

/// Side-effect hook invoked by atomic change actions and by undo/redo
/// replay to propagate a value outward (typically `UPDATE_CONTENT` through
/// the frame bridge).
pub trait ChangeEffects: Send + Sync {
    fn propagate(&mut self, element_id: &str, value: &ContentValue);
}

/// A single versioned state container for one editing session.
#[derive(Default)]
pub struct EditorStore {
    site_id: Option<String>,
    /// Latest change per element: the current working value, not history.
    drafts: BTreeMap<String, ContentChange>,
    /// Value first observed per element this session. Set once.
    original: BTreeMap<String, ContentValue>,
    /// Value considered live. Updated only by an explicit publish.
    published: BTreeMap<String, ContentValue>,
    history: History,
    has_unsaved_edits: bool,
    has_unpublished_changes: bool,
    /// Set for the duration of an undo/redo; frame reports arriving while
    /// set are ignored so the agent's own confirmation of a replayed write
    /// is not mis-recorded as a new user edit.
    is_executing_command: bool,
    selected_element: Option<String>,
    last_saved_at: Option<i64>,
    effects: Option<Box<dyn ChangeEffects>>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything and bind the session's side-effect handler.
    pub fn initialize(&mut self, site_id: impl Into<String>, effects: Box<dyn ChangeEffects>) {
        self.clear();
        self.site_id = Some(site_id.into());
        self.effects = Some(effects);
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    // ---- Atomic change actions -------------------------------------------

    pub fn change_text(&mut self, element_id: &str, new_value: ContentValue, old_value: ContentValue) {
        self.apply_change(ContentChange::new(
            element_id,
            ChangeKind::Text,
            old_value,
            new_value,
        ));
    }

    pub fn change_image(&mut self, element_id: &str, new_src: ContentValue, old_src: ContentValue) {
        self.apply_change(ContentChange::new(
            element_id,
            ChangeKind::Image,
            old_src,
            new_src,
        ));
    }

    /// Image change carrying upload metadata.
    pub fn change_image_with_meta(&mut self, change: ContentChange) {
        self.apply_change(change);
    }

    pub fn change_toggle(&mut self, element_id: &str, new_value: bool, old_value: bool) {
        self.apply_change(ContentChange::new(
            element_id,
            ChangeKind::Toggle,
            ContentValue::Flag(old_value),
            ContentValue::Flag(new_value),
        ));
    }

    pub fn change_config(&mut self, element_id: &str, new_value: ContentValue, old_value: ContentValue) {
        self.apply_change(ContentChange::new(
            element_id,
            ChangeKind::Config,
            old_value,
            new_value,
        ));
    }

    /// Editor-initiated change: propagate outward, then record.
    fn apply_change(&mut self, change: ContentChange) {
        if let Some(effects) = self.effects.as_mut() {
            effects.propagate(&change.element_id, &change.new_value);
        }
        self.record_change(change);
    }

    // ---- Core recording step ---------------------------------------------

    /// Record one change. Both editor-initiated changes and changes
    /// reported back from the frame (inline-edit commits) funnel through
    /// here; this path never propagates outward.
    ///
    /// A change whose new value equals the current draft value is still
    /// recorded; there is no de-duplication.
    pub fn record_change(&mut self, change: ContentChange) {
        if self.is_executing_command {
            debug!(element_id = %change.element_id, "ignoring frame report during undo/redo");
            return;
        }
        self.seed_baseline(&change);
        self.drafts.insert(change.element_id.clone(), change.clone());
        self.history.push(HistoryEntry::single(change));
        self.has_unsaved_edits = true;
        self.has_unpublished_changes = true;
    }

    /// Record several changes as one undo unit (composite edits).
    pub fn record_changes(&mut self, changes: Vec<ContentChange>) {
        if self.is_executing_command {
            debug!("ignoring batched frame report during undo/redo");
            return;
        }
        let Some(entry) = HistoryEntry::batch(changes) else {
            return;
        };
        for change in entry.changes() {
            self.seed_baseline(change);
            self.drafts.insert(change.element_id.clone(), change.clone());
        }
        self.history.push(entry);
        self.has_unsaved_edits = true;
        self.has_unpublished_changes = true;
    }

    /// First sighting of an element seeds both baselines with its old value.
    fn seed_baseline(&mut self, change: &ContentChange) {
        if !self.original.contains_key(&change.element_id) {
            self.original
                .insert(change.element_id.clone(), change.old_value.clone());
            self.published
                .insert(change.element_id.clone(), change.old_value.clone());
        }
    }

    // ---- Undo / redo -----------------------------------------------------

    pub fn can_undo(&self) -> bool {
        !self.is_executing_command && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_executing_command && self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    /// Undo the most recent entry. Propagates each change's old value
    /// outward in reverse order and rewrites the affected draft entries.
    /// Does not remove draft entries and does not touch baselines.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.is_executing_command = true;
        if let Some(entry) = self.history.undo() {
            for change in entry.changes().iter().rev() {
                if let Some(effects) = self.effects.as_mut() {
                    effects.propagate(&change.element_id, &change.old_value);
                }
                if let Some(existing) = self.drafts.get(&change.element_id) {
                    let superseded = existing.superseded_with(change.old_value.clone());
                    self.drafts.insert(change.element_id.clone(), superseded);
                }
            }
        }
        self.is_executing_command = false;
        true
    }

    /// Redo the most recently undone entry. Propagates new values in
    /// forward order; creates a draft entry when the element has none.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.is_executing_command = true;
        if let Some(entry) = self.history.redo() {
            for change in entry.changes() {
                if let Some(effects) = self.effects.as_mut() {
                    effects.propagate(&change.element_id, &change.new_value);
                }
                match self.drafts.get(&change.element_id) {
                    Some(existing) => {
                        let superseded = existing.superseded_with(change.new_value.clone());
                        self.drafts.insert(change.element_id.clone(), superseded);
                    }
                    None => {
                        self.drafts
                            .insert(change.element_id.clone(), change.clone());
                    }
                }
            }
        }
        self.is_executing_command = false;
        true
    }

    // ---- Derived reads ---------------------------------------------------

    pub fn has_unsaved_edits(&self) -> bool {
        self.has_unsaved_edits
    }

    pub fn has_unpublished_changes(&self) -> bool {
        self.has_unpublished_changes
    }

    pub fn is_executing_command(&self) -> bool {
        self.is_executing_command
    }

    pub fn draft_value(&self, element_id: &str) -> Option<&ContentValue> {
        self.drafts.get(element_id).map(|c| &c.new_value)
    }

    pub fn draft_change(&self, element_id: &str) -> Option<&ContentChange> {
        self.drafts.get(element_id)
    }

    pub fn original_value(&self, element_id: &str) -> Option<&ContentValue> {
        self.original.get(element_id)
    }

    pub fn published_value(&self, element_id: &str) -> Option<&ContentValue> {
        self.published.get(element_id)
    }

    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_saved_at(&self) -> Option<i64> {
        self.last_saved_at
    }

    /// Whether any draft genuinely differs from its session baseline.
    ///
    /// Deliberately not wired into `has_unsaved_edits`: undoing back to the
    /// original value leaves that flag set until an explicit save.
    pub fn has_real_divergence(&self) -> bool {
        self.drafts
            .iter()
            .any(|(id, change)| self.original.get(id) != Some(&change.new_value))
    }

    /// Current draft values, serialized for persistence.
    pub fn draft_updates(&self) -> Vec<DraftUpdate> {
        self.drafts
            .values()
            .map(|change| DraftUpdate {
                element_id: change.element_id.clone(),
                kind: change.kind,
                value: change.new_value.clone(),
            })
            .collect()
    }

    // ---- Selection -------------------------------------------------------

    pub fn set_selected_element(&mut self, element_id: Option<String>) {
        self.selected_element = element_id;
    }

    pub fn selected_element(&self) -> Option<&str> {
        self.selected_element.as_deref()
    }

    // ---- Save / publish / clear ------------------------------------------

    /// A save succeeded: clear the unsaved flag. Publish state is untouched;
    /// saving is not publishing.
    pub fn mark_saved(&mut self) {
        self.has_unsaved_edits = false;
        self.last_saved_at = Some(now_millis());
    }

    /// A publish succeeded: every draft value becomes the live value.
    /// Drafts and history remain, so content stays editable after publish.
    pub fn mark_drafts_published(&mut self) {
        for (element_id, change) in &self.drafts {
            self.published
                .insert(element_id.clone(), change.new_value.clone());
        }
        self.has_unpublished_changes = false;
    }

    /// Seed the store from reconciled persisted content. Does not create
    /// history: loaded drafts are the baseline, not undoable edits.
    pub fn import_drafts(&mut self, outcome: ReconcileOutcome) {
        for change in outcome.changes {
            self.original
                .insert(change.element_id.clone(), change.old_value.clone());
            self.published
                .insert(change.element_id.clone(), change.old_value.clone());
            self.drafts.insert(change.element_id.clone(), change);
        }
        self.has_unpublished_changes = !self.drafts.is_empty();
        self.last_saved_at = outcome.last_saved_at;
    }

    /// Wipe all maps, history, and flags back to empty.
    pub fn clear(&mut self) {
        self.drafts.clear();
        self.original.clear();
        self.published.clear();
        self.history.clear();
        self.has_unsaved_edits = false;
        self.has_unpublished_changes = false;
        self.is_executing_command = false;
        self.selected_element = None;
        self.last_saved_at = None;
    }
}
