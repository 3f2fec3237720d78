//! # Editor Session
//!
//! Ties the store to its collaborators: the frame bridge (outward
//! propagation and inbound frame reports) and the content persistence API
//! (load, debounced auto-save, publish).
//!
//! The store itself is synchronous; only persistence calls await. The store
//! lock is never held across an await point.

use crate::change::ContentChange;
use crate::reconcile::reconcile_blocks;
use crate::store::{ChangeEffects, EditorStore};
use sitecanvas_bridge::FrameBridge;
use sitecanvas_common::{ChangeKind, ContentStore, ContentValue, PersistenceError, SiteContent};
use sitecanvas_protocol::{EditorMessage, PreviewMessage, PreviewMessageKind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Propagates store changes outward as `UPDATE_CONTENT` commands.
pub struct BridgeEffects {
    bridge: Arc<Mutex<FrameBridge>>,
}

impl BridgeEffects {
    pub fn new(bridge: Arc<Mutex<FrameBridge>>) -> Self {
        Self { bridge }
    }
}

impl ChangeEffects for BridgeEffects {
    fn propagate(&mut self, element_id: &str, value: &ContentValue) {
        let mut bridge = match self.bridge.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        bridge.send(EditorMessage::UpdateContent {
            element_id: element_id.to_string(),
            content: value.clone(),
        });
    }
}

/// One editing session: a store, a bridge, a persistence collaborator, and
/// the debounced auto-save machinery.
///
/// Cheap to clone; clones share the same session state.
#[derive(Clone)]
pub struct EditorSession {
    site_id: String,
    store: Arc<RwLock<EditorStore>>,
    content: Arc<dyn ContentStore>,
    autosave_delay: Duration,
    /// Bumped on every edit; a sleeping auto-save task only fires if its
    /// generation is still current when it wakes.
    autosave_generation: Arc<AtomicU64>,
    /// At most one save in flight; a save scheduled while one runs is
    /// skipped, not queued.
    save_in_flight: Arc<AtomicBool>,
}

impl EditorSession {
    pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

    pub fn new(site_id: impl Into<String>, content: Arc<dyn ContentStore>) -> Self {
        Self {
            site_id: site_id.into(),
            store: Arc::new(RwLock::new(EditorStore::new())),
            content,
            autosave_delay: Self::DEFAULT_AUTOSAVE_DELAY,
            autosave_generation: Arc::new(AtomicU64::new(0)),
            save_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Read access to the store.
    pub fn store(&self) -> RwLockReadGuard<'_, EditorStore> {
        match self.store.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write access to the store. Edits made through the raw guard do not
    /// schedule the debounced auto-save; use [`EditorSession::edit`] for
    /// that.
    pub fn store_mut(&self) -> RwLockWriteGuard<'_, EditorStore> {
        match self.store.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run an edit against the store and schedule the debounced auto-save.
    /// Every editor-initiated change action should go through here so an
    /// idle editor never sits on unsaved edits.
    pub fn edit<R>(&self, action: impl FnOnce(&mut EditorStore) -> R) -> R {
        let result = action(&mut self.store_mut());
        self.schedule_autosave();
        result
    }

    /// Initialize the store against a bridge: changes propagate outward as
    /// `UPDATE_CONTENT`, and inbound `CONTENT_CHANGED` reports are recorded
    /// through the same path as editor-initiated edits.
    pub fn connect(&self, bridge: Arc<Mutex<FrameBridge>>) {
        self.store_mut().initialize(
            self.site_id.clone(),
            Box::new(BridgeEffects::new(bridge.clone())),
        );

        let session = self.clone();
        let mut locked = match bridge.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locked.on(PreviewMessageKind::ContentChanged, move |envelope| {
            let PreviewMessage::ContentChanged {
                element_id,
                content,
                previous,
                kind,
            } = envelope.message
            else {
                return;
            };
            // An undo/redo in progress holds the store lock; its own echo
            // must not be recorded as a fresh edit.
            let Ok(mut store) = session.store.try_write() else {
                debug!(%element_id, "store busy; dropping frame report");
                return;
            };
            // The agent confirms every applied UPDATE_CONTENT with a
            // CONTENT_CHANGED report. A report that matches the current
            // draft value is such a confirmation, not a new edit.
            if store.draft_value(&element_id) == Some(&content) {
                debug!(%element_id, "frame report confirms current draft; not recorded");
                return;
            }
            let old_value = previous
                .or_else(|| store.draft_value(&element_id).cloned())
                .unwrap_or_else(ContentValue::empty);
            let change = ContentChange::new(
                element_id,
                kind.unwrap_or(ChangeKind::Text),
                old_value,
                content,
            );
            store.record_change(change);
            drop(store);
            session.schedule_autosave();
        });
    }

    /// Load persisted content and rebuild draft state from it.
    pub async fn load(&self) -> Result<SiteContent, PersistenceError> {
        let content = self.content.load(&self.site_id).await?;
        let outcome = reconcile_blocks(&content.block_records());
        self.store_mut().import_drafts(outcome);
        Ok(content)
    }

    /// Persist current draft values. Returns `Ok(false)` when there was
    /// nothing unsaved. A persistence failure propagates to the caller so
    /// a dependent publish can abort instead of publishing a stale draft.
    pub async fn save_draft(&self) -> Result<bool, PersistenceError> {
        let updates = {
            let store = self.store();
            if !store.has_unsaved_edits() {
                return Ok(false);
            }
            store.draft_updates()
        };

        if let Err(err) = self.content.save(&self.site_id, &updates).await {
            error!(%err, "draft save failed");
            return Err(err);
        }
        self.store_mut().mark_saved();
        Ok(true)
    }

    /// Save, then promote every draft to published. Aborts on save failure.
    pub async fn publish(&self) -> Result<(), PersistenceError> {
        self.save_draft().await?;

        let changes = self.store().draft_updates();
        self.content.publish(&self.site_id, &changes).await?;
        self.store_mut().mark_drafts_published();
        Ok(())
    }

    /// Schedule a debounced auto-save: fires after the idle delay unless a
    /// newer edit reschedules it first. Outside a tokio runtime there is
    /// nothing to run the timer on, so the call becomes a no-op.
    pub fn schedule_autosave(&self) {
        let generation = self.autosave_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("no async runtime; auto-save not scheduled");
            return;
        };
        let session = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(session.autosave_delay).await;
            if session.autosave_generation.load(Ordering::SeqCst) != generation {
                // Superseded by a newer edit.
                return;
            }
            if session.save_in_flight.swap(true, Ordering::SeqCst) {
                debug!("auto-save skipped: save already in flight");
                return;
            }
            if let Err(err) = session.save_draft().await {
                warn!(%err, "auto-save failed");
            }
            session.save_in_flight.store(false, Ordering::SeqCst);
        });
    }
}
