//! # Draft/Publish Reconciliation
//!
//! Rebuilds the in-memory draft set from persisted content at session
//! start. Only blocks with a pending draft are imported; purely published,
//! unchanged blocks are not materialized, so `has_unpublished_changes`
//! reflects literal pending edits rather than the full content set.

use crate::change::ContentChange;
use sitecanvas_common::{now_millis, BlockRecord, BlockStatus, ChangeKind, ContentValue};
use std::collections::BTreeMap;

/// Result of reconciling persisted content.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// One change per imported block: old value is the session baseline,
    /// new value is the pending draft.
    pub changes: Vec<ContentChange>,
    /// Most recent persisted write across imported blocks.
    pub last_saved_at: Option<i64>,
}

/// Classify each persisted block and import the ones with pending drafts.
///
/// Import rules:
/// - published + differing draft → baseline is the published value
/// - draft only (never published) → baseline is the empty string
/// - anything else → the persisted current value stands in for both
pub fn reconcile_blocks(records: &BTreeMap<String, BlockRecord>) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for (element_id, record) in records {
        if record.status() != BlockStatus::Draft {
            continue;
        }

        let kind = match (&record.draft, &record.published) {
            (Some(v), _) | (None, Some(v)) if v.is_image() => ChangeKind::Image,
            _ => ChangeKind::Text,
        };

        let (old_value, new_value) = match (&record.published, &record.draft) {
            (Some(published), Some(draft)) => {
                (published.as_content_value(), draft.as_content_value())
            }
            (None, Some(draft)) => (ContentValue::empty(), draft.as_content_value()),
            (Some(current), None) => {
                let value = current.as_content_value();
                (value.clone(), value)
            }
            (None, None) => continue,
        };

        let timestamp = record.updated_at.unwrap_or_else(now_millis);
        outcome.changes.push(
            ContentChange::new(element_id.clone(), kind, old_value, new_value)
                .with_timestamp(timestamp),
        );
        if let Some(updated_at) = record.updated_at {
            outcome.last_saved_at = Some(outcome.last_saved_at.map_or(updated_at, |prev| {
                prev.max(updated_at)
            }));
        }
    }

    outcome
}
