//! # Change History
//!
//! Linear undo/redo over content changes.
//!
//! ## Design
//!
//! - `past` holds applied entries, oldest first; `present` is the entry most
//!   recently applied; `future` holds undone entries, nearest first
//! - Undo moves `present` to the front of `future` and pops the tail of
//!   `past` into `present`; redo is the exact reverse
//! - Any new edit clears `future` (standard linear undo, not a tree)
//! - Bounded depth: past the cap, the oldest `past` entry is dropped

use crate::change::ContentChange;
use std::collections::VecDeque;

/// An ordered, non-empty group of changes applied together as one undo unit.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    changes: Vec<ContentChange>,
}

impl HistoryEntry {
    pub fn single(change: ContentChange) -> Self {
        Self {
            changes: vec![change],
        }
    }

    /// Batch of changes as one unit. Returns `None` for an empty batch.
    pub fn batch(changes: Vec<ContentChange>) -> Option<Self> {
        if changes.is_empty() {
            None
        } else {
            Some(Self { changes })
        }
    }

    pub fn changes(&self) -> &[ContentChange] {
        &self.changes
    }

    /// Label for undo/redo affordances: a single change describes itself,
    /// a batch reports its size.
    pub fn describe(&self) -> String {
        match self.changes.as_slice() {
            [only] => only.describe(),
            many => format!("{} changes", many.len()),
        }
    }
}

/// Session-scoped change history. Never persisted.
#[derive(Debug)]
pub struct History {
    past: Vec<HistoryEntry>,
    present: Option<HistoryEntry>,
    future: VecDeque<HistoryEntry>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default depth cap.
    pub const DEFAULT_MAX_DEPTH: usize = 100;

    pub fn new() -> Self {
        Self::with_max_depth(Self::DEFAULT_MAX_DEPTH)
    }

    /// `max_depth` of 0 means unlimited.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            present: None,
            future: VecDeque::new(),
            max_depth,
        }
    }

    /// Record a newly applied entry. The previous `present` moves into
    /// `past`; the redo branch is discarded.
    pub fn push(&mut self, entry: HistoryEntry) {
        if let Some(previous) = self.present.replace(entry) {
            self.past.push(previous);
            if self.max_depth > 0 && self.past.len() > self.max_depth {
                self.past.remove(0);
            }
        }
        self.future.clear();
    }

    /// Step back. Returns the entry that was undone (the old `present`),
    /// whose changes the caller replays in reverse.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let new_present = self.past.pop()?;
        let undone = self.present.replace(new_present);
        if let Some(undone) = &undone {
            self.future.push_front(undone.clone());
        }
        undone
    }

    /// Step forward. Returns the entry that was redone (the new `present`),
    /// whose changes the caller replays in order.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let redone = self.future.pop_front()?;
        if let Some(previous) = self.present.replace(redone.clone()) {
            self.past.push(previous);
        }
        Some(redone)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn present(&self) -> Option<&HistoryEntry> {
        self.present.as_ref()
    }

    /// Label of the entry the next undo would revert.
    pub fn undo_description(&self) -> Option<String> {
        if !self.can_undo() {
            return None;
        }
        self.present.as_ref().map(|e| e.describe())
    }

    /// Label of the entry the next redo would apply.
    pub fn redo_description(&self) -> Option<String> {
        self.future.front().map(|e| e.describe())
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.present = None;
        self.future.clear();
    }
}
