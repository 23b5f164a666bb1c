//! Undo/redo stacks of committed edits

use chairside_domain::PendingEdit;

/// Two stacks of [`PendingEdit`]s, most recent last.
///
/// Entries are stored in their forward direction: undoing pops from `undo`
/// and applies [`PendingEdit::inverted`], redoing pops from `redo` and applies
/// the entry as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoHistory {
    undo: Vec<PendingEdit>,
    redo: Vec<PendingEdit>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh edit. A new edit invalidates the redo stack; the cleared
    /// entries are returned so a failed commit can put them back.
    #[must_use = "keep the cleared redo entries to restore them if the commit fails"]
    pub fn record(&mut self, edit: PendingEdit) -> Vec<PendingEdit> {
        self.undo.push(edit);
        std::mem::take(&mut self.redo)
    }

    /// Undo [`UndoHistory::record`] after the backend rejected the edit.
    pub fn rollback_record(&mut self, cleared_redo: Vec<PendingEdit>) -> Option<PendingEdit> {
        let dropped = self.undo.pop();
        self.redo = cleared_redo;
        dropped
    }

    pub fn pop_undo(&mut self) -> Option<PendingEdit> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<PendingEdit> {
        self.redo.pop()
    }

    pub fn push_undo(&mut self, edit: PendingEdit) {
        self.undo.push(edit);
    }

    pub fn push_redo(&mut self, edit: PendingEdit) {
        self.redo.push(edit);
    }

    pub fn peek_undo(&self) -> Option<&PendingEdit> {
        self.undo.last()
    }

    pub fn peek_redo(&self) -> Option<&PendingEdit> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
