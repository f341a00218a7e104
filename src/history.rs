use serde::{Deserialize, Serialize};

use crate::component::{Component, Connection};

/// A reversible store mutation, holding a snapshot of what it touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    AddComponent(Component),
    DeleteComponent(Component),
    AddConnection(Connection),
}

impl HistoryEntry {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::AddComponent(_) => "add component",
            HistoryEntry::DeleteComponent(_) => "delete component",
            HistoryEntry::AddConnection(_) => "add connection",
        }
    }
}

/// Undo/redo log.
///
/// Both logs are stacks with the most recent entry last. Recording a new
/// mutation discards everything that could have been redone.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new mutation and clear the redo log
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
    }

    /// Move the most recent entry to the redo log and return it for reverting
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Move the most recently undone entry back and return it for re-applying
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }

    pub fn redo_entries(&self) -> &[HistoryEntry] {
        &self.redo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
