// HistoryManager - Linear snapshot stack with a cursor

use std::collections::VecDeque;

/// Default maximum number of snapshots to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 200;

/// Manages snapshot history for undo/redo
///
/// The manager keeps one ordered list of snapshots and a pointer to the
/// snapshot matching the current document:
/// - Recording drops everything past the pointer (a new timeline), appends,
///   and moves the pointer to the tail
/// - Undo moves the pointer back one, redo forward one
///
/// # Memory Management
/// The list is capped; when the cap is exceeded the oldest snapshot is dropped.
#[derive(Debug, Clone)]
pub struct HistoryManager<T> {
    /// Snapshots, oldest at the front
    entries: VecDeque<T>,

    /// Index of the current snapshot; None when history is empty
    pointer: Option<usize>,

    /// Maximum number of snapshots to keep
    max_history: usize,
}

impl<T: Clone> HistoryManager<T> {
    /// Create a new HistoryManager with default settings
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a new HistoryManager with a custom history limit
    pub fn with_capacity(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            entries: VecDeque::with_capacity(max_history.min(DEFAULT_MAX_HISTORY)),
            pointer: None,
            max_history,
        }
    }

    /// Record a snapshot as the new current state
    pub fn record(&mut self, snapshot: T) {
        let keep = self.pointer.map(|p| p + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        if self.entries.len() > self.max_history {
            self.entries.pop_front();
        }

        self.pointer = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot and return it for restoring
    pub fn undo(&mut self) -> Option<&T> {
        let pointer = self.pointer.filter(|p| *p > 0)?;
        self.pointer = Some(pointer - 1);
        self.entries.get(pointer - 1)
    }

    /// Step forward one snapshot and return it for restoring
    pub fn redo(&mut self) -> Option<&T> {
        let pointer = self.pointer?;
        if pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer = Some(pointer + 1);
        self.entries.get(pointer + 1)
    }

    /// Clear all history (new document / load)
    pub fn reset(&mut self) {
        self.entries.clear();
        self.pointer = None;
    }

    pub fn can_undo(&self) -> bool {
        self.pointer.is_some_and(|p| p > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.pointer.is_some_and(|p| p + 1 < self.entries.len())
    }

    /// True until the first snapshot after a reset
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }
}

impl<T: Clone> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
