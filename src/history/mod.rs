// Undo/redo history over full-document snapshots
//
// The store records a deep copy of the tab document after every committed
// mutation. Undo and redo move a pointer through the recorded snapshots and
// hand the snapshot back for the store to restore; a restore is never itself
// recorded.

pub mod manager;

pub use manager::{DEFAULT_MAX_HISTORY, HistoryManager};
