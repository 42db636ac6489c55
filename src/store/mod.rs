// Tablature store
//
// Owns the project, its tab data and the undo history. All document
// mutations go through the store so that:
// - rows always hold exactly cellsPerMeasure cells
// - every section's bar count equals its `measures` for all three instruments
// - bar arrays are only ever replaced whole, which keeps snapshots trivially
//   consistent
// - every commit bumps the revision, marks the document dirty and raises a
//   document-changed notification
//
// Addresses naming unknown sections, bars, rows or cells are ignored (the
// operation returns false) instead of failing: UI events can race with
// structural edits.

pub mod tab_store;

pub use tab_store::{Snapshot, TabStore};
