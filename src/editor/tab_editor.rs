// TabEditor - selection-driven editing on top of the store

use crate::project::types::SectionId;
use crate::selection::clipboard::{BarClipboard, Clipboard, ColumnClipboard, ColumnEntry};
use crate::selection::coord::{CellCoord, Direction, GridShape};
use crate::selection::engine::SelectionEngine;
use crate::store::TabStore;
use crate::tab::cell::{Cell, MAX_FRET};
use crate::tab::chords::find_chord_shape;
use crate::tab::tuning::{Instrument, Tuning};
use std::collections::BTreeMap;

/// Editing session: the store, the active instrument and what is selected
///
/// Every write goes through `TabStore::edit_bars`, so each user action is
/// one whole-array replacement and one history step.
pub struct TabEditor {
    store: TabStore,
    selection: SelectionEngine,
    clipboard: Clipboard,
    instrument: Instrument,
    power_chord: bool,
}

impl TabEditor {
    pub fn new(store: TabStore) -> Self {
        Self {
            store,
            selection: SelectionEngine::new(),
            clipboard: Clipboard::default(),
            instrument: Instrument::Guitar,
            power_chord: false,
        }
    }

    pub fn store(&self) -> &TabStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TabStore {
        &mut self.store
    }

    pub fn into_store(self) -> TabStore {
        self.store
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Switch the instrument being edited; the selection is kept
    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.instrument = instrument;
    }

    pub fn power_chord(&self) -> bool {
        self.power_chord
    }

    pub fn set_power_chord(&mut self, enabled: bool) {
        self.power_chord = enabled;
    }

    pub fn grid(&self) -> GridShape {
        self.store.grid(self.instrument)
    }

    // ---------------------------------------------------------------------
    // Pointer and keyboard input
    // ---------------------------------------------------------------------

    pub fn click(&mut self, coord: CellCoord, shift: bool) -> bool {
        let grid = self.grid();
        self.selection.click(&grid, coord, shift)
    }

    pub fn drag_start(&mut self, coord: CellCoord) -> bool {
        let grid = self.grid();
        self.selection.drag_start(&grid, coord)
    }

    pub fn drag_over(&mut self, coord: CellCoord) -> bool {
        let grid = self.grid();
        self.selection.drag_over(&grid, coord)
    }

    pub fn drag_end(&mut self) {
        self.selection.drag_end();
    }

    pub fn navigate(&mut self, direction: Direction) -> Option<CellCoord> {
        let grid = self.grid();
        self.selection.navigate(&grid, direction)
    }

    /// The anchor, if it still names a cell on the active instrument's grid
    fn anchor_on_grid(&self) -> Option<CellCoord> {
        let anchor = self.selection.anchor()?;
        if !self.grid().contains(&anchor) {
            tracing::debug!("Edit ignored: anchor {:?} is off the grid", anchor);
            return None;
        }
        Some(anchor)
    }

    // ---------------------------------------------------------------------
    // Cell edits
    // ---------------------------------------------------------------------

    /// Write a value at the anchor.
    ///
    /// With power-chord mode on a stringed instrument, a fret F also stacks
    /// onto the two strings above: row anchor-k gets F + 2k, or plain F
    /// when the anchor is the drop-tuned lowest string. Stacked frets past
    /// the last fret leave that row untouched.
    pub fn set_value(&mut self, input: &str) -> bool {
        let Some(anchor) = self.anchor_on_grid() else {
            return false;
        };
        let Some(value) = Cell::parse(input, self.instrument) else {
            tracing::debug!("Rejected '{}' for {}", input, self.instrument);
            return false;
        };

        let stacked = match value {
            Cell::Fret(fret) if self.power_chord && self.instrument.is_stringed() => {
                self.power_chord_stack(&anchor, fret)
            }
            _ => Vec::new(),
        };

        self.store.edit_bars(anchor.section, self.instrument, |bars| {
            let Some(bar) = bars.get_mut(anchor.bar) else {
                return false;
            };
            if !bar.set(anchor.row, anchor.cell, value) {
                return false;
            }
            for (row, cell) in stacked {
                bar.set(row, anchor.cell, cell);
            }
            true
        })
    }

    fn power_chord_stack(&self, anchor: &CellCoord, fret: u8) -> Vec<(usize, Cell)> {
        let rows = self
            .store
            .bars(anchor.section, self.instrument)
            .and_then(|bars| bars.get(anchor.bar))
            .map(|bar| bar.row_count())
            .unwrap_or(0);

        let drop_root = self.store.project().tunings.get(self.instrument) == Tuning::Drop
            && anchor.row + 1 == rows;
        let step: u8 = if drop_root { 0 } else { 2 };

        (1..=2u8)
            .filter_map(|k| {
                let row = anchor.row.checked_sub(k as usize)?;
                let stacked = fret.checked_add(k * step)?;
                (stacked <= MAX_FRET).then_some((row, Cell::Fret(stacked)))
            })
            .collect()
    }

    /// Reset every selected cell to rest
    pub fn delete_selection(&mut self) -> bool {
        let mut by_section: BTreeMap<SectionId, Vec<CellCoord>> = BTreeMap::new();
        for coord in self.selection.selection() {
            by_section.entry(coord.section).or_default().push(*coord);
        }

        let mut changed = false;
        for (section, coords) in by_section {
            changed |= self.store.edit_bars(section, self.instrument, |bars| {
                for coord in &coords {
                    if let Some(bar) = bars.get_mut(coord.bar) {
                        bar.set(coord.row, coord.cell, Cell::Rest);
                    }
                }
                true
            });
        }
        changed
    }

    /// Stamp a named chord shape at the anchor column (6-string guitar only)
    pub fn apply_chord_shape(&mut self, name: &str) -> bool {
        if self.instrument != Instrument::Guitar {
            return false;
        }
        let Some(anchor) = self.anchor_on_grid() else {
            return false;
        };
        let Some(shape) = find_chord_shape(name) else {
            tracing::debug!("Unknown chord shape '{}'", name);
            return false;
        };
        let cells = shape.cells();

        self.store.edit_bars(anchor.section, Instrument::Guitar, |bars| {
            let Some(bar) = bars.get_mut(anchor.bar) else {
                return false;
            };
            if bar.row_count() != cells.len() || anchor.cell >= bar.cell_count() {
                return false;
            }
            for (row, cell) in cells.iter().enumerate() {
                bar.set(row, anchor.cell, *cell);
            }
            true
        })
    }

    // ---------------------------------------------------------------------
    // Clipboard
    // ---------------------------------------------------------------------

    /// Copy every selected column (or the anchor's column) with offsets
    /// relative to the first one
    pub fn copy(&mut self) -> bool {
        let Some(first) = self.selection.first() else {
            return false;
        };
        let mut columns: Vec<(usize, usize)> = self
            .selection
            .columns()
            .into_iter()
            .filter(|(section, _, _)| *section == first.section)
            .map(|(_, bar, cell)| (bar, cell))
            .collect();
        if columns.is_empty() {
            columns.push((first.bar, first.cell));
        }

        let cpm = self.store.cells_per_measure();
        let Some(bars) = self.store.get_bars(first.section, self.instrument) else {
            return false;
        };
        let base = columns
            .iter()
            .map(|(bar, cell)| bar * cpm + cell)
            .min()
            .unwrap_or(0);

        let mut entries = Vec::new();
        for (bar, cell) in columns {
            let Some(values) = bars.get(bar).and_then(|b| b.column(cell)) else {
                continue;
            };
            let offset = bar * cpm + cell - base;
            entries.extend(
                values
                    .into_iter()
                    .enumerate()
                    .map(|(row, value)| ColumnEntry { offset, row, value }),
            );
        }

        if entries.is_empty() {
            return false;
        }
        tracing::debug!("Copied {} cells from {}", entries.len(), self.instrument);
        self.clipboard.column = Some(ColumnClipboard {
            instrument: self.instrument,
            entries,
        });
        true
    }

    /// Paste the copied columns starting at the anchor column.
    /// No-op when the copy came from another instrument.
    pub fn paste(&mut self) -> bool {
        let Some(anchor) = self.anchor_on_grid() else {
            return false;
        };
        let Some(clip) = self.clipboard.column_for(self.instrument) else {
            tracing::debug!("Paste ignored: clipboard holds no {} columns", self.instrument);
            return false;
        };
        let entries = clip.entries.clone();

        let cpm = self.store.cells_per_measure();
        let start = anchor.flat(cpm);
        self.store.edit_bars(anchor.section, self.instrument, |bars| {
            for entry in &entries {
                let flat = start + entry.offset;
                if let Some(bar) = bars.get_mut(flat / cpm) {
                    bar.set(entry.row, flat % cpm, entry.value);
                }
            }
            true
        })
    }

    pub fn copy_bar(&mut self) -> bool {
        let Some(anchor) = self.anchor_on_grid() else {
            return false;
        };
        let instrument = self.instrument;
        let Some(bar) = self
            .store
            .get_bars(anchor.section, instrument)
            .and_then(|bars| bars.get(anchor.bar))
            .cloned()
        else {
            return false;
        };

        self.clipboard.bar = Some(BarClipboard { instrument, bar });
        true
    }

    /// Replace the anchor's bar with the copied one.
    /// No-op when the row counts (or instruments) differ.
    pub fn paste_bar(&mut self) -> bool {
        let Some(anchor) = self.anchor_on_grid() else {
            return false;
        };
        let rows = self
            .store
            .get_bars(anchor.section, self.instrument)
            .and_then(|bars| bars.get(anchor.bar))
            .map(|bar| bar.row_count());
        let Some(rows) = rows else {
            return false;
        };
        let Some(copied) = self.clipboard.bar_for(self.instrument, rows) else {
            tracing::debug!("Bar paste ignored: incompatible clipboard");
            return false;
        };

        let mut bar = copied.clone();
        bar.resize(self.store.cells_per_measure());
        self.store.edit_bars(anchor.section, self.instrument, |bars| {
            match bars.get_mut(anchor.bar) {
                Some(slot) => {
                    *slot = bar;
                    true
                }
                None => false,
            }
        })
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let restored = self.store.undo();
        if restored {
            let grid = self.grid();
            self.selection.retain_valid(&grid);
        }
        restored
    }

    pub fn redo(&mut self) -> bool {
        let restored = self.store.redo();
        if restored {
            let grid = self.grid();
            self.selection.retain_valid(&grid);
        }
        restored
    }
}
