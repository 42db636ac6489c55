// Clipboard types for copy/paste operations

use crate::tab::bar::Bar;
use crate::tab::cell::Cell;
use crate::tab::tuning::Instrument;

/// One copied cell: flat offset from the first copied column, and its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEntry {
    pub offset: usize,
    pub row: usize,
    pub value: Cell,
}

/// Full-height columns copied from one instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnClipboard {
    pub instrument: Instrument,
    pub entries: Vec<ColumnEntry>,
}

/// One whole bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarClipboard {
    pub instrument: Instrument,
    pub bar: Bar,
}

/// Editor clipboard: one column slot and one bar slot
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    pub column: Option<ColumnClipboard>,
    pub bar: Option<BarClipboard>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.column.is_none() && self.bar.is_none()
    }

    /// Column contents when they may be pasted onto `instrument`
    pub fn column_for(&self, instrument: Instrument) -> Option<&ColumnClipboard> {
        self.column.as_ref().filter(|c| c.instrument == instrument)
    }

    /// Bar contents when they fit a bar of `instrument` with `rows` rows
    pub fn bar_for(&self, instrument: Instrument, rows: usize) -> Option<&Bar> {
        self.bar
            .as_ref()
            .filter(|b| b.instrument == instrument && b.bar.row_count() == rows)
            .map(|b| &b.bar)
    }
}
