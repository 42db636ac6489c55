// Bar and Row - fixed-size slices of notation

use super::cell::Cell;

/// One voice (string or drum line) within a bar
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// All-rest row of the given length
    pub fn empty(cells_per_measure: usize) -> Self {
        Self {
            cells: vec![Cell::Rest; cells_per_measure],
        }
    }

    /// Pad with rests or truncate from the end; the prefix is kept as-is
    pub fn resize(&mut self, cells_per_measure: usize) {
        self.cells.resize(cells_per_measure, Cell::Rest);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Fixed-length slice of notation across all rows of one instrument
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bar {
    pub rows: Vec<Row>,
}

impl Bar {
    /// All-rest bar; the row count is fixed here for the bar's lifetime
    pub fn empty(row_count: usize, cells_per_measure: usize) -> Self {
        Self {
            rows: (0..row_count).map(|_| Row::empty(cells_per_measure)).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells per row (rows always agree)
    pub fn cell_count(&self) -> usize {
        self.rows.first().map(Row::len).unwrap_or(0)
    }

    pub fn resize(&mut self, cells_per_measure: usize) {
        for row in &mut self.rows {
            row.resize(cells_per_measure);
        }
    }

    /// Whether the bar has exactly `row_count` rows of `cells_per_measure` cells
    pub fn has_shape(&self, row_count: usize, cells_per_measure: usize) -> bool {
        self.rows.len() == row_count && self.rows.iter().all(|row| row.len() == cells_per_measure)
    }

    pub fn cell(&self, row: usize, cell: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(cell)
    }

    /// Write a cell; returns false when the address is outside the bar
    pub fn set(&mut self, row: usize, cell: usize, value: Cell) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.cells.get_mut(cell)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Values of every row at one cell index, top row first
    pub fn column(&self, cell: usize) -> Option<Vec<Cell>> {
        self.rows.iter().map(|row| row.cells.get(cell).copied()).collect()
    }

    pub fn is_rest(&self) -> bool {
        self.rows.iter().all(|row| row.cells.iter().all(Cell::is_rest))
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.cells.fill(Cell::Rest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bar_shape() {
        let bar = Bar::empty(6, 16);
        assert_eq!(bar.row_count(), 6);
        assert_eq!(bar.cell_count(), 16);
        assert!(bar.is_rest());
    }

    #[test]
    fn test_resize_keeps_prefix() {
        let mut bar = Bar::empty(2, 8);
        bar.set(0, 1, Cell::Fret(3));
        bar.set(1, 7, Cell::Fret(5));

        bar.resize(4);
        assert_eq!(bar.cell_count(), 4);
        bar.resize(8);

        assert_eq!(bar.cell(0, 1), Some(&Cell::Fret(3)));
        assert_eq!(bar.cell(1, 7), Some(&Cell::Rest));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut bar = Bar::empty(4, 4);
        assert!(!bar.set(4, 0, Cell::Fret(1)));
        assert!(!bar.set(0, 4, Cell::Fret(1)));
        assert!(bar.is_rest());
    }

    #[test]
    fn test_column() {
        let mut bar = Bar::empty(3, 4);
        bar.set(2, 1, Cell::Fret(7));
        assert_eq!(
            bar.column(1),
            Some(vec![Cell::Rest, Cell::Rest, Cell::Fret(7)])
        );
        assert_eq!(bar.column(9), None);
    }
}
