// SelectionEngine - turns pointer and key events into a selection

use super::coord::{CellCoord, Direction, GridShape};
use crate::project::types::SectionId;

/// Pointer-drag state machine
///
/// A drag that entered another cell leaves `SuppressNextClick` behind. The
/// next input event consumes it; if that event is the synthetic click the
/// browser sends after pointer-up, the click is dropped so it cannot reset
/// the range the drag just built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last: CellCoord,
        moved: bool,
    },
    SuppressNextClick,
}

/// Anchor plus the current selection, kept in grid order
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    anchor: Option<CellCoord>,
    selection: Vec<CellCoord>,
    drag: DragState,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<CellCoord> {
        self.anchor
    }

    pub fn selection(&self) -> &[CellCoord] {
        &self.selection
    }

    /// First coordinate in grid order, falling back to the anchor
    pub fn first(&self) -> Option<CellCoord> {
        self.selection.first().copied().or(self.anchor)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_selected(&self, coord: &CellCoord) -> bool {
        self.selection.contains(coord)
    }

    /// Distinct (section, bar, cell) columns covered by the selection, in order
    pub fn columns(&self) -> Vec<(SectionId, usize, usize)> {
        let mut columns: Vec<(SectionId, usize, usize)> = Vec::new();
        for coord in &self.selection {
            let column = (coord.section, coord.bar, coord.cell);
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Plain click selects one cell and moves the anchor; shift-click extends
    /// from the anchor to a full-column range. Returns false when the click
    /// was swallowed after a drag or names a cell that does not exist.
    pub fn click(&mut self, grid: &GridShape, coord: CellCoord, shift: bool) -> bool {
        if self.consume_suppression() {
            tracing::trace!("Click after drag suppressed");
            return false;
        }
        if !grid.contains(&coord) {
            tracing::debug!("Click ignored: {:?} is off the grid", coord);
            return false;
        }

        match self.anchor {
            Some(anchor) if shift => {
                self.selection = grid.full_column_range(&anchor, &coord);
            }
            _ => self.select_single(coord),
        }
        true
    }

    /// Start a drag at `coord`; off-grid coordinates start nothing
    pub fn drag_start(&mut self, grid: &GridShape, coord: CellCoord) -> bool {
        self.consume_suppression();
        if !grid.contains(&coord) {
            tracing::debug!("Drag ignored: {:?} is off the grid", coord);
            return false;
        }
        self.anchor = Some(coord);
        self.selection = grid.full_column_range(&coord, &coord);
        self.drag = DragState::Dragging {
            last: coord,
            moved: false,
        };
        true
    }

    /// Recompute the range when the pointer enters a new cell.
    /// Returns whether the selection changed.
    pub fn drag_over(&mut self, grid: &GridShape, coord: CellCoord) -> bool {
        let DragState::Dragging { last, .. } = self.drag else {
            return false;
        };
        if last == coord || !grid.contains(&coord) {
            return false;
        }
        let Some(anchor) = self.anchor else {
            return false;
        };

        self.drag = DragState::Dragging {
            last: coord,
            moved: true,
        };
        self.selection = grid.full_column_range(&anchor, &coord);
        true
    }

    pub fn drag_end(&mut self) {
        self.drag = match self.drag {
            DragState::Dragging { moved: true, .. } => DragState::SuppressNextClick,
            _ => DragState::Idle,
        };
    }

    /// Move one cell from the first selected coordinate; the result becomes
    /// the single selection and the anchor
    pub fn navigate(&mut self, grid: &GridShape, direction: Direction) -> Option<CellCoord> {
        self.consume_suppression();
        let from = self.first()?;
        let to = grid.navigate(&from, direction)?;
        self.select_single(to);
        Some(to)
    }

    pub fn select_single(&mut self, coord: CellCoord) {
        self.anchor = Some(coord);
        self.selection = vec![coord];
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.selection.clear();
        self.drag = DragState::Idle;
    }

    /// Drop coordinates that no longer exist after a structural edit
    pub fn retain_valid(&mut self, grid: &GridShape) {
        self.selection.retain(|coord| grid.contains(coord));
        if self.anchor.is_some_and(|anchor| !grid.contains(&anchor)) {
            self.anchor = self.selection.first().copied();
        }
    }

    fn consume_suppression(&mut self) -> bool {
        if self.drag == DragState::SuppressNextClick {
            self.drag = DragState::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::coord::SectionGrid;

    fn grid() -> GridShape {
        GridShape {
            sections: vec![SectionGrid {
                id: SectionId(1),
                bars: 2,
                rows: 6,
            }],
            cells_per_measure: 16,
        }
    }

    fn at(bar: usize, row: usize, cell: usize) -> CellCoord {
        CellCoord::new(SectionId(1), bar, row, cell)
    }

    #[test]
    fn test_click_selects_single_cell() {
        let mut engine = SelectionEngine::new();
        assert!(engine.click(&grid(), at(0, 2, 3), false));
        assert_eq!(engine.selection(), &[at(0, 2, 3)]);
        assert_eq!(engine.anchor(), Some(at(0, 2, 3)));
    }

    #[test]
    fn test_shift_click_extends_from_anchor() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.click(&grid, at(0, 0, 2), false);
        engine.click(&grid, at(0, 4, 5), true);

        assert_eq!(engine.selection().len(), 4 * 6);
        assert_eq!(engine.anchor(), Some(at(0, 0, 2)));
        assert_eq!(engine.columns().len(), 4);
    }

    #[test]
    fn test_shift_click_without_anchor_is_plain_click() {
        let mut engine = SelectionEngine::new();
        engine.click(&grid(), at(1, 1, 1), true);
        assert_eq!(engine.selection(), &[at(1, 1, 1)]);
    }

    #[test]
    fn test_drag_builds_range_and_suppresses_one_click() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.drag_start(&grid, at(0, 0, 0));
        assert!(engine.drag_over(&grid, at(0, 3, 7)));
        assert!(!engine.drag_over(&grid, at(0, 3, 7)));
        engine.drag_end();
        assert_eq!(engine.drag_state(), DragState::SuppressNextClick);

        let dragged = engine.selection().to_vec();
        assert_eq!(dragged.len(), 8 * 6);

        // Synthetic click after pointer-up is swallowed
        assert!(!engine.click(&grid, at(0, 3, 7), false));
        assert_eq!(engine.selection(), dragged.as_slice());

        // Only once
        assert!(engine.click(&grid, at(0, 3, 7), false));
        assert_eq!(engine.selection().len(), 1);
    }

    #[test]
    fn test_drag_without_movement_does_not_suppress() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.drag_start(&grid, at(0, 0, 4));
        engine.drag_end();
        assert_eq!(engine.drag_state(), DragState::Idle);
        assert!(engine.click(&grid, at(0, 0, 4), false));
    }

    #[test]
    fn test_suppression_consumed_by_other_input() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.drag_start(&grid, at(0, 0, 0));
        engine.drag_over(&grid, at(0, 0, 1));
        engine.drag_end();

        engine.navigate(&grid, Direction::Right);
        assert_eq!(engine.drag_state(), DragState::Idle);
        assert!(engine.click(&grid, at(1, 0, 0), false));
    }

    #[test]
    fn test_navigate_from_first_coordinate() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.click(&grid, at(0, 2, 15), false);

        assert_eq!(engine.navigate(&grid, Direction::Right), Some(at(1, 2, 0)));
        assert_eq!(engine.selection(), &[at(1, 2, 0)]);
        assert_eq!(engine.anchor(), Some(at(1, 2, 0)));
    }

    #[test]
    fn test_navigate_without_selection() {
        let mut engine = SelectionEngine::new();
        assert_eq!(engine.navigate(&grid(), Direction::Up), None);
    }

    #[test]
    fn test_retain_valid_after_shrink() {
        let mut engine = SelectionEngine::new();
        engine.click(&grid(), at(1, 0, 0), false);

        let mut shrunk = grid();
        shrunk.sections[0].bars = 1;
        engine.retain_valid(&shrunk);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.anchor(), None);
    }

    #[test]
    fn test_off_grid_input_is_ignored() {
        let grid = grid();
        let mut engine = SelectionEngine::new();
        engine.click(&grid, at(0, 1, 1), false);

        // Cell past the end of the bar, row past the last string, missing bar
        assert!(!engine.click(&grid, at(0, 0, 20), false));
        assert!(!engine.click(&grid, at(0, 6, 0), true));
        assert!(!engine.drag_start(&grid, at(2, 0, 0)));
        assert_eq!(engine.selection(), &[at(0, 1, 1)]);
        assert_eq!(engine.anchor(), Some(at(0, 1, 1)));

        assert!(engine.drag_start(&grid, at(0, 0, 0)));
        assert!(!engine.drag_over(&grid, at(0, 0, 16)));
        assert_eq!(engine.selection().len(), 6);
    }
}
