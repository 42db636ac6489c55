// Canonical cell coordinates and grid geometry
//
// A cell is addressed as (section, bar, row, cell). Within a section the
// (bar, cell) pair flattens to `bar * cells_per_measure + cell`; ranges and
// clipboard offsets are computed in that flat space. Beat-subdivided views
// are a projection of the flat cell index, never a second addressing scheme.

use crate::project::types::SectionId;

/// One addressable cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub section: SectionId,
    pub bar: usize,
    pub row: usize,
    pub cell: usize,
}

impl CellCoord {
    pub fn new(section: SectionId, bar: usize, row: usize, cell: usize) -> Self {
        Self {
            section,
            bar,
            row,
            cell,
        }
    }

    /// Position along the section's timeline
    pub fn flat(&self, cells_per_measure: usize) -> usize {
        self.bar * cells_per_measure + self.cell
    }
}

/// Beat-subdivided view of a cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatPosition {
    pub beat: usize,
    pub cell_within_beat: usize,
}

impl BeatPosition {
    /// Project a cell index onto beats. Fractional cells-per-beat values
    /// (compound meters with triplet grids) round to the nearest whole cell.
    pub fn from_cell(cell: usize, cells_per_beat: f64) -> Self {
        let step = beat_step(cells_per_beat);
        Self {
            beat: cell / step,
            cell_within_beat: cell % step,
        }
    }

    pub fn to_cell(&self, cells_per_beat: f64) -> usize {
        self.beat * beat_step(cells_per_beat) + self.cell_within_beat
    }
}

fn beat_step(cells_per_beat: f64) -> usize {
    (cells_per_beat.round() as usize).max(1)
}

/// Cursor movement for keyboard navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Shape of one section for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionGrid {
    pub id: SectionId,
    pub bars: usize,
    pub rows: usize,
}

/// Geometry of an instrument's whole document, sections in playback order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShape {
    pub sections: Vec<SectionGrid>,
    pub cells_per_measure: usize,
}

impl GridShape {
    pub fn section(&self, id: SectionId) -> Option<(usize, &SectionGrid)> {
        self.sections.iter().enumerate().find(|(_, s)| s.id == id)
    }

    /// Whether the coordinate names an existing cell
    pub fn contains(&self, coord: &CellCoord) -> bool {
        self.section(coord.section).is_some_and(|(_, s)| {
            coord.bar < s.bars && coord.row < s.rows && coord.cell < self.cells_per_measure
        })
    }

    /// Every row at one (bar, cell), top row first
    pub fn column(&self, section: SectionId, bar: usize, cell: usize) -> Vec<CellCoord> {
        let Some((_, grid)) = self.section(section) else {
            return Vec::new();
        };
        if bar >= grid.bars || cell >= self.cells_per_measure {
            return Vec::new();
        }
        (0..grid.rows)
            .map(|row| CellCoord::new(section, bar, row, cell))
            .collect()
    }

    /// Column-complete range between two coordinates, inclusive.
    ///
    /// Same-section pairs cover every column whose flat position lies between
    /// `a` and `b`, expanded to all rows. Pairs from different sections
    /// collapse to the single column at `b`. Ordered by flat position, then row.
    pub fn full_column_range(&self, a: &CellCoord, b: &CellCoord) -> Vec<CellCoord> {
        if a.section != b.section {
            return self.column(b.section, b.bar, b.cell);
        }
        let Some((_, grid)) = self.section(b.section) else {
            return Vec::new();
        };

        let cpm = self.cells_per_measure;
        if cpm == 0 {
            return Vec::new();
        }
        let (fa, fb) = (a.flat(cpm), b.flat(cpm));
        let (lo, hi) = (fa.min(fb), fa.max(fb));
        let end = (grid.bars * cpm).min(hi + 1);

        let mut range = Vec::with_capacity(end.saturating_sub(lo) * grid.rows);
        for flat in lo..end {
            for row in 0..grid.rows {
                range.push(CellCoord::new(b.section, flat / cpm, row, flat % cpm));
            }
        }
        range
    }

    /// One step from `from`. Up/Down clamp to the section's rows; Left/Right
    /// cross bar and section boundaries and clamp at the document ends.
    /// None when `from` is not on the grid.
    pub fn navigate(&self, from: &CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(from) {
            return None;
        }
        let (index, grid) = self.section(from.section)?;
        let cpm = self.cells_per_measure;
        let mut to = *from;

        match direction {
            Direction::Up => to.row = from.row.saturating_sub(1),
            Direction::Down => to.row = (from.row + 1).min(grid.rows - 1),
            Direction::Left => {
                if from.cell > 0 {
                    to.cell -= 1;
                } else if from.bar > 0 {
                    to.bar -= 1;
                    to.cell = cpm - 1;
                } else if let Some(prev) = index.checked_sub(1).and_then(|i| self.sections.get(i)) {
                    to = self.enter(prev, prev.bars.saturating_sub(1), cpm - 1, from.row)?;
                }
            }
            Direction::Right => {
                if from.cell + 1 < cpm {
                    to.cell += 1;
                } else if from.bar + 1 < grid.bars {
                    to.bar += 1;
                    to.cell = 0;
                } else if let Some(next) = self.sections.get(index + 1) {
                    to = self.enter(next, 0, 0, from.row)?;
                }
            }
        }
        Some(to)
    }

    fn enter(&self, grid: &SectionGrid, bar: usize, cell: usize, row: usize) -> Option<CellCoord> {
        if grid.bars == 0 || grid.rows == 0 {
            return None;
        }
        Some(CellCoord::new(grid.id, bar, row.min(grid.rows - 1), cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridShape {
        GridShape {
            sections: vec![
                SectionGrid {
                    id: SectionId(1),
                    bars: 2,
                    rows: 6,
                },
                SectionGrid {
                    id: SectionId(2),
                    bars: 1,
                    rows: 4,
                },
            ],
            cells_per_measure: 4,
        }
    }

    fn at(section: u64, bar: usize, row: usize, cell: usize) -> CellCoord {
        CellCoord::new(SectionId(section), bar, row, cell)
    }

    #[test]
    fn test_beat_projection() {
        let pos = BeatPosition::from_cell(9, 4.0);
        assert_eq!(pos, BeatPosition { beat: 2, cell_within_beat: 1 });
        assert_eq!(pos.to_cell(4.0), 9);

        // 6/8 at 1/8T: 1.5 cells per beat rounds to 2
        assert_eq!(BeatPosition::from_cell(5, 1.5).beat, 2);
    }

    #[test]
    fn test_range_is_column_complete() {
        let grid = grid();
        let range = grid.full_column_range(&at(1, 0, 5, 2), &at(1, 1, 0, 1));
        // flat 2..=5 → 4 columns × 6 rows
        assert_eq!(range.len(), 24);
        assert_eq!(range.len() % 6, 0);
        assert_eq!(range[0], at(1, 0, 0, 2));
        assert_eq!(range[23], at(1, 1, 5, 1));
    }

    #[test]
    fn test_range_order_independent() {
        let grid = grid();
        let forward = grid.full_column_range(&at(1, 0, 0, 1), &at(1, 1, 3, 3));
        let backward = grid.full_column_range(&at(1, 1, 3, 3), &at(1, 0, 0, 1));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_range_sizes_multiple_of_rows() {
        let grid = grid();
        for a in 0..8 {
            for b in 0..8 {
                let range = grid.full_column_range(&at(1, a / 4, 0, a % 4), &at(1, b / 4, 2, b % 4));
                assert_eq!(range.len() % 6, 0);
                assert_eq!(range.len(), (a.max(b) - a.min(b) + 1) * 6);
            }
        }
    }

    #[test]
    fn test_cross_section_collapses_to_end_column() {
        let grid = grid();
        let range = grid.full_column_range(&at(1, 0, 0, 0), &at(2, 0, 1, 3));
        assert_eq!(range, grid.column(SectionId(2), 0, 3));
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_unknown_section_range_is_empty() {
        let grid = grid();
        assert!(grid.full_column_range(&at(9, 0, 0, 0), &at(9, 0, 0, 1)).is_empty());
    }

    #[test]
    fn test_navigate_vertical_clamps() {
        let grid = grid();
        assert_eq!(grid.navigate(&at(1, 0, 0, 0), Direction::Up), Some(at(1, 0, 0, 0)));
        assert_eq!(grid.navigate(&at(1, 0, 5, 0), Direction::Down), Some(at(1, 0, 5, 0)));
        assert_eq!(grid.navigate(&at(1, 0, 2, 0), Direction::Down), Some(at(1, 0, 3, 0)));
    }

    #[test]
    fn test_navigate_wraps_bars_and_sections() {
        let grid = grid();
        assert_eq!(grid.navigate(&at(1, 0, 1, 3), Direction::Right), Some(at(1, 1, 1, 0)));
        assert_eq!(grid.navigate(&at(1, 1, 1, 0), Direction::Left), Some(at(1, 0, 1, 3)));
        // Row clamps to the smaller section
        assert_eq!(grid.navigate(&at(1, 1, 5, 3), Direction::Right), Some(at(2, 0, 3, 0)));
        assert_eq!(grid.navigate(&at(2, 0, 0, 0), Direction::Left), Some(at(1, 1, 0, 3)));
    }

    #[test]
    fn test_navigate_clamps_at_document_ends() {
        let grid = grid();
        assert_eq!(grid.navigate(&at(1, 0, 0, 0), Direction::Left), Some(at(1, 0, 0, 0)));
        assert_eq!(grid.navigate(&at(2, 0, 0, 3), Direction::Right), Some(at(2, 0, 0, 3)));
        assert_eq!(grid.navigate(&at(3, 0, 0, 0), Direction::Right), None);
    }
}
