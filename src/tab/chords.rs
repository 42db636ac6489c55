// Chord-shape library for 6-string guitar
// Templates are high-string-first to line up with bar rows; None = muted string

use super::cell::Cell;

/// A named fingering template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordShape {
    pub name: &'static str,
    pub frets: [Option<u8>; 6],
}

const X: Option<u8> = None;

const fn f(fret: u8) -> Option<u8> {
    Some(fret)
}

pub const CHORD_SHAPES: &[ChordShape] = &[
    ChordShape { name: "C", frets: [f(0), f(1), f(0), f(2), f(3), X] },
    ChordShape { name: "D", frets: [f(2), f(3), f(2), f(0), X, X] },
    ChordShape { name: "E", frets: [f(0), f(0), f(1), f(2), f(2), f(0)] },
    ChordShape { name: "F", frets: [f(1), f(1), f(2), f(3), f(3), f(1)] },
    ChordShape { name: "G", frets: [f(3), f(0), f(0), f(0), f(2), f(3)] },
    ChordShape { name: "A", frets: [f(0), f(2), f(2), f(2), f(0), X] },
    ChordShape { name: "B", frets: [f(2), f(4), f(4), f(4), f(2), X] },
    ChordShape { name: "Am", frets: [f(0), f(1), f(2), f(2), f(0), X] },
    ChordShape { name: "Dm", frets: [f(1), f(3), f(2), f(0), X, X] },
    ChordShape { name: "Em", frets: [f(0), f(0), f(0), f(2), f(2), f(0)] },
    ChordShape { name: "A7", frets: [f(0), f(2), f(0), f(2), f(0), X] },
    ChordShape { name: "C7", frets: [f(0), f(1), f(3), f(2), f(3), X] },
    ChordShape { name: "D7", frets: [f(2), f(1), f(2), f(0), X, X] },
    ChordShape { name: "E7", frets: [f(0), f(0), f(1), f(0), f(2), f(0)] },
    ChordShape { name: "G7", frets: [f(1), f(0), f(0), f(0), f(2), f(3)] },
    ChordShape { name: "B7", frets: [f(2), f(0), f(2), f(1), f(2), X] },
];

/// Look up a shape by its exact name
pub fn find_chord_shape(name: &str) -> Option<&'static ChordShape> {
    CHORD_SHAPES.iter().find(|shape| shape.name == name)
}

impl ChordShape {
    /// Cells stamped into the six rows.
    /// Only fretted strings are written; open and muted strings stay blank.
    pub fn cells(&self) -> [Cell; 6] {
        self.frets.map(|entry| match entry {
            Some(fret) if fret > 0 => Cell::Fret(fret),
            _ => Cell::Rest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chord_shape() {
        assert!(find_chord_shape("Am").is_some());
        assert!(find_chord_shape("am").is_none());
        assert!(find_chord_shape("H#").is_none());
    }

    #[test]
    fn test_c_shape_cells() {
        let cells = find_chord_shape("C").unwrap().cells();
        let glyphs: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        assert_eq!(glyphs, vec!["-", "1", "-", "2", "3", "-"]);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in CHORD_SHAPES.iter().enumerate() {
            for b in &CHORD_SHAPES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
