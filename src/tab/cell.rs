// Cell - smallest addressable notation unit

use super::tuning::Instrument;
use std::fmt;

/// Highest fret a cell may hold
pub const MAX_FRET: u8 = 24;

/// Glyph written for an empty cell
pub const REST_GLYPH: char = '-';

/// Articulation marks on stringed instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    HammerOn,
    PullOff,
    SlideUp,
    SlideDown,
    Bend,
    DeadNote,
    PalmMute,
    Vibrato,
}

impl Technique {
    pub const ALL: [Technique; 8] = [
        Technique::HammerOn,
        Technique::PullOff,
        Technique::SlideUp,
        Technique::SlideDown,
        Technique::Bend,
        Technique::DeadNote,
        Technique::PalmMute,
        Technique::Vibrato,
    ];

    pub fn glyph(&self) -> char {
        match self {
            Technique::HammerOn => 'h',
            Technique::PullOff => 'p',
            Technique::SlideUp => '/',
            Technique::SlideDown => '\\',
            Technique::Bend => 'b',
            Technique::DeadNote => 'x',
            Technique::PalmMute => 'm',
            Technique::Vibrato => '~',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.glyph() == glyph)
    }
}

/// Drum line marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumHit {
    Hit,
    Open,
    Accent,
}

impl DrumHit {
    pub fn glyph(&self) -> char {
        match self {
            DrumHit::Hit => 'x',
            DrumHit::Open => 'o',
            DrumHit::Accent => 'X',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'x' => Some(DrumHit::Hit),
            'o' => Some(DrumHit::Open),
            'X' => Some(DrumHit::Accent),
            _ => None,
        }
    }
}

/// Content of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Rest,
    Fret(u8),
    Technique(Technique),
    Drum(DrumHit),
}

impl Cell {
    /// Parse user input or a stored glyph for the given instrument.
    /// Glyphs are instrument-scoped: `x` is a dead note on strings and a hit on drums.
    pub fn parse(input: &str, instrument: Instrument) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input == REST_GLYPH.to_string() {
            return Some(Cell::Rest);
        }

        if input.chars().all(|c| c.is_ascii_digit()) {
            if !instrument.is_stringed() {
                return None;
            }
            return input
                .parse::<u8>()
                .ok()
                .filter(|fret| *fret <= MAX_FRET)
                .map(Cell::Fret);
        }

        let mut chars = input.chars();
        let glyph = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        if instrument.is_stringed() {
            Technique::from_glyph(glyph).map(Cell::Technique)
        } else {
            DrumHit::from_glyph(glyph).map(Cell::Drum)
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Cell::Rest)
    }

    pub fn fret(&self) -> Option<u8> {
        match self {
            Cell::Fret(fret) => Some(*fret),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Rest => write!(f, "{}", REST_GLYPH),
            Cell::Fret(fret) => write!(f, "{}", fret),
            Cell::Technique(technique) => write!(f, "{}", technique.glyph()),
            Cell::Drum(hit) => write!(f, "{}", hit.glyph()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rest() {
        assert_eq!(Cell::parse("-", Instrument::Guitar), Some(Cell::Rest));
        assert_eq!(Cell::parse("  ", Instrument::Drums), Some(Cell::Rest));
    }

    #[test]
    fn test_parse_fret_range() {
        assert_eq!(Cell::parse("0", Instrument::Guitar), Some(Cell::Fret(0)));
        assert_eq!(Cell::parse("24", Instrument::Bass), Some(Cell::Fret(24)));
        assert_eq!(Cell::parse("25", Instrument::Guitar), None);
        assert_eq!(Cell::parse("5", Instrument::Drums), None);
    }

    #[test]
    fn test_glyphs_are_instrument_scoped() {
        assert_eq!(
            Cell::parse("x", Instrument::Guitar),
            Some(Cell::Technique(Technique::DeadNote))
        );
        assert_eq!(Cell::parse("x", Instrument::Drums), Some(Cell::Drum(DrumHit::Hit)));
        assert_eq!(Cell::parse("h", Instrument::Drums), None);
        assert_eq!(Cell::parse("X", Instrument::Guitar), None);
    }

    #[test]
    fn test_display_matches_parse() {
        for technique in Technique::ALL {
            let cell = Cell::Technique(technique);
            assert_eq!(Cell::parse(&cell.to_string(), Instrument::Guitar), Some(cell));
        }
        assert_eq!(Cell::Fret(12).to_string(), "12");
        assert_eq!(Cell::Rest.to_string(), "-");
    }
}
