// Tablature data model
// Cells, rows, bars, the (section, instrument) table and the grid timing math

pub mod bar;
pub mod cell;
pub mod chords;
pub mod data;
pub mod timing;
pub mod tuning;

pub use bar::{Bar, Row};
pub use cell::{Cell, DrumHit, Technique, MAX_FRET};
pub use chords::{find_chord_shape, ChordShape};
pub use data::TabData;
pub use timing::{NoteResolution, Tempo, TimeSignature};
pub use tuning::{Instrument, StringCounts, Tuning, Tunings};

/// Errors raised when a document setting is rejected at the boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TabError {
    #[error("Cells per measure must be positive (got {0})")]
    InvalidResize(usize),

    #[error("Tempo must be between 20 and 999 BPM (got {0})")]
    InvalidTempo(f64),

    #[error("Invalid time signature {beats}/{note_value}")]
    InvalidTimeSignature { beats: u8, note_value: u8 },

    #[error("Unsupported note resolution: {0} cells per quarter")]
    InvalidResolution(u32),

    #[error("Unsupported string count {count} for {instrument}")]
    InvalidStringCount {
        instrument: Instrument,
        count: usize,
    },
}
