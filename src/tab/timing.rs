// Timing - Musical grid math for the tab surface
// Converts time signature + note resolution into cell counts and cell durations

use super::TabError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time signature (beats / unit note value)
/// Example: 6/8 time = TimeSignature { beats: 6, note_value: 8 }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSignature {
    pub label: String,
    pub beats: u8,      // Beats per bar
    pub note_value: u8, // Unit note value (4 = quarter note, 8 = eighth note)
}

impl TimeSignature {
    /// Creates a validated time signature
    pub fn new(beats: u8, note_value: u8) -> Result<Self, TabError> {
        if beats == 0 || beats > 32 || !note_value.is_power_of_two() || note_value > 32 {
            return Err(TabError::InvalidTimeSignature { beats, note_value });
        }
        Ok(Self {
            label: format!("{}/{}", beats, note_value),
            beats,
            note_value,
        })
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self::preset(4, 4)
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self::preset(3, 4)
    }

    /// Common 6/8 time signature
    pub fn six_eight() -> Self {
        Self::preset(6, 8)
    }

    fn preset(beats: u8, note_value: u8) -> Self {
        Self {
            label: format!("{}/{}", beats, note_value),
            beats,
            note_value,
        }
    }

    /// Length of one bar measured in quarter notes
    /// Example: 4/4 = 4.0, 6/8 = 3.0
    pub fn quarters_per_measure(&self) -> f64 {
        self.beats as f64 * 4.0 / self.note_value as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.note_value)
    }
}

/// Grid resolution: how many cells subdivide one quarter note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResolution {
    pub label: String,
    pub per_quarter: u32,
}

impl NoteResolution {
    /// Creates a resolution from its cells-per-quarter value
    pub fn new(per_quarter: u32) -> Result<Self, TabError> {
        let label = match per_quarter {
            1 => "1/4",
            2 => "1/8",
            3 => "1/8T",
            4 => "1/16",
            6 => "1/16T",
            8 => "1/32",
            _ => return Err(TabError::InvalidResolution(per_quarter)),
        };
        Ok(Self {
            label: label.to_string(),
            per_quarter,
        })
    }

    pub fn quarter() -> Self {
        Self::preset("1/4", 1)
    }

    pub fn eighth() -> Self {
        Self::preset("1/8", 2)
    }

    pub fn sixteenth() -> Self {
        Self::preset("1/16", 4)
    }

    fn preset(label: &str, per_quarter: u32) -> Self {
        Self {
            label: label.to_string(),
            per_quarter,
        }
    }
}

impl Default for NoteResolution {
    fn default() -> Self {
        Self::sixteenth()
    }
}

/// Tempo in BPM (Beats Per Minute)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo
    /// BPM must be in range [20.0, 999.0]
    pub fn new(bpm: f64) -> Result<Self, TabError> {
        if !(Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm) {
            return Err(TabError::InvalidTempo(bpm));
        }
        Ok(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in milliseconds
    pub fn beat_duration_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Number of cells in every row of every bar
pub fn cells_per_measure(time_signature: &TimeSignature, resolution: &NoteResolution) -> usize {
    (time_signature.quarters_per_measure() * resolution.per_quarter as f64).round() as usize
}

/// Cells per counted beat; compound meters count the unit note, so an
/// eighth-note beat holds half as many cells as a quarter
pub fn cells_per_beat(time_signature: &TimeSignature, resolution: &NoteResolution) -> f64 {
    let unit = if time_signature.note_value == 4 { 1.0 } else { 0.5 };
    resolution.per_quarter as f64 * unit
}

/// Duration of one cell at the given tempo
pub fn ms_per_cell(tempo: &Tempo, time_signature: &TimeSignature, resolution: &NoteResolution) -> f64 {
    tempo.beat_duration_ms() / cells_per_beat(time_signature, resolution)
}

/// Whether a cell index starts a counted beat.
/// Cells per beat is always a multiple of one half, so the test runs on
/// doubled integers: 1.5 cells per beat clicks at cells 0, 3, 6.
/// One cell per beat or fewer puts every cell on a beat.
pub fn is_beat_boundary(cell_index: usize, cells_per_beat: f64) -> bool {
    let doubled = (cells_per_beat * 2.0).round() as usize;
    if doubled <= 2 {
        return true;
    }
    (cell_index * 2) % doubled == 0
}
