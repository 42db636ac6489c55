// Instruments, tunings and open-string pitch tables
//
// Rows are always ordered high-string-first: row 0 is the highest-pitched
// string, the last row is the lowest.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three parts every section carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Guitar,
    Bass,
    Drums,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [Instrument::Guitar, Instrument::Bass, Instrument::Drums];

    /// Guitar and bass have strings (and frets); drums have lines of glyphs
    pub fn is_stringed(&self) -> bool {
        !matches!(self, Instrument::Drums)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Guitar => "guitar",
            Instrument::Bass => "bass",
            Instrument::Drums => "drums",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "guitar" => Some(Instrument::Guitar),
            "bass" => Some(Instrument::Bass),
            "drums" => Some(Instrument::Drums),
            _ => None,
        }
    }

    /// String counts the pitch tables cover
    pub fn supported_string_counts(&self) -> &'static [usize] {
        match self {
            Instrument::Guitar => &[6, 7],
            Instrument::Bass => &[4, 5],
            Instrument::Drums => &[DRUM_LINE_COUNT],
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String tuning preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tuning {
    #[default]
    Standard,
    /// Lowest string dropped a whole tone
    Drop,
    /// Every string lowered a semitone
    HalfStep,
}

impl Tuning {
    /// Semitone offset applied to a string's open pitch
    fn semitone_offset(&self, string_index: usize, string_count: usize) -> i32 {
        match self {
            Tuning::Standard => 0,
            Tuning::Drop if string_index + 1 == string_count => -2,
            Tuning::Drop => 0,
            Tuning::HalfStep => -1,
        }
    }
}

/// Per-instrument tuning (drums are untuned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tunings {
    pub guitar: Tuning,
    pub bass: Tuning,
}

impl Tunings {
    pub fn get(&self, instrument: Instrument) -> Tuning {
        match instrument {
            Instrument::Guitar => self.guitar,
            Instrument::Bass => self.bass,
            Instrument::Drums => Tuning::Standard,
        }
    }

    pub fn set(&mut self, instrument: Instrument, tuning: Tuning) {
        match instrument {
            Instrument::Guitar => self.guitar = tuning,
            Instrument::Bass => self.bass = tuning,
            Instrument::Drums => {}
        }
    }
}

/// Per-instrument string count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringCounts {
    pub guitar: usize,
    pub bass: usize,
}

impl StringCounts {
    /// Row count for an instrument's bars
    pub fn rows_for(&self, instrument: Instrument) -> usize {
        match instrument {
            Instrument::Guitar => self.guitar,
            Instrument::Bass => self.bass,
            Instrument::Drums => DRUM_LINE_COUNT,
        }
    }

    pub fn set(&mut self, instrument: Instrument, count: usize) {
        match instrument {
            Instrument::Guitar => self.guitar = count,
            Instrument::Bass => self.bass = count,
            Instrument::Drums => {}
        }
    }
}

impl Default for StringCounts {
    fn default() -> Self {
        Self { guitar: 6, bass: 4 }
    }
}

/// Open strings in Hz, high-string-first
const GUITAR_6: [f64; 6] = [329.63, 246.94, 196.00, 146.83, 110.00, 82.41];
const GUITAR_7: [f64; 7] = [329.63, 246.94, 196.00, 146.83, 110.00, 82.41, 61.74];
const BASS_4: [f64; 4] = [98.00, 73.42, 55.00, 41.20];
const BASS_5: [f64; 5] = [98.00, 73.42, 55.00, 41.20, 30.87];

const GUITAR_6_NAMES: [&str; 6] = ["e", "B", "G", "D", "A", "E"];
const GUITAR_7_NAMES: [&str; 7] = ["e", "B", "G", "D", "A", "E", "B"];
const BASS_4_NAMES: [&str; 4] = ["G", "D", "A", "E"];
const BASS_5_NAMES: [&str; 5] = ["G", "D", "A", "E", "B"];

/// Drum lines, top to bottom, with the pitch used for their percussion trigger
pub const DRUM_LINES: [(&str, f64); 6] = [
    ("CC", 5200.0),
    ("HH", 8000.0),
    ("SD", 220.0),
    ("HT", 160.0),
    ("FT", 110.0),
    ("BD", 60.0),
];

pub const DRUM_LINE_COUNT: usize = DRUM_LINES.len();

fn open_table(instrument: Instrument, string_count: usize) -> Option<&'static [f64]> {
    match (instrument, string_count) {
        (Instrument::Guitar, 6) => Some(&GUITAR_6),
        (Instrument::Guitar, 7) => Some(&GUITAR_7),
        (Instrument::Bass, 4) => Some(&BASS_4),
        (Instrument::Bass, 5) => Some(&BASS_5),
        _ => None,
    }
}

/// Open-string pitch for a row, after applying the tuning
pub fn open_string_frequency(
    instrument: Instrument,
    string_count: usize,
    string_index: usize,
    tuning: Tuning,
) -> Option<f64> {
    let base = *open_table(instrument, string_count)?.get(string_index)?;
    let offset = tuning.semitone_offset(string_index, string_count);
    Some(transpose(base, offset))
}

/// Pitch of a fretted note: base × 2^(fret/12)
pub fn fret_frequency(open_frequency: f64, fret: u8) -> f64 {
    transpose(open_frequency, fret as i32)
}

fn transpose(frequency: f64, semitones: i32) -> f64 {
    frequency * 2f64.powf(semitones as f64 / 12.0)
}

/// Pitch used for a drum line's percussion trigger
pub fn drum_line_frequency(line_index: usize) -> Option<f64> {
    DRUM_LINES.get(line_index).map(|(_, freq)| *freq)
}

/// Labels printed at the start of each exported row
pub fn row_labels(instrument: Instrument, string_count: usize, tuning: Tuning) -> Vec<String> {
    let names: &[&str] = match (instrument, string_count) {
        (Instrument::Guitar, 6) => &GUITAR_6_NAMES,
        (Instrument::Guitar, 7) => &GUITAR_7_NAMES,
        (Instrument::Bass, 4) => &BASS_4_NAMES,
        (Instrument::Bass, 5) => &BASS_5_NAMES,
        (Instrument::Drums, _) => {
            return DRUM_LINES.iter().map(|(name, _)| name.to_string()).collect();
        }
        _ => return (1..=string_count).map(|n| n.to_string()).collect(),
    };

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if tuning == Tuning::Drop && index + 1 == names.len() && *name == "E" {
                "D".to_string()
            } else {
                name.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_string_frequency_standard() {
        let low_e = open_string_frequency(Instrument::Guitar, 6, 5, Tuning::Standard).unwrap();
        assert!((low_e - 82.41).abs() < 1e-9);
        assert!(open_string_frequency(Instrument::Guitar, 6, 6, Tuning::Standard).is_none());
        assert!(open_string_frequency(Instrument::Drums, 6, 0, Tuning::Standard).is_none());
    }

    #[test]
    fn test_drop_tuning_lowers_only_lowest_string() {
        let dropped = open_string_frequency(Instrument::Guitar, 6, 5, Tuning::Drop).unwrap();
        assert!((dropped - 73.42).abs() < 0.01);

        let a_string = open_string_frequency(Instrument::Guitar, 6, 4, Tuning::Drop).unwrap();
        assert!((a_string - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_fret_frequency_octave() {
        let octave = fret_frequency(110.0, 12);
        assert!((octave - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_labels() {
        assert_eq!(
            row_labels(Instrument::Guitar, 6, Tuning::Drop),
            vec!["e", "B", "G", "D", "A", "D"]
        );
        assert_eq!(row_labels(Instrument::Bass, 4, Tuning::Standard).len(), 4);
        assert_eq!(row_labels(Instrument::Drums, 6, Tuning::Standard)[5], "BD");
    }

    #[test]
    fn test_rows_for_drums_is_fixed() {
        let counts = StringCounts { guitar: 7, bass: 5 };
        assert_eq!(counts.rows_for(Instrument::Guitar), 7);
        assert_eq!(counts.rows_for(Instrument::Drums), DRUM_LINES.len());
    }

    #[test]
    fn test_supported_string_counts() {
        assert_eq!(Instrument::Guitar.supported_string_counts(), &[6, 7]);
        assert_eq!(Instrument::Bass.supported_string_counts(), &[4, 5]);
        assert_eq!(Instrument::Drums.supported_string_counts(), &[DRUM_LINE_COUNT]);
        assert_eq!(DRUM_LINE_COUNT, 6);
    }
}
