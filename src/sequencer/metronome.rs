// Metronome - Click track on the cell grid
// Emits a click on every beat boundary, accented on the first cell of a bar

use crate::tab::timing::is_beat_boundary;

/// Metronome click type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// Click on first beat of bar (accent/downbeat)
    Accent,
    /// Click on other beats
    Regular,
}

impl ClickType {
    pub fn is_accent(&self) -> bool {
        matches!(self, ClickType::Accent)
    }
}

/// Click-track switch and beat detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metronome {
    enabled: bool,
}

impl Metronome {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enable/disable metronome
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if metronome is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Click to emit at `cell` of a bar, if any
    pub fn click_at(&self, cell: usize, cells_per_beat: f64) -> Option<ClickType> {
        if !self.enabled || !is_beat_boundary(cell, cells_per_beat) {
            return None;
        }
        Some(if cell == 0 {
            ClickType::Accent
        } else {
            ClickType::Regular
        })
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(true)
    }
}
