// Transport - playback state and the read cursor

use crate::project::types::SectionId;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    /// Check if transport is stopped or paused
    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped | PlaybackState::Paused)
    }
}

/// Next position to play, plus how many times the current section has
/// already played through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub section: usize,
    pub bar: usize,
    pub cell: usize,
    pub repeat: u32,
}

impl Cursor {
    pub fn at(section: usize, bar: usize, cell: usize) -> Self {
        Self {
            section,
            bar,
            cell,
            repeat: 0,
        }
    }
}

/// A played position, addressed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playhead {
    pub section: SectionId,
    pub bar: usize,
    pub cell: usize,
}
