// PlaybackScheduler - walks the document cell by cell and emits triggers

use super::metronome::Metronome;
use super::timer::{Timer, TimerHandle};
use super::transport::{Cursor, PlaybackState, Playhead};
use crate::audio::backend::AudioBackend;
use crate::audio::trigger::WaveformType;
use crate::project::types::Project;
use crate::selection::coord::CellCoord;
use crate::store::TabStore;
use crate::tab::bar::Bar;
use crate::tab::cell::{Cell, DrumHit, Technique};
use crate::tab::tuning::{drum_line_frequency, fret_frequency, open_string_frequency, Instrument};
use std::collections::BTreeSet;
use std::time::Duration;

const MUTED_DURATION_SEC: f64 = 0.05;

/// Result of one scheduler step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// A cell was played and the next step is armed after `delay`
    Played { playhead: Playhead, delay: Duration },
    /// The document ended without looping; playback stopped
    Finished,
    /// The step was not the armed one or playback is no longer running
    Stale,
}

/// Deterministic playback cursor over a `TabStore`
///
/// Exactly one step is armed at a time. `pause` and `stop` cancel it
/// synchronously, and `step` ignores any handle other than the armed one,
/// so a late callback cannot play after a state change.
pub struct PlaybackScheduler<B: AudioBackend, T: Timer> {
    backend: B,
    timer: T,
    state: PlaybackState,
    cursor: Option<Cursor>,
    playhead: Option<Playhead>,
    pending: Option<TimerHandle>,
    looping: bool,
    metronome: Metronome,
    muted: BTreeSet<Instrument>,
    tone_sustain_cells: f64,
}

impl<B: AudioBackend, T: Timer> PlaybackScheduler<B, T> {
    pub fn new(backend: B, timer: T) -> Self {
        Self {
            backend,
            timer,
            state: PlaybackState::Stopped,
            cursor: None,
            playhead: None,
            pending: None,
            looping: false,
            metronome: Metronome::default(),
            muted: BTreeSet::new(),
            tone_sustain_cells: 2.0,
        }
    }

    pub fn with_config(backend: B, timer: T, config: &crate::config::EditorConfig) -> Self {
        let mut scheduler = Self::new(backend, timer);
        scheduler.looping = config.loop_playback;
        scheduler.metronome.set_enabled(config.click_track);
        scheduler.tone_sustain_cells = config.tone_sustain_cells;
        scheduler
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Next position to be played
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Last position played, for highlighting
    pub fn position(&self) -> Option<Playhead> {
        self.playhead
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn click_enabled(&self) -> bool {
        self.metronome.is_enabled()
    }

    pub fn set_click_enabled(&mut self, enabled: bool) {
        self.metronome.set_enabled(enabled);
    }

    pub fn is_muted(&self, instrument: Instrument) -> bool {
        self.muted.contains(&instrument)
    }

    pub fn set_muted(&mut self, instrument: Instrument, muted: bool) {
        if muted {
            self.muted.insert(instrument);
        } else {
            self.muted.remove(&instrument);
        }
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Start or resume playback and play the first cell immediately.
    /// Resumes the stored cursor (after a pause or a seek), else starts at
    /// the top of the document.
    pub fn start(&mut self, store: &TabStore) -> StepOutcome {
        if self.state.is_playing() {
            return StepOutcome::Stale;
        }

        let cursor = self.cursor.unwrap_or_default();
        tracing::debug!(
            "Playback {} at section {} bar {} cell {}",
            if self.state == PlaybackState::Paused { "resumed" } else { "started" },
            cursor.section,
            cursor.bar,
            cursor.cell
        );
        self.cursor = Some(cursor);
        self.state = PlaybackState::Playing;
        self.run_step(store)
    }

    /// Run the armed step. Anything but the armed handle while playing is stale.
    pub fn step(&mut self, handle: TimerHandle, store: &TabStore) -> StepOutcome {
        if !self.state.is_playing() || self.pending != Some(handle) {
            tracing::trace!("Ignoring stale step {:?}", handle);
            return StepOutcome::Stale;
        }
        self.pending = None;
        self.run_step(store)
    }

    /// Cancel the armed step and keep the cursor
    pub fn pause(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.cancel_pending();
        self.state = PlaybackState::Paused;
        tracing::debug!("Playback paused");
    }

    /// Cancel the armed step and forget the cursor
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
        self.cursor = None;
        self.playhead = None;
        tracing::debug!("Playback stopped");
    }

    /// Play/pause toggle
    pub fn toggle(&mut self, store: &TabStore) -> Option<StepOutcome> {
        if self.state.is_playing() {
            self.pause();
            None
        } else {
            Some(self.start(store))
        }
    }

    /// Move the cursor to a cell without changing the play state.
    /// Returns false when the section is unknown.
    pub fn seek(&mut self, project: &Project, coord: &CellCoord) -> bool {
        let Some(section) = project.section_index(coord.section) else {
            return false;
        };
        self.cursor = Some(Cursor::at(section, coord.bar, coord.cell));
        true
    }

    // ---------------------------------------------------------------------
    // Stepping
    // ---------------------------------------------------------------------

    fn run_step(&mut self, store: &TabStore) -> StepOutcome {
        let project = store.project();
        let cells_per_measure = project.cells_per_measure();

        let mut cursor = settle(self.cursor.unwrap_or_default(), project);
        if cursor.is_none() && self.looping {
            tracing::trace!("Looping back to the top");
            cursor = settle(Cursor::default(), project);
        }
        let Some(cursor) = cursor else {
            self.finish();
            return StepOutcome::Finished;
        };

        let section = &project.sections[cursor.section];
        let playhead = Playhead {
            section: section.id,
            bar: cursor.bar,
            cell: cursor.cell,
        };
        tracing::trace!("Step {:?}", playhead);

        if let Some(click) = self.metronome.click_at(cursor.cell, project.cells_per_beat()) {
            self.backend.trigger_click(click.is_accent());
        }

        // Tempo is read fresh every step so live changes apply immediately
        let ms_per_cell = project.ms_per_cell();
        for instrument in Instrument::ALL {
            if self.muted.contains(&instrument) {
                continue;
            }
            let bar = store
                .bars(section.id, instrument)
                .and_then(|bars| bars.get(cursor.bar));
            if let Some(bar) = bar {
                self.emit_column(project, instrument, bar, cursor.cell, ms_per_cell);
            }
        }

        let mut next = cursor;
        next.cell += 1;
        if next.cell >= cells_per_measure {
            next.cell = 0;
            next.bar += 1;
            if next.bar >= section.measures {
                next.bar = 0;
                next.repeat += 1;
                if next.repeat >= section.repeat.max(1) {
                    next.repeat = 0;
                    next.section += 1;
                }
            }
        }

        let delay = Duration::from_secs_f64(ms_per_cell.max(0.0) / 1000.0);
        self.cursor = Some(next);
        self.playhead = Some(playhead);
        self.pending = Some(self.timer.schedule(delay));
        StepOutcome::Played { playhead, delay }
    }

    fn emit_column(&mut self, project: &Project, instrument: Instrument, bar: &Bar, cell: usize, ms_per_cell: f64) {
        let string_count = bar.row_count();
        let tuning = project.tunings.get(instrument);

        for (row, cells) in bar.rows.iter().enumerate() {
            let Some(value) = cells.cells.get(cell) else {
                continue;
            };
            match value {
                Cell::Rest => {}
                Cell::Fret(fret) => {
                    if let Some(open) = open_string_frequency(instrument, string_count, row, tuning) {
                        let duration = ms_per_cell / 1000.0 * self.tone_sustain_cells;
                        self.backend
                            .trigger_tone(fret_frequency(open, *fret), duration, pitched_waveform(instrument));
                    }
                }
                Cell::Technique(Technique::PalmMute) => {
                    if let Some(open) = open_string_frequency(instrument, string_count, row, tuning) {
                        self.backend
                            .trigger_tone(open, MUTED_DURATION_SEC, WaveformType::Square);
                    }
                }
                // Articulation marks only
                Cell::Technique(_) => {}
                Cell::Drum(hit) => {
                    if let Some(frequency) = drum_line_frequency(row) {
                        self.backend
                            .trigger_tone(frequency, drum_duration(*hit), WaveformType::Noise);
                    }
                }
            }
        }
    }

    fn finish(&mut self) {
        self.state = PlaybackState::Stopped;
        self.cursor = None;
        self.pending = None;
        tracing::debug!("Playback reached the end");
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
    }
}

/// First playable position at or after `cursor`; None past the last section
fn settle(mut cursor: Cursor, project: &Project) -> Option<Cursor> {
    let cells_per_measure = project.cells_per_measure();
    loop {
        let section = project.sections.get(cursor.section)?;
        if cursor.bar >= section.measures || cells_per_measure == 0 {
            cursor = Cursor::at(cursor.section + 1, 0, 0);
        } else if cursor.cell >= cells_per_measure {
            cursor.cell = 0;
            cursor.bar += 1;
        } else {
            return Some(cursor);
        }
    }
}

fn pitched_waveform(instrument: Instrument) -> WaveformType {
    match instrument {
        Instrument::Bass => WaveformType::Triangle,
        _ => WaveformType::Saw,
    }
}

fn drum_duration(hit: DrumHit) -> f64 {
    match hit {
        DrumHit::Hit => 0.08,
        DrumHit::Accent => 0.15,
        DrumHit::Open => 0.3,
    }
}
