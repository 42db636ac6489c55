// PlaybackDriver - runs the scheduler in real time on the calling thread

use super::scheduler::{PlaybackScheduler, StepOutcome};
use super::timer::SleepTimer;
use crate::audio::backend::AudioBackend;
use crate::store::TabStore;

/// Blocking playback loop for the command line
///
/// Each iteration sleeps until the armed deadline, then runs the step,
/// which arms the next deadline from the tempo at that moment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackDriver {
    max_steps: Option<usize>,
}

impl PlaybackDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many played cells (a looping document never ends)
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Play until the document ends or the step limit is hit.
    /// Returns the number of cells played.
    pub fn run<B: AudioBackend>(
        &self,
        scheduler: &mut PlaybackScheduler<B, SleepTimer>,
        store: &TabStore,
    ) -> usize {
        let mut played = 0;
        let mut outcome = scheduler.start(store);

        loop {
            match outcome {
                StepOutcome::Played { .. } => played += 1,
                StepOutcome::Finished => break,
                StepOutcome::Stale => {}
            }
            if self.max_steps.is_some_and(|max| played >= max) {
                scheduler.stop();
                break;
            }
            let Some(handle) = scheduler.timer_mut().wait() else {
                break;
            };
            outcome = scheduler.step(handle, store);
        }

        tracing::info!("Played {} cells", played);
        played
    }
}
