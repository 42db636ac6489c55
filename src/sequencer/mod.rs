// Sequencer module
// Playback transport, deferred-step timers and the cell-walking scheduler

pub mod driver;
pub mod metronome;
pub mod scheduler;
pub mod timer;
pub mod transport;

pub use driver::PlaybackDriver;
pub use metronome::{ClickType, Metronome};
pub use scheduler::{PlaybackScheduler, StepOutcome};
pub use timer::{ManualTimer, SleepTimer, Timer, TimerHandle};
pub use transport::{Cursor, PlaybackState, Playhead};
