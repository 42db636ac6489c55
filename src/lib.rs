// MyMusic Tab - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod config;
pub mod editor;
pub mod history;
pub mod messaging;
pub mod project;
pub mod selection;
pub mod sequencer;
pub mod store;
pub mod tab;

// Re-export commonly used types for convenience
pub use audio::{AudioBackend, ChannelBackend, RecordingBackend, TriggerEvent, WaveformType};
pub use config::{ConfigError, EditorConfig};
pub use editor::TabEditor;
pub use history::HistoryManager;
pub use messaging::channels::{create_notification_channel, create_trigger_channel};
pub use project::{
    Autosave, Document, FileProjectStore, Project, ProjectError, ProjectId, ProjectStore, Section,
    SectionId, SectionUpdate, export_plain_text,
};
pub use selection::{CellCoord, Direction, GridShape, SelectionEngine};
pub use sequencer::{
    ManualTimer, PlaybackDriver, PlaybackScheduler, PlaybackState, SleepTimer, StepOutcome, Timer,
};
pub use store::TabStore;
pub use tab::{Bar, Cell, Instrument, TabData, TabError, Tuning};
