// Audio trigger contract and backends
// Sound synthesis itself lives outside this crate; the scheduler only emits triggers.

pub mod backend;
pub mod trigger;

pub use backend::{AudioBackend, ChannelBackend, RecordingBackend};
pub use trigger::{TriggerEvent, WaveformType};
