// Audio backends - consumers of the trigger contract

use super::trigger::{TriggerEvent, WaveformType};
use crate::config::EditorConfig;
use crate::messaging::channels::{TriggerConsumer, TriggerProducer, create_trigger_channel};
use ringbuf::traits::Producer;

/// Trigger contract the playback scheduler drives
///
/// Calls are fire-and-forget: they must not block and cannot fail from
/// the caller's point of view. The backend is created once per session and
/// handed to the scheduler.
pub trait AudioBackend {
    fn trigger_tone(&mut self, frequency_hz: f64, duration_sec: f64, waveform: WaveformType);

    fn trigger_click(&mut self, accented: bool);
}

/// Forwards triggers over a lock-free ring buffer to whatever renders sound
pub struct ChannelBackend {
    producer: TriggerProducer,
    dropped: u64,
}

impl ChannelBackend {
    pub fn new(producer: TriggerProducer) -> Self {
        Self {
            producer,
            dropped: 0,
        }
    }

    /// Backend on a fresh channel sized by `trigger_channel_capacity`;
    /// the consumer goes to whatever renders the sound
    pub fn with_config(config: &EditorConfig) -> (Self, TriggerConsumer) {
        let (producer, consumer) = create_trigger_channel(config.trigger_channel_capacity);
        (Self::new(producer), consumer)
    }

    /// Events lost because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn send(&mut self, event: TriggerEvent) {
        if self.producer.try_push(event).is_err() {
            self.dropped += 1;
            tracing::warn!("Trigger channel full, dropped {:?}", event);
        }
    }
}

impl AudioBackend for ChannelBackend {
    fn trigger_tone(&mut self, frequency_hz: f64, duration_sec: f64, waveform: WaveformType) {
        self.send(TriggerEvent::tone(frequency_hz, duration_sec, waveform));
    }

    fn trigger_click(&mut self, accented: bool) {
        self.send(TriggerEvent::Click { accented });
    }
}

/// Keeps every trigger in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub events: Vec<TriggerEvent>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> impl Iterator<Item = &TriggerEvent> {
        self.events.iter().filter(|e| !e.is_click())
    }

    pub fn clicks(&self) -> impl Iterator<Item = &TriggerEvent> {
        self.events.iter().filter(|e| e.is_click())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl AudioBackend for RecordingBackend {
    fn trigger_tone(&mut self, frequency_hz: f64, duration_sec: f64, waveform: WaveformType) {
        self.events
            .push(TriggerEvent::tone(frequency_hz, duration_sec, waveform));
    }

    fn trigger_click(&mut self, accented: bool) {
        self.events.push(TriggerEvent::Click { accented });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::create_trigger_channel;
    use ringbuf::traits::{Consumer, Observer};

    #[test]
    fn test_channel_backend_forwards() {
        let (producer, mut consumer) = create_trigger_channel(4);
        let mut backend = ChannelBackend::new(producer);
        backend.trigger_click(true);
        backend.trigger_tone(110.0, 0.25, WaveformType::Sine);

        assert_eq!(consumer.try_pop(), Some(TriggerEvent::Click { accented: true }));
        assert_eq!(
            consumer.try_pop(),
            Some(TriggerEvent::tone(110.0, 0.25, WaveformType::Sine))
        );
    }

    #[test]
    fn test_channel_backend_drops_when_full() {
        let (producer, consumer) = create_trigger_channel(2);
        let mut backend = ChannelBackend::new(producer);
        for _ in 0..5 {
            backend.trigger_click(false);
        }
        assert_eq!(backend.dropped(), 3);
        assert_eq!(consumer.occupied_len(), 2);
    }

    #[test]
    fn test_channel_sized_from_config() {
        let config = EditorConfig {
            trigger_channel_capacity: 3,
            ..EditorConfig::default()
        };
        let (mut backend, consumer) = ChannelBackend::with_config(&config);
        for _ in 0..4 {
            backend.trigger_click(false);
        }
        assert_eq!(consumer.occupied_len(), 3);
        assert_eq!(backend.dropped(), 1);
    }

    #[test]
    fn test_recording_backend() {
        let mut backend = RecordingBackend::new();
        backend.trigger_click(false);
        backend.trigger_tone(82.41, 0.1, WaveformType::Square);
        assert_eq!(backend.clicks().count(), 1);
        assert_eq!(backend.tones().count(), 1);
    }
}
