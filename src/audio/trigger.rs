// Trigger events - what the scheduler asks the audio backend to play

use serde::{Deserialize, Serialize};

/// Oscillator shape requested for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformType {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
    /// Noise burst, used for percussion
    Noise,
}

/// One fire-and-forget request to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Tone {
        frequency_hz: f64,
        duration_sec: f64,
        waveform: WaveformType,
    },
    /// Click-track tick; accented on the first beat of a bar
    Click { accented: bool },
}

impl TriggerEvent {
    pub fn tone(frequency_hz: f64, duration_sec: f64, waveform: WaveformType) -> Self {
        TriggerEvent::Tone {
            frequency_hz,
            duration_sec,
            waveform,
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(self, TriggerEvent::Click { .. })
    }
}
