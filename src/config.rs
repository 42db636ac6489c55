// Editor configuration, stored as RON in the user's config directory

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("No config directory on this platform")]
    NoConfigDir,
}

/// Editor settings; missing fields take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapshots kept for undo
    pub history_limit: usize,
    /// Quiet period before an autosave
    pub autosave_debounce_ms: u64,
    pub loop_playback: bool,
    pub click_track: bool,
    pub trigger_channel_capacity: usize,
    /// Pitched tone length, in cells
    pub tone_sustain_cells: f64,
    /// Tempo for new documents
    pub default_bpm: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: crate::history::DEFAULT_MAX_HISTORY,
            autosave_debounce_ms: 1500,
            loop_playback: false,
            click_track: true,
            trigger_channel_capacity: 1024,
            tone_sustain_cells: 2.0,
            default_bpm: 120.0,
        }
    }
}

impl EditorConfig {
    /// `<config_dir>/mymusic_tab/config.ron`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("mymusic_tab").join("config.ron"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = ron::from_str(&data)?;
        Ok(config.validated())
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        std::fs::write(path, data)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values into their usable ranges
    pub fn validated(mut self) -> Self {
        self.history_limit = self.history_limit.max(1);
        self.trigger_channel_capacity = self.trigger_channel_capacity.max(1);
        if !self.tone_sustain_cells.is_finite() || self.tone_sustain_cells <= 0.0 {
            self.tone_sustain_cells = 2.0;
        }
        if crate::tab::Tempo::new(self.default_bpm).is_err() {
            self.default_bpm = crate::tab::Tempo::default().bpm();
        }
        self
    }

    pub fn autosave_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_debounce_ms)
    }
}
