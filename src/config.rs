//! Game configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::KeyMap;
use crate::score::DEFAULT_SLOT;
use crate::state::playback::{
    Pacing, DEFAULT_ECHO_DURATION, DEFAULT_GAME_OVER_TONE, DEFAULT_LEAD_IN, DEFAULT_SETTLE_DELAY,
};
use crate::state::Difficulty;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Difficulty of the first game
    pub difficulty: Difficulty,

    /// Delay before a presentation starts
    pub lead_in_ms: u64,

    /// Pause between a completed round and the next presentation
    pub settle_ms: u64,

    /// Flash length when echoing a press
    pub echo_ms: u64,

    /// Length of the game-over buzz
    pub game_over_tone_ms: u64,

    pub keys: KeyMap,

    /// Name of the high score slot
    pub score_slot: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            lead_in_ms: DEFAULT_LEAD_IN.as_millis() as u64,
            settle_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            echo_ms: DEFAULT_ECHO_DURATION.as_millis() as u64,
            game_over_tone_ms: DEFAULT_GAME_OVER_TONE.as_millis() as u64,
            keys: KeyMap::default(),
            score_slot: DEFAULT_SLOT.to_string(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.echo_ms == 0 {
            return Err(ConfigError::Invalid("echo_ms must be positive".into()));
        }
        if self.score_slot.trim().is_empty() {
            return Err(ConfigError::Invalid("score_slot must not be empty".into()));
        }
        if let Some(key) = self.keys.find_conflict() {
            return Err(ConfigError::Invalid(format!(
                "key {:?} is bound more than once",
                key
            )));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            lead_in: Duration::from_millis(self.lead_in_ms),
            settle: Duration::from_millis(self.settle_ms),
            echo: Duration::from_millis(self.echo_ms),
            game_over_tone: Duration::from_millis(self.game_over_tone_ms),
        }
    }
}
