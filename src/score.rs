//! High score persistence.
//!
//! The game keeps exactly one number across sessions: the best round ever
//! reached. A [`ScoreStore`] loads it once when the game is created and saves
//! it whenever a finished game beats it.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::GameConfig;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "high_score";

/// Score store errors.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed score file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistence for the best round.
pub trait ScoreStore {
    /// The stored score, 0 when nothing has been saved yet.
    fn load(&self) -> Result<u32, ScoreError>;

    fn save(&mut self, score: u32) -> Result<(), ScoreError>;
}

/// In-process slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    score: Rc<Cell<u32>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        let store = Self::default();
        store.score.set(score);
        store
    }

    pub fn score(&self) -> u32 {
        self.score.get()
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, ScoreError> {
        Ok(self.score.get())
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        self.score.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// A saved score and when it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: u32,
    pub achieved_at: DateTime<Utc>,
}

/// JSON file of named slots:
///
/// ```json
/// { "high_score": { "score": 7, "achieved_at": "2024-05-01T12:00:00Z" } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
    slot: String,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_slot(path, DEFAULT_SLOT)
    }

    pub fn with_slot(path: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            slot: slot.into(),
        }
    }

    /// Store in the slot named by the config.
    pub fn from_config(path: impl Into<PathBuf>, config: &GameConfig) -> Self {
        Self::with_slot(path, config.score_slot.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn read_slots(&self) -> Result<BTreeMap<String, HighScoreRecord>, ScoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// The full record for this slot, if one was saved.
    pub fn record(&self) -> Result<Option<HighScoreRecord>, ScoreError> {
        Ok(self.read_slots()?.remove(&self.slot))
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn load(&self) -> Result<u32, ScoreError> {
        Ok(self.record()?.map(|r| r.score).unwrap_or(0))
    }

    /// Keeps the better of the stored and the new score.
    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        let mut slots = self.read_slots()?;
        if let Some(existing) = slots.get(&self.slot) {
            if existing.score >= score {
                log::debug!(
                    "not saving score {}, {} already holds {}",
                    score,
                    self.slot,
                    existing.score
                );
                return Ok(());
            }
        }
        slots.insert(
            self.slot.clone(),
            HighScoreRecord {
                score,
                achieved_at: Utc::now(),
            },
        );

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Write beside the target and rename, so a failed write leaves the old file intact
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &slots)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("saved score {} to {}", score, self.path.display());
        Ok(())
    }
}
