use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Difficulty;
use crate::game::GameOverEvent;

const APP_DIR_NAME: &str = "arcade-snake";
const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";
const LOG_FILE_NAME: &str = "arcade-snake.log";

/// Number of entries kept on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to access leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("leaderboard file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns the platform-correct data directory for this game.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

#[must_use]
pub fn leaderboard_path() -> PathBuf {
    data_dir().join(LEADERBOARD_FILE_NAME)
}

#[must_use]
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

/// Where a malformed leaderboard at `path` is moved before a fresh one replaces it.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Best finished games plus per-difficulty high scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    #[serde(default)]
    entries: Vec<GameOverEvent>,
    #[serde(default)]
    high_scores: BTreeMap<Difficulty, u32>,
    #[serde(default)]
    last_difficulty: Option<Difficulty>,
}

impl Leaderboard {
    /// Loads the leaderboard, returning an empty one when the file does not exist yet.
    pub fn load_from_path(path: &Path) -> Result<Self, ScoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no leaderboard yet");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ScoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| ScoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the leaderboard, moving a malformed file to [`backup_path`].
    ///
    /// Returns an empty board once the bad file is out of the way, so saving
    /// afterwards cannot overwrite it. Read and rename failures are returned;
    /// callers should not save over a file they could not inspect.
    pub fn load_or_backup(path: &Path) -> Result<Self, ScoreError> {
        match Self::load_from_path(path) {
            Err(ScoreError::Parse { source: parse_error, .. }) => {
                let backup = backup_path(path);
                fs::rename(path, &backup).map_err(|source| ScoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                warn!(
                    error = %parse_error,
                    backup = %backup.display(),
                    "malformed leaderboard moved aside"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes the leaderboard, creating parent directories when needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ScoreError> {
        let io_error = |source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ScoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(io_error)?;
        debug!(path = %path.display(), entries = self.entries.len(), "leaderboard saved");
        Ok(())
    }

    /// Records a finished game.
    ///
    /// Returns the 1-based rank when the game made the top
    /// [`LEADERBOARD_SIZE`], `None` otherwise.
    pub fn record(&mut self, event: GameOverEvent) -> Option<usize> {
        let best = self.high_scores.entry(event.difficulty).or_insert(0);
        *best = (*best).max(event.final_score);

        // Equal scores keep their arrival order, so the older game ranks higher.
        let rank = self
            .entries
            .iter()
            .position(|entry| entry.final_score < event.final_score)
            .unwrap_or(self.entries.len());

        if rank >= LEADERBOARD_SIZE {
            return None;
        }

        info!(
            rank = rank + 1,
            score = event.final_score,
            difficulty = %event.difficulty,
            "leaderboard entry"
        );
        self.entries.insert(rank, event);
        self.entries.truncate(LEADERBOARD_SIZE);
        Some(rank + 1)
    }

    /// Entries ordered best first.
    #[must_use]
    pub fn entries(&self) -> &[GameOverEvent] {
        &self.entries
    }

    /// Best score ever recorded for `difficulty`, zero when none.
    #[must_use]
    pub fn high_score(&self, difficulty: Difficulty) -> u32 {
        self.high_scores.get(&difficulty).copied().unwrap_or(0)
    }

    /// Difficulty picked in the previous session, if any.
    #[must_use]
    pub fn last_difficulty(&self) -> Option<Difficulty> {
        self.last_difficulty
    }

    pub fn set_last_difficulty(&mut self, difficulty: Difficulty) {
        self.last_difficulty = Some(difficulty);
    }
}
