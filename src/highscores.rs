//! High score persistence
//!
//! A single text file holding the best score as a decimal integer. A missing
//! or unreadable file counts as 0; the game never fails because of it.

use std::path::{Path, PathBuf};

use crate::persistence::{self, PersistError};

/// Default file name, next to the executable's working directory
pub const DEFAULT_HIGHSCORE_FILE: &str = "highscore.txt";

/// File-backed best score
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    best: u32,
}

impl HighScoreStore {
    /// Open the store, reading whatever score is on disk
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = Self::load(&path);
        Self { path, best }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best score known to the store
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Read the score from `path`, recovering to 0 on any problem
    pub fn load(path: &Path) -> u32 {
        match Self::try_load(path) {
            Ok(Some(score)) => {
                log::info!("Loaded high score {} from {}", score, path.display());
                score
            }
            Ok(None) => {
                log::info!("No high score at {}, starting at 0", path.display());
                0
            }
            Err(e) => {
                log::warn!("Ignoring high score file: {}", e);
                0
            }
        }
    }

    fn try_load(path: &Path) -> Result<Option<u32>, PersistError> {
        let Some(text) = persistence::read_text(path)? else {
            return Ok(None);
        };
        text.trim()
            .parse()
            .map(Some)
            .map_err(|_| PersistError::NotAnInteger {
                path: path.to_path_buf(),
                content: text.clone(),
            })
    }

    /// Persist `score` if it beats the stored best.
    ///
    /// Returns `Ok(true)` when the file was rewritten.
    pub fn record(&mut self, score: u32) -> Result<bool, PersistError> {
        if score <= self.best {
            return Ok(false);
        }
        persistence::write_atomic(&self.path, &score.to_string())?;
        self.best = score;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(true)
    }
}
