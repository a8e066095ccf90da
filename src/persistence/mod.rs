//! Best-score persistence
//!
//! Backends:
//! - `MemoryStore`: in-process key/value cell (tests, headless runs)
//! - `JsonFileStore`: JSON file with tmp-then-rename writes (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Stored values are a small JSON record. A bare integer (the format older
//! builds wrote) is accepted on read.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Key used by key/value backends
pub const BEST_SCORE_KEY: &str = "evilMeterHighScore";

/// A place the best score can be kept between sessions
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load_best_score(&self) -> Result<Option<u64>, StoreError>;
    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Record(BestScoreRecord),
    Bare(u64),
}

/// Decode a stored best-score value
pub fn decode_score(raw: &str) -> Result<u64, StoreError> {
    let stored: StoredScore = serde_json::from_str(raw.trim())?;
    Ok(match stored {
        StoredScore::Record(r) => r.best_score,
        StoredScore::Bare(n) => n,
    })
}

/// Encode a best score for storage
pub fn encode_score(score: u64) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&BestScoreRecord { best_score: score })?)
}

/// Shared in-memory cell holding the raw stored text.
///
/// Clones share the same cell, so a test can keep one handle while the game
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
    broken: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw text (may be corrupt on purpose)
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Rc::new(RefCell::new(Some(raw.to_string()))),
            broken: false,
        }
    }

    /// Store whose every read and write fails
    pub fn broken() -> Self {
        Self {
            raw: Rc::default(),
            broken: true,
        }
    }

    /// Raw text currently stored
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load_best_score(&self) -> Result<Option<u64>, StoreError> {
        if self.broken {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        self.raw.borrow().as_deref().map(decode_score).transpose()
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        if self.broken {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        *self.raw.borrow_mut() = Some(encode_score(score)?);
        Ok(())
    }
}
