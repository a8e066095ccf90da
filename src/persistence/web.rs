//! Browser LocalStorage backend (wasm32)

use web_sys::Storage;

use super::{BEST_SCORE_KEY, ScoreStore, decode_score, encode_score};
use crate::error::StoreError;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".into()))
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_best_score(&self) -> Result<Option<u64>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => decode_score(&raw).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable("LocalStorage read refused".into())),
        }
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(BEST_SCORE_KEY, &encode_score(score)?)
            .map_err(|_| StoreError::Unavailable("LocalStorage write refused".into()))
    }
}
