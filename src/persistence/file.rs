//! JSON file backend (native)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScoreStore, decode_score, encode_score};
use crate::error::StoreError;

/// Best score kept in a small JSON file.
///
/// Writes go to `<path>.tmp` first and are renamed over the real file, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best_score(&self) -> Result<Option<u64>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_score(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let tmp = self.tmp_path();
        fs::write(&tmp, encode_score(score)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("evil-meter-{}-{}", name, std::process::id()));
        let _ = fs::create_dir_all(&dir);
        dir.join("best.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::new(scratch("missing").with_file_name("nope.json"));
        assert_eq!(store.load_best_score().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("save");
        let mut store = JsonFileStore::new(&path);
        store.save_best_score(4200).unwrap();
        assert_eq!(store.load_best_score().unwrap(), Some(4200));
        assert!(!store.tmp_path().exists());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = scratch("corrupt");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load_best_score(), Err(StoreError::Parse(_))));
        let _ = fs::remove_file(path);
    }
}
