//! Best score across sessions
//!
//! Storage faults never reach the player: a failed read counts as "no best
//! score yet", a failed write is logged and skipped.

use crate::persistence::ScoreStore;

pub struct BestScore {
    value: u64,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore").field("value", &self.value).finish()
    }
}

impl BestScore {
    /// Read the stored best score, defaulting to 0 on missing or corrupt data
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let value = match store.load_best_score() {
            Ok(Some(v)) => {
                log::info!("Loaded best score {}", v);
                v
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable best score: {}", e);
                0
            }
        };
        Self { value, store }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Record a finished round. Only a strictly higher score replaces the
    /// best; returns whether it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        match self.store.save_best_score(score) {
            Ok(()) => log::info!("New best score {} saved", score),
            Err(e) => log::warn!("Best score {} not saved: {}", score, e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_to_zero() {
        let best = BestScore::load(Box::new(MemoryStore::new()));
        assert_eq!(best.get(), 0);
    }

    #[test]
    fn test_corrupt_value_reads_as_zero() {
        let best = BestScore::load(Box::new(MemoryStore::with_raw("NaN")));
        assert_eq!(best.get(), 0);
        let best = BestScore::load(Box::new(MemoryStore::broken()));
        assert_eq!(best.get(), 0);
    }

    #[test]
    fn test_only_strictly_higher_updates() {
        let probe = MemoryStore::with_raw("500");
        let mut best = BestScore::load(Box::new(probe.clone()));
        assert_eq!(best.get(), 500);

        assert!(!best.record(500));
        assert_eq!(probe.raw().as_deref(), Some("500"));

        assert!(!best.record(120));
        assert!(best.record(501));
        assert_eq!(best.get(), 501);
        assert_eq!(probe.load_best_score().unwrap(), Some(501));
    }

    #[test]
    fn test_write_failure_still_tracks_in_memory() {
        let mut best = BestScore::load(Box::new(MemoryStore::broken()));
        assert!(best.record(10));
        assert_eq!(best.get(), 10);
    }
}
