//! High score record
//!
//! A single integer persisted under [`HighScore::STORAGE_KEY`]. The stored
//! value only ever moves up: [`HighScore::report`] ignores anything that
//! does not beat the current record.

use crate::persistence::KeyValueStore;

/// Persisted best score with an in-memory mirror
pub struct HighScore<S: KeyValueStore> {
    store: S,
    best: u64,
}

impl<S: KeyValueStore> HighScore<S> {
    pub const STORAGE_KEY: &'static str = "grid_runner_high_score";

    /// Load the record from `store` (0 if missing or unparsable)
    pub fn load(store: S) -> Self {
        let best = read_score(&store);
        log::info!("High score loaded: {}", best);
        Self { store, best }
    }

    /// Current record
    pub fn get(&self) -> u64 {
        self.best
    }

    /// Submit a finished run's score; returns true if it set a new record
    pub fn report(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.set(Self::STORAGE_KEY, &score.to_string()) {
            // Mirror still advances so the session shows the new record
            log::warn!("Failed to persist high score {}: {}", score, e);
        } else {
            log::info!("New high score: {}", score);
        }
        true
    }

    /// Mutable access for other values sharing the same store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn read_score<S: KeyValueStore>(store: &S) -> u64 {
    store
        .get(HighScore::<S>::STORAGE_KEY)
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StorageError};
    use proptest::prelude::*;

    const KEY: &str = HighScore::<MemoryStore>::STORAGE_KEY;

    #[test]
    fn test_missing_value_reads_zero() {
        let hs = HighScore::load(MemoryStore::new());
        assert_eq!(hs.get(), 0);
    }

    #[test]
    fn test_garbage_value_reads_zero() {
        for raw in ["", "abc", "-5", "12.5", "NaN"] {
            let hs = HighScore::load(MemoryStore::with_entry(KEY, raw));
            assert_eq!(hs.get(), 0, "raw value {raw:?}");
        }
    }

    #[test]
    fn test_existing_value_is_loaded() {
        let hs = HighScore::load(MemoryStore::with_entry(KEY, " 420\n"));
        assert_eq!(hs.get(), 420);
    }

    #[test]
    fn test_report_only_raises() {
        let mut hs = HighScore::load(MemoryStore::with_entry(KEY, "100"));
        assert!(!hs.report(50));
        assert!(!hs.report(100));
        assert_eq!(hs.store_mut().get(KEY).as_deref(), Some("100"));
        assert!(hs.report(150));
        assert_eq!(hs.get(), 150);
        assert_eq!(hs.store_mut().get(KEY).as_deref(), Some("150"));
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_write_failure_still_updates_mirror() {
        let mut hs = HighScore::load(BrokenStore);
        assert!(hs.report(30));
        assert_eq!(hs.get(), 30);
    }

    proptest! {
        #[test]
        fn prop_record_is_max_of_reports(initial in 0u64..1000, scores in prop::collection::vec(0u64..5000, 0..32)) {
            let mut hs = HighScore::load(MemoryStore::with_entry(KEY, &initial.to_string()));
            for &s in &scores {
                hs.report(s);
            }
            let expected = scores.iter().copied().fold(initial, u64::max);
            prop_assert_eq!(hs.get(), expected);
            let reloaded = HighScore::load(hs.store_mut().clone());
            prop_assert_eq!(reloaded.get(), expected);
        }
    }
}
