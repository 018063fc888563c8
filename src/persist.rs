//! Key-value persistence collaborator.
//!
//! The game only needs a handful of redis-style operations, so the surface is
//! kept to exactly those. [`MemoryStore`] is the in-process implementation used
//! during development and in tests; a networked store can implement the same
//! trait without the rest of the crate noticing.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::constants::HIGH_SCORE_KEY;
use crate::error::StoreError;

/// A string-keyed store holding either plain values or per-key hashes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Increments the integer stored at `key`, treating a missing key as 0.
    fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Removes `key`, returning whether it existed.
    fn del(&self, key: &str) -> Result<bool, StoreError>;

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Sets `field` in the hash at `key`, returning whether the field is new.
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError>;

    fn hmget(&self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Value(String),
    Hash(HashMap<String, String>),
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entries.lock().get(key) {
            None => Ok(None),
            Some(Entry::Value(value)) => Ok(Some(value.clone())),
            Some(Entry::Hash(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), Entry::Value(value.to_string()));
        Ok(())
    }

    fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry::Value("0".to_string()));

        match entry {
            Entry::Value(value) => {
                let current: i64 = value.parse().map_err(|_| StoreError::NotAnInteger(key.to_string()))?;
                let next = current.checked_add(1).ok_or_else(|| StoreError::NotAnInteger(key.to_string()))?;
                *value = next.to_string();
                Ok(next)
            }
            Entry::Hash(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    fn del(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        match self.entries.lock().get(key) {
            None => Ok(None),
            Some(Entry::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(Entry::Value(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry::Hash(HashMap::new()));

        match entry {
            Entry::Hash(hash) => Ok(hash.insert(field.to_string(), value.to_string()).is_none()),
            Entry::Value(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    fn hmget(&self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        match self.entries.lock().get(key) {
            None => Ok(vec![None; fields.len()]),
            Some(Entry::Hash(hash)) => Ok(fields.iter().map(|field| hash.get(*field).cloned()).collect()),
            Some(Entry::Value(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }
}

/// Reads the locally persisted high score.
///
/// A missing key reads as 0. So does a value that is not a decimal integer,
/// which is logged and otherwise ignored.
pub fn read_high_score(store: &dyn KeyValueStore) -> Result<u32, StoreError> {
    let Some(raw) = store.get(HIGH_SCORE_KEY)? else {
        return Ok(0);
    };

    match raw.trim().parse::<u32>() {
        Ok(score) => Ok(score),
        Err(_) => {
            warn!(value = %raw, key = HIGH_SCORE_KEY, "Ignoring unparsable high score");
            Ok(0)
        }
    }
}

/// Compares `score` against the persisted high score and overwrites it when beaten.
///
/// Returns the high score as it was before this call.
pub fn record_high_score(store: &dyn KeyValueStore, score: u32) -> Result<u32, StoreError> {
    let previous = read_high_score(store)?;
    if score > previous {
        store.set(HIGH_SCORE_KEY, &score.to_string())?;
        debug!(score, previous, "Stored new high score");
    }
    Ok(previous)
}
