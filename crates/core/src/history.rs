use crate::{ReadingResult, ReadingStamp};
use std::collections::HashMap;
use thiserror::Error;

/// Key the whole history list is stored under.
pub const HISTORY_KEY: &str = "arcana_history";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("encode history: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Narrow persistence seam: one string value per key.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Completed readings, newest first. Every append rewrites the whole list.
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    readings: Vec<ReadingResult>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Loads the persisted list. Absent, unreadable or corrupt data all mean
    /// an empty history.
    pub fn open(store: S) -> Self {
        let readings = read_readings(&store);
        Self { store, readings }
    }

    pub fn load_all(&self) -> &[ReadingResult] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ReadingResult> {
        self.readings.iter().find(|reading| reading.id == id)
    }

    /// Copy of a past reading to hand to [`crate::Session::restore`].
    pub fn select_for_replay(&self, id: &str) -> Option<ReadingResult> {
        self.get(id).cloned()
    }

    /// Time-based identity for a new reading. Collisions move forward to the
    /// next free millisecond.
    pub fn stamp(&self, now_millis: u64) -> ReadingStamp {
        let mut timestamp = now_millis;
        while self.get(&timestamp.to_string()).is_some() {
            timestamp += 1;
        }
        ReadingStamp::at(timestamp)
    }

    /// Prepends `reading` and persists the full list. The in-memory list keeps
    /// the reading even when persisting fails.
    pub fn append(&mut self, reading: ReadingResult) -> Result<(), HistoryError> {
        tracing::debug!(id = %reading.id, total = self.readings.len() + 1, "history append");
        self.readings.insert(0, reading);
        self.persist()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let body = serde_json::to_string(&self.readings)?;
        self.store.save(HISTORY_KEY, &body)?;
        Ok(())
    }
}

fn read_readings<S: KeyValueStore>(store: &S) -> Vec<ReadingResult> {
    let body = match store.load(HISTORY_KEY) {
        Ok(Some(body)) => body,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(%err, "history unreadable, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&body) {
        Ok(readings) => readings,
        Err(err) => {
            tracing::warn!(%err, "history corrupt, starting empty");
            Vec::new()
        }
    }
}
