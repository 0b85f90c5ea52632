use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::PersistError;

/// Raw byte storage keyed by session attribute name.
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError>;

    /// Returns whether an entry was removed.
    fn remove(&self, key: &str) -> Result<bool, PersistError>;

    fn contains(&self, key: &str) -> Result<bool, PersistError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Process-local backend.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionBackend for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError> {
        self.entries.lock().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PersistError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn contains(&self, key: &str) -> Result<bool, PersistError> {
        Ok(self.entries.lock().contains_key(key))
    }
}
