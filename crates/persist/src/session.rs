use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::SessionBackend;
use crate::dirty::DirtyTracked;
use crate::error::PersistError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistConfig {
    /// Prepended to every key handed to the backend.
    pub key_prefix: String,
    /// Write on every store even when the object is clean.
    pub always_write: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key_prefix: "weft:".to_string(),
            always_write: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored,
    /// The object was clean and the backend already holds a copy.
    SkippedClean,
}

/// JSON persistence on top of a [`SessionBackend`], skipping writes of unchanged objects.
#[derive(Debug)]
pub struct SessionPersistence<B> {
    backend: B,
    config: PersistConfig,
}

impl<B: SessionBackend> SessionPersistence<B> {
    pub fn new(backend: B, config: PersistConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Loads and decodes the object under `key`. Loaded objects start clean.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistError> {
        let key = self.scoped(key);
        let Some(bytes) = self.backend.get(&key)? else {
            log::trace!(target: "weft.persist", "{key}: nothing stored");
            return Ok(None);
        };
        let value = serde_json::from_slice(&bytes)?;
        log::trace!(target: "weft.persist", "{key}: loaded {} byte(s)", bytes.len());
        Ok(Some(value))
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, PersistError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Writes `value` unless it is clean and a copy already exists.
    ///
    /// The dirty flag is cleared before serializing and set again if encoding or the backend
    /// write fails, so a failed store is retried by the next one.
    pub fn store<T: Serialize + DirtyTracked>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<StoreOutcome, PersistError> {
        let key = self.scoped(key);
        let flag = value.dirty_flag();
        let was_dirty = flag.check_and_reset();
        if !was_dirty && !self.config.always_write && self.backend.contains(&key)? {
            log::trace!(target: "weft.persist", "{key}: clean, skipping write");
            return Ok(StoreOutcome::SkippedClean);
        }

        let written = serde_json::to_vec(value)
            .map_err(PersistError::from)
            .and_then(|bytes| {
                let len = bytes.len();
                self.backend.put(&key, bytes).map(|()| len)
            });
        match written {
            Ok(len) => {
                log::debug!(target: "weft.persist", "{key}: stored {len} byte(s)");
                Ok(StoreOutcome::Stored)
            }
            Err(err) => {
                flag.mark_dirty();
                log::warn!(target: "weft.persist", "{key}: store failed: {err}");
                Err(err)
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<bool, PersistError> {
        self.backend.remove(&self.scoped(key))
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.config.key_prefix)
    }
}
