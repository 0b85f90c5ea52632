use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistError;

/// Encodes persisted objects for client-side round trips (a hidden form field): JSON, then
/// URL-safe base64 without padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientBlobCodec {
    max_bytes: usize,
}

impl ClientBlobCodec {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String, PersistError> {
        let json = serde_json::to_vec(value)?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        if encoded.len() > self.max_bytes {
            return Err(PersistError::BlobTooLarge {
                len: encoded.len(),
                max: self.max_bytes,
            });
        }
        Ok(encoded)
    }

    pub fn decode<T: DeserializeOwned>(&self, blob: &str) -> Result<T, PersistError> {
        let blob = blob.trim();
        if blob.len() > self.max_bytes {
            return Err(PersistError::BlobTooLarge {
                len: blob.len(),
                max: self.max_bytes,
            });
        }
        let json = URL_SAFE_NO_PAD.decode(blob)?;
        Ok(serde_json::from_slice(&json)?)
    }
}

impl Default for ClientBlobCodec {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}
