#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not encode or decode persisted object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("client blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("client blob is {len} bytes, limit is {max}")]
    BlobTooLarge { len: usize, max: usize },
    #[error("session backend failed for `{key}`: {message}")]
    Backend { key: String, message: String },
}
