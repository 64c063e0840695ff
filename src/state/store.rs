use async_trait::async_trait;
use thiserror::Error;

/// Key-value collaborator used for both ledger entries and node records.
///
/// Implementations must give read-your-writes within one invocation and
/// serialize conflicting writes to the same key.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Unconditionally replaces any prior value at `key`
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
