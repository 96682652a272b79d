use async_trait::async_trait;

use super::domain::{NewEntry, PersistedEntry};

/// Remote list holding submitted applications. Items are only ever created
/// and listed.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Fetches every item in the list.
    async fn items(&self) -> Result<Vec<PersistedEntry>, StoreError>;
    /// Creates one item and returns it as stored.
    async fn create(&self, entry: &NewEntry) -> Result<PersistedEntry, StoreError>;
}

/// Error enumeration for remote store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("store response could not be decoded: {0}")]
    Decode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
