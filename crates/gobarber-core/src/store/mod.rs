//! Persistent key/value storage for the client.
//!
//! The session lifecycle only needs four operations, captured by the
//! `KeyValueStore` trait. Backends:
//! - `MemoryStore`: process-local, lost on exit
//! - `FileStore`: a JSON object file in the app data directory
//! - `KeyringStore`: one OS keychain entry per key
//!
//! Durability and atomicity are whatever the backend provides.

pub mod file;
pub mod keyring;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use self::keyring::KeyringStore;
pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] ::keyring::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read several keys. The result has one entry per key, in input order.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    /// Write several entries as one logical unit.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove several keys. Absent keys are ignored.
    async fn delete_many(&self, keys: &[&str]) -> Result<(), StoreError>;
}
