use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};

/// Storage file name in the data directory
const STORE_FILE: &str = "storage.json";

/// Key/value store backed by one JSON object file.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a reader never sees a half-written file. A file that no longer
/// parses fails reads, but writes replace it rather than failing.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store in `storage.json` inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::at_path(data_dir.as_ref().join(STORE_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current entries for a read-modify-write. An unparseable file counts as
    /// empty; the flag says it must be rewritten even if nothing changes.
    async fn read_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StoreError> {
        match self.read_all().await {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Serialization(e)) => {
                warn!(path = ?self.path, error = %e, "Discarding unparseable storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = ?self.path, entries = entries.len(), "Storage file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let mut entries = self.read_all().await?;
        Ok(keys.iter().map(|k| entries.remove(*k)).collect())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let (mut all, _) = self.read_for_write().await?;
        for (key, value) in entries {
            all.insert(key.to_string(), value.to_string());
        }
        self.write_all(&all).await
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let (mut all, corrupt) = self.read_for_write().await?;
        let before = all.len();
        for key in keys {
            all.remove(*key);
        }
        if all.len() == before && !corrupt {
            return Ok(());
        }
        self.write_all(&all).await
    }
}
