use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::{KeyValueStore, StoreError};

/// Default keychain service name
const SERVICE_NAME: &str = "gobarber";

/// Key/value store backed by the OS keychain, one entry per key.
///
/// Keychain calls are synchronous and short, so they run inline. Entries are
/// created once per key and reused.
pub struct KeyringStore {
    service: String,
    entries: Mutex<HashMap<String, Arc<Entry>>>,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Result<Arc<Entry>, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("keychain entry cache poisoned".to_string()))?;
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(Entry::new(&self.service, key)?);
        entries.insert(key.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

#[async_trait]
impl KeyValueStore for KeyringStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.entry(key)?.set_password(value)?;
        }
        debug!(service = %self.service, count = entries.len(), "Keychain entries stored");
        Ok(())
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            match self.entry(key)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
