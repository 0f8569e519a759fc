use crate::{
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

/// In-process storage backend
///
/// Can be switched into a failing mode where every call returns a storage
/// error, which is how quota or permission failures are simulated.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, e.g. to simulate data left by an earlier session
    pub fn with_record(self, key: &str, contents: &str) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), contents.to_string());
        }
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BoardError::StorageError("storage unavailable".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| BoardError::StorageError("storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    async fn save(&self, key: &str, contents: &str) -> Result<()> {
        self.records()?.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}
