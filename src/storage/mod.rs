use crate::error::Result;
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;
pub mod snapshot;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};

/// Keyed record store the board is persisted through
///
/// Backends only move strings around; they know nothing about board shape.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the record under `key`, or `None` when nothing is stored
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record under `key`
    async fn save(&self, key: &str, contents: &str) -> Result<()>;
}

/// Surfaces non-fatal failures to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Reports notifications through the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
