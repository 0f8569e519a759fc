use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// Settings for the board store and its persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the persisted board is stored under
    pub storage_key: String,
    /// Pretty-print the persisted JSON record
    pub pretty: bool,
}

impl StoreConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "taskboard-state";

    /// Parses a JSON config document, filling missing fields with defaults
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| BoardError::ConfigError(e.to_string()))?;

        if config.storage_key.trim().is_empty() {
            return Err(BoardError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            pretty: false,
        }
    }
}
