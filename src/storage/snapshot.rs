//! Reading and writing the persisted board record.
//!
//! Failures here are never fatal. They are logged, reported once through the
//! [`Notifier`], and the caller carries on with whatever it has in memory.

use crate::{
    domain::board::BoardState,
    error::Result,
    storage::{Notifier, Storage},
};
use serde_json::Value;

pub const LOAD_FAILED: &str = "Failed to load state";
pub const SAVE_FAILED: &str = "Failed to save state";

/// What reading the persisted record produced
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Nothing usable is stored
    Empty,
    /// The record exists but could not be read or parsed; already reported
    Unreadable,
    /// A JSON object, not yet validated
    Stored(Value),
}

impl Snapshot {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Stored(value) => Some(value),
            Self::Empty | Self::Unreadable => None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable)
    }
}

/// Loads the raw persisted record under `key`
///
/// A missing record or a value that is not a JSON object is silently
/// [`Snapshot::Empty`]. Read errors and unparsable JSON are reported and give
/// [`Snapshot::Unreadable`].
pub async fn load_snapshot(
    storage: &dyn Storage,
    key: &str,
    notifier: &dyn Notifier,
) -> Snapshot {
    let raw = match storage.load(key).await {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return Snapshot::Empty,
        Err(e) => {
            tracing::warn!(key, error = %e, "reading persisted board failed");
            notifier.notify(LOAD_FAILED);
            return Snapshot::Unreadable;
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) if value.is_object() => Snapshot::Stored(value),
        Ok(_) => {
            tracing::debug!(key, "persisted record is not an object");
            Snapshot::Empty
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "persisted board is not valid JSON");
            notifier.notify(LOAD_FAILED);
            Snapshot::Unreadable
        }
    }
}

/// Writes the persistent fields of `state` under `key`
///
/// Returns whether the write went through.
pub async fn save_snapshot(
    storage: &dyn Storage,
    key: &str,
    state: &BoardState,
    pretty: bool,
    notifier: &dyn Notifier,
) -> bool {
    match write_snapshot(storage, key, state, pretty).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "persisting board failed");
            notifier.notify(SAVE_FAILED);
            false
        }
    }
}

async fn write_snapshot(
    storage: &dyn Storage,
    key: &str,
    state: &BoardState,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(&state.persisted())?
    } else {
        serde_json::to_string(&state.persisted())?
    };
    storage.save(key, &json).await
}
