//! The dispatch boundary: owns the current board and is its only writer.

use crate::{
    config::StoreConfig,
    domain::{action::Action, board::BoardState},
    storage::{save_snapshot, Notifier, Storage},
};
use std::sync::Arc;
use tokio::sync::watch;

pub mod hydration;
pub mod reducer;
pub mod sanitize;

pub use hydration::{build_initial_state, hydrate, InitialState};
pub use reducer::{reduce, reduce_with, Environment, SystemEnvironment};
pub use sanitize::{sanitize_persisted, Rejection};

/// Holds the current board snapshot and applies actions to it
///
/// Readers get cheap `Arc` snapshots or subscribe to every committed change.
/// Writing requires `&mut self`, so actions are applied strictly one at a time.
pub struct Store {
    state: watch::Sender<Arc<BoardState>>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
}

impl Store {
    /// Hydrates the board from storage and writes the repaired form back
    ///
    /// When the stored record could not be read it is left untouched until
    /// the first committed action.
    pub async fn open(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        config: StoreConfig,
    ) -> Self {
        let initial =
            build_initial_state(storage.as_ref(), &config.storage_key, notifier.as_ref()).await;
        let (state, _) = watch::channel(Arc::new(initial.state));

        let store = Self {
            state,
            storage,
            notifier,
            config,
        };
        if initial.load_failed {
            tracing::warn!(
                key = %store.config.storage_key,
                "persisted board unreadable, skipping write-back"
            );
        } else {
            store.persist(&store.state()).await;
        }
        store
    }

    /// The current board snapshot
    pub fn state(&self) -> Arc<BoardState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receives every snapshot committed from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardState>> {
        self.state.subscribe()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Applies an action, commits the result and persists it
    ///
    /// Rejected actions commit nothing and skip persistence. A failed write is
    /// reported through the notifier; the committed state stays authoritative.
    pub async fn dispatch(&mut self, action: Action) -> Arc<BoardState> {
        let current = self.state();
        let next = reducer::reduce(&current, &action);
        if Arc::ptr_eq(&current, &next) {
            return next;
        }

        tracing::debug!(action = action.kind(), "action applied");
        self.state.send_replace(Arc::clone(&next));
        self.persist(&next).await;
        next
    }

    async fn persist(&self, state: &BoardState) {
        save_snapshot(
            self.storage.as_ref(),
            &self.config.storage_key,
            state,
            self.config.pretty,
            self.notifier.as_ref(),
        )
        .await;
    }
}
