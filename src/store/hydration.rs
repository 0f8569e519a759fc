use crate::{
    domain::board::BoardState,
    storage::{load_snapshot, Notifier, Storage},
    store::sanitize::sanitize_persisted,
};
use serde_json::Value;

/// The startup board and how reading it went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialState {
    pub state: BoardState,
    /// The stored record exists but could not be read or parsed
    pub load_failed: bool,
}

/// Builds the startup board from whatever is persisted under `key`
///
/// Falls back to an empty board when nothing usable is stored. Transient UI
/// state (filter, search, selection) always starts from defaults.
pub async fn build_initial_state(
    storage: &dyn Storage,
    key: &str,
    notifier: &dyn Notifier,
) -> InitialState {
    let snapshot = load_snapshot(storage, key, notifier).await;
    InitialState {
        state: hydrate(snapshot.value()),
        load_failed: snapshot.is_unreadable(),
    }
}

/// Turns an already-loaded persisted value into a board
pub fn hydrate(saved: Option<&Value>) -> BoardState {
    let Some(saved) = saved else {
        tracing::debug!("no persisted board, starting empty");
        return BoardState::empty();
    };

    match sanitize_persisted(saved) {
        Ok(board) => {
            tracing::info!(
                tasks = board.tasks.len(),
                columns = board.columns.len(),
                "restored persisted board"
            );
            let state = board.into_state();
            if let Err(e) = state.check_invariants() {
                tracing::debug!(error = %e, "restored board failed invariant check");
            }
            state
        }
        Err(reason) => {
            tracing::warn!(%reason, "discarding persisted board");
            BoardState::empty()
        }
    }
}
