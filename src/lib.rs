//! # Taskboard Core
//!
//! State core for a column-based task board.
//!
//! This crate provides the board model, the pure reducer every change goes
//! through, the sanitizer that repairs persisted data on startup, and a
//! [`Store`] that owns the current board and writes it through a pluggable
//! [`Storage`] backend. It carries no rendering or input handling.

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use domain::{
    action::Action,
    board::{BoardState, Column, ColumnId, Filter, PersistentBoard},
    dnd::{resolve_drop, DropEvent, Placement},
    task::{Task, TaskId},
};
pub use error::{BoardError, Result};
pub use storage::{FileStorage, LogNotifier, MemoryStorage, Notifier, Storage};
pub use store::{reduce, reduce_with, sanitize_persisted, Environment, Rejection, Store};
