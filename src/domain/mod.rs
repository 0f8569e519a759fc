pub mod action;
pub mod board;
pub mod dnd;
pub mod ordering;
pub mod query;
pub mod task;

pub use action::Action;
pub use board::{BoardState, Column, ColumnId, Filter, PersistedView, PersistentBoard};
pub use dnd::{resolve_drop, DropEvent, Placement};
pub use task::{Task, TaskId};
