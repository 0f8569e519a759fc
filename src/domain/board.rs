use crate::domain::task::{Task, TaskId};
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::{
    borrow::Borrow,
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
};
use uuid::Uuid;

/// Unique identifier for a column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Creates a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, ordered bucket of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<TaskId>,
}

impl Column {
    pub fn new(id: ColumnId, title: String) -> Self {
        Self {
            id,
            title,
            task_ids: Vec::new(),
        }
    }

    pub fn with_task_ids(&self, task_ids: Vec<TaskId>) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            task_ids,
        }
    }

    pub fn with_title(&self, title: String) -> Self {
        Self {
            id: self.id.clone(),
            title,
            task_ids: self.task_ids.clone(),
        }
    }
}

/// Completion filter applied when listing tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Complete,
    Incomplete,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Complete => write!(f, "complete"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// The whole board: the task/column graph plus transient UI state
///
/// Only `tasks`, `columns` and `column_order` are ever persisted. The filter,
/// search query and selection always start from their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub tasks: HashMap<TaskId, Task>,
    pub columns: HashMap<ColumnId, Column>,
    pub column_order: Vec<ColumnId>,
    pub filter: Filter,
    pub search_query: String,
    pub selected_task_ids: BTreeSet<TaskId>,
}

impl BoardState {
    /// A board with no columns and default UI state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrowed view of the fields that get persisted
    pub fn persisted(&self) -> PersistedView<'_> {
        PersistedView {
            tasks: &self.tasks,
            columns: &self.columns,
            column_order: &self.column_order,
        }
    }

    /// Columns in display order
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.column_order
            .iter()
            .filter_map(move |id| self.columns.get(id))
    }

    /// Verifies the relational invariants of the board
    pub fn check_invariants(&self) -> Result<()> {
        for (id, task) in &self.tasks {
            if &task.id != id {
                return violation(format!("task keyed {} carries id {}", id, task.id));
            }
            if task.text.trim().is_empty() {
                return violation(format!("task {} has blank text", id));
            }
        }

        let mut owned: HashSet<&TaskId> = HashSet::new();
        for (id, column) in &self.columns {
            if &column.id != id {
                return violation(format!("column keyed {} carries id {}", id, column.id));
            }
            if column.title.trim().is_empty() {
                return violation(format!("column {} has blank title", id));
            }
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return violation(format!("column {} references missing task {}", id, task_id));
                }
                if !owned.insert(task_id) {
                    return violation(format!("task {} appears more than once", task_id));
                }
            }
        }

        if let Some(orphan) = self.tasks.keys().find(|id| !owned.contains(id)) {
            return violation(format!("task {} belongs to no column", orphan));
        }

        let ordered: HashSet<&ColumnId> = self.column_order.iter().collect();
        if ordered.len() != self.column_order.len() {
            return violation("column order contains duplicates".to_string());
        }
        if ordered.len() != self.columns.len()
            || !self.columns.keys().all(|id| ordered.contains(id))
        {
            return violation("column order is not a permutation of the columns".to_string());
        }

        if let Some(stale) = self
            .selected_task_ids
            .iter()
            .find(|id| !self.tasks.contains_key(*id))
        {
            return violation(format!("selection references missing task {}", stale));
        }

        Ok(())
    }
}

fn violation(message: String) -> Result<()> {
    Err(BoardError::InvariantViolation(message))
}

/// The persistent part of a board, as recovered from storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistentBoard {
    pub tasks: HashMap<TaskId, Task>,
    pub columns: HashMap<ColumnId, Column>,
    pub column_order: Vec<ColumnId>,
}

impl PersistentBoard {
    /// Overlays default UI state
    pub fn into_state(self) -> BoardState {
        BoardState {
            tasks: self.tasks,
            columns: self.columns,
            column_order: self.column_order,
            ..BoardState::default()
        }
    }
}

/// Serializable borrow of a board's persistent fields
///
/// Tasks and columns are written without their `id`; the mapping key is the id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedView<'a> {
    #[serde(serialize_with = "serialize_task_records")]
    pub tasks: &'a HashMap<TaskId, Task>,
    #[serde(serialize_with = "serialize_column_records")]
    pub columns: &'a HashMap<ColumnId, Column>,
    pub column_order: &'a [ColumnId],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord<'a> {
    text: &'a str,
    completed: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnRecord<'a> {
    title: &'a str,
    task_ids: &'a [TaskId],
}

fn serialize_task_records<S>(
    tasks: &&HashMap<TaskId, Task>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(tasks.iter().map(|(id, task)| {
        let record = TaskRecord {
            text: &task.text,
            completed: task.completed,
            created_at: task.created_at,
        };
        (id, record)
    }))
}

fn serialize_column_records<S>(
    columns: &&HashMap<ColumnId, Column>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(columns.iter().map(|(id, column)| {
        let record = ColumnRecord {
            title: &column.title,
            task_ids: &column.task_ids,
        };
        (id, record)
    }))
}
