//! Ordering and bulk-removal helpers shared by the reducer.
//!
//! All helpers are pure: they take borrowed input and return new collections.

use crate::domain::{
    board::{Column, ColumnId},
    task::{Task, TaskId},
};
use std::collections::{HashMap, HashSet};

/// Bounds `value` to `[min, max]`
///
/// Unlike [`Ord::clamp`] this never panics when `min > max`; `min` wins.
pub fn clamp(value: i64, min: i64, max: i64) -> i64 {
    value.min(max).max(min)
}

/// Moves the element at `from_index` so that it lands at `to_index`
///
/// Returns `None` when either index is negative or out of bounds, or when the
/// indices are equal. Callers treat `None` as "nothing to do".
///
/// # Examples
/// ```
/// use taskboard_core::domain::ordering::reorder_items;
///
/// assert_eq!(reorder_items(&["a", "b", "c"], 0, 2), Some(vec!["b", "c", "a"]));
/// assert_eq!(reorder_items(&["a", "b", "c"], 1, 1), None);
/// ```
pub fn reorder_items<T: Clone>(items: &[T], from_index: i64, to_index: i64) -> Option<Vec<T>> {
    let from = usize::try_from(from_index).ok()?;
    let to = usize::try_from(to_index).ok()?;

    if from >= items.len() || to >= items.len() || from == to {
        return None;
    }

    let mut next = items.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Some(next)
}

/// Strips the given task ids from every column
///
/// Columns that held none of the ids are returned unchanged.
pub fn remove_task_ids_from_columns(
    columns: &HashMap<ColumnId, Column>,
    task_ids: &HashSet<TaskId>,
) -> HashMap<ColumnId, Column> {
    columns
        .iter()
        .map(|(id, column)| {
            let next = if column.task_ids.iter().any(|t| task_ids.contains(t)) {
                column.with_task_ids(
                    column
                        .task_ids
                        .iter()
                        .filter(|t| !task_ids.contains(*t))
                        .cloned()
                        .collect(),
                )
            } else {
                column.clone()
            };
            (id.clone(), next)
        })
        .collect()
}

/// Drops the given tasks from the task mapping
pub fn remove_tasks_by_ids(
    tasks: &HashMap<TaskId, Task>,
    task_ids: &HashSet<TaskId>,
) -> HashMap<TaskId, Task> {
    tasks
        .iter()
        .filter(|(id, _)| !task_ids.contains(*id))
        .map(|(id, task)| (id.clone(), task.clone()))
        .collect()
}

/// Keeps only the requested ids that still exist, in request order
pub fn existing_task_ids(requested: &[TaskId], tasks: &HashMap<TaskId, Task>) -> Vec<TaskId> {
    requested
        .iter()
        .filter(|id| tasks.contains_key(*id))
        .cloned()
        .collect()
}

/// Like [`existing_task_ids`] but keeps only the first occurrence of each id
pub fn unique_existing_task_ids(
    requested: &[TaskId],
    tasks: &HashMap<TaskId, Task>,
) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    existing_task_ids(requested, tasks)
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
