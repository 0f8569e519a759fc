//! The board state machine.
//!
//! `reduce` is the only way board state changes. Every action whose target
//! does not exist, or whose payload is invalid (blank text, out-of-range
//! index), leaves the state untouched and the same `Arc` is handed back.

use crate::domain::{
    action::Action,
    board::{BoardState, Column, ColumnId},
    ordering::{
        clamp, existing_task_ids, remove_task_ids_from_columns, remove_tasks_by_ids,
        reorder_items, unique_existing_task_ids,
    },
    task::{Task, TaskId},
};
use chrono::{DateTime, Utc};
use std::{collections::HashSet, sync::Arc};

/// Source of fresh ids and timestamps for newly created entities
pub trait Environment {
    fn task_id(&self) -> TaskId;
    fn column_id(&self) -> ColumnId;
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUIDs and the wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn task_id(&self) -> TaskId {
        TaskId::generate()
    }

    fn column_id(&self) -> ColumnId {
        ColumnId::generate()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Applies an action using random ids and the current time
pub fn reduce(state: &Arc<BoardState>, action: &Action) -> Arc<BoardState> {
    reduce_with(state, action, &SystemEnvironment)
}

/// Applies an action, drawing new ids and timestamps from `env`
///
/// Returns a clone of `state` itself (pointer-equal) when the action is
/// rejected.
pub fn reduce_with(
    state: &Arc<BoardState>,
    action: &Action,
    env: &dyn Environment,
) -> Arc<BoardState> {
    match transition(state, action, env) {
        Some(next) => Arc::new(next),
        None => {
            tracing::trace!(action = action.kind(), "action ignored");
            Arc::clone(state)
        }
    }
}

fn transition(state: &BoardState, action: &Action, env: &dyn Environment) -> Option<BoardState> {
    match action {
        Action::TaskAdd { column_id, text } => add_task(state, column_id, text, env),
        Action::TaskDelete { task_id } => delete_task(state, task_id),
        Action::TaskDeleteBulk { task_ids } => delete_tasks(state, task_ids),
        Action::TaskToggle { task_id } => {
            let task = state.tasks.get(task_id)?;
            let mut next = state.clone();
            next.tasks.insert(task_id.clone(), task.toggled());
            Some(next)
        }
        Action::TaskToggleBulk {
            task_ids,
            completed,
        } => set_completed(state, task_ids, *completed),
        Action::TaskEdit { task_id, text } => {
            let task = state.tasks.get(task_id)?;
            let text = non_blank(text)?;
            let mut next = state.clone();
            next.tasks.insert(task_id.clone(), task.with_text(text));
            Some(next)
        }
        Action::TaskReorder {
            column_id,
            from_index,
            to_index,
        } => {
            let column = state.columns.get(column_id)?;
            let task_ids = reorder_items(&column.task_ids, *from_index, *to_index)?;
            let mut next = state.clone();
            next.columns.insert(column_id.clone(), column.with_task_ids(task_ids));
            Some(next)
        }
        Action::TaskMove {
            task_id,
            from_column_id,
            to_column_id,
            to_index,
        } => move_task(state, task_id, from_column_id, to_column_id, *to_index),
        Action::TaskMoveBulk {
            task_ids,
            to_column_id,
        } => move_tasks(state, task_ids, to_column_id),
        Action::ColumnAdd { title } => {
            let title = non_blank(title)?;
            let column_id = env.column_id();
            let mut next = state.clone();
            next.columns.insert(column_id.clone(), Column::new(column_id.clone(), title));
            next.column_order.push(column_id);
            Some(next)
        }
        Action::ColumnDelete { column_id } => delete_column(state, column_id),
        Action::ColumnRename { column_id, title } => {
            let column = state.columns.get(column_id)?;
            let title = non_blank(title)?;
            let mut next = state.clone();
            next.columns.insert(column_id.clone(), column.with_title(title));
            Some(next)
        }
        Action::ColumnReorder {
            from_index,
            to_index,
        } => {
            let column_order = reorder_items(&state.column_order, *from_index, *to_index)?;
            Some(BoardState {
                column_order,
                ..state.clone()
            })
        }
        Action::FilterSet(filter) => Some(BoardState {
            filter: *filter,
            ..state.clone()
        }),
        Action::SearchSet(query) => Some(BoardState {
            search_query: query.clone(),
            ..state.clone()
        }),
        Action::TaskSelectToggle { task_id } => {
            // Unknown ids are rejected so the selection never references a missing task.
            if !state.tasks.contains_key(task_id) {
                return None;
            }
            let mut next = state.clone();
            if !next.selected_task_ids.remove(task_id) {
                next.selected_task_ids.insert(task_id.clone());
            }
            Some(next)
        }
        Action::ColumnSelectAll { column_id } => select_column(state, column_id),
        Action::SelectionClear => {
            let mut next = state.clone();
            next.selected_task_ids.clear();
            Some(next)
        }
        Action::Unknown => None,
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn add_task(
    state: &BoardState,
    column_id: &ColumnId,
    text: &str,
    env: &dyn Environment,
) -> Option<BoardState> {
    let column = state.columns.get(column_id)?;
    let text = non_blank(text)?;

    let task_id = env.task_id();
    let task = Task::new(task_id.clone(), text, env.now());

    let mut task_ids = column.task_ids.clone();
    task_ids.push(task_id.clone());

    let mut next = state.clone();
    next.tasks.insert(task_id, task);
    next.columns.insert(column_id.clone(), column.with_task_ids(task_ids));
    Some(next)
}

fn delete_task(state: &BoardState, task_id: &TaskId) -> Option<BoardState> {
    if !state.tasks.contains_key(task_id) {
        return None;
    }

    let doomed = HashSet::from([task_id.clone()]);
    let mut next = BoardState {
        tasks: remove_tasks_by_ids(&state.tasks, &doomed),
        columns: remove_task_ids_from_columns(&state.columns, &doomed),
        ..state.clone()
    };
    next.selected_task_ids.remove(task_id);
    Some(next)
}

fn delete_tasks(state: &BoardState, requested: &[TaskId]) -> Option<BoardState> {
    let valid = existing_task_ids(requested, &state.tasks);
    if valid.is_empty() {
        return None;
    }

    let doomed: HashSet<TaskId> = valid.into_iter().collect();
    let mut next = BoardState {
        tasks: remove_tasks_by_ids(&state.tasks, &doomed),
        columns: remove_task_ids_from_columns(&state.columns, &doomed),
        ..state.clone()
    };
    next.selected_task_ids.clear();
    Some(next)
}

fn set_completed(state: &BoardState, requested: &[TaskId], completed: bool) -> Option<BoardState> {
    let valid = existing_task_ids(requested, &state.tasks);
    if valid.is_empty() {
        return None;
    }

    let mut next = state.clone();
    for task_id in valid {
        if let Some(task) = state.tasks.get(&task_id) {
            next.tasks.insert(task_id, task.with_completed(completed));
        }
    }
    next.selected_task_ids.clear();
    Some(next)
}

fn move_task(
    state: &BoardState,
    task_id: &TaskId,
    from_column_id: &ColumnId,
    to_column_id: &ColumnId,
    to_index: i64,
) -> Option<BoardState> {
    if !state.tasks.contains_key(task_id) {
        return None;
    }
    let from_column = state.columns.get(from_column_id)?;
    let to_column = state.columns.get(to_column_id)?;
    let current_index = from_column.task_ids.iter().position(|id| id == task_id)?;

    let mut next = state.clone();

    if from_column_id == to_column_id {
        let mut task_ids = from_column.task_ids.clone();
        task_ids.remove(current_index);
        let bounded = clamp(to_index, 0, task_ids.len() as i64) as usize;
        task_ids.insert(bounded, task_id.clone());
        next.columns.insert(from_column_id.clone(), from_column.with_task_ids(task_ids));
        return Some(next);
    }

    let bounded = clamp(to_index, 0, to_column.task_ids.len() as i64) as usize;
    let from_task_ids = from_column
        .task_ids
        .iter()
        .filter(|id| *id != task_id)
        .cloned()
        .collect();
    let mut to_task_ids = to_column.task_ids.clone();
    to_task_ids.insert(bounded, task_id.clone());

    next.columns.insert(from_column_id.clone(), from_column.with_task_ids(from_task_ids));
    next.columns.insert(to_column_id.clone(), to_column.with_task_ids(to_task_ids));
    Some(next)
}

fn move_tasks(
    state: &BoardState,
    requested: &[TaskId],
    to_column_id: &ColumnId,
) -> Option<BoardState> {
    if !state.columns.contains_key(to_column_id) {
        return None;
    }

    let valid = unique_existing_task_ids(requested, &state.tasks);
    if valid.is_empty() {
        return None;
    }

    let moving: HashSet<TaskId> = valid.iter().cloned().collect();
    let mut columns = remove_task_ids_from_columns(&state.columns, &moving);
    let target = columns.get_mut(to_column_id)?;
    target.task_ids.extend(valid);

    let mut next = BoardState {
        columns,
        ..state.clone()
    };
    next.selected_task_ids.clear();
    Some(next)
}

fn delete_column(state: &BoardState, column_id: &ColumnId) -> Option<BoardState> {
    let column = state.columns.get(column_id)?;
    let owned: HashSet<TaskId> = column.task_ids.iter().cloned().collect();

    let mut next = BoardState {
        tasks: remove_tasks_by_ids(&state.tasks, &owned),
        column_order: state
            .column_order
            .iter()
            .filter(|id| *id != column_id)
            .cloned()
            .collect(),
        ..state.clone()
    };
    next.columns.remove(column_id);
    next.selected_task_ids.retain(|id| !owned.contains(id));
    Some(next)
}

fn select_column(state: &BoardState, column_id: &ColumnId) -> Option<BoardState> {
    let column = state.columns.get(column_id)?;
    if column.task_ids.is_empty() {
        return None;
    }

    let mut next = state.clone();
    let all_selected = column
        .task_ids
        .iter()
        .all(|id| state.selected_task_ids.contains(id));

    if all_selected {
        for task_id in &column.task_ids {
            next.selected_task_ids.remove(task_id);
        }
    } else {
        next.selected_task_ids.extend(column.task_ids.iter().cloned());
    }
    Some(next)
}
