//! Translates finished drag-and-drop gestures into board actions.
//!
//! Gesture tracking and hit-testing happen in the UI. By the time a drop
//! reaches this module it has been resolved to what was dragged, what it was
//! dropped on, and which half of the target task the pointer was over.

use crate::domain::{
    action::Action,
    board::{BoardState, ColumnId},
    task::TaskId,
};

/// Which half of the target task a drop landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// A resolved drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEvent {
    /// A task dropped onto another task
    TaskOnTask {
        task_id: TaskId,
        source_column_id: ColumnId,
        target_task_id: TaskId,
        target_column_id: ColumnId,
        placement: Placement,
    },
    /// A task dropped onto a column body; it goes to the end
    TaskOnColumn {
        task_id: TaskId,
        source_column_id: ColumnId,
        target_column_id: ColumnId,
    },
    /// A column dropped onto another column
    ColumnOnColumn {
        dragged_column_id: ColumnId,
        target_column_id: ColumnId,
    },
}

/// Converts a drop into the action that applies it, if any
///
/// Drops that would leave everything in place produce `None`.
pub fn resolve_drop(state: &BoardState, event: &DropEvent) -> Option<Action> {
    match event {
        DropEvent::TaskOnTask {
            task_id,
            source_column_id,
            target_task_id,
            target_column_id,
            placement,
        } => {
            let target = state.columns.get(target_column_id)?;
            let target_index = target.task_ids.iter().position(|id| id == target_task_id)?;
            let insert_index = match placement {
                Placement::Before => target_index,
                Placement::After => target_index + 1,
            };

            if source_column_id == target_column_id {
                let from_index = target.task_ids.iter().position(|id| id == task_id)?;
                // Dropping next to itself is a no-op.
                if from_index == insert_index || from_index + 1 == insert_index {
                    return None;
                }
                let to_index = if insert_index > from_index {
                    insert_index - 1
                } else {
                    insert_index
                };
                Some(Action::TaskReorder {
                    column_id: target_column_id.clone(),
                    from_index: from_index as i64,
                    to_index: to_index as i64,
                })
            } else {
                Some(Action::TaskMove {
                    task_id: task_id.clone(),
                    from_column_id: source_column_id.clone(),
                    to_column_id: target_column_id.clone(),
                    to_index: insert_index as i64,
                })
            }
        }
        DropEvent::TaskOnColumn {
            task_id,
            source_column_id,
            target_column_id,
        } => {
            let target = state.columns.get(target_column_id)?;
            Some(Action::TaskMove {
                task_id: task_id.clone(),
                from_column_id: source_column_id.clone(),
                to_column_id: target_column_id.clone(),
                to_index: target.task_ids.len() as i64,
            })
        }
        DropEvent::ColumnOnColumn {
            dragged_column_id,
            target_column_id,
        } => {
            let from_index = state.column_order.iter().position(|id| id == dragged_column_id)?;
            let to_index = state.column_order.iter().position(|id| id == target_column_id)?;
            if from_index == to_index {
                return None;
            }
            Some(Action::ColumnReorder {
                from_index: from_index as i64,
                to_index: to_index as i64,
            })
        }
    }
}
