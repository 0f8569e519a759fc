//! Rebuilds a valid board from untrusted persisted data.
//!
//! The input is whatever came out of storage. The output is either a board
//! that satisfies every relational invariant or a [`Rejection`]; nothing in
//! between. Individually malformed tasks and columns are dropped, while a
//! value that does not look like a board at all is rejected outright.

use crate::domain::{
    board::{Column, ColumnId, PersistentBoard},
    task::{Task, TaskId},
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Why a persisted value could not be turned into a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("persisted value is not shaped like a board")]
    MalformedShape,

    #[error("no persisted column survived validation")]
    NoColumns,

    #[error("persisted column order is empty")]
    EmptyColumnOrder,
}

/// Validates a persisted board
///
/// `tasks` and `columns` must be objects keyed by id and `columnOrder` an
/// array. The object key is the authoritative id; any `id` field inside a
/// value is ignored.
pub fn sanitize_persisted(value: &Value) -> Result<PersistentBoard, Rejection> {
    let saved = value.as_object().ok_or(Rejection::MalformedShape)?;
    let raw_tasks = field_object(saved, "tasks")?;
    let raw_columns = field_object(saved, "columns")?;
    let raw_order = saved
        .get("columnOrder")
        .and_then(Value::as_array)
        .ok_or(Rejection::MalformedShape)?;

    let mut tasks: HashMap<TaskId, Task> = raw_tasks
        .iter()
        .filter_map(|(key, value)| sanitize_task(key, value))
        .map(|task| (task.id.clone(), task))
        .collect();

    // Persisted mapping order decides which column keeps a task listed twice.
    let mut claimed: HashSet<TaskId> = HashSet::new();
    let mut columns: HashMap<ColumnId, Column> = HashMap::new();
    let mut surviving: Vec<ColumnId> = Vec::new();
    for (key, value) in raw_columns {
        if let Some(column) = sanitize_column(key, value, &tasks, &mut claimed) {
            surviving.push(column.id.clone());
            columns.insert(column.id.clone(), column);
        }
    }

    if columns.is_empty() {
        return Err(Rejection::NoColumns);
    }

    // Tasks must belong to a column.
    tasks.retain(|id, _| claimed.contains(id));

    let column_order = reconcile_order(raw_order, &columns, &surviving);
    if column_order.is_empty() {
        return Err(Rejection::EmptyColumnOrder);
    }

    Ok(PersistentBoard {
        tasks,
        columns,
        column_order,
    })
}

fn field_object<'a>(
    saved: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Map<String, Value>, Rejection> {
    saved
        .get(name)
        .and_then(Value::as_object)
        .ok_or(Rejection::MalformedShape)
}

fn sanitize_task(key: &str, value: &Value) -> Option<Task> {
    let fields = value.as_object()?;
    let text = fields.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let completed = fields.get("completed")?.as_bool()?;
    let created_ms = fields.get("createdAt")?.as_f64().filter(|ms| ms.is_finite())?;
    let created_at = timestamp_from_millis(created_ms);

    Some(Task {
        id: TaskId::from(key),
        text: text.to_string(),
        completed,
        created_at,
    })
}

// Any finite millisecond count is accepted; values past chrono's range pin to
// the nearest representable instant.
fn timestamp_from_millis(ms: f64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms.trunc() as i64)
        .single()
        .unwrap_or(if ms < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

fn sanitize_column(
    key: &str,
    value: &Value,
    tasks: &HashMap<TaskId, Task>,
    claimed: &mut HashSet<TaskId>,
) -> Option<Column> {
    let fields = value.as_object()?;
    let title = fields.get("title")?.as_str()?.trim();
    let raw_task_ids = fields.get("taskIds")?.as_array()?;
    if title.is_empty() {
        return None;
    }

    let mut task_ids = Vec::new();
    for task_id in raw_task_ids.iter().filter_map(Value::as_str) {
        if tasks.contains_key(task_id) && !claimed.contains(task_id) {
            let task_id = TaskId::from(task_id);
            claimed.insert(task_id.clone());
            task_ids.push(task_id);
        }
    }

    Some(Column {
        id: ColumnId::from(key),
        title: title.to_string(),
        task_ids,
    })
}

// Persisted entries naming surviving columns keep their relative order; any
// surviving column the order forgot is appended in mapping order.
fn reconcile_order(
    raw_order: &[Value],
    columns: &HashMap<ColumnId, Column>,
    surviving: &[ColumnId],
) -> Vec<ColumnId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<ColumnId> = raw_order
        .iter()
        .filter_map(Value::as_str)
        .filter(|id| columns.contains_key(*id) && seen.insert(*id))
        .map(ColumnId::from)
        .collect();

    order.extend(
        surviving
            .iter()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned(),
    );
    order
}
