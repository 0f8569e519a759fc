use crate::domain::{board::ColumnId, board::Filter, task::TaskId};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A request to transition board state
///
/// On the wire an action is `{"type": "TASK_ADD", "payload": {...}}` with
/// camelCase payload fields. Indices are signed so that out-of-range requests
/// from a caller can be represented and rejected rather than failing to parse.
/// A `type` this build does not know becomes [`Action::Unknown`] whatever its
/// payload; known types parse strictly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // Tasks
    TaskAdd {
        column_id: ColumnId,
        text: String,
    },
    TaskDelete {
        task_id: TaskId,
    },
    TaskDeleteBulk {
        task_ids: Vec<TaskId>,
    },
    TaskToggle {
        task_id: TaskId,
    },
    TaskToggleBulk {
        task_ids: Vec<TaskId>,
        completed: bool,
    },
    TaskEdit {
        task_id: TaskId,
        text: String,
    },
    TaskReorder {
        column_id: ColumnId,
        from_index: i64,
        to_index: i64,
    },
    TaskMove {
        task_id: TaskId,
        from_column_id: ColumnId,
        to_column_id: ColumnId,
        to_index: i64,
    },
    TaskMoveBulk {
        task_ids: Vec<TaskId>,
        to_column_id: ColumnId,
    },

    // Columns
    ColumnAdd {
        title: String,
    },
    ColumnDelete {
        column_id: ColumnId,
    },
    ColumnRename {
        column_id: ColumnId,
        title: String,
    },
    ColumnReorder {
        from_index: i64,
        to_index: i64,
    },

    // UI state
    FilterSet(Filter),
    SearchSet(String),
    TaskSelectToggle {
        task_id: TaskId,
    },
    ColumnSelectAll {
        column_id: ColumnId,
    },
    SelectionClear,

    /// Any action type this build does not know about
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire names of every action this build understands
    pub const KINDS: [&'static str; 18] = [
        "TASK_ADD",
        "TASK_DELETE",
        "TASK_DELETE_BULK",
        "TASK_TOGGLE",
        "TASK_TOGGLE_BULK",
        "TASK_EDIT",
        "TASK_REORDER",
        "TASK_MOVE",
        "TASK_MOVE_BULK",
        "COLUMN_ADD",
        "COLUMN_DELETE",
        "COLUMN_RENAME",
        "COLUMN_REORDER",
        "FILTER_SET",
        "SEARCH_SET",
        "TASK_SELECT_TOGGLE",
        "COLUMN_SELECT_ALL",
        "SELECTION_CLEAR",
    ];

    /// The wire name of the action
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskAdd { .. } => "TASK_ADD",
            Self::TaskDelete { .. } => "TASK_DELETE",
            Self::TaskDeleteBulk { .. } => "TASK_DELETE_BULK",
            Self::TaskToggle { .. } => "TASK_TOGGLE",
            Self::TaskToggleBulk { .. } => "TASK_TOGGLE_BULK",
            Self::TaskEdit { .. } => "TASK_EDIT",
            Self::TaskReorder { .. } => "TASK_REORDER",
            Self::TaskMove { .. } => "TASK_MOVE",
            Self::TaskMoveBulk { .. } => "TASK_MOVE_BULK",
            Self::ColumnAdd { .. } => "COLUMN_ADD",
            Self::ColumnDelete { .. } => "COLUMN_DELETE",
            Self::ColumnRename { .. } => "COLUMN_RENAME",
            Self::ColumnReorder { .. } => "COLUMN_REORDER",
            Self::FilterSet(_) => "FILTER_SET",
            Self::SearchSet(_) => "SEARCH_SET",
            Self::TaskSelectToggle { .. } => "TASK_SELECT_TOGGLE",
            Self::ColumnSelectAll { .. } => "COLUMN_SELECT_ALL",
            Self::SelectionClear => "SELECTION_CLEAR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Action::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let unknown = value
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| !Action::KINDS.contains(&kind));
        if unknown {
            return Ok(Action::Unknown);
        }
        Action::deserialize(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_struct_payload() {
        let action: Action = serde_json::from_value(json!({
            "type": "TASK_MOVE",
            "payload": {
                "taskId": "t1",
                "fromColumnId": "a",
                "toColumnId": "b",
                "toIndex": 0
            }
        }))
        .unwrap();

        assert_eq!(
            action,
            Action::TaskMove {
                task_id: TaskId::from("t1"),
                from_column_id: ColumnId::from("a"),
                to_column_id: ColumnId::from("b"),
                to_index: 0,
            }
        );
        assert_eq!(action.kind(), "TASK_MOVE");
    }

    #[test]
    fn test_parse_literal_payloads() {
        let filter: Action =
            serde_json::from_value(json!({"type": "FILTER_SET", "payload": "incomplete"})).unwrap();
        assert_eq!(filter, Action::FilterSet(Filter::Incomplete));

        let search: Action =
            serde_json::from_value(json!({"type": "SEARCH_SET", "payload": "  raw  "})).unwrap();
        assert_eq!(search, Action::SearchSet("  raw  ".to_string()));

        let clear: Action = serde_json::from_value(json!({"type": "SELECTION_CLEAR"})).unwrap();
        assert_eq!(clear, Action::SelectionClear);
    }

    #[test]
    fn test_negative_indices_parse() {
        let action: Action = serde_json::from_value(json!({
            "type": "COLUMN_REORDER",
            "payload": {"fromIndex": -1, "toIndex": 1}
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::ColumnReorder {
                from_index: -1,
                to_index: 1
            }
        );
    }

    #[test]
    fn test_unrecognized_type_is_unknown() {
        let action: Action = serde_json::from_value(json!({"type": "BOARD_ARCHIVE"})).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_unrecognized_type_with_payload_is_unknown() {
        for payload in [json!({"boardId": "x"}), json!("x"), json!([1, 2]), Value::Null] {
            let action: Action =
                serde_json::from_value(json!({"type": "BOARD_ARCHIVE", "payload": payload}))
                    .unwrap();
            assert_eq!(action, Action::Unknown);
        }
    }

    #[test]
    fn test_known_type_still_parses_strictly() {
        let bad_payload = serde_json::from_value::<Action>(json!({
            "type": "TASK_DELETE",
            "payload": {"taskIdentifier": "t1"}
        }));
        assert!(bad_payload.is_err());

        let missing_type = serde_json::from_value::<Action>(json!({"payload": {}}));
        assert!(missing_type.is_err());
    }

    #[test]
    fn test_kinds_cover_every_known_variant() {
        let actions = [
            Action::TaskAdd {
                column_id: ColumnId::from("a"),
                text: "t".to_string(),
            },
            Action::TaskDelete {
                task_id: TaskId::from("t"),
            },
            Action::TaskDeleteBulk { task_ids: vec![] },
            Action::TaskToggle {
                task_id: TaskId::from("t"),
            },
            Action::TaskToggleBulk {
                task_ids: vec![],
                completed: true,
            },
            Action::TaskEdit {
                task_id: TaskId::from("t"),
                text: "t".to_string(),
            },
            Action::TaskReorder {
                column_id: ColumnId::from("a"),
                from_index: 0,
                to_index: 1,
            },
            Action::TaskMove {
                task_id: TaskId::from("t"),
                from_column_id: ColumnId::from("a"),
                to_column_id: ColumnId::from("b"),
                to_index: 0,
            },
            Action::TaskMoveBulk {
                task_ids: vec![],
                to_column_id: ColumnId::from("b"),
            },
            Action::ColumnAdd {
                title: "c".to_string(),
            },
            Action::ColumnDelete {
                column_id: ColumnId::from("a"),
            },
            Action::ColumnRename {
                column_id: ColumnId::from("a"),
                title: "c".to_string(),
            },
            Action::ColumnReorder {
                from_index: 0,
                to_index: 1,
            },
            Action::FilterSet(Filter::All),
            Action::SearchSet(String::new()),
            Action::TaskSelectToggle {
                task_id: TaskId::from("t"),
            },
            Action::ColumnSelectAll {
                column_id: ColumnId::from("a"),
            },
            Action::SelectionClear,
        ];

        let kinds: Vec<&str> = actions.iter().map(Action::kind).collect();
        assert_eq!(kinds, Action::KINDS);

        for action in actions {
            let value = serde_json::to_value(&action).unwrap();
            assert_eq!(serde_json::from_value::<Action>(value).unwrap(), action);
        }
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(Action::TaskToggleBulk {
            task_ids: vec![TaskId::from("t1")],
            completed: true,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"type": "TASK_TOGGLE_BULK", "payload": {"taskIds": ["t1"], "completed": true}})
        );
    }
}
