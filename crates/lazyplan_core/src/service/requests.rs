//! Request and patch inputs for facade mutations.
//!
//! # Invariants
//! - Date fields arrive as text and are parsed by the facade; blank text on an
//!   optional field means "not supplied".
//! - Every patch field is optional; `None` leaves the stored value unchanged.
//!
//! All types deserialize from tool-call argument objects; unknown keys (such as
//! the target id) are ignored.

use super::error::{ServiceError, ServiceResult};
use crate::model::entity::DEFAULT_PRIORITY;
use crate::model::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use serde::Deserialize;

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: String,
    /// Defaults to `start` when absent.
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            start_date: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewNote {
    pub title: String,
    #[serde(rename = "type", default)]
    pub note_type: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub start_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "note_type", alias = "type")]
    pub note_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DependentNotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Parses a mandatory date field.
pub(crate) fn parse_required_date(
    field: &'static str,
    value: &str,
) -> ServiceResult<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| ServiceError::MalformedDate {
        field,
        value: value.to_string(),
    })
}

/// Parses an optional date field; blank text counts as absent.
pub(crate) fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> ServiceResult<Option<NaiveDateTime>> {
    match value {
        Some(text) if !text.trim().is_empty() => parse_required_date(field, text).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_optional_date, parse_required_date, NewTodo, TodoPatch};
    use crate::service::error::ServiceError;

    #[test]
    fn blank_optional_date_is_absent() {
        assert_eq!(parse_optional_date("due_date", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date("due_date", None).unwrap(), None);
    }

    #[test]
    fn malformed_date_names_the_field() {
        let err = parse_required_date("start", "soon").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedDate { field: "start", .. }));
    }

    #[test]
    fn requests_deserialize_from_tool_arguments() {
        let todo: NewTodo =
            serde_json::from_value(serde_json::json!({"title": "Pack", "tags": ["Move"]}))
                .unwrap();
        assert_eq!(todo.priority, 3);
        assert_eq!(todo.tags, vec!["Move".to_string()]);

        let patch: TodoPatch =
            serde_json::from_value(serde_json::json!({"todo_id": 4, "priority": 5})).unwrap();
        assert_eq!(patch.priority, Some(5));
        assert!(patch.title.is_none());
    }
}
