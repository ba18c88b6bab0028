//! Raw submission forms and validation error values.
//!
//! Forms carry untrusted text exactly as it was submitted (from an edit
//! form or a JSON line). They are turned into typed payloads only after
//! validation succeeds.

use serde::{Deserialize, Serialize};

/// Tag input as submitted: normally a list, but a single string is
/// accepted at the type level so it can be reported as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    /// A sequence of tags.
    List(Vec<String>),
    /// A single scalar where a sequence was expected.
    Scalar(String),
}

impl From<Vec<String>> for TagsField {
    fn from(tags: Vec<String>) -> Self {
        Self::List(tags)
    }
}

/// Candidate payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Option<TagsField>,
    pub assignee: Option<String>,
}

/// Candidate partial payload for updating a task. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskUpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Option<TagsField>,
    /// An empty or blank assignee clears the current one.
    pub assignee: Option<String>,
}

/// Task fields that validation can complain about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    Tags,
}

impl TaskField {
    /// Field name as used by submission forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::Tags => "tags",
        }
    }
}

impl std::fmt::Display for TaskField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation: which field, and a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The offending field.
    pub field: TaskField,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    #[must_use]
    pub fn new(field: TaskField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Returns the first message reported for `field`, if any.
#[must_use]
pub fn field_error(errors: &[ValidationError], field: TaskField) -> Option<&str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

/// Whether any error was reported for `field`.
#[must_use]
pub fn has_field_error(errors: &[ValidationError], field: TaskField) -> bool {
    errors.iter().any(|e| e.field == field)
}
