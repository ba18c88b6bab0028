//! Filter and sort specifications for derived task views.
//!
//! These are transient, per-session settings. They are never stored with
//! the tasks themselves.

use serde::{Deserialize, Serialize};

use crate::task::{ParseError, TaskPriority, TaskStatus};

/// Either "match everything" or "match exactly this value".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Choice<T> {
    /// No constraint (the `all` sentinel).
    All,
    /// Only values equal to the given one.
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Choice<T> {
    /// Whether `value` satisfies this choice.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    /// Whether this choice constrains anything.
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.pad("all"),
            Self::Only(v) => v.fmt(f),
        }
    }
}

impl<T> std::str::FromStr for Choice<T>
where
    T: std::str::FromStr<Err = ParseError>,
{
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Criteria for deriving a subset of the task collection.
///
/// All active criteria must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    /// Status to match.
    pub status: Choice<TaskStatus>,
    /// Priority to match.
    pub priority: Choice<TaskPriority>,
    /// Case-insensitive text to look for in title, description and tags.
    pub search_query: String,
}

impl TaskFilter {
    /// Whether any criterion is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.status.is_all() || !self.priority.is_all() || !self.search_query.trim().is_empty()
    }
}

/// Ordering applied to a derived task view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Latest due date first.
    #[default]
    DueDate,
    /// Critical first, low last.
    Priority,
    /// In-progress, on-hold, pending, completed.
    Status,
    /// Keep the input order.
    Unsorted,
}

impl SortKey {
    /// Text token for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "date",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Unsorted => "none",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognized tokens map to [`SortKey::Unsorted`].
impl From<&str> for SortKey {
    fn from(token: &str) -> Self {
        match token {
            "date" => Self::DueDate,
            "priority" => Self::Priority,
            "status" => Self::Status,
            _ => Self::Unsorted,
        }
    }
}
