//! Task entity types for Taskdeck.
//!
//! Defines the [`Task`] record held by the store, its closed
//! [`TaskStatus`] and [`TaskPriority`] enumerations, and the typed
//! payloads used to create ([`NewTask`]) and modify ([`TaskPatch`]) it.
//! Text tokens from the outside world are converted into these enums only
//! through their [`FromStr`](std::str::FromStr) implementations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors produced when external text does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The token is not one of the four task statuses.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),
    /// The token is not one of the four task priorities.
    #[error("unknown task priority: {0}")]
    UnknownPriority(String),
}

/// Opaque, unique task identifier.
///
/// Identifiers are assigned once at creation and never change. The default
/// source is a time-ordered UUID v7 string so that lexical order follows
/// creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the signed-in user a task belongs to.
///
/// Supplied by the external identity provider and treated as a trusted,
/// opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps an externally authenticated identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow stage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet. Every new task starts here.
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Paused.
    OnHold,
}

impl TaskStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Completed, Self::OnHold];

    /// The external text token for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }

    /// Position in the status sort: in-progress, on-hold, pending, completed.
    #[must_use]
    pub const fn workflow_rank(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::OnHold => 1,
            Self::Pending => 2,
            Self::Completed => 3,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on-hold" => Ok(Self::OnHold),
            other => Err(ParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// Urgency ranking of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Should be handled soon.
    High,
    /// Drop everything.
    Critical,
}

impl TaskPriority {
    /// All priorities in declaration order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// The external text token for this priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Position in the priority sort: critical first, low last.
    #[must_use]
    pub const fn severity_rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Whether this priority counts towards the high-priority tally.
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(ParseError::UnknownPriority(other.to_string())),
        }
    }
}

/// A trackable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, fixed at creation.
    pub id: TaskId,
    /// Short summary (3 to 100 characters once validated).
    pub title: String,
    /// Longer free text (at most 500 characters once validated).
    pub description: String,
    /// Current workflow stage.
    pub status: TaskStatus,
    /// Urgency ranking.
    pub priority: TaskPriority,
    /// Calendar date the task is due.
    pub due_date: NaiveDate,
    /// When the task was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the task was last mutated. Never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
    /// Signed-in user who created the task. Never changes.
    pub owner: OwnerId,
    /// Tags in insertion order, without duplicates.
    pub tags: Vec<String>,
    /// Optional assignee reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Task {
    /// Merges the present slots of `patch` into this task and stamps
    /// `updated_at` with `now`.
    ///
    /// Identifier, owner and creation timestamp are not representable in a
    /// [`TaskPatch`] and therefore stay untouched. `updated_at` never moves
    /// before `created_at`, even if the clock is behind.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        let TaskPatch {
            title,
            description,
            status,
            priority,
            due_date,
            tags,
            assignee,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(assignee) = assignee {
            self.assignee = assignee;
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Validated payload for creating a task.
///
/// Carries no status and no identifier: the store assigns both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tags, already deduplicated.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional assignee.
    #[serde(default)]
    pub assignee: Option<String>,
}

/// Typed partial update with one optional slot per mutable field.
///
/// `None` leaves the field untouched. For `assignee`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement due date.
    pub due_date: Option<NaiveDate>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement assignee (`Some(None)` clears).
    pub assignee: Option<Option<String>>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch touches no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
            && self.assignee.is_none()
    }
}
