//! Shared data model for `Taskdeck`.

pub mod form;
pub mod task;
pub mod view;

pub use form::{
    TagsField, TaskField, TaskForm, TaskUpdateForm, ValidationError, field_error, has_field_error,
};
pub use task::{NewTask, OwnerId, ParseError, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
pub use view::{Choice, SortKey, TaskFilter};
