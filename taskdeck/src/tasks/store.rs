//! The authoritative in-memory task collection.
//!
//! `TaskStore` is the only writer of task state. It trusts its inputs:
//! business rules are enforced upstream by [`validate`](super::validate),
//! while the store itself guarantees the structural invariants (unique,
//! immutable identifiers and owners, monotonic timestamps).

use std::sync::Arc;

use parking_lot::RwLock;
use taskdeck_model::{NewTask, OwnerId, Task, TaskId, TaskPatch, TaskStatus};

use crate::clock::{Clock, IdGenerator, SystemClock, UuidV7Ids};

/// Owns the task collection for one session.
///
/// Tasks are kept most-recently-created first.
pub struct TaskStore {
    tasks: Vec<Task>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    /// Creates an empty store using the wall clock and UUID v7 identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Arc::new(UuidV7Ids))
    }

    /// Creates an empty store with explicit time and identifier sources.
    #[must_use]
    pub fn with_sources(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
            ids,
        }
    }

    /// The clock this store stamps tasks with.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Creates a task from an already validated payload and puts it first.
    ///
    /// The new task is `pending`, stamped with the current instant for both
    /// timestamps, and owned by `owner`.
    ///
    /// # Panics
    ///
    /// Panics if the identifier generator hands out an identifier that is
    /// already in the store. That is a defect in the generator, not a
    /// recoverable condition.
    pub fn create(&mut self, new_task: NewTask, owner: &OwnerId) -> Task {
        let id = self.ids.next_id();
        assert!(
            self.position(&id).is_none(),
            "identifier generator produced duplicate task id {id}"
        );

        let now = self.clock.now();
        let NewTask {
            title,
            description,
            priority,
            due_date,
            tags,
            assignee,
        } = new_task;
        let task = Task {
            id,
            title,
            description,
            status: TaskStatus::Pending,
            priority,
            due_date,
            created_at: now,
            updated_at: now,
            owner: owner.clone(),
            tags,
            assignee,
        };

        tracing::info!(task_id = %task.id, owner = %owner, "task created");
        self.tasks.insert(0, task.clone());
        task
    }

    /// Applies `patch` to the task with `id` and refreshes its update time.
    ///
    /// Returns `false` without touching anything when no such task exists.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "update ignored, task not found");
            return false;
        };
        task.apply_patch(patch, now);
        tracing::debug!(task_id = %id, status = %task.status, "task updated");
        true
    }

    /// Removes the task with `id`. Returns `false` if it was not present.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.position(id) else {
            tracing::debug!(task_id = %id, "delete ignored, task not found");
            return false;
        };
        self.tasks.remove(index);
        tracing::info!(task_id = %id, "task deleted");
        true
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn find_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// All tasks, most recently created first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every task. Used when the session ends.
    pub fn clear(&mut self) {
        let dropped = self.tasks.len();
        self.tasks.clear();
        tracing::info!(dropped, "task store cleared");
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

/// Cloneable, thread-safe handle to a [`TaskStore`].
///
/// Each mutation holds the write lock for its whole duration, so a reader
/// observes either the state before a change or the state after it.
#[derive(Debug, Clone, Default)]
pub struct TaskStoreHandle {
    inner: Arc<RwLock<TaskStore>>,
}

impl TaskStoreHandle {
    /// Wraps `store` for shared access.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&TaskStore) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive write access.
    pub fn write<R>(&self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// See [`TaskStore::create`].
    pub fn create(&self, new_task: NewTask, owner: &OwnerId) -> Task {
        self.write(|store| store.create(new_task, owner))
    }

    /// See [`TaskStore::update`].
    pub fn update(&self, id: &TaskId, patch: TaskPatch) -> bool {
        self.write(|store| store.update(id, patch))
    }

    /// See [`TaskStore::delete`].
    pub fn delete(&self, id: &TaskId) -> bool {
        self.write(|store| store.delete(id))
    }

    /// Clones the task with `id`, if present.
    #[must_use]
    pub fn find_by_id(&self, id: &TaskId) -> Option<Task> {
        self.read(|store| store.find_by_id(id).cloned())
    }

    /// Clones the whole collection at one consistent point in time.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.read(|store| store.tasks().to_vec())
    }
}
