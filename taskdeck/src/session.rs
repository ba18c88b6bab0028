//! A signed-in user's working session.
//!
//! `Session` ties together the explicitly owned [`TaskStore`], the
//! identity of the signed-in user, and the transient view settings
//! (filter and sort). It runs validation before every mutation so the
//! store only ever sees well-formed payloads. Signing out ends the session
//! and discards every task.

use taskdeck_model::{
    OwnerId, SortKey, Task, TaskFilter, TaskForm, TaskId, TaskPatch, TaskStatus, TaskUpdateForm,
    ValidationError,
};

use crate::tasks::{
    TaskStats, TaskStore, ValidationLimits, compute_stats, parse_create, parse_update,
    visible_tasks,
};

/// Errors returned by session mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// No user is signed in.
    #[error("no user is signed in")]
    NotSignedIn,
    /// The submission broke one or more field rules.
    #[error("{} validation error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// Store, identity and view settings for one user session.
#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    owner: Option<OwnerId>,
    limits: ValidationLimits,
    filter: TaskFilter,
    sort: SortKey,
}

impl Session {
    /// Starts a session around `store` with nobody signed in.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            owner: None,
            limits: ValidationLimits::default(),
            filter: TaskFilter::default(),
            sort: SortKey::default(),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the initial sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    // --- identity ---

    /// Records `owner` as the authenticated user.
    pub fn sign_in(&mut self, owner: OwnerId) {
        tracing::info!(owner = %owner, "signed in");
        self.owner = Some(owner);
    }

    /// Ends the session: forgets the user, drops all tasks and resets the
    /// view settings.
    pub fn sign_out(&mut self) {
        if let Some(owner) = self.owner.take() {
            tracing::info!(owner = %owner, "signed out");
        }
        self.store.clear();
        self.filter = TaskFilter::default();
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.owner.is_some()
    }

    // --- mutations ---

    /// Validates `form` and creates the task.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSignedIn`] without a user,
    /// [`SessionError::Invalid`] with every violation otherwise.
    pub fn create_task(&mut self, form: &TaskForm) -> Result<Task, SessionError> {
        let owner = self.owner.clone().ok_or(SessionError::NotSignedIn)?;
        let today = self.store.clock().today();
        let new_task = parse_create(form, today, &self.limits).map_err(|errors| {
            tracing::debug!(errors = errors.len(), "create rejected");
            SessionError::Invalid(errors)
        })?;
        Ok(self.store.create(new_task, &owner))
    }

    /// Validates `form` and applies it to the task with `id`.
    ///
    /// Returns `Ok(None)` when no such task exists.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSignedIn`] without a user,
    /// [`SessionError::Invalid`] with every violation otherwise.
    pub fn update_task(
        &mut self,
        id: &TaskId,
        form: &TaskUpdateForm,
    ) -> Result<Option<Task>, SessionError> {
        if !self.is_signed_in() {
            return Err(SessionError::NotSignedIn);
        }
        let today = self.store.clock().today();
        let patch = parse_update(form, today, &self.limits).map_err(|errors| {
            tracing::debug!(task_id = %id, errors = errors.len(), "update rejected");
            SessionError::Invalid(errors)
        })?;
        Ok(self.apply(id, patch))
    }

    /// Moves the task with `id` to `status`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSignedIn`] without a user.
    pub fn set_status(
        &mut self,
        id: &TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, SessionError> {
        if !self.is_signed_in() {
            return Err(SessionError::NotSignedIn);
        }
        Ok(self.apply(id, TaskPatch::status(status)))
    }

    /// Deletes the task with `id`. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSignedIn`] without a user.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool, SessionError> {
        if !self.is_signed_in() {
            return Err(SessionError::NotSignedIn);
        }
        Ok(self.store.delete(id))
    }

    fn apply(&mut self, id: &TaskId, patch: TaskPatch) -> Option<Task> {
        if self.store.update(id, patch) {
            self.store.find_by_id(id).cloned()
        } else {
            None
        }
    }

    // --- reads ---

    /// Looks up a task by identifier.
    #[must_use]
    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.store.find_by_id(id)
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The current filter.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replaces the current filter.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Mutates the current filter in place.
    pub fn update_filter(&mut self, f: impl FnOnce(&mut TaskFilter)) {
        f(&mut self.filter);
    }

    /// Resets the filter to match everything.
    pub fn clear_filter(&mut self) {
        self.filter = TaskFilter::default();
    }

    /// The current sort key.
    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// Replaces the current sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Tasks passing the current filter, ordered by the current sort key.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(self.store.tasks(), &self.filter, self.sort)
    }

    /// Statistics over every task, ignoring the filter.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        compute_stats(self.store.tasks())
    }
}
