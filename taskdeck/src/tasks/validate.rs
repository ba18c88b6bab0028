//! Field validation for task submissions.
//!
//! Creation and update share one ruleset. The only difference is
//! [`Presence`]: on creation the core fields are required, on update every
//! field is optional and checked only when present. Every rule runs
//! independently, so a submission gets all of its errors at once.
//!
//! The `parse_*` functions are the single boundary where raw form text
//! becomes typed [`NewTask`] / [`TaskPatch`] values.

use chrono::{DateTime, NaiveDate};
use taskdeck_model::{
    NewTask, TagsField, TaskField, TaskForm, TaskPatch, TaskPriority, TaskStatus, TaskUpdateForm,
    ValidationError,
};

/// Length bounds applied to free-text fields, in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Minimum title length.
    pub title_min: usize,
    /// Maximum title length.
    pub title_max: usize,
    /// Maximum description length.
    pub description_max: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            title_min: 3,
            title_max: 100,
            description_max: 500,
        }
    }
}

/// Whether an absent field is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// Runs the per-field rules and accumulates violations.
struct Checker<'a> {
    presence: Presence,
    today: NaiveDate,
    limits: &'a ValidationLimits,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    const fn new(presence: Presence, today: NaiveDate, limits: &'a ValidationLimits) -> Self {
        Self {
            presence,
            today,
            limits,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: TaskField, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }

    const fn required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    fn title(&mut self, value: Option<&str>) -> Option<String> {
        let Some(raw) = value else {
            if self.required() {
                self.fail(TaskField::Title, "Title is required");
            }
            return None;
        };
        let title = raw.trim();
        let len = title.chars().count();
        if len == 0 {
            let message = if self.required() {
                "Title is required"
            } else {
                "Title cannot be empty"
            };
            self.fail(TaskField::Title, message);
            None
        } else if len < self.limits.title_min {
            let min = self.limits.title_min;
            self.fail(
                TaskField::Title,
                format!("Title must be at least {min} characters long"),
            );
            None
        } else if len > self.limits.title_max {
            let max = self.limits.title_max;
            self.fail(
                TaskField::Title,
                format!("Title must not exceed {max} characters"),
            );
            None
        } else {
            Some(title.to_string())
        }
    }

    fn description(&mut self, value: Option<&str>) -> Option<String> {
        let Some(raw) = value else {
            if self.required() {
                self.fail(TaskField::Description, "Description is required");
            }
            return None;
        };
        let description = raw.trim();
        if description.is_empty() {
            let message = if self.required() {
                "Description is required"
            } else {
                "Description cannot be empty"
            };
            self.fail(TaskField::Description, message);
            None
        } else if description.chars().count() > self.limits.description_max {
            let max = self.limits.description_max;
            self.fail(
                TaskField::Description,
                format!("Description must not exceed {max} characters"),
            );
            None
        } else {
            Some(description.to_string())
        }
    }

    fn priority(&mut self, value: Option<&str>) -> Option<TaskPriority> {
        let Some(raw) = value else {
            if self.required() {
                self.fail(TaskField::Priority, "Invalid priority value");
            }
            return None;
        };
        raw.parse().map_or_else(
            |_| {
                self.fail(TaskField::Priority, "Invalid priority value");
                None
            },
            Some,
        )
    }

    fn status(&mut self, value: Option<&str>) -> Option<TaskStatus> {
        let raw = value?;
        raw.parse().map_or_else(
            |_| {
                self.fail(TaskField::Status, "Invalid status value");
                None
            },
            Some,
        )
    }

    fn due_date(&mut self, value: Option<&str>) -> Option<NaiveDate> {
        // Only an absent or empty value counts as missing; blanks are malformed.
        let raw = match value {
            Some(raw) if !raw.is_empty() => raw,
            Some(_) if !self.required() => {
                self.fail(TaskField::DueDate, "Invalid due date format");
                return None;
            }
            _ => {
                if self.required() {
                    self.fail(TaskField::DueDate, "Due date is required");
                }
                return None;
            }
        };
        let Some(date) = parse_due_date(raw) else {
            self.fail(TaskField::DueDate, "Invalid due date format");
            return None;
        };
        if date < self.today {
            self.fail(TaskField::DueDate, "Due date cannot be in the past");
            return None;
        }
        Some(date)
    }

    fn tags(&mut self, value: Option<&TagsField>) -> Option<Vec<String>> {
        match value? {
            TagsField::List(tags) => Some(normalize_tags(tags)),
            TagsField::Scalar(_) => {
                self.fail(TaskField::Tags, "Tags must be an array");
                None
            }
        }
    }
}

/// Parses a submitted due date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, whose
/// calendar date (in its own offset) is used.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

/// Trims tags, drops blank ones and removes duplicates, keeping the first
/// occurrence of each.
#[must_use]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Checks a creation form. An empty result means the form is acceptable.
#[must_use]
pub fn validate_for_create(
    form: &TaskForm,
    today: NaiveDate,
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    match parse_create(form, today, limits) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    }
}

/// Checks an update form. Absent fields are never errors.
#[must_use]
pub fn validate_for_update(
    form: &TaskUpdateForm,
    today: NaiveDate,
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    match parse_update(form, today, limits) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    }
}

/// Validates a creation form and converts it into a [`NewTask`].
///
/// # Errors
///
/// Returns every rule violation found in the form.
pub fn parse_create(
    form: &TaskForm,
    today: NaiveDate,
    limits: &ValidationLimits,
) -> Result<NewTask, Vec<ValidationError>> {
    let mut check = Checker::new(Presence::Required, today, limits);
    let title = check.title(form.title.as_deref());
    let description = check.description(form.description.as_deref());
    let priority = check.priority(form.priority.as_deref());
    let due_date = check.due_date(form.due_date.as_deref());
    let tags = check.tags(form.tags.as_ref());

    if !check.errors.is_empty() {
        return Err(check.errors);
    }
    match (title, description, priority, due_date) {
        (Some(title), Some(description), Some(priority), Some(due_date)) => Ok(NewTask {
            title,
            description,
            priority,
            due_date,
            tags: tags.unwrap_or_default(),
            assignee: form
                .assignee
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        }),
        _ => Err(check.errors),
    }
}

/// Validates an update form and converts it into a [`TaskPatch`].
///
/// # Errors
///
/// Returns every rule violation found among the present fields.
pub fn parse_update(
    form: &TaskUpdateForm,
    today: NaiveDate,
    limits: &ValidationLimits,
) -> Result<TaskPatch, Vec<ValidationError>> {
    let mut check = Checker::new(Presence::Optional, today, limits);
    let patch = TaskPatch {
        title: check.title(form.title.as_deref()),
        description: check.description(form.description.as_deref()),
        status: check.status(form.status.as_deref()),
        priority: check.priority(form.priority.as_deref()),
        due_date: check.due_date(form.due_date.as_deref()),
        tags: check.tags(form.tags.as_ref()),
        assignee: form.assignee.as_deref().map(|a| {
            let a = a.trim();
            (!a.is_empty()).then(|| a.to_string())
        }),
    };

    if check.errors.is_empty() {
        Ok(patch)
    } else {
        Err(check.errors)
    }
}
