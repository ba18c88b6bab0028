//! Summary counts over a task collection.

use serde::Serialize;
use taskdeck_model::{Task, TaskStatus};

/// Counts by status and priority, plus the share of completed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub on_hold: usize,
    /// Tasks whose priority is high or critical.
    pub high_priority: usize,
    /// `completed / total` as a whole percentage, 0 when there are no tasks.
    pub completion_percentage: usize,
}

/// Tallies `tasks`. Always called on the full, unfiltered collection.
#[must_use]
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::OnHold => stats.on_hold += 1,
        }
        if task.priority.is_high() {
            stats.high_priority += 1;
        }
    }
    stats.completion_percentage = percentage(stats.completed, stats.total);
    stats
}

/// `100 * part / whole` rounded half away from zero, in integer arithmetic.
const fn percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    (200 * part + whole) / (2 * whole)
}
