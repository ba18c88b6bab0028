//! Pure derivations that filter and order task collections.
//!
//! Nothing here mutates the collection it is given. Callers compose
//! [`filter_tasks`] then [`sort_tasks`]; [`visible_tasks`] does both.

use std::cmp::Reverse;

use taskdeck_model::{SortKey, Task, TaskFilter};

/// Returns the tasks matching every active criterion of `filter`, in their
/// input order.
///
/// Search is active only when the query has non-whitespace content. The
/// query is then compared as given, case-insensitively, against the title,
/// the description and each tag (substring match).
pub fn filter_tasks<'a, I>(tasks: I, filter: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let searching = !filter.search_query.trim().is_empty();
    let query = filter.search_query.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| filter.status.matches(&t.status))
        .filter(|t| filter.priority.matches(&t.priority))
        .filter(|t| !searching || matches_query(t, &query))
        .collect()
}

/// `query` must already be lowercased.
fn matches_query(task: &Task, query: &str) -> bool {
    task.title.to_lowercase().contains(query)
        || task.description.to_lowercase().contains(query)
        || task.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

/// Orders `tasks` in place by `key`. Ties keep their relative order.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::DueDate => tasks.sort_by_key(|t| Reverse(t.due_date)),
        SortKey::Priority => tasks.sort_by_key(|t| t.priority.severity_rank()),
        SortKey::Status => tasks.sort_by_key(|t| t.status.workflow_rank()),
        SortKey::Unsorted => {}
    }
}

/// Filters `tasks`, then sorts the survivors by `key`.
#[must_use]
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, key: SortKey) -> Vec<&'a Task> {
    let mut out = filter_tasks(tasks, filter);
    sort_tasks(&mut out, key);
    out
}
