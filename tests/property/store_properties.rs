//! Property-based tests for the task store and its derived views.
//!
//! Uses proptest to verify:
//! 1. Filtering is idempotent and keeps input order.
//! 2. Sorting is a stable permutation for every key.
//! 3. Status counts always sum to the total and the percentage stays in range.
//! 4. Create applies defaults, delete removes exactly one task.
//! 5. Update changes only the patched fields.
//! 6. Validation never panics and accepted titles respect the limits.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck::clock::{Clock, ManualClock, SequentialIds};
use taskdeck::tasks::{
    TaskStore, ValidationLimits, compute_stats, filter_tasks, parse_create, sort_tasks,
};
use taskdeck_model::{
    Choice, NewTask, OwnerId, SortKey, TagsField, Task, TaskFilter, TaskForm, TaskId, TaskPatch,
    TaskPriority, TaskStatus,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn empty_store() -> TaskStore {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
    TaskStore::with_sources(Arc::new(clock), Arc::new(SequentialIds::new()))
}

/// Creates each task and moves it to its status.
fn populate(specs: Vec<(NewTask, TaskStatus)>) -> TaskStore {
    let mut store = empty_store();
    let owner = OwnerId::new("prop");
    for (new_task, status) in specs {
        let task = store.create(new_task, &owner);
        assert!(store.update(&task.id, TaskPatch::status(status)));
    }
    store
}

/// Position of each task in the store, used to check relative order.
fn positions(store: &TaskStore, tasks: &[&Task]) -> Vec<usize> {
    tasks
        .iter()
        .map(|t| {
            store
                .tasks()
                .iter()
                .position(|s| s.id == t.id)
                .expect("task comes from the store")
        })
        .collect()
}

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = TaskPriority> {
    prop::sample::select(TaskPriority::ALL.to_vec())
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..4)
}

fn arb_new_task() -> impl Strategy<Value = NewTask> {
    (
        "[A-Za-z ]{3,20}",
        "[A-Za-z ]{1,40}",
        arb_priority(),
        0i64..30,
        arb_tags(),
    )
        .prop_map(|(title, description, priority, due, tags)| NewTask {
            title,
            description,
            priority,
            due_date: today() + Duration::days(due),
            tags,
            assignee: None,
        })
}

fn arb_specs() -> impl Strategy<Value = Vec<(NewTask, TaskStatus)>> {
    prop::collection::vec((arb_new_task(), arb_status()), 0..24)
}

fn arb_choice<T: Clone + std::fmt::Debug + 'static>(
    inner: impl Strategy<Value = T> + 'static,
) -> impl Strategy<Value = Choice<T>> {
    prop_oneof![Just(Choice::All), inner.prop_map(Choice::Only)]
}

fn arb_filter() -> impl Strategy<Value = TaskFilter> {
    (
        arb_choice(arb_status()),
        arb_choice(arb_priority()),
        prop_oneof![Just(String::new()), "[a-zA-Z ]{1,4}"],
    )
        .prop_map(|(status, priority, search_query)| TaskFilter {
            status,
            priority,
            search_query,
        })
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::DueDate),
        Just(SortKey::Priority),
        Just(SortKey::Status),
        Just(SortKey::Unsorted),
    ]
}

fn arb_patch() -> impl Strategy<Value = TaskPatch> {
    (
        prop::option::of("[A-Za-z ]{3,20}"),
        prop::option::of("[A-Za-z ]{1,40}"),
        prop::option::of(arb_status()),
        prop::option::of(arb_priority()),
        prop::option::of(0i64..30),
        prop::option::of(arb_tags()),
        prop::option::of(prop::option::of("[a-z]{1,8}")),
    )
        .prop_map(
            |(title, description, status, priority, due, tags, assignee)| TaskPatch {
                title,
                description,
                status,
                priority,
                due_date: due.map(|d| today() + Duration::days(d)),
                tags,
                assignee,
            },
        )
}

fn arb_form() -> impl Strategy<Value = TaskForm> {
    (
        prop::option::of(".{0,120}"),
        prop::option::of(".{0,40}"),
        prop::option::of(prop_oneof![
            Just("low".to_string()),
            Just("critical".to_string()),
            ".{0,8}",
        ]),
        prop::option::of(prop_oneof![
            Just("2026-10-18".to_string()),
            Just("2026-10-17".to_string()),
            ".{0,12}",
        ]),
        prop::option::of(prop_oneof![
            arb_tags().prop_map(TagsField::List),
            "[a-z]{0,6}".prop_map(TagsField::Scalar),
        ]),
    )
        .prop_map(|(title, description, priority, due_date, tags)| TaskForm {
            title,
            description,
            priority,
            due_date,
            tags,
            assignee: None,
        })
}

// --- Property tests ---

proptest! {
    /// Filtering an already filtered view changes nothing.
    #[test]
    fn filter_is_idempotent(specs in arb_specs(), filter in arb_filter()) {
        let store = populate(specs);
        let once = filter_tasks(store.tasks(), &filter);
        let twice = filter_tasks(once.iter().copied(), &filter);
        prop_assert_eq!(once, twice);
    }

    /// Survivors of a filter keep their relative store order.
    #[test]
    fn filter_preserves_order(specs in arb_specs(), filter in arb_filter()) {
        let store = populate(specs);
        let hits = filter_tasks(store.tasks(), &filter);
        let pos = positions(&store, &hits);
        prop_assert!(pos.windows(2).all(|w| w[0] < w[1]));
        for task in &hits {
            prop_assert!(filter.status.matches(&task.status));
            prop_assert!(filter.priority.matches(&task.priority));
        }
    }

    /// Sorting is a permutation that keeps ties in their store order.
    #[test]
    fn sort_is_stable(specs in arb_specs(), key in arb_sort_key()) {
        let store = populate(specs);
        let mut sorted: Vec<&Task> = store.tasks().iter().collect();
        sort_tasks(&mut sorted, key);
        prop_assert_eq!(sorted.len(), store.len());

        let pos = positions(&store, &sorted);
        for (w, idx) in sorted.windows(2).zip(pos.windows(2)) {
            let (a, b) = (w[0], w[1]);
            let tie = match key {
                SortKey::DueDate => {
                    prop_assert!(a.due_date >= b.due_date);
                    a.due_date == b.due_date
                }
                SortKey::Priority => {
                    prop_assert!(a.priority.severity_rank() <= b.priority.severity_rank());
                    a.priority == b.priority
                }
                SortKey::Status => {
                    prop_assert!(a.status.workflow_rank() <= b.status.workflow_rank());
                    a.status == b.status
                }
                SortKey::Unsorted => true,
            };
            if tie {
                prop_assert!(idx[0] < idx[1]);
            }
        }
    }

    /// Status counts partition the collection.
    #[test]
    fn stats_counts_sum_to_total(specs in arb_specs()) {
        let store = populate(specs);
        let stats = compute_stats(store.tasks());
        prop_assert_eq!(stats.total, store.len());
        prop_assert_eq!(
            stats.completed + stats.pending + stats.in_progress + stats.on_hold,
            stats.total
        );
        prop_assert!(stats.high_priority <= stats.total);
        prop_assert!(stats.completion_percentage <= 100);
        if stats.total == 0 {
            prop_assert_eq!(stats.completion_percentage, 0);
        }
        if stats.completed == stats.total && stats.total > 0 {
            prop_assert_eq!(stats.completion_percentage, 100);
        }
    }

    /// Created tasks start pending, owned, and stamped with the clock.
    #[test]
    fn create_applies_defaults(new_task in arb_new_task()) {
        let mut store = empty_store();
        let now = store.clock().now();
        let owner = OwnerId::new("prop");
        let task = store.create(new_task.clone(), &owner);

        prop_assert_eq!(task.status, TaskStatus::Pending);
        prop_assert_eq!(task.created_at, now);
        prop_assert_eq!(task.updated_at, now);
        prop_assert_eq!(&task.owner, &owner);
        prop_assert_eq!(&task.title, &new_task.title);
        prop_assert_eq!(&task.tags, &new_task.tags);
        prop_assert_eq!(store.tasks().first(), Some(&task));
    }

    /// Deleting a present id removes exactly that task; an absent id is a no-op.
    #[test]
    fn delete_removes_one(specs in arb_specs(), pick in any::<prop::sample::Index>()) {
        let mut store = populate(specs);
        let before = store.len();

        prop_assert!(!store.delete(&TaskId::from("missing")));
        prop_assert_eq!(store.len(), before);

        if before > 0 {
            let id = store.tasks()[pick.index(before)].id.clone();
            prop_assert!(store.delete(&id));
            prop_assert_eq!(store.len(), before - 1);
            prop_assert!(store.find_by_id(&id).is_none());
        }
    }

    /// Fields absent from a patch keep their values.
    #[test]
    fn update_touches_only_patched_fields(new_task in arb_new_task(), patch in arb_patch()) {
        let mut store = empty_store();
        let task = store.create(new_task, &OwnerId::new("prop"));
        prop_assert!(store.update(&task.id, patch.clone()));
        let after = store.find_by_id(&task.id).expect("still present");

        prop_assert_eq!(&after.id, &task.id);
        prop_assert_eq!(&after.owner, &task.owner);
        prop_assert_eq!(after.created_at, task.created_at);
        prop_assert!(after.updated_at >= after.created_at);
        prop_assert_eq!(&after.title, patch.title.as_ref().unwrap_or(&task.title));
        prop_assert_eq!(
            &after.description,
            patch.description.as_ref().unwrap_or(&task.description)
        );
        prop_assert_eq!(after.status, patch.status.unwrap_or(task.status));
        prop_assert_eq!(after.priority, patch.priority.unwrap_or(task.priority));
        prop_assert_eq!(after.due_date, patch.due_date.unwrap_or(task.due_date));
        prop_assert_eq!(&after.tags, patch.tags.as_ref().unwrap_or(&task.tags));
        prop_assert_eq!(
            &after.assignee,
            patch.assignee.as_ref().unwrap_or(&task.assignee)
        );
    }

    /// Arbitrary forms never panic; accepted ones respect every limit.
    #[test]
    fn accepted_forms_respect_limits(form in arb_form()) {
        let limits = ValidationLimits::default();
        if let Ok(new_task) = parse_create(&form, today(), &limits) {
            let len = new_task.title.chars().count();
            prop_assert!((limits.title_min..=limits.title_max).contains(&len));
            prop_assert!(!new_task.description.is_empty());
            prop_assert!(new_task.description.chars().count() <= limits.description_max);
            prop_assert!(new_task.due_date >= today());
        }
    }
}
