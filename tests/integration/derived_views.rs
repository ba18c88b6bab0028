//! Integration tests for derived views: filtering, search, sort orders and
//! summary statistics over a populated store.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::similar_names)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use taskdeck::clock::{ManualClock, SequentialIds};
use taskdeck::tasks::{TaskStore, compute_stats, filter_tasks, sort_tasks, visible_tasks};
use taskdeck_model::{
    Choice, NewTask, OwnerId, SortKey, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus,
};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn empty_store() -> TaskStore {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
    TaskStore::with_sources(Arc::new(clock), Arc::new(SequentialIds::new()))
}

fn new_task(title: &str, priority: TaskPriority, due_in_days: i64, tags: &[&str]) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: format!("About {title}"),
        priority,
        due_date: today() + Duration::days(due_in_days),
        tags: tags.iter().map(ToString::to_string).collect(),
        assignee: None,
    }
}

/// Adds `specs` in order and moves each task to its status.
///
/// The store prepends, so the collection ends up in reverse order of `specs`.
fn populate(specs: &[(&str, TaskPriority, TaskStatus, i64)]) -> TaskStore {
    let mut store = empty_store();
    let owner = OwnerId::new("u1");
    for &(title, priority, status, due) in specs {
        let task = store.create(new_task(title, priority, due, &[]), &owner);
        store.update(&task.id, TaskPatch::status(status));
    }
    store
}

fn titles(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.title.clone()).collect()
}

// ===========================================================================
// Filter and search
// ===========================================================================

#[test]
fn search_matches_tag() {
    let mut store = empty_store();
    let owner = OwnerId::new("u1");
    store.create(
        new_task("Write report", TaskPriority::Medium, 2, &["work"]),
        &owner,
    );
    store.create(new_task("Buy milk", TaskPriority::Low, 1, &[]), &owner);

    let filter = TaskFilter {
        search_query: "work".to_string(),
        ..TaskFilter::default()
    };
    let hits = filter_tasks(store.tasks(), &filter);

    assert_eq!(titles(&hits), vec!["Write report"]);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let mut store = empty_store();
    let owner = OwnerId::new("u1");
    store.create(
        new_task("Tidy garage", TaskPriority::Low, 4, &["Home"]),
        &owner,
    );
    store.create(
        NewTask {
            description: "Email the LANDLORD about the boiler".to_string(),
            ..new_task("Boiler", TaskPriority::High, 1, &[])
        },
        &owner,
    );
    store.create(new_task("Plan trip", TaskPriority::Low, 9, &[]), &owner);

    let by = |query: &str| {
        let filter = TaskFilter {
            search_query: query.to_string(),
            ..TaskFilter::default()
        };
        titles(&filter_tasks(store.tasks(), &filter))
    };

    assert_eq!(by("landlord"), vec!["Boiler"]);
    assert_eq!(by("HOME"), vec!["Tidy garage"]);
    assert_eq!(by("TRIP"), vec!["Plan trip"]);
    // Whitespace only decides whether search is on; it still has to match.
    assert!(by("trip ").is_empty());
    assert_eq!(by(" garage"), vec!["Tidy garage"]);
    assert_eq!(by("   ").len(), 3);
    assert!(by("dentist").is_empty());
}

#[test]
fn criteria_combine_conjunctively() {
    let store = populate(&[
        ("Alpha", TaskPriority::High, TaskStatus::Pending, 1),
        ("Bravo", TaskPriority::High, TaskStatus::Completed, 1),
        ("Charlie", TaskPriority::Low, TaskStatus::Pending, 1),
        ("Delta", TaskPriority::High, TaskStatus::Pending, 1),
    ]);

    let filter = TaskFilter {
        status: Choice::Only(TaskStatus::Pending),
        priority: Choice::Only(TaskPriority::High),
        search_query: String::new(),
    };
    let hits = filter_tasks(store.tasks(), &filter);

    // Input order (newest first) is preserved.
    assert_eq!(titles(&hits), vec!["Delta", "Alpha"]);
}

#[test]
fn filtering_never_mutates_the_store() {
    let store = populate(&[
        ("Alpha", TaskPriority::High, TaskStatus::Pending, 1),
        ("Bravo", TaskPriority::Low, TaskStatus::Completed, 2),
    ]);
    let before = store.tasks().to_vec();

    let filter = TaskFilter {
        status: Choice::Only(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    let _ = visible_tasks(store.tasks(), &filter, SortKey::Priority);

    assert_eq!(store.tasks(), before.as_slice());
}

// ===========================================================================
// Sort
// ===========================================================================

#[test]
fn sort_by_due_date_puts_latest_first() {
    let store = populate(&[
        ("Soon", TaskPriority::Low, TaskStatus::Pending, 1),
        ("Later", TaskPriority::Low, TaskStatus::Pending, 10),
        ("Middle", TaskPriority::Low, TaskStatus::Pending, 5),
    ]);
    let mut tasks: Vec<&Task> = store.tasks().iter().collect();
    sort_tasks(&mut tasks, SortKey::DueDate);
    assert_eq!(titles(&tasks), vec!["Later", "Middle", "Soon"]);
}

#[test]
fn sort_by_priority_is_stable() {
    let store = populate(&[
        ("Low one", TaskPriority::Low, TaskStatus::Pending, 1),
        ("High one", TaskPriority::High, TaskStatus::Pending, 1),
        ("Critical", TaskPriority::Critical, TaskStatus::Pending, 1),
        ("High two", TaskPriority::High, TaskStatus::Pending, 1),
        ("Medium", TaskPriority::Medium, TaskStatus::Pending, 1),
    ]);
    let mut tasks: Vec<&Task> = store.tasks().iter().collect();
    sort_tasks(&mut tasks, SortKey::Priority);

    // "High two" was created later, so it precedes "High one" in the store.
    assert_eq!(
        titles(&tasks),
        vec!["Critical", "High two", "High one", "Medium", "Low one"]
    );
}

#[test]
fn sort_by_status_follows_workflow_rank() {
    let store = populate(&[
        ("Done", TaskPriority::Low, TaskStatus::Completed, 1),
        ("Waiting", TaskPriority::Low, TaskStatus::Pending, 1),
        ("Parked", TaskPriority::Low, TaskStatus::OnHold, 1),
        ("Active", TaskPriority::Low, TaskStatus::InProgress, 1),
    ]);
    let mut tasks: Vec<&Task> = store.tasks().iter().collect();
    sort_tasks(&mut tasks, SortKey::Status);
    assert_eq!(titles(&tasks), vec!["Active", "Parked", "Waiting", "Done"]);
}

#[test]
fn unknown_sort_key_keeps_store_order() {
    let store = populate(&[
        ("First", TaskPriority::Low, TaskStatus::Completed, 9),
        ("Second", TaskPriority::Critical, TaskStatus::Pending, 1),
    ]);
    let key = SortKey::from("alphabetical");
    let tasks = visible_tasks(store.tasks(), &TaskFilter::default(), key);
    assert_eq!(titles(&tasks), vec!["Second", "First"]);
}

// ===========================================================================
// Stats
// ===========================================================================

#[test]
fn stats_over_mixed_statuses() {
    let store = populate(&[
        ("One", TaskPriority::Low, TaskStatus::Completed, 1),
        ("Two", TaskPriority::Medium, TaskStatus::Completed, 1),
        ("Three", TaskPriority::High, TaskStatus::Pending, 1),
        ("Four", TaskPriority::Critical, TaskStatus::InProgress, 1),
    ]);

    let stats = compute_stats(store.tasks());

    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.on_hold, 0);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.completion_percentage, 50);
}

#[test]
fn stats_ignore_the_filter() {
    let store = populate(&[
        ("One", TaskPriority::Low, TaskStatus::Completed, 1),
        ("Two", TaskPriority::Low, TaskStatus::Pending, 1),
        ("Three", TaskPriority::Low, TaskStatus::Pending, 1),
    ]);
    let filter = TaskFilter {
        status: Choice::Only(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    assert_eq!(filter_tasks(store.tasks(), &filter).len(), 1);

    let stats = compute_stats(store.tasks());
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completion_percentage, 33);
}

#[test]
fn stats_serialize_camel_case() {
    let store = populate(&[("One", TaskPriority::High, TaskStatus::OnHold, 1)]);
    let json = serde_json::to_value(compute_stats(store.tasks())).unwrap();

    assert_eq!(json["total"], 1);
    assert_eq!(json["onHold"], 1);
    assert_eq!(json["inProgress"], 0);
    assert_eq!(json["highPriority"], 1);
    assert_eq!(json["completionPercentage"], 0);
}
