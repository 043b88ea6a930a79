mod support;

use chrono::Duration;
use serde_json::json;
use support::{manual_store_with_slot, FailingSlot, ManualClock};
use tasktide::persist::FileSlot;
use tasktide::{migrate, NewTask, Priority, TaskStore, TaskView};
use tempfile::TempDir;

#[test]
fn state_survives_a_reopen_through_the_file_slot() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    let clock = ManualClock::at(support::base_time());

    {
        let mut store = TaskStore::with_clock(FileSlot::new(&path), clock.clone());
        store.add_tag("work", "#8b5cf6");
        let tag = store.tags()[0].clone();
        store.add_task(
            NewTask::new("persisted")
                .priority(Priority::P2)
                .due_date(support::base_time() + Duration::days(2))
                .tags(vec![tag]),
        );
        let id = store.tasks()[0].id.clone();
        store.start_time_tracking(&id);
        clock.advance(Duration::minutes(15));
        store.stop_time_tracking(&id);
        store.set_view(TaskView::Upcoming);
    }

    let reopened = TaskStore::with_clock(FileSlot::new(&path), clock.clone());
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tags().len(), 1);
    assert_eq!(reopened.current_view(), TaskView::Upcoming);

    let task = &reopened.tasks()[0];
    assert_eq!(task.title, "persisted");
    assert_eq!(task.priority, Priority::P2);
    // Instant-level equality across the round trip.
    assert_eq!(task.created_at, support::base_time());
    assert_eq!(
        task.due_date,
        Some(support::base_time() + Duration::days(2))
    );
    assert_eq!(task.tracked_minutes(), 15);
    assert_eq!(task.tags[0].name, "work");
}

#[test]
fn every_mutation_saves_a_current_version_document() {
    let (mut store, _clock, slot) = manual_store_with_slot();
    assert!(slot.document().is_none());

    store.add_task(NewTask::new("first"));
    let doc: serde_json::Value = serde_json::from_str(&slot.document().unwrap()).unwrap();
    assert_eq!(doc["version"], json!(migrate::CURRENT_VERSION));
    assert_eq!(doc["tasks"].as_array().unwrap().len(), 1);

    store.set_view(TaskView::Completed);
    let doc: serde_json::Value = serde_json::from_str(&slot.document().unwrap()).unwrap();
    assert_eq!(doc["currentView"], json!("completed"));
}

#[test]
fn corrupt_document_fails_closed_to_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = TaskStore::open(FileSlot::new(&path));
    assert!(store.tasks().is_empty());
    assert!(store.tags().is_empty());
    assert_eq!(store.current_view(), TaskView::All);
}

#[test]
fn newer_schema_fails_closed_to_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(
        &path,
        json!({ "version": 99, "tasks": [], "tags": [] }).to_string(),
    )
    .unwrap();

    let store = TaskStore::open(FileSlot::new(&path));
    assert!(store.tasks().is_empty());
}

#[test]
fn legacy_document_is_migrated_on_open() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(
        &path,
        json!({
            "tasks": [{
                "id": "legacy-1",
                "title": "from v0",
                "completed": false,
                "createdAt": "2024-01-05",
                "dueDate": "2024-01-10",
                "priority": "p2",
                "tags": [],
            }],
            "tags": [],
            "currentView": "today",
            "selectedTags": [],
        })
        .to_string(),
    )
    .unwrap();

    let store = TaskStore::open(FileSlot::new(&path));
    let task = store.task("legacy-1").unwrap();
    assert_eq!(task.created_at.to_rfc3339(), "2024-01-05T00:00:00+00:00");
    assert!(task.time_tracking.is_some());
    assert_eq!(store.current_view(), TaskView::Today);
}

#[test]
fn failed_saves_never_abort_mutations() {
    let mut store = TaskStore::open(FailingSlot);
    store.add_task(NewTask::new("kept in memory"));
    store.toggle_task(&store.tasks()[0].id.clone());

    // In-memory state stays authoritative for the session.
    assert_eq!(store.tasks().len(), 1);
    assert!(store.tasks()[0].completed);
}
