mod support;

use std::collections::HashSet;

use chrono::Duration;
use support::manual_store;
use tasktide::{NewTask, Priority, TagPatch, TaskPatch};

#[test]
fn added_tasks_get_unique_ids_and_equal_timestamps() {
    let (mut store, _clock) = manual_store();
    for i in 0..50 {
        store.add_task(NewTask::new(format!("task {i}")));
    }

    let ids: HashSet<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 50);
    for task in store.tasks() {
        assert_eq!(task.created_at, task.updated_at);
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::P4);
        assert!(task.tags.is_empty());
    }
}

#[test]
fn toggle_twice_restores_flag_and_bumps_updated_at() {
    let (mut store, clock) = manual_store();
    store.add_task(NewTask::new("flip me"));
    let id = store.tasks()[0].id.clone();
    let created = store.tasks()[0].created_at;

    clock.advance(Duration::minutes(1));
    store.toggle_task(&id);
    let after_first = store.task(&id).unwrap().updated_at;
    assert!(store.task(&id).unwrap().completed);
    assert!(after_first > created);

    clock.advance(Duration::minutes(1));
    store.toggle_task(&id);
    let after_second = store.task(&id).unwrap().updated_at;
    assert!(!store.task(&id).unwrap().completed);
    assert!(after_second > after_first);
}

#[test]
fn delete_task_is_idempotent() {
    let (mut store, _clock) = manual_store();
    store.add_task(NewTask::new("gone soon"));
    let id = store.tasks()[0].id.clone();

    store.delete_task(&id);
    assert!(store.tasks().is_empty());

    // Second delete of the same id is a quiet no-op.
    store.delete_task(&id);
    assert!(store.tasks().is_empty());
}

#[test]
fn mutations_on_unknown_ids_change_nothing() {
    let (mut store, _clock) = manual_store();
    store.add_task(NewTask::new("only task"));
    let snapshot = store.tasks().to_vec();

    store.toggle_task("missing");
    store.update_task("missing", TaskPatch::default().title("nope"));
    store.start_time_tracking("missing");
    store.stop_time_tracking("missing");
    store.update_tag("missing", TagPatch::default().name("nope"));
    store.delete_tag("missing");

    assert_eq!(store.tasks(), &snapshot[..]);
    assert!(store.tags().is_empty());
}

#[test]
fn update_task_merges_fields_and_preserves_tags_when_absent() {
    let (mut store, clock) = manual_store();
    store.add_tag("work", "#8b5cf6");
    let tag = store.tags()[0].clone();
    store.add_task(NewTask::new("draft").tags(vec![tag.clone()]));
    let id = store.tasks()[0].id.clone();

    clock.advance(Duration::seconds(30));
    store.update_task(
        &id,
        TaskPatch::default()
            .title("final")
            .priority(Priority::P1)
            .description(Some("ship it".to_string())),
    );

    let task = store.task(&id).unwrap();
    assert_eq!(task.title, "final");
    assert_eq!(task.priority, Priority::P1);
    assert_eq!(task.description.as_deref(), Some("ship it"));
    // No tags field in the patch: embedded collection untouched.
    assert_eq!(task.tags, vec![tag]);
    assert!(task.updated_at > task.created_at);
}

#[test]
fn update_task_with_tags_replaces_collection() {
    let (mut store, _clock) = manual_store();
    store.add_tag("old", "#111");
    let old = store.tags()[0].clone();
    store.add_task(NewTask::new("retag").tags(vec![old]));
    let id = store.tasks()[0].id.clone();

    store.add_tag("new", "#222");
    let new = store.tags()[1].clone();
    store.update_task(&id, TaskPatch::default().tags(vec![new.clone()]));

    assert_eq!(store.task(&id).unwrap().tags, vec![new]);
}

#[test]
fn add_task_drops_end_date_before_due_date() {
    let (mut store, clock) = manual_store();
    let due = support::base_time() + Duration::days(10);
    let end = support::base_time() + Duration::days(5);
    store.add_task(NewTask::new("bad window").due_date(due).end_date(end));

    let task = &store.tasks()[0];
    assert_eq!(task.due_date, Some(due));
    assert_eq!(task.end_date, None);

    // A consistent window is kept as given.
    clock.advance(Duration::seconds(1));
    store.add_task(NewTask::new("good window").due_date(end).end_date(due));
    assert_eq!(store.tasks()[1].end_date, Some(due));
}

#[test]
fn rename_tag_propagates_into_embedded_copies() {
    let (mut store, _clock) = manual_store();
    store.add_tag("errands", "#f59e0b");
    let tag = store.tags()[0].clone();
    store.add_task(NewTask::new("one").tags(vec![tag.clone()]));
    store.add_task(NewTask::new("two").tags(vec![tag.clone()]));
    store.add_task(NewTask::new("untagged"));

    store.update_tag(&tag.id, TagPatch::default().name("X"));

    assert_eq!(store.tags()[0].name, "X");
    for task in store.tasks().iter().take(2) {
        let embedded = task.tags.iter().find(|t| t.id == tag.id).unwrap();
        assert_eq!(embedded.name, "X");
        // Color was not in the patch and survives.
        assert_eq!(embedded.color, "#f59e0b");
    }
    assert!(store.tasks()[2].tags.is_empty());
}

#[test]
fn delete_tag_cascades_into_every_task() {
    let (mut store, _clock) = manual_store();
    store.add_tag("home", "#10b981");
    store.add_tag("keep", "#3b82f6");
    let home = store.tags()[0].clone();
    let keep = store.tags()[1].clone();
    store.add_task(NewTask::new("both").tags(vec![home.clone(), keep.clone()]));

    store.delete_tag(&home.id);

    assert_eq!(store.tags().len(), 1);
    assert!(store.tags().iter().all(|t| t.id != home.id));
    for task in store.tasks() {
        assert!(!task.has_tag(&home.id));
    }
    assert_eq!(store.tasks()[0].tags, vec![keep.clone()]);
}

#[test]
fn dangling_selected_tag_matches_nothing_after_delete() {
    let (mut store, _clock) = manual_store();
    store.add_tag("gone", "#000");
    let gone = store.tags()[0].clone();
    store.add_task(NewTask::new("was tagged").tags(vec![gone.clone()]));
    store.set_selected_tags(vec![gone.id.clone()]);

    store.delete_tag(&gone.id);

    // The selection still references the deleted tag and now matches no
    // task; it is not silently cleared.
    assert_eq!(store.selected_tags(), [gone.id.clone()]);
    assert!(store.filtered_tasks().is_empty());
}
