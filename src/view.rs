//! View filter/sort pipeline.
//!
//! A pure derivation of the visible task list from `{tasks, view, selected
//! tag ids, now}`. Nothing here is memoized; the store calls into this on
//! every read.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Named predicate selecting which tasks are currently visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskView {
    #[default]
    All,
    Today,
    Upcoming,
    Completed,
}

/// Apply the view filter, the tag filter, and the three-level sort.
///
/// Filtering happens in two stages: the view predicate first, then (only when
/// `selected_tags` is non-empty) a keep-if-any-tag-matches stage. The sort is
/// stable with tie-breaks in order: priority ascending, due date
/// (present-first, then earliest-first), creation time descending.
pub fn filter_and_sort<'a>(
    tasks: &'a [Task],
    view: TaskView,
    selected_tags: &[String],
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| view_predicate(task, view, now))
        .collect();

    if !selected_tags.is_empty() {
        visible.retain(|task| {
            task.tags
                .iter()
                .any(|tag| selected_tags.iter().any(|id| *id == tag.id))
        });
    }

    visible.sort_by(|left, right| compare_tasks(left, right));
    visible
}

fn view_predicate(task: &Task, view: TaskView, now: DateTime<Utc>) -> bool {
    match view {
        TaskView::All => !task.completed,
        TaskView::Completed => task.completed,
        TaskView::Today => !task.completed && due_within_days(task, now, 1),
        TaskView::Upcoming => !task.completed && due_within_days(task, now, 8),
    }
}

/// True when the task has a due date inside `[start-of-today,
/// start-of-today + days)` in UTC.
fn due_within_days(task: &Task, now: DateTime<Utc>, days: i64) -> bool {
    let Some(due) = task.due_date else {
        return false;
    };
    let start = start_of_day(now);
    due >= start && due < start + Duration::days(days)
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn compare_tasks(left: &Task, right: &Task) -> Ordering {
    left.priority
        .cmp(&right.priority)
        .then_with(|| compare_due_dates(left.due_date, right.due_date))
        .then_with(|| right.created_at.cmp(&left.created_at))
}

/// Tasks with a due date sort before tasks without one; among dated tasks,
/// earlier first.
fn compare_due_dates(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
