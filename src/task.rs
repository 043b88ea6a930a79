//! Task entity model.
//!
//! Tasks carry scheduling fields, an ordered priority, denormalized tag
//! copies, and an optional time-tracking aggregate. All timestamps are
//! assigned by the store, never by callers; the wire format uses camelCase
//! field names and RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tag::Tag;

/// Task priority, ordered from most to least urgent.
///
/// The derived `Ord` is the sort order: `P1` (Urgent) compares lowest and
/// therefore sorts first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    P1,
    P2,
    P3,
    #[default]
    P4,
}

impl Priority {
    /// All priority levels in urgency order.
    pub const ALL: [Priority; 4] = [Priority::P1, Priority::P2, Priority::P3, Priority::P4];

    /// Human-readable label for display and analytics.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "Urgent",
            Priority::P2 => "High",
            Priority::P3 => "Medium",
            Priority::P4 => "Low",
        }
    }
}

/// One contiguous start/stop interval of tracked work on a task.
///
/// `duration` stays 0 while the log is open and is computed (in whole
/// minutes) when the log is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: u32,
}

impl TimeLog {
    /// A log is open until it has been closed by a stop.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Per-task time-tracking aggregate.
///
/// Invariants (maintained by `tracking`):
/// - at most one open log at any time
/// - `is_tracking` is true iff the last log is open
/// - `total_time` equals the sum of all closed logs' durations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    pub is_tracking: bool,
    pub total_time: u32,
    #[serde(default)]
    pub logs: Vec<TimeLog>,
}

/// A user-visible unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    /// Denormalized copies of assigned tags, not references. The store
    /// repairs these copies when a tag is renamed, recolored, or deleted.
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_tracking: Option<TimeTracking>,
}

impl Task {
    pub(crate) fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Total tracked minutes, 0 when the task has no tracking aggregate.
    pub fn tracked_minutes(&self) -> u32 {
        self.time_tracking
            .as_ref()
            .map(|t| t.total_time)
            .unwrap_or(0)
    }

    /// Whether this task carries an embedded copy of the given tag.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

/// Caller-supplied fields for creating a task.
///
/// Excludes everything the store owns: id, completion flag, and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub tags: Vec<Tag>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update for `TaskStore::update_task`.
///
/// `None` leaves a field untouched. Clearable optional fields use a nested
/// `Option`: `Some(None)` clears, `Some(Some(v))` replaces. A `tags` value
/// replaces the whole embedded collection.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<Tag>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn due_date(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn end_date(mut self, end: Option<DateTime<Utc>>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}
