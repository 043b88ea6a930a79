//! Task store: the single authoritative state container.
//!
//! `TaskStore` owns the in-memory state (tasks, tags, current view, selected
//! tag filter) and exposes synchronous mutation and read operations. Every
//! mutation runs to completion against the in-memory state and is followed by
//! a best-effort save into the injected `StateSlot`; save failures are logged
//! and never abort the mutation that triggered them.
//!
//! Mutations addressed at an unknown task or tag id are silent no-ops. That
//! behavior is funneled through `find_task_mut` / `find_tag_mut` so it can be
//! swapped for explicit error signaling later without touching call sites.

use chrono::{DateTime, Utc};

use crate::analytics::AnalyticsReport;
use crate::clock::{Clock, SystemClock};
use crate::migrate::{self, CURRENT_VERSION};
use crate::persist::{FileSlot, MemorySlot, PersistedState, StateSlot};
use crate::tag::{Tag, TagPatch};
use crate::task::{NewTask, Task, TaskPatch};
use crate::tracking;
use crate::view::{self, TaskView};
use crate::Result;

/// The single source of truth for task state.
pub struct TaskStore {
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    current_view: TaskView,
    selected_tags: Vec<String>,
    slot: Box<dyn StateSlot>,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    /// Open a store over the given slot, restoring (and migrating) any
    /// previously saved document.
    ///
    /// A corrupt or unrecognized document fails closed: the store starts
    /// from the empty default, since no prior session data is safe to trust.
    pub fn open(slot: impl StateSlot + 'static) -> Self {
        Self::with_clock(slot, SystemClock)
    }

    /// Open a store with an explicit clock. The clock stamps `createdAt` /
    /// `updatedAt` and drives time tracking; tests inject a manual one.
    pub fn with_clock(slot: impl StateSlot + 'static, clock: impl Clock + 'static) -> Self {
        let restored = Self::restore(&slot);
        Self {
            tasks: restored.tasks,
            tags: restored.tags,
            current_view: restored.current_view,
            selected_tags: restored.selected_tags,
            slot: Box::new(slot),
            clock: Box::new(clock),
        }
    }

    /// Ephemeral store backed by an in-memory slot.
    pub fn in_memory() -> Self {
        Self::open(MemorySlot::new())
    }

    /// Store over the default per-user state file.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(FileSlot::default_location()?))
    }

    fn restore(slot: &dyn StateSlot) -> PersistedState {
        match slot.load() {
            Ok(Some(raw)) => match migrate::run(&raw) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(error = %err, "stored state unusable, starting empty");
                    PersistedState::empty()
                }
            },
            Ok(None) => PersistedState::empty(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored state, starting empty");
                PersistedState::empty()
            }
        }
    }

    // =========================================================================
    // Read operations
    // =========================================================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn current_view(&self) -> TaskView {
        self.current_view
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    /// The task list for the current view and tag filter, filtered and
    /// sorted. Pure derivation over the current state; recomputed per call.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        view::filter_and_sort(
            &self.tasks,
            self.current_view,
            &self.selected_tags,
            self.clock.now(),
        )
    }

    /// Live tracked-minutes projection for a task: accumulated total plus
    /// minutes elapsed on an open log. Read-only; nothing is written back
    /// until `stop_time_tracking`.
    pub fn elapsed_minutes(&self, id: &str) -> Option<u32> {
        let task = self.task(id)?;
        let tracking = task.time_tracking.as_ref()?;
        Some(tracking::elapsed_minutes(tracking, self.clock.now()))
    }

    /// On-demand analytics snapshot, a pure function of the current state.
    pub fn analytics(&self) -> AnalyticsReport {
        AnalyticsReport::compute(&self.tasks, &self.tags, self.clock.now())
    }

    // =========================================================================
    // Task mutations
    // =========================================================================

    /// Create a task from caller-supplied fields. The store generates the id
    /// and stamps both timestamps; an `endDate` earlier than `dueDate` is
    /// silently dropped rather than failing the whole write.
    pub fn add_task(&mut self, input: NewTask) {
        let now = self.clock.now();
        let NewTask {
            title,
            description,
            due_date,
            end_date,
            priority,
            tags,
        } = input;

        self.tasks.push(Task {
            id: Task::generate_id(),
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
            due_date,
            end_date: validated_end_date(due_date, end_date),
            priority,
            tags,
            time_tracking: None,
        });
        self.persist();
    }

    /// Flip a task's completion flag.
    pub fn toggle_task(&mut self, id: &str) {
        let now = self.clock.now();
        let Some(task) = find_task_mut(&mut self.tasks, id) else {
            return;
        };
        task.completed = !task.completed;
        task.updated_at = now;
        self.persist();
    }

    /// Remove a task. Deleting an unknown id is a no-op, not an error.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() != before {
            self.persist();
        } else {
            tracing::debug!(%id, "delete_task: unknown task id, ignoring");
        }
    }

    /// Merge a partial update into a task. A `tags` value in the patch
    /// replaces the embedded collection; absent fields are preserved.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let now = self.clock.now();
        let Some(task) = find_task_mut(&mut self.tasks, id) else {
            return;
        };

        let TaskPatch {
            title,
            description,
            due_date,
            end_date,
            priority,
            tags,
        } = patch;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        // The add-path leniency applies only when the patch itself carries
        // both dates; merged state is not re-validated.
        let (due_date, end_date) = match (due_date, end_date) {
            (Some(due), Some(end)) => (Some(due), Some(validated_end_date(due, end))),
            other => other,
        };
        if let Some(due) = due_date {
            task.due_date = due;
        }
        if let Some(end) = end_date {
            task.end_date = end;
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(tags) = tags {
            task.tags = tags;
        }
        task.updated_at = now;
        self.persist();
    }

    // =========================================================================
    // Tag mutations
    // =========================================================================

    /// Create a tag. Existing tasks are untouched; assignment happens through
    /// `update_task`.
    pub fn add_tag(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.tags.push(Tag::new(name, color));
        self.persist();
    }

    /// Remove a tag from the collection and cascade the removal into every
    /// task's embedded copy, within this single operation.
    pub fn delete_tag(&mut self, id: &str) {
        let before = self.tags.len();
        self.tags.retain(|tag| tag.id != id);
        if self.tags.len() == before {
            tracing::debug!(%id, "delete_tag: unknown tag id, ignoring");
            return;
        }
        for task in &mut self.tasks {
            task.tags.retain(|tag| tag.id != id);
        }
        self.persist();
    }

    /// Merge a partial update into a tag and propagate the new fields into
    /// every task's embedded copy (denormalization repair).
    pub fn update_tag(&mut self, id: &str, patch: TagPatch) {
        let Some(tag) = find_tag_mut(&mut self.tags, id) else {
            return;
        };
        patch.apply(tag);
        for task in &mut self.tasks {
            for embedded in task.tags.iter_mut().filter(|tag| tag.id == id) {
                patch.apply(embedded);
            }
        }
        self.persist();
    }

    // =========================================================================
    // View state
    // =========================================================================

    pub fn set_view(&mut self, view: TaskView) {
        self.current_view = view;
        self.persist();
    }

    pub fn set_selected_tags(&mut self, tag_ids: Vec<String>) {
        self.selected_tags = tag_ids;
        self.persist();
    }

    // =========================================================================
    // Time tracking
    // =========================================================================

    /// Start tracking time on a task. Already-tracking tasks are left
    /// untouched, so two concurrent open logs can never exist.
    pub fn start_time_tracking(&mut self, id: &str) {
        let now = self.clock.now();
        let Some(task) = find_task_mut(&mut self.tasks, id) else {
            return;
        };
        let aggregate = task.time_tracking.get_or_insert_with(Default::default);
        if tracking::start(aggregate, now) {
            task.updated_at = now;
            self.persist();
        }
    }

    /// Stop tracking time on a task, closing the open log and folding its
    /// duration into the total. Idle tasks are left untouched.
    pub fn stop_time_tracking(&mut self, id: &str) {
        let now = self.clock.now();
        let Some(task) = find_task_mut(&mut self.tasks, id) else {
            return;
        };
        let Some(aggregate) = task.time_tracking.as_mut() else {
            return;
        };
        if tracking::stop(aggregate, now).is_some() {
            task.updated_at = now;
            self.persist();
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Fire-and-forget save of the whole state. Failure leaves the in-memory
    /// state authoritative for the session and surfaces as a warning only.
    fn persist(&self) {
        let document = PersistedState {
            version: CURRENT_VERSION,
            tasks: self.tasks.clone(),
            tags: self.tags.clone(),
            current_view: self.current_view,
            selected_tags: self.selected_tags.clone(),
        };
        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "state serialization failed, skipping save");
                return;
            }
        };
        if let Err(err) = self.slot.save(&json) {
            tracing::warn!(error = %err, "state save failed, in-memory state stays authoritative");
        }
    }
}

/// Resolve-or-no-op: unknown ids are ignored (logged at debug), matching the
/// store's silent-no-op contract.
fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    let task = tasks.iter_mut().find(|task| task.id == id);
    if task.is_none() {
        tracing::debug!(%id, "unknown task id, ignoring");
    }
    task
}

fn find_tag_mut<'a>(tags: &'a mut [Tag], id: &str) -> Option<&'a mut Tag> {
    let tag = tags.iter_mut().find(|tag| tag.id == id);
    if tag.is_none() {
        tracing::debug!(%id, "unknown tag id, ignoring");
    }
    tag
}

/// Drop an `endDate` earlier than `dueDate` instead of rejecting the write.
fn validated_end_date(
    due_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (due_date, end_date) {
        (Some(due), Some(end)) if end < due => {
            tracing::debug!("dropping endDate earlier than dueDate");
            None
        }
        (_, end) => end,
    }
}
