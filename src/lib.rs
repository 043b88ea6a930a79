//! tasktide - Task State Store Library
//!
//! This library provides the core of a personal task-management application:
//! a single authoritative state container for tasks, tags, and view state,
//! with derived views, time tracking, versioned persistence, and analytics.
//!
//! # Core Concepts
//!
//! - **Task Store**: the one in-memory source of truth; all mutations go
//!   through it and each is followed by a best-effort save
//! - **Views**: named predicates (all/today/upcoming/completed) combined with
//!   a tag filter and a stable three-level sort
//! - **Time Tracking**: a guarded per-task state machine accumulating whole
//!   minutes into a running total
//! - **Persistence**: one versioned JSON document in an abstract durable
//!   slot, migrated forward on load
//! - **Analytics**: an on-demand read-only snapshot serializable for export
//!
//! # Module Organization
//!
//! - `task`, `tag`: entity model
//! - `store`: the `TaskStore` service object
//! - `view`: filter/sort pipeline
//! - `tracking`: time-tracking state machine
//! - `persist`: state slots and the persisted document
//! - `migrate`: schema migration steps and driver
//! - `clock`: wall-clock seam
//! - `analytics`: productivity report
//! - `error`: error types and result alias

pub mod analytics;
pub mod clock;
pub mod error;
pub mod migrate;
pub mod persist;
pub mod store;
pub mod tag;
pub mod task;
pub mod tracking;
pub mod view;

pub use analytics::AnalyticsReport;
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use persist::{FileSlot, MemorySlot, PersistedState, StateSlot};
pub use store::TaskStore;
pub use tag::{Tag, TagPatch};
pub use task::{NewTask, Priority, Task, TaskPatch, TimeLog, TimeTracking};
pub use view::TaskView;
