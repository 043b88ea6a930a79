//! Schema migrations for the persisted store document.
//!
//! The document carries a monotonically increasing `version`. Loading an
//! older document applies every migration step between its version and
//! `CURRENT_VERSION`, in order, on the raw JSON value before it is
//! deserialized into `PersistedState`. Each step is pure and idempotent, so
//! a partially migrated document (for example one already holding RFC 3339
//! timestamps) passes through unchanged.
//!
//! History:
//! - 0 -> 1: normalize every timestamp field to RFC 3339 (early documents
//!   stored bare `YYYY-MM-DD` strings or epoch milliseconds)
//! - 1 -> 2: inject a default empty `timeTracking` aggregate into every task
//!   lacking one

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::persist::PersistedState;

/// Version written by the current code.
pub const CURRENT_VERSION: u32 = 2;

struct Migration {
    from: u32,
    name: &'static str,
    apply: fn(&mut Value) -> std::result::Result<(), String>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 0,
        name: "normalize-timestamps",
        apply: normalize_timestamps,
    },
    Migration {
        from: 1,
        name: "inject-time-tracking",
        apply: inject_time_tracking,
    },
];

/// Parse a raw stored document, migrating it up to `CURRENT_VERSION`.
///
/// A document newer than this code understands is rejected; callers fail
/// closed to the empty default (see `TaskStore::open`).
pub fn run(raw: &str) -> Result<PersistedState> {
    let mut doc: Value = serde_json::from_str(raw)?;
    if !doc.is_object() {
        return Err(Error::Migration {
            from: 0,
            reason: "stored document is not a JSON object".to_string(),
        });
    }
    let stored = doc
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    if stored > CURRENT_VERSION {
        return Err(Error::UnsupportedSchema {
            found: stored,
            current: CURRENT_VERSION,
        });
    }

    for migration in MIGRATIONS {
        if migration.from < stored {
            continue;
        }
        tracing::debug!(step = migration.name, from = migration.from, "applying migration");
        (migration.apply)(&mut doc).map_err(|reason| Error::Migration {
            from: migration.from,
            reason,
        })?;
    }
    doc["version"] = json!(CURRENT_VERSION);

    Ok(serde_json::from_value(doc)?)
}

// =============================================================================
// 0 -> 1: timestamp normalization
// =============================================================================

fn normalize_timestamps(doc: &mut Value) -> std::result::Result<(), String> {
    let Some(tasks) = doc.get_mut("tasks").and_then(Value::as_array_mut) else {
        return Ok(());
    };

    for task in tasks {
        let Some(task) = task.as_object_mut() else {
            return Err("task entry is not a JSON object".to_string());
        };

        normalize_field(task, "createdAt", true)?;
        normalize_field(task, "updatedAt", false)?;
        normalize_field(task, "dueDate", false)?;
        normalize_field(task, "endDate", false)?;

        // updatedAt is required in the current model; early documents omitted
        // it, so backfill from createdAt.
        if task.get("updatedAt").map(Value::is_null).unwrap_or(true) {
            if let Some(created) = task.get("createdAt").cloned() {
                task.insert("updatedAt".to_string(), created);
            }
        }

        // Logs only exist in documents that already went partway through a
        // newer migration; normalize them too so steps compose.
        if let Some(logs) = task
            .get_mut("timeTracking")
            .and_then(|t| t.get_mut("logs"))
            .and_then(Value::as_array_mut)
        {
            for log in logs {
                let Some(log) = log.as_object_mut() else {
                    return Err("time log entry is not a JSON object".to_string());
                };
                normalize_field(log, "startTime", true)?;
                normalize_field(log, "endTime", false)?;
            }
        }
    }
    Ok(())
}

/// Rewrite one timestamp field in place as RFC 3339. Required fields fail the
/// migration when unparseable; optional ones degrade to null.
fn normalize_field(
    object: &mut Map<String, Value>,
    field: &str,
    required: bool,
) -> std::result::Result<(), String> {
    let Some(value) = object.get(field) else {
        if required {
            return Err(format!("missing required timestamp field '{field}'"));
        }
        return Ok(());
    };
    if value.is_null() {
        if required {
            return Err(format!("null required timestamp field '{field}'"));
        }
        return Ok(());
    }

    match parse_timestamp(value) {
        Some(instant) => {
            object.insert(field.to_string(), json!(instant.to_rfc3339()));
            Ok(())
        }
        None if required => Err(format!(
            "unparseable required timestamp field '{field}': {value}"
        )),
        None => {
            object.insert(field.to_string(), Value::Null);
            Ok(())
        }
    }
}

/// Accept every representation older documents used: RFC 3339, a naive
/// datetime, a bare date, or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(text) = value.as_str() {
        let text = text.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        return None;
    }
    if let Some(millis) = value.as_i64() {
        return DateTime::from_timestamp_millis(millis);
    }
    None
}

// =============================================================================
// 1 -> 2: default time tracking
// =============================================================================

fn inject_time_tracking(doc: &mut Value) -> std::result::Result<(), String> {
    let Some(tasks) = doc.get_mut("tasks").and_then(Value::as_array_mut) else {
        return Ok(());
    };

    for task in tasks {
        let Some(task) = task.as_object_mut() else {
            return Err("task entry is not a JSON object".to_string());
        };
        let missing = task
            .get("timeTracking")
            .map(Value::is_null)
            .unwrap_or(true);
        if missing {
            task.insert(
                "timeTracking".to_string(),
                json!({
                    "isTracking": false,
                    "totalTime": 0,
                    "logs": [],
                }),
            );
        }
    }
    Ok(())
}
