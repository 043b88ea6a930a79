//! Time-tracking state machine.
//!
//! A task's tracking aggregate is either idle or tracking (exactly one open
//! log, the last one). Transitions are guarded: starting while tracking and
//! stopping while idle are no-ops, so at most one open log can ever exist.
//! All functions take an explicit `now` so callers own the clock.

use chrono::{DateTime, Utc};

use crate::task::{TimeLog, TimeTracking};

/// Begin a tracking interval. Returns `false` (leaving state untouched) if
/// the aggregate is already tracking.
pub fn start(tracking: &mut TimeTracking, now: DateTime<Utc>) -> bool {
    if tracking.is_tracking {
        return false;
    }
    tracking.logs.push(TimeLog {
        start_time: now,
        end_time: None,
        duration: 0,
    });
    tracking.is_tracking = true;
    true
}

/// Close the open tracking interval and fold its duration into `total_time`.
/// Returns the closed interval's minutes, or `None` if the aggregate was
/// idle.
pub fn stop(tracking: &mut TimeTracking, now: DateTime<Utc>) -> Option<u32> {
    if !tracking.is_tracking {
        return None;
    }
    let log = tracking.logs.iter_mut().rev().find(|log| log.is_open())?;
    let minutes = elapsed_whole_minutes(log.start_time, now);
    log.end_time = Some(now);
    log.duration = minutes;
    tracking.total_time += minutes;
    tracking.is_tracking = false;
    Some(minutes)
}

/// Live read-only projection for display polling: accumulated minutes plus
/// minutes elapsed on the open log, if any. Never writes back.
pub fn elapsed_minutes(tracking: &TimeTracking, now: DateTime<Utc>) -> u32 {
    let open = tracking
        .is_tracking
        .then(|| tracking.logs.last())
        .flatten()
        .filter(|log| log.is_open());
    match open {
        Some(log) => tracking.total_time + elapsed_whole_minutes(log.start_time, now),
        None => tracking.total_time,
    }
}

/// Elapsed time rounded to whole minutes, clamped at zero against clock
/// skew.
fn elapsed_whole_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let seconds = (now - start).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    ((seconds as f64) / 60.0).round() as u32
}
