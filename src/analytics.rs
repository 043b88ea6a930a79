//! Productivity analytics snapshot.
//!
//! A read-only report derived from store state, serializable to JSON for
//! download. Computing the report never touches the mutation surface; it is a
//! pure function of `{tasks, tags, now}`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::error::Result;
use crate::tag::Tag;
use crate::task::{Priority, Task};

/// Tracked minutes per day of the current week (Sunday through Saturday).
#[derive(Debug, Clone, Serialize)]
pub struct DailyMinutes {
    pub date: NaiveDate,
    /// Short weekday label, e.g. "Sun".
    pub day: String,
    pub minutes: u64,
}

/// Tracked minutes and task count per priority level.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityMinutes {
    pub priority: Priority,
    pub label: &'static str,
    pub tasks: usize,
    pub minutes: u64,
}

/// Tracked minutes and task count per known tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagMinutes {
    pub id: String,
    pub name: String,
    pub tasks: usize,
    pub minutes: u64,
}

/// On-demand analytics snapshot of the whole store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub total_tracked_minutes: u64,
    pub completed_count: usize,
    pub total_count: usize,
    pub average_minutes_per_completed: f64,
    /// Completed tasks whose last update falls in the current month.
    pub monthly_completions: usize,
    /// Presentation-only composite in 0..=100, derived from completion ratio
    /// and tracked-time presence.
    pub productivity_score: u32,
    pub daily: Vec<DailyMinutes>,
    pub priorities: Vec<PriorityMinutes>,
    pub tags: Vec<TagMinutes>,
}

impl AnalyticsReport {
    /// Compute the report from the given state at the given instant.
    pub fn compute(tasks: &[Task], tags: &[Tag], now: DateTime<Utc>) -> Self {
        let total_tracked_minutes: u64 =
            tasks.iter().map(|task| task.tracked_minutes() as u64).sum();

        let completed: Vec<&Task> = tasks.iter().filter(|task| task.completed).collect();
        let completed_tracked: u64 = completed
            .iter()
            .map(|task| task.tracked_minutes() as u64)
            .sum();
        let average_minutes_per_completed = if completed.is_empty() {
            0.0
        } else {
            completed_tracked as f64 / completed.len() as f64
        };

        let monthly_completions = completed
            .iter()
            .filter(|task| {
                task.updated_at.year() == now.year() && task.updated_at.month() == now.month()
            })
            .count();

        let productivity_score = productivity_score(
            completed.len(),
            tasks.len(),
            total_tracked_minutes,
            monthly_completions,
        );

        Self {
            generated_at: now,
            total_tracked_minutes,
            completed_count: completed.len(),
            total_count: tasks.len(),
            average_minutes_per_completed,
            monthly_completions,
            productivity_score,
            daily: daily_minutes(tasks, now),
            priorities: priority_minutes(tasks),
            tags: tag_minutes(tasks, tags),
        }
    }

    /// Serialize the report for download.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Composite score: completion ratio, a bonus for any tracked time, and a
/// capped bonus for monthly completions.
fn productivity_score(
    completed: usize,
    total: usize,
    tracked_minutes: u64,
    monthly_completions: usize,
) -> u32 {
    let ratio = completed as f64 / total.max(1) as f64;
    let tracked_bonus = if tracked_minutes > 0 { 20.0 } else { 0.0 };
    let monthly_bonus = if monthly_completions > 5 {
        20.0
    } else {
        monthly_completions as f64 * 4.0
    };
    let score = (ratio * 100.0 + tracked_bonus + monthly_bonus).round();
    (score as u32).min(100)
}

/// Minutes of closed logs per day across the week containing `now`, Sunday
/// start.
fn daily_minutes(tasks: &[Task], now: DateTime<Utc>) -> Vec<DailyMinutes> {
    let today = now.date_naive();
    let back = today.weekday().num_days_from_sunday() as i64;
    let week_start = today - Duration::days(back);

    (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let minutes = tasks
                .iter()
                .flat_map(|task| task.time_tracking.iter())
                .flat_map(|tracking| tracking.logs.iter())
                .filter(|log| {
                    log.end_time
                        .map(|end| end.date_naive() == date)
                        .unwrap_or(false)
                })
                .map(|log| log.duration as u64)
                .sum();
            DailyMinutes {
                date,
                day: weekday_label(date.weekday()).to_string(),
                minutes,
            }
        })
        .collect()
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

fn priority_minutes(tasks: &[Task]) -> Vec<PriorityMinutes> {
    Priority::ALL
        .iter()
        .map(|&priority| {
            let matching: Vec<&Task> = tasks
                .iter()
                .filter(|task| task.priority == priority)
                .collect();
            PriorityMinutes {
                priority,
                label: priority.label(),
                tasks: matching.len(),
                minutes: matching
                    .iter()
                    .map(|task| task.tracked_minutes() as u64)
                    .sum(),
            }
        })
        .collect()
}

fn tag_minutes(tasks: &[Task], tags: &[Tag]) -> Vec<TagMinutes> {
    tags.iter()
        .map(|tag| {
            let matching: Vec<&Task> = tasks
                .iter()
                .filter(|task| task.has_tag(&tag.id))
                .collect();
            TagMinutes {
                id: tag.id.clone(),
                name: tag.name.clone(),
                tasks: matching.len(),
                minutes: matching
                    .iter()
                    .map(|task| task.tracked_minutes() as u64)
                    .sum(),
            }
        })
        .collect()
}
