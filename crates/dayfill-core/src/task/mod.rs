//! Task model as supplied by the task store.
//!
//! The scheduler only reads a handful of fields (completion, estimate,
//! existing placement and priority). Any other fields the store sends along
//! are kept in [`Task::extra`] so a snapshot can be written back unchanged
//! apart from the new placements.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scheduler::{ScheduleResult, SkipReason};
use crate::wall_clock;

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Ordering weight used by the scheduler (higher is placed first).
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Deserialize a priority, mapping anything unrecognised to `None`.
    ///
    /// Stores are not strict about this field, and an unknown value must
    /// behave like an absent one (medium) instead of rejecting the task.
    fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse().ok()))
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest span `Duration::seconds` accepts.
const MAX_ESTIMATE_SECS: i64 = i64::MAX / 1000;

/// Estimated time in minutes, as the store sent it.
///
/// Whole minutes are the common case. Fractional minutes are honoured to
/// the second. Anything else is kept verbatim so a snapshot written back
/// still carries it, and the task is reported as having an invalid estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    Minutes(i64),
    Other(serde_json::Value),
}

impl Estimate {
    /// The estimate as a span, or `None` when it is not a number.
    pub fn duration(&self) -> Option<Duration> {
        let secs = match self {
            Estimate::Minutes(minutes) => minutes.saturating_mul(60).min(MAX_ESTIMATE_SECS),
            Estimate::Other(value) => {
                let secs = (value.as_f64()? * 60.0).round();
                // `as` saturates; clamp the top so `Duration::seconds` cannot panic.
                (secs as i64).min(MAX_ESTIMATE_SECS)
            }
        };
        Some(Duration::seconds(secs.max(-MAX_ESTIMATE_SECS)))
    }
}

/// A task as read from the task store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<Estimate>,
    #[serde(
        default,
        deserialize_with = "wall_clock::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "wall_clock::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDateTime>,
    /// `None` (or an unrecognised value) means medium.
    #[serde(
        default,
        deserialize_with = "Priority::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    /// Store fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            completed: false,
            estimated_time: None,
            start_date: None,
            end_date: None,
            priority: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_estimate(mut self, minutes: i64) -> Self {
        self.estimated_time = Some(Estimate::Minutes(minutes));
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_dates(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn mark_completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Priority with the medium default applied.
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Both placement fields are set; the scheduler never moves such a task.
    pub fn is_locked(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Duration to schedule, or why the task is not a candidate.
    pub fn schedulable_duration(&self) -> Result<Duration, SkipReason> {
        if self.completed {
            return Err(SkipReason::Completed);
        }
        if self.is_locked() {
            return Err(SkipReason::AlreadyScheduled);
        }
        let estimate = self.estimated_time.as_ref().ok_or(SkipReason::MissingEstimate)?;
        match estimate.duration() {
            None => Err(SkipReason::InvalidEstimate),
            Some(duration) if duration <= Duration::zero() => Err(SkipReason::NonPositiveEstimate),
            Some(duration) => Ok(duration),
        }
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Write placements back onto their tasks.
///
/// Tasks that are already locked are left alone. Returns how many tasks
/// were updated.
pub fn apply_placements(tasks: &mut [Task], placements: &[ScheduleResult]) -> usize {
    let mut updated = 0;
    for placement in placements {
        if let Some(task) = tasks
            .iter_mut()
            .find(|t| t.id == placement.task_id && !t.is_locked())
        {
            task.start_date = Some(placement.start_date);
            task.end_date = Some(placement.end_date);
            updated += 1;
        }
    }
    updated
}
