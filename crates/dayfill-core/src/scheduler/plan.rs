//! Scheduling results and the full plan report.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::window::WorkWindow;
use crate::timeline::TimeGap;

/// A placement decision for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub task_id: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl ScheduleResult {
    pub fn new(task_id: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            task_id: task_id.into(),
            start_date,
            end_date,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_date - self.start_date).num_minutes()
    }

    pub fn overlaps(&self, other: &ScheduleResult) -> bool {
        self.start_date < other.end_date && other.start_date < self.end_date
    }
}

/// Why a task received no placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Completed,
    MissingEstimate,
    /// The estimate is present but not a number.
    InvalidEstimate,
    NonPositiveEstimate,
    AlreadyScheduled,
    /// No gap in the remaining window was long enough.
    NoFit,
    /// The work window for today has closed.
    DayOver,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Task is completed",
            Self::MissingEstimate => "No estimated time",
            Self::InvalidEstimate => "Estimated time is not a number",
            Self::NonPositiveEstimate => "Estimated time is not positive",
            Self::AlreadyScheduled => "Already has a start and end date",
            Self::NoFit => "No free slot long enough",
            Self::DayOver => "Work day is over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTask {
    pub task_id: String,
    pub reason: SkipReason,
}

/// Everything a scheduling run decided, for callers that want more than
/// the placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    /// `None` when no capacity was left today.
    pub window: Option<WorkWindow>,
    /// In placement order.
    pub placements: Vec<ScheduleResult>,
    pub skipped: Vec<SkippedTask>,
    /// Open time left inside the window after placement.
    pub free_gaps: Vec<TimeGap>,
}

impl SchedulePlan {
    pub fn free_minutes(&self) -> i64 {
        self.free_gaps.iter().map(TimeGap::duration_minutes).sum()
    }

    pub fn placed_minutes(&self) -> i64 {
        self.placements.iter().map(ScheduleResult::duration_minutes).sum()
    }
}
