//! Free time detection between busy intervals.
//!
//! Used to report how much of the work window is still open once the
//! scheduler has placed what it could.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::BusyInterval;

/// Size category of a time gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSize {
    Small,  // under 30 minutes
    Medium, // 30-59 minutes
    Large,  // 60+ minutes
}

impl GapSize {
    /// Categorize a gap by its duration in minutes
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes < 30 {
            Self::Small
        } else if minutes < 60 {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// A free span inside the searched range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGap {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub size: GapSize,
}

impl TimeGap {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            end_time,
            size: GapSize::from_minutes((end_time - start_time).num_minutes()),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Check if this gap can fit a task of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Detector for finding time gaps in a schedule
#[derive(Debug, Clone)]
pub struct TimeGapDetector {
    min_gap_minutes: i64,
}

impl TimeGapDetector {
    /// Create a new detector with default settings (15 min minimum)
    pub fn new() -> Self {
        Self {
            min_gap_minutes: 15,
        }
    }

    /// Set the minimum gap duration
    pub fn with_min_gap(mut self, minutes: i64) -> Self {
        self.min_gap_minutes = minutes.max(1);
        self
    }

    /// Find gaps between busy intervals inside `[range_start, range_end)`.
    ///
    /// Intervals may be unsorted and overlapping. Gaps shorter than the
    /// minimum are dropped. The result is sorted by start time.
    pub fn find_gaps(
        &self,
        busy: &[BusyInterval],
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Vec<TimeGap> {
        let mut gaps = Vec::new();
        if range_start >= range_end {
            return gaps;
        }

        let mut sorted: Vec<_> = busy.to_vec();
        sorted.sort_by_key(|b| b.start);

        let mut last_end = range_start;
        for interval in &sorted {
            if interval.end <= last_end {
                continue;
            }
            if interval.start >= range_end {
                break;
            }
            if interval.start > last_end {
                self.push_gap(&mut gaps, last_end, interval.start);
            }
            last_end = interval.end.min(range_end);
        }

        if last_end < range_end {
            self.push_gap(&mut gaps, last_end, range_end);
        }

        gaps
    }

    fn push_gap(&self, gaps: &mut Vec<TimeGap>, start: NaiveDateTime, end: NaiveDateTime) {
        let gap = TimeGap::new(start, end);
        if gap.duration_minutes() >= self.min_gap_minutes {
            gaps.push(gap);
        }
    }
}

impl Default for TimeGapDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to find gaps with default settings
pub fn detect_time_gaps(
    busy: &[BusyInterval],
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Vec<TimeGap> {
    TimeGapDetector::new().find_gaps(busy, range_start, range_end)
}
