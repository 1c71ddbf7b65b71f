//! Calendar events and the busy set derived from them.
//!
//! A [`BusySet`] is the per-run snapshot of occupied time for one day. It is
//! built from the events that overlap the day and grows as the scheduler
//! places tasks, so later tasks in the same run treat earlier placements as
//! busy.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::wall_clock;

/// An existing calendar event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "wall_clock::deserialize")]
    pub start: NaiveDateTime,
    #[serde(deserialize_with = "wall_clock::deserialize")]
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CalendarEvent {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            title: None,
            start,
            end,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Strict overlap with `[start, end)`; touching endpoints do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }
}

/// A span of occupied time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end && end > self.start
    }
}

impl From<&CalendarEvent> for BusyInterval {
    fn from(event: &CalendarEvent) -> Self {
        Self::new(event.start, event.end)
    }
}

/// `[00:00 of day, 00:00 of the next day)`.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let end = day
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Busy intervals for one day, kept sorted by start.
#[derive(Debug, Clone, Default)]
pub struct BusySet {
    intervals: Vec<BusyInterval>,
}

impl BusySet {
    /// Collect every event overlapping `day`.
    ///
    /// Events are kept whole (not clipped to the day) and may arrive in any
    /// order.
    pub fn for_day(events: &[CalendarEvent], day: NaiveDate) -> Self {
        let (day_start, day_end) = day_bounds(day);
        Self::from_intervals(
            events
                .iter()
                .filter(|e| e.overlaps(day_start, day_end))
                .map(BusyInterval::from),
        )
    }

    pub fn from_intervals(intervals: impl IntoIterator<Item = BusyInterval>) -> Self {
        let mut intervals: Vec<_> = intervals.into_iter().collect();
        intervals.sort_by_key(|b| b.start);
        Self { intervals }
    }

    /// Whether `[start, end)` hits any busy interval.
    pub fn conflicts(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.intervals.iter().any(|b| b.overlaps(start, end))
    }

    /// Insert while keeping the set sorted by start.
    pub fn insert(&mut self, interval: BusyInterval) {
        let at = self.intervals.partition_point(|b| b.start <= interval.start);
        self.intervals.insert(at, interval);
    }

    pub fn intervals(&self) -> &[BusyInterval] {
        &self.intervals
    }
}
