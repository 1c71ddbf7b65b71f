//! Work window for the current day.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// The span of today still open for placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkWindow {
    pub day: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Start was moved forward because the work day had already begun.
    pub late_start: bool,
}

impl WorkWindow {
    /// Compute today's window as seen from `now`.
    ///
    /// Returns `None` when there is no capacity left: inverted or
    /// out-of-range hours, or a late start that lands at/after the end.
    pub fn compute(
        now: NaiveDateTime,
        work_start_hour: u32,
        work_end_hour: u32,
        round_minutes: u32,
    ) -> Option<Self> {
        let day = now.date();
        let nominal_start = day.and_hms_opt(work_start_hour, 0, 0)?;
        let end = day.and_hms_opt(work_end_hour, 0, 0)?;

        let (start, late_start) = if now > nominal_start {
            (round_up(now, round_minutes)?, true)
        } else {
            (nominal_start, false)
        };

        if start >= end {
            return None;
        }

        Some(Self {
            day,
            start,
            end,
            late_start,
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Next `step`-minute boundary after `now`, seconds dropped.
///
/// Always moves forward by `step - minute % step`, so a moment already on a
/// boundary advances a full step.
fn round_up(now: NaiveDateTime, step: u32) -> Option<NaiveDateTime> {
    let step = step.max(1);
    let trimmed = now.with_second(0)?.with_nanosecond(0)?;
    let add = step - now.minute() % step;
    Some(trimmed + Duration::minutes(add as i64))
}
