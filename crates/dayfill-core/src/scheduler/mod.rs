//! Automatic scheduler for unplaced tasks.
//!
//! Packs tasks into the free time of today's work window:
//! - Filters out completed, estimate-less and already placed tasks
//! - Orders by priority, then by longest estimate first
//! - Scans the window in fixed steps for the earliest conflict-free slot
//! - Treats each placement as busy for the tasks that follow
//!
//! This is a greedy first-fit packer. It never backtracks, so a fittable
//! task can stay unplaced when an earlier placement took the slot it needed.

mod plan;
mod window;

pub use plan::{SchedulePlan, ScheduleResult, SkipReason, SkippedTask};
pub use window::WorkWindow;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calendar::{BusyInterval, BusySet, CalendarEvent};
use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::task::Task;
use crate::timeline::TimeGapDetector;

/// Where each task's slot search begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStrategy {
    /// One cursor is threaded through the whole run: a task starts scanning
    /// where the previous task's search stopped.
    #[default]
    Continue,
    /// Every task scans from the window start.
    Restart,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// First hour of the work window (0-23)
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    /// Hour the work window closes (0-23)
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    /// Cursor advance after a conflict (minutes)
    #[serde(default = "default_scan_step_minutes")]
    pub scan_step_minutes: u32,
    /// Boundary a late start is rounded up to (minutes)
    #[serde(default = "default_late_start_round_minutes")]
    pub late_start_round_minutes: u32,
    #[serde(default)]
    pub cursor_strategy: CursorStrategy,
}

fn default_work_start_hour() -> u32 {
    9
}
fn default_work_end_hour() -> u32 {
    18
}
fn default_scan_step_minutes() -> u32 {
    15
}
fn default_late_start_round_minutes() -> u32 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            scan_step_minutes: default_scan_step_minutes(),
            late_start_round_minutes: default_late_start_round_minutes(),
            cursor_strategy: CursorStrategy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_work_hours(mut self, start: u32, end: u32) -> Self {
        self.work_start_hour = start;
        self.work_end_hour = end;
        self
    }

    pub fn with_cursor_strategy(mut self, strategy: CursorStrategy) -> Self {
        self.cursor_strategy = strategy;
        self
    }

    /// Check the settings a user can get wrong.
    ///
    /// The scheduler does not call this; it degrades to an empty result on
    /// bad values. Config loading and the CLI use it to report mistakes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.work_start_hour >= 24
            || self.work_end_hour >= 24
            || self.work_start_hour >= self.work_end_hour
        {
            return Err(ValidationError::InvalidWorkHours {
                start: self.work_start_hour,
                end: self.work_end_hour,
            });
        }
        for (field, minutes) in [
            ("scan_step_minutes", self.scan_step_minutes),
            ("late_start_round_minutes", self.late_start_round_minutes),
        ] {
            if minutes == 0 || minutes > 60 || 60 % minutes != 0 {
                return Err(ValidationError::InvalidStep {
                    field: field.to_string(),
                    minutes,
                });
            }
        }
        Ok(())
    }
}

/// Automatic scheduler for unplaced tasks
#[derive(Debug, Clone)]
pub struct AutoScheduler<C = SystemClock> {
    config: SchedulerConfig,
    clock: C,
}

impl AutoScheduler<SystemClock> {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl Default for AutoScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AutoScheduler<C> {
    /// Create with custom config and clock
    pub fn with_clock(config: SchedulerConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Today's remaining work window, if any.
    pub fn window(&self) -> Option<WorkWindow> {
        WorkWindow::compute(
            self.clock.now(),
            self.config.work_start_hour,
            self.config.work_end_hour,
            self.config.late_start_round_minutes,
        )
    }

    /// Place as many tasks as fit today.
    ///
    /// `events` may be unsorted and may include other days; only events
    /// overlapping today block time. Results come back in placement order.
    pub fn schedule(&self, tasks: &[Task], events: &[CalendarEvent]) -> Vec<ScheduleResult> {
        self.plan(tasks, events).placements
    }

    /// Like [`schedule`](Self::schedule), also reporting skipped tasks and
    /// the free time left over.
    pub fn plan(&self, tasks: &[Task], events: &[CalendarEvent]) -> SchedulePlan {
        let mut skipped = Vec::new();
        let mut candidates = Vec::new();
        for task in tasks {
            match task.schedulable_duration() {
                Ok(duration) => candidates.push((task, duration)),
                Err(reason) => {
                    debug!(task_id = %task.id, reason = ?reason, "task not eligible");
                    skipped.push(SkippedTask {
                        task_id: task.id.clone(),
                        reason,
                    });
                }
            }
        }

        // Stable: equal keys keep input order.
        candidates.sort_by(|(a, a_duration), (b, b_duration)| {
            b.effective_priority()
                .weight()
                .cmp(&a.effective_priority().weight())
                .then_with(|| b_duration.cmp(a_duration))
        });

        let Some(window) = self.window() else {
            warn!(
                work_start_hour = self.config.work_start_hour,
                work_end_hour = self.config.work_end_hour,
                "no work window left today"
            );
            skipped.extend(candidates.into_iter().map(|(task, _)| SkippedTask {
                task_id: task.id.clone(),
                reason: SkipReason::DayOver,
            }));
            return SchedulePlan {
                window: None,
                placements: Vec::new(),
                skipped,
                free_gaps: Vec::new(),
            };
        };

        let mut busy = BusySet::for_day(events, window.day);
        let step = Duration::minutes(i64::from(self.config.scan_step_minutes.max(1)));
        let capacity = window.end - window.start;
        let mut cursor = window.start;
        let mut placements = Vec::new();

        for (task, duration) in candidates {
            if self.config.cursor_strategy == CursorStrategy::Restart {
                cursor = window.start;
            }

            let placed = if duration > capacity {
                None
            } else {
                let mut found = None;
                while cursor + duration <= window.end {
                    let end = cursor + duration;
                    if !busy.conflicts(cursor, end) {
                        found = Some(BusyInterval::new(cursor, end));
                        break;
                    }
                    cursor += step;
                }
                found
            };

            match placed {
                Some(slot) => {
                    debug!(task_id = %task.id, start = %slot.start, end = %slot.end, "placed task");
                    busy.insert(slot);
                    placements.push(ScheduleResult::new(task.id.clone(), slot.start, slot.end));
                }
                None => {
                    debug!(task_id = %task.id, minutes = duration.num_minutes(), "no slot fits task");
                    skipped.push(SkippedTask {
                        task_id: task.id.clone(),
                        reason: SkipReason::NoFit,
                    });
                }
            }
        }

        let free_gaps = TimeGapDetector::new()
            .with_min_gap(step.num_minutes())
            .find_gaps(busy.intervals(), window.start, window.end);

        info!(
            placed = placements.len(),
            skipped = skipped.len(),
            window_start = %window.start,
            window_end = %window.end,
            "scheduling run complete"
        );

        SchedulePlan {
            window: Some(window),
            placements,
            skipped,
            free_gaps,
        }
    }
}

/// Schedule against the system clock with the given work hours.
pub fn auto_schedule_tasks(
    tasks: &[Task],
    events: &[CalendarEvent],
    work_start_hour: u32,
    work_end_hour: u32,
) -> Vec<ScheduleResult> {
    AutoScheduler::with_config(
        SchedulerConfig::default().with_work_hours(work_start_hour, work_end_hour),
    )
    .schedule(tasks, events)
}
