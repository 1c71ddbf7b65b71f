//! # dayfill Core Library
//!
//! Auto-scheduling for a personal task list: takes the tasks that still need
//! a slot and the calendar events already on today's agenda, and packs the
//! tasks into the free time of a configurable work window.
//!
//! ## Architecture
//!
//! - **Scheduler**: greedy first-fit placement by priority and duration,
//!   scanning the window in fixed steps
//! - **Calendar**: event snapshots and the per-run busy set
//! - **Timeline**: free gap detection for reporting leftover capacity
//! - **Storage**: TOML configuration and JSON store snapshots
//!
//! Scheduling is a pure computation over caller-supplied snapshots. Callers
//! own persistence and apply the returned placements themselves.
//!
//! ## Key Components
//!
//! - [`AutoScheduler`]: the interval scheduler
//! - [`Task`] / [`CalendarEvent`]: inputs
//! - [`ScheduleResult`] / [`SchedulePlan`]: outputs
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod clock;
pub mod error;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timeline;
pub mod wall_clock;

pub use calendar::{BusyInterval, BusySet, CalendarEvent};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, ValidationError};
pub use scheduler::{
    auto_schedule_tasks, AutoScheduler, CursorStrategy, SchedulePlan, ScheduleResult,
    SchedulerConfig, SkipReason, SkippedTask, WorkWindow,
};
pub use storage::{Config, Snapshot};
pub use task::{apply_placements, Estimate, Priority, Task};
pub use timeline::{GapSize, TimeGap, TimeGapDetector};
