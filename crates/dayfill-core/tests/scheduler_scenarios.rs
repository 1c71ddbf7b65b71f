//! Integration tests for day-planning scenarios.
//!
//! All scenarios run with a 09:00-18:00 window and the clock pinned at
//! 08:00, so no late-start adjustment applies.

use chrono::{NaiveDate, NaiveDateTime};
use dayfill_core::{
    AutoScheduler, CalendarEvent, FixedClock, Priority, SchedulerConfig, Snapshot, SkipReason,
    Task,
};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn scheduler() -> AutoScheduler<FixedClock> {
    AutoScheduler::with_clock(SchedulerConfig::default(), FixedClock(at(8, 0)))
}

#[test]
fn single_task_on_empty_day_starts_at_window_open() {
    let tasks = vec![Task::new("t1").with_estimate(60).with_priority(Priority::High)];

    let results = scheduler().schedule(&tasks, &[]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].task_id, "t1");
    assert_eq!(results[0].start_date, at(9, 0));
    assert_eq!(results[0].end_date, at(10, 0));
}

#[test]
fn tasks_flow_around_existing_event() {
    let tasks = vec![
        Task::new("t1").with_estimate(30).with_priority(Priority::High),
        Task::new("t2").with_estimate(30).with_priority(Priority::Low),
    ];
    let events = vec![CalendarEvent::new(at(9, 0), at(9, 30)).with_title("Standup")];

    let results = scheduler().schedule(&tasks, &events);

    assert_eq!(results.len(), 2);
    assert_eq!((results[0].task_id.as_str(), results[0].start_date, results[0].end_date), ("t1", at(9, 30), at(10, 0)));
    assert_eq!((results[1].task_id.as_str(), results[1].start_date, results[1].end_date), ("t2", at(10, 0), at(10, 30)));
}

#[test]
fn task_longer_than_window_never_fits() {
    let tasks = vec![Task::new("t1").with_estimate(600)];

    let plan = scheduler().plan(&tasks, &[]);

    assert!(plan.placements.is_empty());
    assert_eq!(plan.skipped[0].reason, SkipReason::NoFit);
}

#[test]
fn already_placed_task_is_excluded() {
    let tasks = vec![Task::new("t1")
        .with_estimate(60)
        .with_dates(at(14, 0), at(15, 0))];

    let plan = scheduler().plan(&tasks, &[]);

    assert!(plan.placements.is_empty());
    assert_eq!(plan.skipped[0].reason, SkipReason::AlreadyScheduled);
}

#[test]
fn completed_task_is_excluded() {
    let tasks = vec![Task::new("t1").with_estimate(30).mark_completed()];

    let plan = scheduler().plan(&tasks, &[]);

    assert!(plan.placements.is_empty());
    assert_eq!(plan.skipped[0].reason, SkipReason::Completed);
}

#[test]
fn fully_booked_day_places_nothing() {
    let events = vec![
        CalendarEvent::new(at(9, 0), at(12, 0)),
        CalendarEvent::new(at(12, 0), at(18, 0)),
    ];
    let tasks: Vec<_> = (0..10)
        .map(|i| Task::new(format!("t{i}")).with_estimate(15))
        .collect();

    let plan = scheduler().plan(&tasks, &events);

    assert!(plan.placements.is_empty());
    assert!(plan.free_gaps.is_empty());
    assert!(plan.skipped.iter().all(|s| s.reason == SkipReason::NoFit));
}

#[test]
fn events_on_other_days_are_ignored() {
    let tomorrow = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let events = vec![CalendarEvent::new(
        tomorrow.and_hms_opt(9, 0, 0).unwrap(),
        tomorrow.and_hms_opt(18, 0, 0).unwrap(),
    )];
    let tasks = vec![Task::new("t1").with_estimate(30)];

    let results = scheduler().schedule(&tasks, &events);

    assert_eq!(results[0].start_date, at(9, 0));
}

#[test]
fn snapshot_run_and_apply_round_trip() {
    let json = r#"{
        "tasks": [
            {"id": "write", "title": "Write report", "estimatedTime": 90, "priority": "high"},
            {"id": "mail", "estimatedTime": 20, "priority": "low"},
            {"id": "done", "estimatedTime": 20, "completed": true},
            {"id": "someday"}
        ],
        "events": [
            {"id": "e1", "title": "Standup", "start": "2026-10-18T09:00:00", "end": "2026-10-18T09:15:00"},
            {"id": "e2", "title": "Lunch", "start": "2026-10-18T12:00:00", "end": "2026-10-18T13:00:00"}
        ]
    }"#;
    let mut snapshot = Snapshot::from_reader(json.as_bytes()).unwrap();

    let results = scheduler().schedule(&snapshot.tasks, &snapshot.events);
    let updated = snapshot.apply(&results);

    assert_eq!(updated, 2);
    let write = snapshot.tasks.iter().find(|t| t.id == "write").unwrap();
    assert_eq!(write.start_date, Some(at(9, 15)));
    assert_eq!(write.end_date, Some(at(10, 45)));
    let mail = snapshot.tasks.iter().find(|t| t.id == "mail").unwrap();
    assert_eq!(mail.start_date, Some(at(10, 45)));

    // A second run has nothing left to place.
    assert!(scheduler().schedule(&snapshot.tasks, &snapshot.events).is_empty());
}
