//! JSON snapshot of the task and calendar stores.
//!
//! The stores themselves live elsewhere; a snapshot is what they hand over
//! for one scheduling run:
//!
//! ```json
//! { "tasks": [ { "id": "t1", "estimatedTime": 60, "priority": "high" } ],
//!   "events": [ { "start": "2026-10-18T09:00:00", "end": "2026-10-18T09:30:00" } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

use crate::calendar::CalendarEvent;
use crate::error::{CoreError, Result};
use crate::scheduler::ScheduleResult;
use crate::task::{apply_placements, Task};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>, events: Vec<CalendarEvent>) -> Self {
        Self { tasks, events }
    }

    /// Read a snapshot file; `-` reads stdin.
    pub fn load(path: &Path) -> Result<Self> {
        if path == Path::new("-") {
            return Self::from_reader(std::io::stdin().lock()).map_err(|e| snapshot_error(path, e));
        }
        let file = std::fs::File::open(path).map_err(|e| snapshot_error(path, e))?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|e| snapshot_error(path, e))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the snapshot as pretty JSON; `-` writes stdout.
    pub fn save(&self, path: &Path) -> Result<()> {
        if path == Path::new("-") {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            self.to_writer(&mut out)?;
            writeln!(out)?;
            return Ok(());
        }
        let mut file = std::fs::File::create(path)?;
        self.to_writer(&mut file)?;
        writeln!(file)?;
        Ok(())
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Copy placements onto the snapshot's tasks. See [`apply_placements`].
    pub fn apply(&mut self, placements: &[ScheduleResult]) -> usize {
        apply_placements(&mut self.tasks, placements)
    }
}

fn snapshot_error(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::Snapshot {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn reads_store_payload() {
        let json = r#"{
            "tasks": [
                {"id": "t1", "estimatedTime": 60, "priority": "high"},
                {"id": "t2", "completed": true, "estimatedTime": 15}
            ],
            "events": [
                {"id": "e1", "start": "2026-10-18T09:00:00", "end": "2026-10-18T09:30:00"}
            ]
        }"#;

        let snapshot = Snapshot::from_reader(json.as_bytes()).unwrap();

        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.events.len(), 1);
        assert!(snapshot.tasks[1].completed);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn loose_task_fields_do_not_sink_the_snapshot() {
        let json = r#"{"tasks": [
            {"id": "a", "estimatedTime": 22.5},
            {"id": "b", "estimatedTime": 30},
            {"id": "c", "estimatedTime": 15, "startDate": "", "endDate": null},
            {"id": "d", "estimatedTime": "a while"}
        ]}"#;

        let snapshot = Snapshot::from_reader(json.as_bytes()).unwrap();

        assert_eq!(snapshot.tasks.len(), 4);
        assert_eq!(
            snapshot.tasks[0].schedulable_duration(),
            Ok(chrono::Duration::seconds(1350))
        );
        assert!(snapshot.tasks[1].schedulable_duration().is_ok());
        assert!(!snapshot.tasks[2].is_locked());
        assert_eq!(
            snapshot.tasks[3].schedulable_duration(),
            Err(crate::scheduler::SkipReason::InvalidEstimate)
        );
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let json = r#"{"events": [{"start": "soon", "end": "later"}]}"#;
        assert!(Snapshot::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Snapshot::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn save_then_load_keeps_applied_placements() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let start = day.and_hms_opt(9, 0, 0).unwrap();
        let end = day.and_hms_opt(10, 0, 0).unwrap();
        let mut snapshot = Snapshot::new(vec![Task::new("t1").with_estimate(60)], Vec::new());
        assert_eq!(snapshot.apply(&[ScheduleResult::new("t1", start, end)]), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        snapshot.save(&path).unwrap();
        let reloaded = Snapshot::load(&path).unwrap();

        assert_eq!(reloaded.tasks[0].start_date, Some(start));
        assert_eq!(reloaded.tasks[0].end_date, Some(end));
        assert!(reloaded.tasks[0].is_locked());
    }
}
