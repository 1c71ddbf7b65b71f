//! Timeline helpers around the scheduler.

mod gap;

pub use gap::{detect_time_gaps, GapSize, TimeGap, TimeGapDetector};
