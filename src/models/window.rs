use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A recurring daily time-of-day window, e.g. "23:00 to 07:00" for a sleep
/// period. Spans midnight iff `end < start`; full-day (interpreted as
/// empty, per spec §3) iff `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DailyWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn spans_midnight(&self) -> bool {
        self.end < self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
