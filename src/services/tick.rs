use std::collections::HashSet;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::error::{EngineError, EngineResult};

/// Component A: tick algebra. The timeline is quantised to 5-minute ticks,
/// indexed from a rounded scope start (spec §3, §4.A).
pub const MINUTES_PER_TICK: i64 = 5;

/// Floors `dt` to the nearest tick boundary.
pub fn round_down(dt: DateTime<Utc>) -> DateTime<Utc> {
    let remainder = (dt.minute() as i64).rem_euclid(MINUTES_PER_TICK);
    dt - Duration::seconds(dt.second() as i64)
        - Duration::nanoseconds(dt.nanosecond() as i64)
        - Duration::minutes(remainder)
}

/// Ceilings `dt` to the next tick boundary; returns `dt` unchanged iff it is
/// already on a boundary.
pub fn round_up(dt: DateTime<Utc>) -> DateTime<Utc> {
    let down = round_down(dt);
    if down == dt {
        dt
    } else {
        down + Duration::minutes(MINUTES_PER_TICK)
    }
}

/// Integer floor of `(dt - reference) / MINUTES_PER_TICK`.
pub fn from_diff(dt: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let total_seconds = (dt - reference).num_seconds();
    total_seconds.div_euclid(60 * MINUTES_PER_TICK)
}

/// `reference + tick * MINUTES_PER_TICK`.
pub fn to_instant(tick_number: i64, reference: DateTime<Utc>) -> DateTime<Utc> {
    reference + Duration::minutes(tick_number * MINUTES_PER_TICK)
}

/// Integer floor of `hours * 60 / MINUTES_PER_TICK`.
pub fn hours_to_ticks(hours: f64) -> i64 {
    ((hours * 60.0) / MINUTES_PER_TICK as f64).floor() as i64
}

/// The rounded scheduling window every other component consumes, bundling
/// `scope_start_rounded` / `scope_end_rounded` / `scope_end_tick` (spec §3,
/// §4.A expansion) so callers don't thread three separate values around.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_rounded: DateTime<Utc>,
    pub end_rounded: DateTime<Utc>,
    pub end_tick: i64,
}

impl Scope {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::invalid_input(
                "scope",
                "scope.end must be after scope.start",
            ));
        }
        let start_rounded = round_down(start);
        let end_rounded = round_up(end);
        let end_tick = from_diff(end_rounded, start_rounded);
        Ok(Self {
            start,
            end,
            start_rounded,
            end_rounded,
            end_tick,
        })
    }

    pub fn to_instant(&self, tick_number: i64) -> DateTime<Utc> {
        to_instant(tick_number, self.start_rounded)
    }

    pub fn tick_of(&self, dt: DateTime<Utc>) -> i64 {
        from_diff(dt, self.start_rounded)
    }
}

/// A sorted, deduplicated set of tick indices with the set-algebra helpers
/// used throughout components D/E (spec §4.B expansion). Grounded in the
/// original's pattern of returning `sorted(list(set(...)))` from
/// `Tick.time_window_to_list_of_ticks` and then treating the result as a
/// set in `base_solver.py`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSet(Vec<i64>);

impl TickSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a tick set from the half-open range `[start, end)`.
    pub fn from_range(start: i64, end: i64) -> Self {
        if end <= start {
            Self::new()
        } else {
            Self((start..end).collect())
        }
    }

    /// Builds a tick set from an unsorted, possibly-duplicated vec, sorting
    /// and deduplicating once rather than per insertion.
    pub fn from_unsorted(mut ticks: Vec<i64>) -> Self {
        ticks.sort_unstable();
        ticks.dedup();
        Self(ticks)
    }

    pub fn insert_range(&mut self, start: i64, end: i64) {
        if end <= start {
            return;
        }
        self.0.extend(start..end);
        self.0.sort_unstable();
        self.0.dedup();
    }

    pub fn contains(&self, tick_number: i64) -> bool {
        self.0.binary_search(&tick_number).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend_from_slice(&other.0);
        Self::from_unsorted(merged)
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let other_set: HashSet<i64> = other.0.iter().copied().collect();
        Self(
            self.0
                .iter()
                .copied()
                .filter(|tick_number| other_set.contains(tick_number))
                .collect(),
        )
    }

    pub fn difference(&self, other: &Self) -> Self {
        let other_set: HashSet<i64> = other.0.iter().copied().collect();
        Self(
            self.0
                .iter()
                .copied()
                .filter(|tick_number| !other_set.contains(tick_number))
                .collect(),
        )
    }

    /// Maximal contiguous runs as half-open `[start, end)` tick ranges.
    pub fn maximal_runs(&self) -> Vec<(i64, i64)> {
        let mut runs = Vec::new();
        let mut iter = self.0.iter().copied();
        if let Some(first) = iter.next() {
            let mut run_start = first;
            let mut run_end = first + 1;
            for tick_number in iter {
                if tick_number == run_end {
                    run_end = tick_number + 1;
                } else {
                    runs.push((run_start, run_end));
                    run_start = tick_number;
                    run_end = tick_number + 1;
                }
            }
            runs.push((run_start, run_end));
        }
        runs
    }
}
