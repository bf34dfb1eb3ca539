use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::models::window::DailyWindow;
use crate::services::tick::{self, Scope, TickSet};

/// Component B: projects a recurring daily time-of-day window across every
/// calendar date overlapping `scope`, clamped and aligned to tick
/// boundaries (spec §4.B). Reused unmodified for sleep, do-not-disturb,
/// preferred-hours, and task day-period windows by the constraint compiler
/// — this crate's one shared daily-window expander, mirroring the
/// original's single `Tick.time_window_to_list_of_ticks` helper.
///
/// Unlike the original, the upper bound of a midnight-spanning window's
/// first segment is the exact next midnight, not a `23:59:59` sentinel —
/// spec §4.B calls that sentinel a leak in the source it was distilled
/// from.
pub fn expand(window: &DailyWindow, scope: &Scope) -> TickSet {
    let mut ticks = Vec::new();
    if window.is_empty() {
        return TickSet::new();
    }

    let start_date = scope.start_rounded.date_naive();
    let end_date = scope.end_rounded.date_naive();
    let mut date = start_date;
    loop {
        if window.spans_midnight() {
            let segment1_start = day_instant(date, window.start);
            let segment1_end = day_instant(date, midnight()) + Duration::days(1);
            push_clamped(&mut ticks, segment1_start, segment1_end, scope);

            let next_date = date + Duration::days(1);
            let segment2_start = day_instant(next_date, midnight());
            let segment2_end = day_instant(next_date, window.end);
            push_clamped(&mut ticks, segment2_start, segment2_end, scope);
        } else {
            let segment_start = day_instant(date, window.start);
            let segment_end = day_instant(date, window.end);
            push_clamped(&mut ticks, segment_start, segment_end, scope);
        }

        if date >= end_date {
            break;
        }
        date += Duration::days(1);
    }

    TickSet::from_unsorted(ticks)
}

fn midnight() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 0).expect("00:00 is valid")
}

fn day_instant(date: chrono::NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

fn push_clamped(
    ticks: &mut Vec<i64>,
    segment_start: DateTime<Utc>,
    segment_end: DateTime<Utc>,
    scope: &Scope,
) {
    if segment_end <= scope.start_rounded || segment_start >= scope.end_rounded {
        return;
    }
    let clamped_start = segment_start.max(scope.start_rounded);
    let clamped_end = segment_end.min(scope.end_rounded);
    let start_tick = tick::from_diff(tick::round_down(clamped_start), scope.start_rounded);
    let end_tick = tick::from_diff(tick::round_up(clamped_end), scope.start_rounded);
    ticks.extend(start_tick..end_tick);
}
