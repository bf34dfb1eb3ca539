use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use crate::error::{EngineError, EngineResult, InfeasibilityReason};
use crate::models::enums::{Relation, Weekday};
use crate::models::event::ExistingEvent;
use crate::models::request::TaskRequest;
use crate::models::user_model::UserModel;
use crate::models::window::DailyWindow;
use crate::services::tick::{self, Scope, TickSet};
use crate::services::{event_projector, window_expander};

/// Component D's output: every tick-domain structure the session placer
/// (E) and objective shaper (F) need, built once and consumed by reference
/// instead of threading five separate values through call signatures
/// (spec §4.D expansion) — mirrors how the teacher's `ScheduleConstraints`
/// / `SchedulingPreferences` pair is built once in `prepare_windows` and
/// passed by reference into both block-building and scoring.
pub struct CompiledConstraints {
    pub scope: Scope,
    pub hard_blocked: TickSet,
    pub preferred: TickSet,
    pub task_period: TickSet,
    pub allowed_weekday_ticks: TickSet,
    pub deadline_cutoff: i64,
    pub feasible: TickSet,
    /// Maximal contiguous feasible runs, pre-split so no run crosses a
    /// calendar-day boundary (spec §4.E point 6's no-midnight-crossing
    /// assumption, enforced structurally rather than re-checked per
    /// candidate placement).
    pub feasible_runs: Vec<(i64, i64)>,
}

pub fn compile(
    request: &TaskRequest,
    user_model: &UserModel,
    events: &[ExistingEvent],
    around_buffer_ticks: i64,
) -> EngineResult<CompiledConstraints> {
    let scope = Scope::new(request.scope.start, request.scope.end)?;

    let sleep_ticks = window_expander::expand(&user_model.sleep_window, &scope);
    let dnd_ticks = user_model
        .do_not_disturb_window
        .as_ref()
        .map(|window| window_expander::expand(window, &scope))
        .unwrap_or_default();
    let busy_ticks = event_projector::project(events, &scope)?;
    let hard_blocked = sleep_ticks.union(&dnd_ticks).union(&busy_ticks);

    let preferred = window_expander::expand(&user_model.preferred_window, &scope);

    let task_period = match (&request.day_period, request.relation_to_day_period) {
        (Some(window), Some(relation)) => {
            relation_ticks(window, relation, &scope, around_buffer_ticks)
        }
        (Some(window), None) => window_expander::expand(window, &scope),
        (None, _) => TickSet::from_range(0, scope.end_tick),
    };

    let allowed_weekday_ticks = weekday_mask(&scope, &user_model.allowed_weekdays);

    let deadline_cutoff = deadline_cutoff_tick(request.deadline, &scope);
    let within_deadline = TickSet::from_range(0, (deadline_cutoff + 1).clamp(0, scope.end_tick));

    let feasible = task_period
        .intersect(&allowed_weekday_ticks)
        .intersect(&within_deadline)
        .difference(&hard_blocked);

    let feasible_runs = split_at_midnight(&feasible, &scope);

    let task_length_ticks = request.task_length_ticks();
    if (feasible.len() as i64) < task_length_ticks {
        let reason = infer_infeasibility_reason(
            scope.end_tick,
            &hard_blocked,
            &allowed_weekday_ticks,
            &task_period,
        );
        return Err(EngineError::infeasible(reason));
    }

    Ok(CompiledConstraints {
        scope,
        hard_blocked,
        preferred,
        task_period,
        allowed_weekday_ticks,
        deadline_cutoff,
        feasible,
        feasible_runs,
    })
}

fn deadline_cutoff_tick(deadline: Option<DateTime<Utc>>, scope: &Scope) -> i64 {
    match deadline {
        Some(deadline) => {
            let clamped = deadline.min(scope.end_rounded).max(scope.start_rounded);
            let cutoff = tick::from_diff(tick::round_down(clamped), scope.start_rounded);
            cutoff.min(scope.end_tick - 1)
        }
        None => scope.end_tick - 1,
    }
}

/// Tick `t` is weekday-allowed iff the calendar day of `to_instant(t)` is in
/// `allowed_weekdays` (spec §4.D, and the Open Question resolution in
/// SPEC_FULL.md §9: constrains a session's *start* tick only — the
/// no-midnight-crossing rule already prevents a session from ever running
/// into a disallowed day).
fn weekday_mask(scope: &Scope, allowed: &BTreeSet<Weekday>) -> TickSet {
    let mut ticks = Vec::new();
    let mut date = scope.start_rounded.date_naive();
    let end_date = scope.end_rounded.date_naive();
    loop {
        if allowed.contains(&Weekday::from_chrono(date.weekday())) {
            let day_start = day_instant(date);
            let day_end = day_start + Duration::days(1);
            let clamped_start = day_start.max(scope.start_rounded);
            let clamped_end = day_end.min(scope.end_rounded);
            if clamped_start < clamped_end {
                let start_tick = tick::from_diff(clamped_start, scope.start_rounded);
                let end_tick = tick::from_diff(clamped_end, scope.start_rounded);
                ticks.extend(start_tick..end_tick);
            }
        }
        if date >= end_date {
            break;
        }
        date = date.succ_opt().expect("date within scope has a successor");
    }
    TickSet::from_unsorted(ticks)
}

fn day_instant(date: chrono::NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(0, 0, 0).expect("00:00 is valid"))
        .and_utc()
}

/// Per-day ticks satisfying a `before`/`after`/`around` relation to
/// `window`, grounded on `original_source/test_model/test-model.py`'s
/// `get_day_period_constraints`: `before` is valid ticks strictly before
/// the window start, `after` is ticks at/after the window end, `around` is
/// the window widened by `around_buffer_ticks` on each side. This is a
/// *different* (and, per spec §4.D/§4.F, hard rather than soft) set than
/// the plain window itself — `compile` only falls back to the plain window
/// when no relation is given.
fn relation_ticks(
    window: &DailyWindow,
    relation: Relation,
    scope: &Scope,
    around_buffer_ticks: i64,
) -> TickSet {
    let ticks_per_day = tick::hours_to_ticks(24.0);
    let start_offset = time_of_day_ticks(window.start);
    let end_offset = time_of_day_ticks(window.end);

    let mut ticks = Vec::new();
    let mut date = scope.start_rounded.date_naive();
    let end_date = scope.end_rounded.date_naive();
    loop {
        let day_start_tick = tick::from_diff(day_instant(date), scope.start_rounded);
        let day_end_tick = (day_start_tick + ticks_per_day).min(scope.end_tick);

        let (range_start, range_end) = match relation {
            Relation::Before => (day_start_tick, (day_start_tick + start_offset).min(day_end_tick)),
            Relation::After => {
                ((day_start_tick + end_offset).max(day_start_tick), day_end_tick)
            }
            Relation::Around => (
                (day_start_tick + start_offset - around_buffer_ticks).max(day_start_tick),
                (day_start_tick + end_offset + around_buffer_ticks).min(day_end_tick),
            ),
        };
        push_clamped_range(&mut ticks, range_start, range_end, scope.end_tick);

        if date >= end_date {
            break;
        }
        date = date.succ_opt().expect("date within scope has a successor");
    }
    TickSet::from_unsorted(ticks)
}

fn time_of_day_ticks(time: NaiveTime) -> i64 {
    (time.num_seconds_from_midnight() as i64 / 60) / tick::MINUTES_PER_TICK
}

fn push_clamped_range(ticks: &mut Vec<i64>, start: i64, end: i64, scope_end_tick: i64) {
    let start = start.clamp(0, scope_end_tick);
    let end = end.clamp(0, scope_end_tick);
    if end > start {
        ticks.extend(start..end);
    }
}

/// Splits the feasible tick set's maximal runs at calendar-midnight
/// boundaries, so the session placer never needs to special-case a run
/// spanning two days.
fn split_at_midnight(feasible: &TickSet, scope: &Scope) -> Vec<(i64, i64)> {
    let mut runs = Vec::new();
    for (start, end) in feasible.maximal_runs() {
        let mut cursor = start;
        while cursor < end {
            let boundary = next_midnight_tick(cursor, scope);
            let run_end = end.min(boundary);
            runs.push((cursor, run_end));
            cursor = run_end;
        }
    }
    runs
}

fn next_midnight_tick(tick_number: i64, scope: &Scope) -> i64 {
    let instant = scope.to_instant(tick_number);
    let next_midnight = day_instant(instant.date_naive() + Duration::days(1));
    tick::from_diff(next_midnight, scope.start_rounded)
}

/// Best-effort, stable-but-not-authoritative diagnostic for why no
/// feasible schedule exists (spec §4.E "Failure modes").
fn infer_infeasibility_reason(
    scope_end_tick: i64,
    hard_blocked: &TickSet,
    allowed_weekday_ticks: &TickSet,
    task_period: &TickSet,
) -> InfeasibilityReason {
    let total = scope_end_tick.max(1) as usize;
    if allowed_weekday_ticks.is_empty() {
        InfeasibilityReason::WeekdayExclusion
    } else if task_period.len() * 4 < total {
        InfeasibilityReason::DayPeriodExclusion
    } else if hard_blocked.len() * 2 >= total {
        InfeasibilityReason::TooManyBlockers
    } else {
        InfeasibilityReason::ScopeTooShort
    }
}
