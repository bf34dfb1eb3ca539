use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use crate::config::ObjectiveWeights;
use crate::models::enums::{Relation, Spread};
use crate::models::request::TaskRequest;
use crate::services::constraint_compiler::CompiledConstraints;
use crate::services::session_placer::PlacedSession;
use crate::services::tick;

/// Component F: scores a candidate placement. Weights are combined so that
/// priority dominates spread, spread dominates preferred-hours, and
/// preferred-hours dominates the day-period relation bonus (spec §4.F).
///
/// Spec §4.F attaches the priority-derived weight explicitly to the
/// preferred-hours bonus ("reward proportional to overlap... weight scales
/// with priority") but also ranks "priority" itself above "spread" in its
/// dominance ordering, which only makes sense if priority also contributes
/// an independent term. This implementation resolves that by having
/// priority scale the *same* spread-shaping reward `request.spread`
/// already selects (earliness for `frontloaded`, inter-session gap for
/// `uniform`) at a weight tier above `spread_weight`, rather than adding a
/// spread-blind earliness term: an earlier draft rewarded earliness
/// unconditionally regardless of `spread`, which made `uniform` collapse
/// into `frontloaded` (scenario 6 of spec §8 requires them to differ).
/// Recorded as an Open Question resolution in DESIGN.md.
pub fn score(
    sessions: &[PlacedSession],
    request: &TaskRequest,
    compiled: &CompiledConstraints,
    weights: &ObjectiveWeights,
    now: DateTime<Utc>,
) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }

    let priority_weight = request.priority.weight() as f64;
    let now_tick = compiled
        .scope
        .tick_of(now.max(compiled.scope.start_rounded))
        .max(0);

    let spread_term = spread_bonus(sessions, request.spread, now_tick);
    let priority_term = spread_term * priority_weight;
    let preferred_term = preferred_hours_bonus(sessions, compiled) * priority_weight;
    let relation_term = relation_bonus(sessions, request, compiled, weights);

    priority_term * weights.priority_scale
        + spread_term * weights.spread_weight
        + preferred_term * weights.preferred_hours_weight
        + relation_term * weights.relation_weight
}

fn preferred_hours_bonus(sessions: &[PlacedSession], compiled: &CompiledConstraints) -> f64 {
    let mut overlap = 0i64;
    for session in sessions {
        for t in session.start_tick..session.end_tick {
            if compiled.preferred.contains(t) {
                overlap += 1;
            }
        }
    }
    overlap as f64
}

fn spread_bonus(sessions: &[PlacedSession], spread: Spread, now_tick: i64) -> f64 {
    match spread {
        Spread::Frontloaded => {
            let total: i64 = sessions.iter().map(|s| s.start_tick - now_tick).sum();
            -(total as f64)
        }
        Spread::Uniform => {
            let mut ordered = sessions.to_vec();
            ordered.sort_by_key(|s| s.start_tick);
            let gap_sum: i64 = ordered
                .windows(2)
                .map(|pair| pair[1].start_tick - pair[0].end_tick)
                .sum();
            gap_sum as f64
        }
    }
}

fn relation_bonus(
    sessions: &[PlacedSession],
    request: &TaskRequest,
    compiled: &CompiledConstraints,
    weights: &ObjectiveWeights,
) -> f64 {
    let (Some(window), Some(relation)) = (&request.day_period, request.relation_to_day_period)
    else {
        return 0.0;
    };

    let mut bonus = 0.0;
    for session in sessions {
        let start = compiled.scope.to_instant(session.start_tick);
        let end = compiled.scope.to_instant(session.end_tick);
        let day_start = day_boundary(start);
        let period_start = day_start + time_offset(window.start);
        let period_end = if window.spans_midnight() {
            day_start + Duration::days(1) + time_offset(window.end)
        } else {
            day_start + time_offset(window.end)
        };

        let satisfied = match relation {
            Relation::Before => end <= period_start,
            Relation::After => start >= period_end,
            Relation::Around => {
                let buffer = Duration::minutes(weights.around_buffer_ticks * tick::MINUTES_PER_TICK);
                start >= period_start - buffer && end <= period_end + buffer
            }
        };
        if satisfied {
            bonus += 1.0;
        }
    }
    bonus
}

fn day_boundary(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_time(NaiveTime::from_hms_opt(0, 0, 0).expect("00:00 is valid"))
        .and_utc()
}

fn time_offset(time: NaiveTime) -> Duration {
    Duration::seconds(time.num_seconds_from_midnight() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Priority;
    use crate::models::request::ScopeWindow;
    use chrono::TimeZone;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid datetime")
    }

    fn base_request() -> TaskRequest {
        TaskRequest {
            title: "Task".into(),
            tag: "tag".into(),
            task_length_hours: 1.0,
            scope: ScopeWindow {
                start: dt(2025, 1, 6, 0, 0),
                end: dt(2025, 1, 7, 0, 0),
            },
            priority: Priority::High,
            max_allowed_hours_per_day: 4.0,
            spread: Spread::Uniform,
            day_period: None,
            relation_to_day_period: None,
            deadline: None,
        }
    }

    fn compiled_for(request: &TaskRequest) -> CompiledConstraints {
        crate::services::constraint_compiler::compile(
            request,
            &crate::models::UserModel {
                allowed_weekdays: std::collections::BTreeSet::from([
                    crate::models::enums::Weekday::Monday,
                ]),
                min_session_hours: 0.5,
                max_session_hours: 2.0,
                min_break_between_sessions_hours: 0.5,
                sleep_window: crate::models::DailyWindow::new(
                    NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                ),
                do_not_disturb_window: None,
                preferred_window: crate::models::DailyWindow::new(
                    NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                ),
            },
            &[],
            ObjectiveWeights::default().around_buffer_ticks,
        )
        .unwrap()
    }

    #[test]
    fn preferred_hours_bonus_rewards_overlap_with_preferred_window() {
        let request = base_request();
        let compiled = compiled_for(&request);

        let in_preferred = compiled.scope.tick_of(dt(2025, 1, 6, 13, 0));
        let outside_preferred = compiled.scope.tick_of(dt(2025, 1, 6, 3, 0));

        let inside = [PlacedSession {
            start_tick: in_preferred,
            end_tick: in_preferred + 6,
        }];
        let outside = [PlacedSession {
            start_tick: outside_preferred,
            end_tick: outside_preferred + 6,
        }];

        assert!(preferred_hours_bonus(&inside, &compiled) > preferred_hours_bonus(&outside, &compiled));
    }

    #[test]
    fn frontloaded_spread_rewards_earlier_starts() {
        let earlier = [PlacedSession { start_tick: 0, end_tick: 6 }];
        let later = [PlacedSession { start_tick: 100, end_tick: 106 }];
        assert!(spread_bonus(&earlier, Spread::Frontloaded, 0) > spread_bonus(&later, Spread::Frontloaded, 0));
    }

    #[test]
    fn empty_placement_scores_zero() {
        let request = base_request();
        let compiled = compiled_for(&request);
        let weights = ObjectiveWeights::default();
        assert_eq!(score(&[], &request, &compiled, &weights, dt(2025, 1, 6, 0, 0)), 0.0);
    }
}
