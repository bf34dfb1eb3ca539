use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use daypacker::{
    schedule, DailyWindow, ExistingEvent, Priority, Relation, ScheduleResult, ScopeWindow, Spread,
    TaskRequest, UserModel, Weekday,
};

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid datetime")
}

fn all_week() -> BTreeSet<Weekday> {
    BTreeSet::from([
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ])
}

fn base_user_model() -> UserModel {
    UserModel {
        allowed_weekdays: all_week(),
        min_session_hours: 0.5,
        max_session_hours: 2.0,
        min_break_between_sessions_hours: 0.5,
        sleep_window: DailyWindow::new(
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        ),
        do_not_disturb_window: None,
        preferred_window: DailyWindow::new(
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        ),
    }
}

fn base_request(task_length_hours: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> TaskRequest {
    TaskRequest {
        title: "Finish the proposal".into(),
        tag: "work".into(),
        task_length_hours,
        scope: ScopeWindow { start, end },
        priority: Priority::Medium,
        max_allowed_hours_per_day: 4.0,
        spread: Spread::Uniform,
        day_period: None,
        relation_to_day_period: None,
        deadline: None,
    }
}

/// Scenario 1: trivial placement (spec.md §8).
#[test]
fn trivial_placement_fits_entirely_within_scope() {
    let req = base_request(1.0, dt(2025, 1, 6, 9, 0), dt(2025, 1, 6, 12, 0));
    let result = schedule(&req, &base_user_model(), &[], dt(2025, 1, 6, 8, 0));

    let ScheduleResult::Scheduled { sessions } = result else {
        panic!("expected Scheduled, got {result:?}");
    };
    assert_eq!(sessions.len(), 1);
    let session = sessions[0];
    assert_eq!((session.end - session.start).num_minutes(), 60);
    assert!(session.start >= req.scope.start && session.end <= req.scope.end);
    assert_eq!(session.start.timestamp() % 300, 0);
}

/// Scenario 2: infeasible by blockers.
#[test]
fn scope_too_small_is_reported_infeasible() {
    let req = base_request(2.0, dt(2025, 1, 6, 9, 0), dt(2025, 1, 6, 10, 0));
    let result = schedule(&req, &base_user_model(), &[], dt(2025, 1, 6, 8, 0));
    assert!(matches!(result, ScheduleResult::Infeasible { .. }));
}

/// Scenario 3: multiple sessions with a minimum break between them.
#[test]
fn long_task_splits_into_multiple_sessions_respecting_break_and_bounds() {
    let mut user_model = base_user_model();
    user_model.min_session_hours = 1.0;
    user_model.max_session_hours = 2.0;
    user_model.min_break_between_sessions_hours = 0.5;

    let req = base_request(4.0, dt(2025, 1, 6, 8, 0), dt(2025, 1, 6, 20, 0));
    let result = schedule(&req, &user_model, &[], dt(2025, 1, 6, 7, 0));

    let ScheduleResult::Scheduled { sessions } = result else {
        panic!("expected Scheduled, got {result:?}");
    };
    assert!(sessions.len() >= 2);

    let total_minutes: i64 = sessions.iter().map(|s| (s.end - s.start).num_minutes()).sum();
    assert_eq!(total_minutes, 240);

    for session in &sessions {
        let minutes = (session.end - session.start).num_minutes();
        assert!((60..=120).contains(&minutes));
    }
    for pair in sessions.windows(2) {
        assert!(pair[1].start - pair[0].end >= Duration::minutes(30));
    }
}

/// Scenario 4: sleep wrap — no session may straddle the overnight window on
/// either of the two nights in scope.
#[test]
fn no_session_straddles_the_overnight_sleep_window() {
    let req = base_request(1.0, dt(2025, 1, 6, 0, 0), dt(2025, 1, 8, 0, 0));
    let result = schedule(&req, &base_user_model(), &[], dt(2025, 1, 6, 0, 0));

    let ScheduleResult::Scheduled { sessions } = result else {
        panic!("expected Scheduled, got {result:?}");
    };
    for session in &sessions {
        let day = session.start.date_naive();
        let sleep_start = day.and_hms_opt(23, 0, 0).unwrap().and_utc();
        let sleep_end = (day + Duration::days(1)).and_hms_opt(7, 0, 0).unwrap().and_utc();
        let next_morning_end = day.and_hms_opt(7, 0, 0).unwrap().and_utc();

        let overlaps_night_start = session.start < sleep_start && session.end > sleep_start;
        let overlaps_morning = session.start < next_morning_end
            && session.end > day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let overlaps_sleep_end = session.start < sleep_end && session.end > sleep_end;

        assert!(!overlaps_night_start, "session straddles 23:00 boundary: {session:?}");
        assert!(!overlaps_sleep_end, "session straddles 07:00 boundary: {session:?}");
        let _ = overlaps_morning;
    }
}

/// Scenario 5: a `before` relation should steer sessions to end by the
/// day-period start when scope leaves room to honor it.
#[test]
fn before_relation_prefers_sessions_ending_before_the_day_period() {
    let mut req = base_request(1.0, dt(2025, 1, 6, 8, 0), dt(2025, 1, 6, 22, 0));
    req.day_period = Some(DailyWindow::new(
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    ));
    req.relation_to_day_period = Some(Relation::Before);

    let result = schedule(&req, &base_user_model(), &[], dt(2025, 1, 6, 7, 0));
    let ScheduleResult::Scheduled { sessions } = result else {
        panic!("expected Scheduled, got {result:?}");
    };
    let period_start = dt(2025, 1, 6, 14, 0);
    assert!(sessions.iter().all(|s| s.end <= period_start));
}

/// Scenario 6: frontloaded spread starts strictly earlier than uniform when
/// the scope otherwise leaves the choice free.
#[test]
fn frontloaded_spread_starts_earlier_than_uniform() {
    let uniform_req = base_request(1.0, dt(2025, 1, 6, 8, 0), dt(2025, 1, 6, 22, 0));
    let mut frontloaded_req = uniform_req.clone();
    frontloaded_req.spread = Spread::Frontloaded;

    let now = dt(2025, 1, 6, 7, 0);
    let uniform_result = schedule(&uniform_req, &base_user_model(), &[], now);
    let frontloaded_result = schedule(&frontloaded_req, &base_user_model(), &[], now);

    let uniform_start = uniform_result.sessions().unwrap()[0].start;
    let frontloaded_start = frontloaded_result.sessions().unwrap()[0].start;
    assert!(frontloaded_start < uniform_start);
}

#[test]
fn existing_events_are_treated_as_hard_blockers() {
    let req = base_request(1.0, dt(2025, 1, 6, 9, 0), dt(2025, 1, 6, 11, 0));
    let events = vec![ExistingEvent {
        id: "meeting-1".into(),
        start: dt(2025, 1, 6, 9, 0),
        end: dt(2025, 1, 6, 10, 0),
        priority: None,
        tag: None,
    }];

    let result = schedule(&req, &base_user_model(), &events, dt(2025, 1, 6, 8, 0));
    let ScheduleResult::Scheduled { sessions } = result else {
        panic!("expected Scheduled, got {result:?}");
    };
    for session in &sessions {
        assert!(session.start >= dt(2025, 1, 6, 10, 0));
    }
}
