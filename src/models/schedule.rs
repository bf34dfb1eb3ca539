use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InfeasibilityReason;

/// One placed work session (spec §3 "Lifecycle"): `end - start` is always a
/// positive multiple of [`crate::services::tick::MINUTES_PER_TICK`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The sum type returned by [`crate::schedule`] (spec §6). Carries one
/// variant beyond the distilled spec's four: `SolverTimeout`, distinct from
/// `Infeasible` because exhausting the search budget is not the same claim
/// as the compiler having proven no feasible placement exists (spec §7
/// lists `SolverTimeout` as its own error kind; collapsing it into
/// `Infeasible` would silently misreport "proven unsat" when the true
/// state is "unknown, ran out of time").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleResult {
    Scheduled { sessions: Vec<Session> },
    Infeasible { reason: InfeasibilityReason },
    Cancelled,
    SolverTimeout,
    InvalidInput { field: String, message: String },
}

impl ScheduleResult {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, ScheduleResult::Scheduled { .. })
    }

    pub fn sessions(&self) -> Option<&[Session]> {
        match self {
            ScheduleResult::Scheduled { sessions } => Some(sessions),
            _ => None,
        }
    }
}
