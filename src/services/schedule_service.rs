use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::{CancellationToken, EngineConfig};
use crate::error::EngineError;
use crate::models::event::ExistingEvent;
use crate::models::request::TaskRequest;
use crate::models::schedule::{ScheduleResult, Session};
use crate::models::user_model::UserModel;
use crate::services::constraint_compiler;
use crate::services::objective;
use crate::services::session_placer::SessionPlacer;

/// Component G and the crate's public entry point (spec §5 "Lifecycle").
/// Uses a fresh, unreachable cancellation token and the default engine
/// configuration; call [`schedule_with`] directly to supply either.
pub fn schedule(
    request: &TaskRequest,
    user_model: &UserModel,
    events: &[ExistingEvent],
    now: DateTime<Utc>,
) -> ScheduleResult {
    let config = EngineConfig::default();
    schedule_with(request, user_model, events, now, &config, CancellationToken::new())
}

/// Same as [`schedule`], but with an explicit [`EngineConfig`] and a
/// [`CancellationToken`] the caller can trip from another thread.
#[instrument(skip(request, user_model, events, config, cancel), fields(title = %request.title))]
pub fn schedule_with(
    request: &TaskRequest,
    user_model: &UserModel,
    events: &[ExistingEvent],
    now: DateTime<Utc>,
    config: &EngineConfig,
    cancel: CancellationToken,
) -> ScheduleResult {
    if let Err(err) = request.validate() {
        return fold_error(err);
    }
    if let Err(err) = user_model.validate() {
        return fold_error(err);
    }

    let compiled = match constraint_compiler::compile(
        request,
        user_model,
        events,
        config.weights.around_buffer_ticks,
    ) {
        Ok(compiled) => compiled,
        Err(err) => return fold_error(err),
    };

    let placer = SessionPlacer::new(config, cancel);
    let placed = match placer.place(&compiled, request, user_model, now) {
        Ok(placed) => placed,
        Err(err) => return fold_error(err),
    };

    let score = objective::score(&placed, request, &compiled, &config.weights, now);
    debug!(session_count = placed.len(), score, "placement found");

    let mut sessions: Vec<Session> = placed
        .iter()
        .map(|session| Session {
            start: compiled.scope.to_instant(session.start_tick),
            end: compiled.scope.to_instant(session.end_tick),
        })
        .collect();
    sessions.sort_by_key(|session| session.start);

    info!(session_count = sessions.len(), "schedule produced");
    ScheduleResult::Scheduled { sessions }
}

fn fold_error(err: EngineError) -> ScheduleResult {
    match err {
        EngineError::InvalidInput { field, message, .. } => {
            ScheduleResult::InvalidInput { field, message }
        }
        EngineError::Infeasible { reason } => ScheduleResult::Infeasible { reason },
        EngineError::Cancelled => ScheduleResult::Cancelled,
        EngineError::SolverTimeout => {
            warn!("solver exhausted its time budget");
            ScheduleResult::SolverTimeout
        }
    }
}
