use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::{CancellationToken, EngineConfig};
use crate::error::{EngineError, InfeasibilityReason};
use crate::models::request::TaskRequest;
use crate::models::user_model::UserModel;
use crate::services::constraint_compiler::CompiledConstraints;
use crate::services::objective;
use crate::services::tick::Scope;

/// One placed session in tick space, before being mapped back to wall-clock
/// instants by component G.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedSession {
    pub start_tick: i64,
    pub end_tick: i64,
}

impl PlacedSession {
    pub fn duration(&self) -> i64 {
        self.end_tick - self.start_tick
    }
}

/// Component E. spec §9 leaves the solver technology open but forbids
/// leaking it through the public interface; the original prototype reaches
/// for OR-Tools' CP-SAT (`original_source/.../base_solver.py`,
/// `test_model/cp_sat.py`), but no crate in this workspace's dependency
/// stack binds a CP/MIP solver and fabricating one is out of bounds (see
/// SPEC_FULL.md §4.E). This type is never exported from the crate root —
/// only `schedule()` and its plain-data types are public.
///
/// The model is built directly: candidate placements are searched over
/// increasing session counts (spec's `N` bound), each count resolved by a
/// greedy cursor walk across the maximal feasible runs (in the manner of
/// the teacher's `build_blocks_for_variant`), followed by a bounded,
/// deterministic local-search pass that hill-climbs the objective (F) by
/// shifting session starts within their run. This is a best-effort
/// optimizer: it guarantees a feasible solution when one exists within the
/// modeled constraints and improves the objective heuristically rather
/// than proving optimality.
pub(crate) struct SessionPlacer<'a> {
    config: &'a EngineConfig,
    cancel: CancellationToken,
    deadline: Instant,
}

impl<'a> SessionPlacer<'a> {
    pub fn new(config: &'a EngineConfig, cancel: CancellationToken) -> Self {
        let deadline = Instant::now() + config.solver_timeout;
        Self {
            config,
            cancel,
            deadline,
        }
    }

    pub fn place(
        &self,
        compiled: &CompiledConstraints,
        request: &TaskRequest,
        user_model: &UserModel,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlacedSession>, EngineError> {
        let task_length = request.task_length_ticks();
        let min_dur = user_model.min_session_ticks();
        let max_dur = user_model.max_session_ticks();
        let min_break = user_model.min_break_ticks();
        let daily_cap = request.max_allowed_ticks_per_day();

        if min_dur <= 0 || max_dur < min_dur {
            return Err(EngineError::invalid_input(
                "min_session_hours",
                "session length bounds are invalid",
            ));
        }

        let session_count_bound = ((task_length + min_dur - 1) / min_dur).max(1);

        for session_count in 1..=session_count_bound {
            self.check_budget()?;
            if let Some(candidate) = self.search_assignment(
                session_count,
                &compiled.feasible_runs,
                min_dur,
                max_dur,
                task_length,
                min_break,
                daily_cap,
                &compiled.scope,
            )? {
                let improved = self.local_search(candidate, compiled, request, user_model, now);
                return Ok(improved);
            }
        }

        Err(EngineError::infeasible(InfeasibilityReason::TooManyBlockers))
    }

    fn check_budget(&self) -> Result<(), EngineError> {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(EngineError::SolverTimeout);
        }
        Ok(())
    }

    /// Greedily walks the feasible runs in order, placing `session_count`
    /// sessions of the durations `distribute_durations` proposes. Bails out
    /// (returns `Ok(None)`) if the runs can't absorb every session under
    /// the break and daily-cap constraints, letting the caller retry with
    /// more sessions.
    #[allow(clippy::too_many_arguments)]
    fn search_assignment(
        &self,
        session_count: i64,
        runs: &[(i64, i64)],
        min_dur: i64,
        max_dur: i64,
        task_length: i64,
        min_break: i64,
        daily_cap: i64,
        scope: &Scope,
    ) -> Result<Option<Vec<PlacedSession>>, EngineError> {
        let Some(durations) = distribute_durations(session_count, task_length, min_dur, max_dur)
        else {
            return Ok(None);
        };

        let mut placed = Vec::with_capacity(session_count as usize);
        let mut day_totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        let mut run_idx = 0usize;
        let mut cursor = match runs.first() {
            Some(&(start, _)) => start,
            None => return Ok(None),
        };

        for &duration in &durations {
            self.check_budget()?;
            loop {
                let Some(&(run_start, run_end)) = runs.get(run_idx) else {
                    return Ok(None);
                };

                let candidate_start = cursor.max(run_start);
                let candidate_end = candidate_start + duration;

                if candidate_end > run_end {
                    run_idx += 1;
                    cursor = runs.get(run_idx).map(|r| r.0).unwrap_or(run_end);
                    continue;
                }

                let day = scope.to_instant(candidate_start).date_naive();
                let used_today = *day_totals.get(&day).unwrap_or(&0);
                if used_today + duration > daily_cap {
                    // Runs are pre-split at midnight (constraint_compiler),
                    // so the whole rest of this run shares `day`; skip it.
                    run_idx += 1;
                    cursor = runs.get(run_idx).map(|r| r.0).unwrap_or(run_end);
                    continue;
                }

                placed.push(PlacedSession {
                    start_tick: candidate_start,
                    end_tick: candidate_end,
                });
                *day_totals.entry(day).or_insert(0) += duration;
                cursor = candidate_end + min_break;
                break;
            }
        }

        Ok(Some(placed))
    }

    fn local_search(
        &self,
        initial: Vec<PlacedSession>,
        compiled: &CompiledConstraints,
        request: &TaskRequest,
        user_model: &UserModel,
        now: DateTime<Utc>,
    ) -> Vec<PlacedSession> {
        let mut current = initial;
        let mut best_score = objective::score(&current, request, compiled, &self.config.weights, now);
        let min_break = user_model.min_break_ticks();

        for _ in 0..self.config.local_search_iterations {
            if self.cancel.is_cancelled() || Instant::now() >= self.deadline {
                break;
            }
            let mut improved = false;
            for i in 0..current.len() {
                for candidate_start in self.candidate_starts(&current, i, compiled, min_break) {
                    let duration = current[i].duration();
                    let mut trial = current.clone();
                    trial[i] = PlacedSession {
                        start_tick: candidate_start,
                        end_tick: candidate_start + duration,
                    };
                    if !respects_ordering(&trial, min_break) {
                        continue;
                    }
                    let trial_score =
                        objective::score(&trial, request, compiled, &self.config.weights, now);
                    if trial_score > best_score {
                        current = trial;
                        best_score = trial_score;
                        improved = true;
                    }
                }
            }
            if !improved {
                break;
            }
        }

        current.sort_by_key(|s| s.start_tick);
        current
    }

    /// Candidate start ticks for session `idx` within the feasible run it
    /// currently occupies: as early and as late as its neighbours (and the
    /// run bounds) allow, plus the midpoint.
    fn candidate_starts(
        &self,
        sessions: &[PlacedSession],
        idx: usize,
        compiled: &CompiledConstraints,
        min_break: i64,
    ) -> Vec<i64> {
        let session = sessions[idx];
        let duration = session.duration();
        let Some(&(run_start, run_end)) = compiled
            .feasible_runs
            .iter()
            .find(|&&(start, end)| start <= session.start_tick && session.end_tick <= end)
        else {
            return Vec::new();
        };

        let mut lower = run_start;
        let mut upper = run_end - duration;

        if idx > 0 {
            let prev = sessions[idx - 1];
            if prev.end_tick > run_start {
                lower = lower.max(prev.end_tick + min_break);
            }
        }
        if idx + 1 < sessions.len() {
            let next = sessions[idx + 1];
            if next.start_tick < run_end {
                upper = upper.min(next.start_tick - min_break - duration);
            }
        }

        if upper < lower {
            return Vec::new();
        }

        let mut candidates = vec![lower, upper, lower + (upper - lower) / 2];
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }
}

/// Splits `total` ticks across `session_count` sessions as evenly as
/// possible, each within `[min_dur, max_dur]`. Returns `None` if no such
/// split exists (the caller then tries the next session count).
fn distribute_durations(
    session_count: i64,
    total: i64,
    min_dur: i64,
    max_dur: i64,
) -> Option<Vec<i64>> {
    if session_count <= 0 || total < session_count * min_dur || total > session_count * max_dur {
        return None;
    }

    let base = total / session_count;
    let mut remainder = total % session_count;
    let mut durations = Vec::with_capacity(session_count as usize);
    for _ in 0..session_count {
        let mut duration = base;
        if remainder > 0 {
            duration += 1;
            remainder -= 1;
        }
        durations.push(duration.clamp(min_dur, max_dur));
    }

    let sum: i64 = durations.iter().sum();
    let all_within_bounds = durations.iter().all(|&d| (min_dur..=max_dur).contains(&d));
    if sum == total && all_within_bounds {
        Some(durations)
    } else {
        None
    }
}

fn respects_ordering(sessions: &[PlacedSession], min_break: i64) -> bool {
    let mut ordered = sessions.to_vec();
    ordered.sort_by_key(|s| s.start_tick);
    ordered
        .windows(2)
        .all(|pair| pair[1].start_tick >= pair[0].end_tick + min_break)
}
