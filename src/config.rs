use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::services::tick;

/// Weights for the objective shaper (spec §4.F). Per spec, exact numeric
/// values are implementation-defined, but must preserve
/// `priority > spread > preferred-hours > relation` in dominance. Chosen as
/// successive orders of magnitude so no combination of lower-tier terms can
/// outweigh a higher tier.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveWeights {
    pub priority_scale: f64,
    pub spread_weight: f64,
    pub preferred_hours_weight: f64,
    pub relation_weight: f64,
    /// `Δ` in spec §4.F's "around" relation, in ticks. Defaults to 2 hours
    /// (24 ticks at `MINUTES_PER_TICK = 5`), matching
    /// `original_source/test_model/test-model.py`'s `around_buffer_hours`.
    pub around_buffer_ticks: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            priority_scale: 1_000_000.0,
            spread_weight: 10_000.0,
            preferred_hours_weight: 100.0,
            relation_weight: 1.0,
            around_buffer_ticks: tick::hours_to_ticks(2.0),
        }
    }
}

/// Tunable engine behaviour (spec §6: "Solver timeout and weight ordering
/// are configurable; all other behaviour is fixed"). `MINUTES_PER_TICK`
/// itself is deliberately not here — it is a compile-time constant
/// (`services::tick::MINUTES_PER_TICK`), not a runtime setting.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub solver_timeout: Duration,
    pub seed: u64,
    pub local_search_iterations: usize,
    pub weights: ObjectiveWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            solver_timeout: Duration::from_secs(30),
            seed: 42,
            local_search_iterations: 200,
            weights: ObjectiveWeights::default(),
        }
    }
}

/// Cooperative cancellation handle for an in-flight `schedule()` call (spec
/// §5). Checked at the same points as the solver timeout; tripping it
/// yields `ScheduleResult::Cancelled` before any partial solution escapes.
/// Modelled on the teacher's use of a bare `Arc<AtomicBool>` for
/// `WorkloadForecastService::job_started`.
#[derive(Debug, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
