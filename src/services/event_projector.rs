use crate::error::EngineResult;
use crate::models::event::{self, ExistingEvent};
use crate::services::tick::{self, Scope, TickSet};

/// Component C: converts persisted event intervals into tick sets clamped
/// to the scheduling scope (spec §4.C). Validates event id uniqueness
/// before projecting anything, naming the offending id in the resulting
/// `InvalidInput` error rather than surfacing a generic failure.
pub fn project(events: &[ExistingEvent], scope: &Scope) -> EngineResult<TickSet> {
    event::validate_events(events)?;

    let mut ticks = Vec::new();
    for existing in events {
        let rounded_start = tick::round_down(existing.start);
        let rounded_end = tick::round_up(existing.end);
        if rounded_end <= scope.start_rounded || rounded_start >= scope.end_rounded {
            continue;
        }
        let clamped_start = rounded_start.max(scope.start_rounded);
        let clamped_end = rounded_end.min(scope.end_rounded);
        let start_tick = tick::from_diff(clamped_start, scope.start_rounded);
        let end_tick = tick::from_diff(clamped_end, scope.start_rounded);
        ticks.extend(start_tick..end_tick);
    }

    Ok(TickSet::from_unsorted(ticks))
}
