use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::enums::{Priority, Relation, Spread};
use crate::models::window::DailyWindow;
use crate::services::tick;

/// The absolute half-open window in which the task's sessions must fit
/// (spec §3 "Scope"). Kept as a plain field pair on the wire so a caller
/// never has to construct the rounded/tick-relative [`crate::services::tick::Scope`]
/// itself — that derivation happens once, inside the constraint compiler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A natural-language-derived task request (spec §3). Hour-denominated
/// fields are stored exactly as supplied (for round-tripping/display) and
/// converted to ticks on demand by the `*_ticks` methods below, mirroring
/// the original's `computed_field` properties without caching them on an
/// otherwise-immutable value type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    pub tag: String,
    pub task_length_hours: f64,
    pub scope: ScopeWindow,
    pub priority: Priority,
    pub max_allowed_hours_per_day: f64,
    pub spread: Spread,
    #[serde(default)]
    pub day_period: Option<DailyWindow>,
    #[serde(default)]
    pub relation_to_day_period: Option<Relation>,
    /// Absolute cutoff for the task, distinct from `scope.end`: a task can
    /// be scoped to "this week" but due by Wednesday. Not part of the
    /// distilled spec's field table but present in the original prototype
    /// (`original_source/test_model/test-model.py`'s `absolute_deadline_datetime`)
    /// and required to give §4.D's `deadline_cutoff` any meaning beyond a
    /// restatement of `scope_end_tick`. Defaults to the scope end when absent.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskRequest {
    pub fn validate(&self) -> EngineResult<()> {
        if self.title.trim().is_empty() {
            return Err(EngineError::invalid_input("title", "title must not be empty"));
        }
        if self.tag.trim().is_empty() {
            return Err(EngineError::invalid_input("tag", "tag must not be empty"));
        }
        if !self.task_length_hours.is_finite() || self.task_length_hours <= 0.0 {
            return Err(EngineError::invalid_input(
                "task_length_hours",
                "must be a positive, finite number of hours",
            ));
        }
        if !self.max_allowed_hours_per_day.is_finite() || self.max_allowed_hours_per_day <= 0.0 {
            return Err(EngineError::invalid_input(
                "max_allowed_hours_per_day",
                "must be a positive, finite number of hours",
            ));
        }
        if self.scope.end <= self.scope.start {
            return Err(EngineError::invalid_input(
                "scope",
                "scope.end must be after scope.start",
            ));
        }
        if self.relation_to_day_period.is_some() && self.day_period.is_none() {
            return Err(EngineError::invalid_input(
                "relation_to_day_period",
                "requires day_period to also be set",
            ));
        }
        if let Some(deadline) = self.deadline {
            if deadline <= self.scope.start {
                return Err(EngineError::invalid_input(
                    "deadline",
                    "must be after scope.start",
                ));
            }
        }
        Ok(())
    }

    pub fn task_length_ticks(&self) -> i64 {
        tick::hours_to_ticks(self.task_length_hours)
    }

    pub fn max_allowed_ticks_per_day(&self) -> i64 {
        tick::hours_to_ticks(self.max_allowed_hours_per_day)
    }
}
