use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::warn;

/// Result alias used throughout the component pipeline (A–D). The public
/// `schedule()` entry point folds every `EngineError` into the matching
/// `ScheduleResult` variant rather than surfacing this type directly.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input on field `{field}`: {message}")]
    InvalidInput {
        field: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        details: Option<JsonValue>,
    },

    #[error("no feasible schedule: {reason}")]
    Infeasible { reason: InfeasibilityReason },

    #[error("solve cancelled")]
    Cancelled,

    #[error("solver timed out before finding a feasible schedule")]
    SolverTimeout,
}

/// Coarse, best-effort diagnostic tag for why the placer could not seat the
/// task. Stable across runs with the same input, but not authoritative —
/// more than one reason may plausibly apply to a given infeasible input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfeasibilityReason {
    ScopeTooShort,
    TooManyBlockers,
    WeekdayExclusion,
    DayPeriodExclusion,
}

impl std::fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InfeasibilityReason::ScopeTooShort => "scope_too_short",
            InfeasibilityReason::TooManyBlockers => "too_many_blockers",
            InfeasibilityReason::WeekdayExclusion => "weekday_exclusion",
            InfeasibilityReason::DayPeriodExclusion => "day_period_exclusion",
        };
        f.write_str(label)
    }
}

impl EngineError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        warn!(target: "engine::validation", %field, %message, "invalid input");
        EngineError::InvalidInput {
            field,
            message,
            source: None,
            details: None,
        }
    }

    pub fn invalid_input_with_details(
        field: impl Into<String>,
        message: impl Into<String>,
        details: JsonValue,
    ) -> Self {
        let field = field.into();
        let message = message.into();
        warn!(target: "engine::validation", %field, %message, %details, "invalid input with details");
        EngineError::InvalidInput {
            field,
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn infeasible(reason: InfeasibilityReason) -> Self {
        warn!(target: "engine::solve", %reason, "no feasible schedule");
        EngineError::Infeasible { reason }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::InvalidInput { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}
