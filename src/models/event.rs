use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::enums::Priority;

/// A pre-existing calendar event, consumed read-only as an immutable
/// blocker. Spec §3: `start < end` is an invariant, enforced by
/// [`ExistingEvent::validate`] rather than at construction, since this
/// type is plain deserialized data with no validating constructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExistingEvent {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ExistingEvent {
    pub fn validate(&self) -> EngineResult<()> {
        if self.end <= self.start {
            return Err(EngineError::invalid_input(
                "events.end",
                format!("event `{}` must have end after start", self.id),
            ));
        }
        Ok(())
    }
}

/// Validates every event individually and rejects duplicate ids (spec §4.C,
/// §7). Called once by the event projector before any tick conversion.
pub fn validate_events(events: &[ExistingEvent]) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        event.validate()?;
        if !seen.insert(event.id.as_str()) {
            return Err(EngineError::invalid_input(
                "events.id",
                format!("duplicate event id `{}`", event.id),
            ));
        }
    }
    Ok(())
}
