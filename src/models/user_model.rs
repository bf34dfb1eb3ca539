use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::enums::Weekday;
use crate::models::window::DailyWindow;
use crate::services::tick;

/// The long-lived record of per-user scheduling preferences (spec §3
/// "User model (Ump)"). Defaults mirror the original's `UMP` pydantic model
/// (`original_source/.../ump.py`): a 23:00-07:00 sleep window, a
/// 12:00-20:00 preferred window, half-hour min session/break, two-hour max
/// session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub allowed_weekdays: BTreeSet<Weekday>,
    #[serde(default = "default_min_session_hours")]
    pub min_session_hours: f64,
    #[serde(default = "default_max_session_hours")]
    pub max_session_hours: f64,
    #[serde(default = "default_min_break_hours")]
    pub min_break_between_sessions_hours: f64,
    #[serde(default = "default_sleep_window")]
    pub sleep_window: DailyWindow,
    #[serde(default)]
    pub do_not_disturb_window: Option<DailyWindow>,
    #[serde(default = "default_preferred_window")]
    pub preferred_window: DailyWindow,
}

fn default_min_session_hours() -> f64 {
    0.5
}

fn default_max_session_hours() -> f64 {
    2.0
}

fn default_min_break_hours() -> f64 {
    0.5
}

fn default_sleep_window() -> DailyWindow {
    DailyWindow::new(
        NaiveTime::from_hms_opt(23, 0, 0).expect("23:00 is valid"),
        NaiveTime::from_hms_opt(7, 0, 0).expect("07:00 is valid"),
    )
}

fn default_preferred_window() -> DailyWindow {
    DailyWindow::new(
        NaiveTime::from_hms_opt(12, 0, 0).expect("12:00 is valid"),
        NaiveTime::from_hms_opt(20, 0, 0).expect("20:00 is valid"),
    )
}

impl UserModel {
    pub fn validate(&self) -> EngineResult<()> {
        if self.allowed_weekdays.is_empty() {
            return Err(EngineError::invalid_input(
                "allowed_weekdays",
                "must contain at least one weekday",
            ));
        }
        if !self.min_session_hours.is_finite() || self.min_session_hours <= 0.0 {
            return Err(EngineError::invalid_input(
                "min_session_hours",
                "must be a positive, finite number of hours",
            ));
        }
        if !self.max_session_hours.is_finite() || self.max_session_hours < self.min_session_hours
        {
            return Err(EngineError::invalid_input(
                "max_session_hours",
                "must be finite and at least min_session_hours",
            ));
        }
        if !self.min_break_between_sessions_hours.is_finite()
            || self.min_break_between_sessions_hours < 0.0
        {
            return Err(EngineError::invalid_input(
                "min_break_between_sessions_hours",
                "must be a non-negative, finite number of hours",
            ));
        }
        Ok(())
    }

    pub fn min_session_ticks(&self) -> i64 {
        tick::hours_to_ticks(self.min_session_hours)
    }

    pub fn max_session_ticks(&self) -> i64 {
        tick::hours_to_ticks(self.max_session_hours)
    }

    pub fn min_break_ticks(&self) -> i64 {
        tick::hours_to_ticks(self.min_break_between_sessions_hours)
    }
}
