use serde::{Deserialize, Serialize};

/// Task importance or urgency level. Ordered so that `HIGH > MEDIUM > LOW`
/// can be used directly as an objective weight multiplier (spec §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Priority {
    pub fn weight(self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 4,
        }
    }
}

/// How sessions are distributed across the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    Uniform,
    Frontloaded,
}

/// Temporal relation of scheduled sessions to a day period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Before,
    After,
    Around,
}

/// Day of the week, Monday = 0 .. Sunday = 6, matching `allowed_weekdays`
/// wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Weekday::Monday),
            1 => Some(Weekday::Tuesday),
            2 => Some(Weekday::Wednesday),
            3 => Some(Weekday::Thursday),
            4 => Some(Weekday::Friday),
            5 => Some(Weekday::Saturday),
            6 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        // chrono::Weekday::num_days_from_monday() already uses Mon=0..Sun=6.
        Self::from_index(weekday.num_days_from_monday()).expect("chrono weekday is always 0..=6")
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}
