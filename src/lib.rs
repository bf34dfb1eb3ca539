pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{CancellationToken, EngineConfig, ObjectiveWeights};
pub use error::{EngineError, InfeasibilityReason};
pub use models::{
    DailyWindow, ExistingEvent, Priority, Relation, ScheduleResult, ScopeWindow, Session, Spread,
    TaskRequest, UserModel, Weekday,
};
pub use services::schedule_service::{schedule, schedule_with};
