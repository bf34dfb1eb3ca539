pub mod enums;
pub mod event;
pub mod request;
pub mod schedule;
pub mod user_model;
pub mod window;

pub use enums::{Priority, Relation, Spread, Weekday};
pub use event::ExistingEvent;
pub use request::{ScopeWindow, TaskRequest};
pub use schedule::{ScheduleResult, Session};
pub use user_model::UserModel;
pub use window::DailyWindow;
