pub mod constraint_compiler;
pub mod event_projector;
pub mod objective;
pub mod schedule_service;
pub(crate) mod session_placer;
pub mod tick;
pub mod window_expander;
