use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{EngineError, EngineResult};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();
static LOGGER_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,daypacker::services=debug";

/// Initialises the crate's structured logging. Idempotent: callers that
/// embed this crate in a larger application and already run their own
/// `tracing` subscriber can skip calling this at all.
pub fn init_logging(log_dir: impl AsRef<Path>) -> EngineResult<()> {
    let log_dir = log_dir.as_ref();
    LOGGER_INIT
        .get_or_try_init(|| {
            std::fs::create_dir_all(log_dir).map_err(|err| {
                EngineError::invalid_input("log_dir", format!("cannot create log directory: {err}"))
            })?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "daypacker.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let env_filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
                .map_err(|err| {
                    EngineError::invalid_input("log_filter", format!("invalid log filter: {err}"))
                })?;

            LOGGER_GUARD
                .set(guard)
                .map_err(|_| EngineError::invalid_input("log_dir", "logging already initialised"))?;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .init();

            Ok(())
        })
        .map(|_| ())
}
