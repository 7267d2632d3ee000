use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();
static LOGGER_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,app::performance=debug,app::payroll=debug";
pub const LOG_FILE_PREFIX: &str = "bizdash.log";

/// Installs the global subscriber: a daily rolling file under `log_dir` plus console output.
/// Later calls, including ones after [`init_console_logging`], are no-ops.
pub fn init_logging(log_dir: &Path) -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            std::fs::create_dir_all(log_dir)?;

            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let env_filter = env_filter()?;

            LOGGER_GUARD
                .set(guard)
                .map_err(|_| AppError::other("logger already initialized"))?;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .with(console_layer())
                .try_init()
                .map_err(install_failed)
        })
        .map(|_| ())
}

/// Console-only subscriber for embedders that keep no log directory.
pub fn init_console_logging() -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            tracing_subscriber::registry()
                .with(env_filter()?)
                .with(console_layer())
                .try_init()
                .map_err(install_failed)
        })
        .map(|_| ())
}

fn env_filter() -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
        .map_err(|err| AppError::other(format!("invalid log directives: {err}")))
}

fn console_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339())
}

fn install_failed(err: tracing_subscriber::util::TryInitError) -> AppError {
    AppError::other(format!("failed to install subscriber: {err}"))
}
