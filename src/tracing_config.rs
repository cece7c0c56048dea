use std::{env, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

/// Selects pretty or JSON output
pub const LOG_FORMAT_ENV: &str = "CLOUD_MUSIC_LOG_FORMAT";

const DAYS_TO_KEEP: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        Self::parse(env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initialize tracing to stdout.
///
/// Uses `RUST_LOG` if set, otherwise `level`. Output is pretty unless
/// `CLOUD_MUSIC_LOG_FORMAT=json`.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init(level: &LogLevel) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    match LogFormat::from_env() {
        LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_target(true).with_level(true))
                .try_init()?;
        }
        LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(true),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize tracing to stdout and a daily rotated file in `log_dir`.
///
/// Keep the returned guard alive for as long as logs should be flushed to
/// the file.
///
/// # Errors
/// Returns error if the log file cannot be created or a global subscriber
/// is already installed
pub fn init_with_file(
    level: &LogLevel,
    log_dir: &Path,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix(env!("CARGO_PKG_NAME"))
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(env_filter(level));

    match LogFormat::from_env() {
        LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stdout),
                )
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stdout),
                )
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .try_init()?;
        }
    }

    Ok(guard)
}
