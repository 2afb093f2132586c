use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::IsTerminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of rotated log files
pub const LOG_PREFIX: &str = "syntux";

/// Guards that must be held for the duration of the program to keep logging active.
///
/// Dropping them flushes the non-blocking writers.
#[must_use]
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

/// Build the level filter.
///
/// `RUST_LOG` wins when set. Otherwise verbose runs log at debug level and
/// normal runs only show warnings and per-path errors.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    })
}

/// Setup logging to stderr, with an optional rotating file appender.
///
/// Stderr is the diagnostic stream of a run: per-path failures appear there one
/// line per event. When `log_dir` is given, the same events also go to daily
/// rotated files `<log_dir>/syntux.<date>`.
///
/// # Arguments
/// * `verbose` - If true, use debug level; otherwise warn level
/// * `log_dir` - Optional directory for log files
///
/// # Returns
/// Guards that must be held until exit
pub fn setup_logging(verbose: bool, log_dir: Option<&Utf8Path>) -> Result<LoggingGuards> {
    let mut guards = Vec::new();

    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(stderr_guard);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(stderr_writer)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    let file_layer = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory: {}", dir))?;
            }

            let file_appender = rolling::daily(dir, LOG_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            guards.push(guard);

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::debug!(
        "Logging initialized: verbose={}, log_dir={:?}",
        verbose,
        log_dir
    );

    Ok(LoggingGuards { _guards: guards })
}
