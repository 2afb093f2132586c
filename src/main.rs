//! syntux - rewrite source files in place
//!
//! Main entry point for the command line tool.
//!
//! # Execution Flow
//!
//! 1. Parse arguments ([`Cli`])
//! 2. Initialize logging (stderr, optional rotating files with `--log-dir`)
//! 3. Build a single-threaded tokio runtime
//! 4. Resolve the syntax configuration once, then walk every path and rewrite
//!    matching files ([`Runner`])
//! 5. Exit 0 on success (even with per-path failures), 1 on a configuration error

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use syntux::cli::Cli;
use syntux::runner::Runner;
use syntux::{APP_NAME, VERSION};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _logging = syntux::logging::setup_logging(cli.verbose, cli.log_dir.as_deref())?;
    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).context("Working directory is not valid UTF-8")?;
    let options = cli.into_options(cwd);

    // One thread: every filesystem call is a suspension point on the same loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .thread_name("syntux")
        .build()
        .context("Failed to build tokio runtime")?;

    let outcome = runtime.block_on(Runner::new(options).execute());

    Ok(ExitCode::from(outcome.exit_code() as u8))
}
