// syntux - rewrite source files in place
//
// This is the library crate: configuration resolution, the asynchronous
// traversal engine and the transform pipeline. The binary crate (main.rs)
// is a thin command line wrapper around `runner::Runner`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod runner;
pub mod services;
pub mod tracker;

// Re-export commonly used types for convenience
pub use config::{ConfigResolver, MARKER_FILE, ResolvedConfig};
pub use error::{ConfigError, PathError, TransformError};
pub use models::{ConfigSource, EffectiveConfig, OverrideMap, Plugin, RunOutcome, RunSummary};
pub use runner::{RunOptions, Runner};
pub use services::{BuiltinEngine, TransformEngine, Walker};
pub use tracker::{CompletionTracker, Pending};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
