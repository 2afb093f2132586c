//! Data models for a syntux run.
//!
//! - [`EffectiveConfig`]: the single, immutable configuration handed to the transform
//!   engine for every file of a run, built once by [`ConfigResolver`](crate::config::ConfigResolver)
//! - [`OverrideMap`]: per-plugin values given directly on the command line
//! - [`ConfigSource`]: where the file configuration came from (explicit, discovered, none)
//! - [`Plugin`]: the statically enumerated set of plugin keys the CLI exposes
//! - [`RunOutcome`] / [`RunSummary`]: terminal state of a run and its side-channel counters
//!
//! # Architecture Note
//!
//! Config types are plain values. Nothing mutates an [`EffectiveConfig`] after
//! resolution, so the walker shares it by `Arc` across every concurrent file transform.

pub mod config;
pub mod plugin;
pub mod run;

pub use config::{ConfigMap, ConfigSource, EffectiveConfig, OverrideMap, merge_config};
pub use plugin::Plugin;
pub use run::{FailureKind, PathFailure, RunOutcome, RunSummary};
