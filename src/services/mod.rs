//! Services module - the asynchronous traversal and rewrite pipeline.
//!
//! # Components
//!
//! - [`Walker`]: Classifies each path with a non-blocking stat, lists directories and
//!   recurses into their entries, and hands matching files to the invoker.
//!   - [`ExtensionFilter`]: Which files are transformed (default: `.js`)
//!   - [`PathEntry`]: Directory, matching file, or filtered out
//!
//! - [`TransformInvoker`]: Reads one file, runs the [`TransformEngine`], and writes the
//!   result back in place.
//!
//! - [`TransformEngine`]: The pure `(content, config) -> content` function. [`BuiltinEngine`]
//!   implements the plugins of [`Plugin`](crate::models::Plugin).
//!
//! # Concurrency
//!
//! Every filesystem call runs in its own task and holds a
//! [`Pending`](crate::tracker::Pending) guard from the run's
//! [`CompletionTracker`](crate::tracker::CompletionTracker). Work discovered by a task
//! is registered before that task completes, so the tracker drains exactly once,
//! after the last file has been written.
//!
//! # Failure isolation
//!
//! Stat, listing, read, transform, and write failures are recorded against the path
//! where they happened (see [`Metrics`](crate::metrics::Metrics)). Nothing is retried
//! and nothing else is cancelled.

pub mod engine;
pub mod transform;
pub mod walker;

pub use engine::{BuiltinEngine, TransformEngine};
pub use transform::TransformInvoker;
pub use walker::{DEFAULT_EXTENSION, ExtensionFilter, PathEntry, WalkOptions, Walker};
