// Run metrics
//
// Counters and the per-path failure log of a single run. Shared by every
// in-flight walker and invoker task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::error::PathError;
use crate::models::{PathFailure, RunSummary};

/// Per-run metrics
///
/// Uses atomic operations for the counters. The failure log sits behind a
/// mutex; each failure is appended and logged as one message.
#[derive(Debug)]
pub struct Metrics {
    /// Directories whose listing succeeded
    pub directories: AtomicUsize,

    /// Files that passed the extension filter
    pub files_matched: AtomicUsize,

    /// Files written back
    pub files_transformed: AtomicUsize,

    /// Written-back files whose content did not change
    pub files_unchanged: AtomicUsize,

    /// Files skipped by the extension filter
    pub files_filtered: AtomicUsize,

    failures: Mutex<Vec<PathFailure>>,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            directories: AtomicUsize::new(0),
            files_matched: AtomicUsize::new(0),
            files_transformed: AtomicUsize::new(0),
            files_unchanged: AtomicUsize::new(0),
            files_filtered: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
            start_time: Instant::now(),
        }
    }

    pub fn record_directory(&self) {
        self.directories.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_matched(&self) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.files_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a file written back; `changed` is false when the transform was a no-op
    pub fn record_transformed(&self, changed: bool) {
        self.files_transformed.fetch_add(1, Ordering::Relaxed);
        if !changed {
            self.files_unchanged.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Report a per-path failure on the diagnostic stream and keep it for the summary
    pub fn record_failure(&self, err: &PathError) {
        let failure = PathFailure {
            kind: err.kind(),
            path: err.path().clone(),
            message: err.to_string(),
        };

        tracing::error!(kind = %failure.kind, path = %failure.path, "{}", failure.message);

        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }

    /// Number of failures recorded so far
    pub fn failure_count(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Snapshot of the counters
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            directories: self.directories.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_transformed: self.files_transformed.load(Ordering::Relaxed),
            files_unchanged: self.files_unchanged.load(Ordering::Relaxed),
            files_filtered: self.files_filtered.load(Ordering::Relaxed),
            failures: self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            duration: self.start_time.elapsed(),
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        let summary = self.summary();
        tracing::info!(
            "Run finished in {:.2}s: {}",
            summary.duration.as_secs_f64(),
            summary.summary()
        );
        tracing::debug!("{} files skipped by the extension filter", summary.files_filtered);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
