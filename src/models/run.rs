use camino::Utf8PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Classification of a per-path failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Stat,
    Readdir,
    ReadFile,
    WriteFile,
    Transform,
}

impl FailureKind {
    /// Prefix used on diagnostic lines
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::Stat => "StatError",
            FailureKind::Readdir => "ReaddirError",
            FailureKind::ReadFile => "ReadFileError",
            FailureKind::WriteFile => "WriteFileError",
            FailureKind::Transform => "TransformFailure",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported per-path failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFailure {
    pub kind: FailureKind,
    pub path: Utf8PathBuf,
    pub message: String,
}

/// Counters collected during a run.
///
/// Not part of the run's success or failure; a run with per-path failures still
/// succeeds.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Directories whose entries were listed
    pub directories: usize,

    /// Files that passed the extension filter
    pub files_matched: usize,

    /// Files written back after transforming
    pub files_transformed: usize,

    /// Of the transformed files, those whose content did not change
    pub files_unchanged: usize,

    /// Files skipped by the extension filter
    pub files_filtered: usize,

    pub failures: Vec<PathFailure>,

    pub duration: Duration,
}

impl RunSummary {
    /// Number of failures of one kind
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One-line summary for the end of a run
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} of {} files transformed",
            self.files_transformed, self.files_matched
        )];

        if self.files_unchanged > 0 {
            parts.push(format!("{} unchanged", self.files_unchanged));
        }
        if self.has_failures() {
            parts.push(format!("{} failures", self.failures.len()));
        }
        parts.push(format!("{} directories", self.directories));

        parts.join(", ")
    }
}

/// Terminal state of a run
#[derive(Debug)]
pub enum RunOutcome {
    Success(RunSummary),
    Failure(ConfigError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success(_) => 0,
            RunOutcome::Failure(_) => 1,
        }
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::Success(summary) => Some(summary),
            RunOutcome::Failure(_) => None,
        }
    }
}
