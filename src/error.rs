//! Error types for syntux.
//!
//! Two families, matching how the run treats them:
//! - [`ConfigError`]: fatal. Raised while resolving the effective configuration,
//!   before any traversal starts. The run ends with a single classified message.
//! - [`PathError`]: non-fatal. Raised at one node of the traversal, reported,
//!   and isolated to that path. Siblings and ancestors carry on.
//!
//! [`TransformError`] is what a [`TransformEngine`](crate::services::TransformEngine)
//! returns; the invoker wraps it in [`PathError::Transform`].

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

use crate::models::FailureKind;

/// Fatal configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ConfigFileNotFound: {path}")]
    ConfigFileNotFound {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("InvalidConfigJson: {detail} in {path}")]
    InvalidConfigJson { detail: String, path: Utf8PathBuf },
}

impl ConfigError {
    /// Path of the syntax file that caused the error
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::ConfigFileNotFound { path, .. } | Self::InvalidConfigJson { path, .. } => path,
        }
    }
}

/// Errors a transform engine can report for a single file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("plugin `{plugin}` expects {expected}, found {found}")]
    InvalidOption {
        plugin: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{0}")]
    Engine(String),
}

/// Per-path errors. Reported and counted, never fatal to the run.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("StatError: {path}: {source}")]
    Stat {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ReaddirError: {path}: {source}")]
    Readdir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ReaddirError: {parent}: entry name is not valid UTF-8: {name}")]
    NonUtf8Path { parent: Utf8PathBuf, name: String },

    #[error("ReadFileError: {path}: {source}")]
    ReadFile {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("WriteFileError: {path}: {source}")]
    WriteFile {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TransformFailure: {path}: {source}")]
    Transform {
        path: Utf8PathBuf,
        #[source]
        source: TransformError,
    },
}

impl PathError {
    /// Classified kind used for counting and for the diagnostic prefix
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Stat { .. } => FailureKind::Stat,
            Self::Readdir { .. } | Self::NonUtf8Path { .. } => FailureKind::Readdir,
            Self::ReadFile { .. } => FailureKind::ReadFile,
            Self::WriteFile { .. } => FailureKind::WriteFile,
            Self::Transform { .. } => FailureKind::Transform,
        }
    }

    /// The path the failure is attributed to
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Stat { path, .. }
            | Self::Readdir { path, .. }
            | Self::ReadFile { path, .. }
            | Self::WriteFile { path, .. }
            | Self::Transform { path, .. } => path,
            Self::NonUtf8Path { parent, .. } => parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages_are_classified() {
        let err = ConfigError::ConfigFileNotFound {
            path: Utf8PathBuf::from("/tmp/missing/syntax.json"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "ConfigFileNotFound: /tmp/missing/syntax.json");

        let err = ConfigError::InvalidConfigJson {
            detail: "expected value at line 1 column 1".to_string(),
            path: Utf8PathBuf::from("/repo/syntax.json"),
        };
        assert_eq!(
            err.to_string(),
            "InvalidConfigJson: expected value at line 1 column 1 in /repo/syntax.json"
        );
    }

    #[test]
    fn test_path_error_kind_and_prefix() {
        let err = PathError::Stat {
            path: Utf8PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), FailureKind::Stat);
        assert!(err.to_string().starts_with("StatError: /nope"));

        let err = PathError::NonUtf8Path {
            parent: Utf8PathBuf::from("/src"),
            name: "bad\u{FFFD}.js".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Readdir);
        assert_eq!(err.path(), &Utf8PathBuf::from("/src"));
        assert!(err.to_string().starts_with("ReaddirError: /src"));
    }

    #[test]
    fn test_transform_error_message() {
        let err = PathError::Transform {
            path: Utf8PathBuf::from("/a.js"),
            source: TransformError::InvalidOption {
                plugin: "indent",
                expected: "a number or a string",
                found: "true".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "TransformFailure: /a.js: plugin `indent` expects a number or a string, found true"
        );
    }
}
