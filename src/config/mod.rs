mod fs;

pub use fs::{ConfigFs, OsFs};

use crate::error::ConfigError;
use crate::models::{ConfigMap, ConfigSource, EffectiveConfig, OverrideMap, merge_config};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Name of the configuration file looked up by discovery
pub const MARKER_FILE: &str = "syntax.json";

/// Upper bound on the number of directories discovery visits
pub const MAX_DISCOVERY_DEPTH: usize = 4096;

/// Result of configuration resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub source: ConfigSource,
    pub config: EffectiveConfig,
}

/// Resolves the effective configuration of a run.
///
/// Three possible inputs, with fixed precedence:
/// 1. An explicit syntax file (`--syntax`). Discovery is skipped.
/// 2. Otherwise, if any plugin override was given, discovery is skipped and
///    there is no file configuration.
/// 3. Otherwise, walk up from the start directory and use the first
///    [`MARKER_FILE`] found. Reaching the filesystem root without one is fine.
///
/// When a file configuration and overrides are both present, overrides win
/// key by key (see [`merge_config`]).
#[derive(Debug, Clone)]
pub struct ConfigResolver<F = OsFs> {
    start_dir: Utf8PathBuf,
    fs: F,
}

impl ConfigResolver<OsFs> {
    /// Create a resolver rooted at `start_dir` (usually the working directory)
    pub fn new<P: AsRef<Utf8Path>>(start_dir: P) -> Self {
        Self::with_fs(start_dir, OsFs)
    }
}

impl<F: ConfigFs> ConfigResolver<F> {
    /// Create a resolver with a custom filesystem capability
    pub fn with_fs<P: AsRef<Utf8Path>>(start_dir: P, fs: F) -> Self {
        Self {
            start_dir: start_dir.as_ref().to_path_buf(),
            fs,
        }
    }

    pub fn start_dir(&self) -> &Utf8Path {
        &self.start_dir
    }

    /// Resolve the effective configuration.
    ///
    /// # Errors
    /// - [`ConfigError::ConfigFileNotFound`] if the selected syntax file cannot be read
    /// - [`ConfigError::InvalidConfigJson`] if it is not a JSON object
    pub fn resolve(
        &self,
        explicit: Option<&Utf8Path>,
        overrides: &OverrideMap,
    ) -> Result<ResolvedConfig, ConfigError> {
        let source = self.select_source(explicit, overrides);

        let file_config = match source.path() {
            Some(path) => {
                tracing::debug!("Syntax from file: {}", path);
                let map = self.load(path)?;
                tracing::debug!("{:?}", map);
                Some(map)
            }
            None => None,
        };

        if !overrides.is_empty() {
            tracing::debug!("Syntax from command: {:?}", overrides);
        }

        let merged_both = file_config.is_some() && !overrides.is_empty();
        let config = merge_config(file_config, overrides);
        if merged_both {
            tracing::debug!("Result of merging command syntax into file syntax: {:?}", config);
        }

        Ok(ResolvedConfig { source, config })
    }

    /// Decide where the file configuration comes from, without reading it
    pub fn select_source(&self, explicit: Option<&Utf8Path>, overrides: &OverrideMap) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(self.start_dir.join(path));
        }

        if !overrides.is_empty() {
            tracing::debug!("Plugin flags given, skipping {} discovery", MARKER_FILE);
            return ConfigSource::None;
        }

        match self.discover() {
            Some(path) => ConfigSource::Discovered(path),
            None => ConfigSource::None,
        }
    }

    /// Walk up from the start directory looking for [`MARKER_FILE`].
    ///
    /// Stops at the first directory that has one, or when a directory has no
    /// parent distinct from itself.
    pub fn discover(&self) -> Option<Utf8PathBuf> {
        let mut dir = self.start_dir.as_path();

        for _ in 0..MAX_DISCOVERY_DEPTH {
            let candidate = dir.join(MARKER_FILE);
            if self.fs.exists(&candidate) {
                tracing::debug!("Discovered {}", candidate);
                return Some(candidate);
            }

            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => return None,
            }
        }

        tracing::warn!(
            "Gave up looking for {} after {} directories above {}",
            MARKER_FILE,
            MAX_DISCOVERY_DEPTH,
            self.start_dir
        );
        None
    }

    fn load(&self, path: &Utf8Path) -> Result<ConfigMap, ConfigError> {
        let data = self
            .fs
            .read_to_string(path)
            .map_err(|source| ConfigError::ConfigFileNotFound {
                path: path.to_path_buf(),
                source,
            })?;

        let invalid = |detail: String| ConfigError::InvalidConfigJson {
            detail,
            path: path.to_path_buf(),
        };

        match serde_json::from_str::<Value>(&data).map_err(|e| invalid(e.to_string()))? {
            Value::Object(object) => Ok(object.into_iter().collect()),
            other => Err(invalid(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
