//! Run driver.
//!
//! Resolves the configuration once, then walks every root path and waits for
//! the last file to be written. A configuration error ends the run before any
//! path is touched.

use camino::Utf8PathBuf;
use std::sync::Arc;

use crate::config::{ConfigResolver, ResolvedConfig};
use crate::error::ConfigError;
use crate::metrics::Metrics;
use crate::models::{OverrideMap, RunOutcome};
use crate::services::{
    BuiltinEngine, ExtensionFilter, TransformEngine, TransformInvoker, WalkOptions, Walker,
};
use crate::tracker::CompletionTracker;

/// Inputs of one run, as collected by the command line layer
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working directory. Relative paths are resolved against it and config
    /// discovery starts here.
    pub cwd: Utf8PathBuf,

    /// Files or directories to rewrite. Empty means `cwd`.
    pub paths: Vec<Utf8PathBuf>,

    /// Explicit syntax file
    pub syntax_file: Option<Utf8PathBuf>,

    /// Plugin values given as flags
    pub overrides: OverrideMap,

    pub walk: WalkOptions,
}

impl RunOptions {
    pub fn new<P: Into<Utf8PathBuf>>(cwd: P) -> Self {
        Self {
            cwd: cwd.into(),
            paths: Vec::new(),
            syntax_file: None,
            overrides: OverrideMap::new(),
            walk: WalkOptions::default(),
        }
    }

    /// Absolute root paths of the walk
    pub fn roots(&self) -> Vec<Utf8PathBuf> {
        if self.paths.is_empty() {
            return vec![self.cwd.clone()];
        }
        self.paths.iter().map(|path| self.cwd.join(path)).collect()
    }
}

pub struct Runner {
    options: RunOptions,
    engine: Arc<dyn TransformEngine>,
}

impl Runner {
    /// Runner using the [`BuiltinEngine`]
    pub fn new(options: RunOptions) -> Self {
        Self::with_engine(options, Arc::new(BuiltinEngine::new()))
    }

    pub fn with_engine(options: RunOptions, engine: Arc<dyn TransformEngine>) -> Self {
        Self { options, engine }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Resolve the effective configuration for this run
    pub fn resolve_config(&self) -> Result<ResolvedConfig, ConfigError> {
        ConfigResolver::new(&self.options.cwd)
            .resolve(self.options.syntax_file.as_deref(), &self.options.overrides)
    }

    /// Execute the run.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn execute(&self) -> RunOutcome {
        let resolved = match self.resolve_config() {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!("{}", err);
                return RunOutcome::Failure(err);
            }
        };

        let roots = self.options.roots();
        tracing::debug!("Looking for files in: {:?}", roots);

        let tracker = CompletionTracker::new();
        let metrics = Arc::new(Metrics::new());
        let invoker = TransformInvoker::new(
            tracker.clone(),
            Arc::clone(&self.engine),
            Arc::new(resolved.config),
            Arc::clone(&metrics),
        );
        let walker = Walker::new(
            tracker,
            ExtensionFilter::from(&self.options.walk),
            invoker,
            Arc::clone(&metrics),
        );

        walker.run(roots).await;

        metrics.log_summary();
        tracing::debug!("Ending without error");
        RunOutcome::Success(metrics.summary())
    }
}
