use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;

use super::engine::TransformEngine;
use crate::error::PathError;
use crate::metrics::Metrics;
use crate::models::EffectiveConfig;
use crate::tracker::CompletionTracker;

/// Reads a file, runs the transform engine over it, and writes the result back.
///
/// The write replaces the original content directly: no backup, no temporary
/// file and rename. Failures at any step are reported for that path only.
#[derive(Clone)]
pub struct TransformInvoker {
    tracker: CompletionTracker,
    engine: Arc<dyn TransformEngine>,
    config: Arc<EffectiveConfig>,
    metrics: Arc<Metrics>,
}

impl TransformInvoker {
    pub fn new(
        tracker: CompletionTracker,
        engine: Arc<dyn TransformEngine>,
        config: Arc<EffectiveConfig>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            tracker,
            engine,
            config,
            metrics,
        }
    }

    /// Register and schedule the rewrite of `path`.
    ///
    /// Must be called from within a Tokio runtime. The registration happens
    /// before this returns, so a caller that is itself tracked can complete
    /// right after.
    pub fn apply(&self, path: Utf8PathBuf) {
        let pending = self.tracker.register();
        let invoker = self.clone();

        tokio::spawn(async move {
            if let Err(err) = invoker.rewrite(&path).await {
                invoker.metrics.record_failure(&err);
            }
            pending.complete();
        });
    }

    /// Rewrite one file in place.
    ///
    /// # Returns
    /// Whether the content changed. Unchanged content is still written back.
    pub async fn rewrite(&self, path: &Utf8Path) -> Result<bool, PathError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PathError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Transforming: {}", path);

        let transformed = self
            .engine
            .transform(&source, &self.config)
            .map_err(|source| PathError::Transform {
                path: path.to_path_buf(),
                source,
            })?;
        let changed = transformed != source;

        tokio::fs::write(path, transformed)
            .await
            .map_err(|source| PathError::WriteFile {
                path: path.to_path_buf(),
                source,
            })?;

        self.metrics.record_transformed(changed);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::models::FailureKind;
    use std::fs;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, root)
    }

    fn invoker(engine: Arc<dyn TransformEngine>) -> (TransformInvoker, CompletionTracker, Arc<Metrics>) {
        let tracker = CompletionTracker::new();
        let metrics = Arc::new(Metrics::new());
        let invoker = TransformInvoker::new(
            tracker.clone(),
            engine,
            Arc::new(EffectiveConfig::default()),
            Arc::clone(&metrics),
        );
        (invoker, tracker, metrics)
    }

    fn upper() -> Arc<dyn TransformEngine> {
        Arc::new(|source: &str, _: &EffectiveConfig| Ok::<_, TransformError>(source.to_uppercase()))
    }

    #[tokio::test]
    async fn test_rewrite_replaces_content() {
        let (_temp_dir, root) = temp_root();
        let file = root.join("a.js");
        fs::write(&file, "var a;").unwrap();

        let (invoker, _, metrics) = invoker(upper());
        assert!(invoker.rewrite(&file).await.unwrap());

        assert_eq!(fs::read_to_string(&file).unwrap(), "VAR A;");
        assert_eq!(metrics.summary().files_transformed, 1);
    }

    #[tokio::test]
    async fn test_unchanged_content_is_counted() {
        let (_temp_dir, root) = temp_root();
        let file = root.join("a.js");
        fs::write(&file, "ALREADY;").unwrap();

        let (invoker, _, metrics) = invoker(upper());
        assert!(!invoker.rewrite(&file).await.unwrap());
        assert_eq!(metrics.summary().files_unchanged, 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let (_temp_dir, root) = temp_root();
        let (invoker, tracker, metrics) = invoker(upper());

        invoker.apply(root.join("missing.js"));
        tracker.drained().await;

        let summary = metrics.summary();
        assert_eq!(summary.failures_of(FailureKind::ReadFile), 1);
        assert_eq!(summary.files_transformed, 0);
    }

    #[tokio::test]
    async fn test_transform_failure_leaves_file_untouched() {
        let (_temp_dir, root) = temp_root();
        let file = root.join("a.js");
        fs::write(&file, "keep me").unwrap();

        let failing: Arc<dyn TransformEngine> = Arc::new(|_: &str, _: &EffectiveConfig| {
            Err::<String, _>(TransformError::Engine("parse error".to_string()))
        });
        let (invoker, tracker, metrics) = invoker(failing);

        invoker.apply(file.clone());
        tracker.drained().await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");
        assert_eq!(metrics.summary().failures_of(FailureKind::Transform), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_content_is_a_read_failure() {
        let (_temp_dir, root) = temp_root();
        let file = root.join("binary.js");
        fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

        let (invoker, _, _) = invoker(upper());
        let err = invoker.rewrite(&file).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::ReadFile);
        assert_eq!(fs::read(&file).unwrap(), vec![0xff, 0xfe, 0x00]);
    }

    #[tokio::test]
    async fn test_write_failure_is_isolated() {
        let (_temp_dir, root) = temp_root();
        let doomed_dir = root.join("doomed");
        fs::create_dir(&doomed_dir).unwrap();
        fs::write(doomed_dir.join("a.js"), "doomed").unwrap();
        fs::write(root.join("b.js"), "b").unwrap();
        fs::write(root.join("c.js"), "c").unwrap();

        // The parent disappears between read and write.
        let dir = doomed_dir.clone();
        let engine: Arc<dyn TransformEngine> = Arc::new(move |source: &str, _: &EffectiveConfig| {
            if source == "doomed" {
                fs::remove_dir_all(&dir).unwrap();
            }
            Ok::<_, TransformError>(source.to_uppercase())
        });
        let (invoker, tracker, metrics) = invoker(engine);

        invoker.apply(doomed_dir.join("a.js"));
        invoker.apply(root.join("b.js"));
        invoker.apply(root.join("c.js"));
        tracker.drained().await;

        let summary = metrics.summary();
        assert_eq!(summary.failures_of(FailureKind::WriteFile), 1);
        assert_eq!(summary.failures[0].path, doomed_dir.join("a.js"));
        assert_eq!(summary.files_transformed, 2);
        assert_eq!(fs::read_to_string(root.join("b.js")).unwrap(), "B");
        assert_eq!(fs::read_to_string(root.join("c.js")).unwrap(), "C");
    }
}
