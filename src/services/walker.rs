use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsString;
use std::fs::Metadata;
use std::io;
use std::sync::Arc;

use super::transform::TransformInvoker;
use crate::error::PathError;
use crate::metrics::Metrics;
use crate::tracker::CompletionTracker;

/// Extension transformed when none is configured
pub const DEFAULT_EXTENSION: &str = "js";

/// Traversal options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// File extension to transform, without the leading dot
    pub extension: String,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Decides which files are handed to the transform invoker.
///
/// Matches on the file name's suffix, so a file named just `.js` matches too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Dot plus extension, e.g. `.js`
    suffix: String,
}

impl ExtensionFilter {
    /// `extension` may be given with or without its leading dot
    pub fn new(extension: &str) -> Self {
        Self {
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    pub fn matches(&self, path: &Utf8Path) -> bool {
        path.file_name().is_some_and(|name| name.ends_with(self.suffix.as_str()))
    }
}

impl From<&WalkOptions> for ExtensionFilter {
    fn from(options: &WalkOptions) -> Self {
        Self::new(&options.extension)
    }
}

/// A visited path after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    Directory(Utf8PathBuf),

    /// A regular file that passed the extension filter
    File(Utf8PathBuf),

    /// Anything else: files with another extension, sockets, FIFOs, devices
    Filtered(Utf8PathBuf),
}

impl PathEntry {
    pub fn classify(path: Utf8PathBuf, metadata: &Metadata, filter: &ExtensionFilter) -> Self {
        if metadata.is_dir() {
            PathEntry::Directory(path)
        } else if metadata.is_file() && filter.matches(&path) {
            PathEntry::File(path)
        } else {
            PathEntry::Filtered(path)
        }
    }
}

/// Recursive, non-blocking directory walker.
///
/// Every stat and every listing is a separate task bracketed by a
/// [`Pending`](crate::tracker::Pending) guard. A listing registers all of its
/// children before its own guard completes, so the tracker cannot drain while
/// part of the tree is still undiscovered.
#[derive(Clone)]
pub struct Walker {
    tracker: CompletionTracker,
    filter: Arc<ExtensionFilter>,
    invoker: TransformInvoker,
    metrics: Arc<Metrics>,
}

impl Walker {
    pub fn new(
        tracker: CompletionTracker,
        filter: ExtensionFilter,
        invoker: TransformInvoker,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            tracker,
            filter: Arc::new(filter),
            invoker,
            metrics,
        }
    }

    /// Visit every root and wait until all resulting work has finished.
    ///
    /// Per-path failures are recorded in the metrics; they never end the walk.
    pub async fn run<I>(&self, roots: I)
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        // Roots are siblings discovered by the caller: hold one unit open until
        // all of them are registered.
        let seeding = self.tracker.register();
        for root in roots {
            self.visit(root);
        }
        seeding.complete();

        self.tracker.drained().await;
    }

    /// Register and schedule the classification of `path`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn visit(&self, path: Utf8PathBuf) {
        let pending = self.tracker.register();
        let walker = self.clone();

        tokio::spawn(async move {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => walker.dispatch(PathEntry::classify(path, &metadata, &walker.filter)),
                Err(source) => walker.metrics.record_failure(&PathError::Stat { path, source }),
            }
            pending.complete();
        });
    }

    fn dispatch(&self, entry: PathEntry) {
        match entry {
            PathEntry::Directory(path) => self.read_directory(path),
            PathEntry::File(path) => {
                self.metrics.record_matched();
                self.invoker.apply(path);
            }
            PathEntry::Filtered(path) => {
                tracing::trace!("Skipping {}", path);
                self.metrics.record_filtered();
            }
        }
    }

    fn read_directory(&self, path: Utf8PathBuf) {
        let pending = self.tracker.register();
        let walker = self.clone();

        tokio::spawn(async move {
            match list_directory(&path).await {
                Ok(names) => {
                    walker.metrics.record_directory();
                    for name in names {
                        match name.into_string() {
                            Ok(name) => walker.visit(path.join(name)),
                            Err(name) => walker.metrics.record_failure(&PathError::NonUtf8Path {
                                parent: path.clone(),
                                name: name.to_string_lossy().into_owned(),
                            }),
                        }
                    }
                }
                Err(source) => walker.metrics.record_failure(&PathError::Readdir { path, source }),
            }
            pending.complete();
        });
    }
}

/// All entry names of a directory, or nothing if any part of the listing fails
async fn list_directory(path: &Utf8Path) -> io::Result<Vec<OsString>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}
