use camino::Utf8Path;
use std::{fs, io};

/// Filesystem read capability used by the config resolver.
///
/// The resolver only ever asks two questions: does a marker file exist here,
/// and what does this file contain.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigFs: Send + Sync {
    /// Whether `path` is an existing regular file
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Read the whole file as UTF-8 text
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String>;
}

/// [`ConfigFs`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl ConfigFs for OsFs {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
