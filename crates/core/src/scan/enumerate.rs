use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::scan::ScanError;

/// Lazy depth-first listing of every regular file under a root directory.
///
/// Yielded paths are absolute: a relative root is resolved against the
/// current directory. Directories whose name is in the exclusion list are
/// never descended into. Entries within a directory are visited in file-name
/// order so the sequence is deterministic for a given filesystem state.
///
/// Symbolic links that resolve to regular files are yielded under the link's
/// own path. Links to directories are not followed.
pub struct FileEnumerator {
    root: PathBuf,
    exclude_dirs: Vec<String>,
    walker: walkdir::IntoIter,
}

impl FileEnumerator {
    pub fn new(root: impl AsRef<Path>, exclude_dirs: &[String]) -> Self {
        let root = absolute_root(root.as_ref());
        let walker = WalkDir::new(&root).follow_links(false).sort_by_file_name().into_iter();
        Self { root, exclude_dirs: exclude_dirs.to_vec(), walker }
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.exclude_dirs.iter().any(|d| d == n))
    }

    fn to_scan_error(&self, err: walkdir::Error) -> ScanError {
        let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
        let source = match err.into_io_error() {
            Some(io) => io,
            None => std::io::Error::other("filesystem loop detected"),
        };
        ScanError::Io { path, source }
    }
}

impl Iterator for FileEnumerator {
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.to_scan_error(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if entry.depth() > 0 && self.is_excluded(entry.file_name()) {
                    tracing::trace!(dir = %entry.path().display(), "skipping excluded directory");
                    self.walker.skip_current_dir();
                }
                continue;
            }
            if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

/// Canonical form of `root`, or an absolute form when it cannot be resolved
/// (e.g. it does not exist, which the walk then reports).
fn absolute_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}
