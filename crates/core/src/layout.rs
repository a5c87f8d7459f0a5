use std::path::{Path, PathBuf};

use crate::config::OutputFiles;

/// File name of the optional per-codebase configuration.
pub const DEFAULT_CONFIG_FILE: &str = ".fntrack.yaml";

/// Logical layout of the persisted tracking artifacts for one codebase.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerLayout {
    /// Root directory of the scanned codebase.
    pub root: PathBuf,
    /// Current inventory snapshot (`currentFunctionsList.json`).
    pub current_list_path: PathBuf,
    /// Append-only change log (`functionsListHistory.json`).
    pub history_path: PathBuf,
    /// Externally maintained functionality tracker (`functionalityTracker.json`).
    pub functionality_tracker_path: PathBuf,
    /// Optional configuration file (`.fntrack.yaml`).
    pub config_path: PathBuf,
}

impl TrackerLayout {
    /// Compute the default layout for a codebase rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_outputs(root, &OutputFiles::default())
    }

    /// Compute a layout using custom artifact file names.
    ///
    /// Relative names are resolved against `root`; absolute names are kept.
    pub fn with_outputs(root: impl AsRef<Path>, outputs: &OutputFiles) -> Self {
        let root = root.as_ref().to_path_buf();
        let current_list_path = root.join(&outputs.current_list);
        let history_path = root.join(&outputs.history);
        let functionality_tracker_path = root.join(&outputs.functionality_tracker);
        let config_path = root.join(DEFAULT_CONFIG_FILE);

        Self { root, current_list_path, history_path, functionality_tracker_path, config_path }
    }

    /// Render `path` relative to the root when it lives underneath it.
    pub fn relative_string(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}
