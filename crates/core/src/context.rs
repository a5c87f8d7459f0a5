use std::path::Path;

use crate::config::{ConfigError, ScanConfig};
use crate::layout::TrackerLayout;

/// Convenience wrapper bundling the resolved layout and scan configuration.
#[derive(Debug, Clone)]
pub struct TrackerContext {
    pub layout: TrackerLayout,
    pub config: ScanConfig,
}

impl TrackerContext {
    /// Build a context from an already-resolved configuration.
    pub fn new(root: impl AsRef<Path>, config: ScanConfig) -> Self {
        let layout = TrackerLayout::with_outputs(root, &config.outputs);
        Self { layout, config }
    }

    /// Load configuration for `root` and compute the layout.
    ///
    /// An explicit `config_path` must exist; otherwise `<root>/.fntrack.yaml`
    /// is used when present and defaults apply when it is not.
    pub fn from_root(
        root: impl AsRef<Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let config = match config_path {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::load_or_default(&TrackerLayout::new(root).config_path)?,
        };
        Ok(Self::new(root, config))
    }
}
