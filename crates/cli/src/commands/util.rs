use std::path::PathBuf;

use anyhow::{Context, Result};
use fntrack_core::config::{ScanConfig, SnapshotFormat};
use fntrack_core::context::TrackerContext;
use serde::Serialize;

use crate::canonicalize_or_current;

/// Scan settings given on the command line, layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub config: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub no_routes: bool,
    pub strict: bool,
    pub names_only: bool,
}

impl ScanOverrides {
    pub fn apply(&self, config: &mut ScanConfig) {
        for name in &self.exclude {
            config.exclude(name.as_str());
        }
        if self.no_routes {
            config.route_handlers = false;
        }
        if self.strict {
            config.strict_syntax = true;
        }
        if self.names_only {
            config.snapshot_format = SnapshotFormat::Names;
        }
    }

    /// Config from `--config` (which must exist) or defaults, with overrides applied.
    pub fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ScanConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }
}

/// Resolve `root` and load its tracker context with CLI overrides applied.
pub fn load_context(root: &str, overrides: &ScanOverrides) -> Result<TrackerContext> {
    let root_path = canonicalize_or_current(root)?;
    if !root_path.is_dir() {
        anyhow::bail!("Codebase root is not a directory: {}", root_path.display());
    }

    let ctx = TrackerContext::from_root(&root_path, overrides.config.as_deref())
        .with_context(|| format!("Failed to load configuration for {}", root_path.display()))?;
    let mut config = ctx.config;
    overrides.apply(&mut config);
    tracing::debug!(root = %root_path.display(), ?config, "resolved tracker context");
    Ok(TrackerContext::new(&root_path, config))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
