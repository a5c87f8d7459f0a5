//! Scan configuration.
//!
//! A [`ScanConfig`] is built once by the entry point (defaults, optionally
//! overlaid by a `.fntrack.yaml`/JSON file and CLI flags) and then passed to
//! every component explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// How the current inventory snapshot is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFormat {
    /// Array of `{"name", "testFile"?, "functionalityID"?}` objects.
    #[default]
    Objects,
    /// Array of bare name strings.
    Names,
}

/// File names of the persisted artifacts, relative to the codebase root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub current_list: String,
    pub history: String,
    pub functionality_tracker: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            current_list: "currentFunctionsList.json".to_string(),
            history: "functionsListHistory.json".to_string(),
            functionality_tracker: "functionalityTracker.json".to_string(),
        }
    }
}

/// Settings for one tracking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,
    /// File extensions (without the dot) treated as source code.
    pub extensions: Vec<String>,
    /// Recognize `router.get("/path", handler)` style route registrations.
    pub route_handlers: bool,
    /// Object names treated as web routers.
    pub router_objects: Vec<String>,
    /// Fail a whole file on any syntax error instead of skipping bad nodes.
    pub strict_syntax: bool,
    pub snapshot_format: SnapshotFormat,
    pub outputs: OutputFiles,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: vec!["node_modules".to_string(), ".git".to_string()],
            extensions: ["js", "jsx", "mjs", "cjs", "ts", "tsx"].map(String::from).to_vec(),
            route_handlers: true,
            router_objects: vec!["app".to_string(), "router".to_string()],
            strict_syntax: false,
            snapshot_format: SnapshotFormat::Objects,
            outputs: OutputFiles::default(),
        }
    }
}

impl ScanConfig {
    /// Load a config file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let parsed = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        };
        parsed.map_err(|reason| ConfigError::Parse { path: path.to_path_buf(), reason })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Add a directory name to the exclusion list unless already present.
    pub fn exclude(&mut self, dir_name: impl Into<String>) {
        let dir_name = dir_name.into();
        if !self.exclude_dirs.contains(&dir_name) {
            self.exclude_dirs.push(dir_name);
        }
    }

    pub fn is_excluded_dir(&self, dir_name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == dir_name)
    }

    /// Whether `path` carries one of the configured source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_vendor_directories() {
        let config = ScanConfig::default();
        assert!(config.is_excluded_dir("node_modules"));
        assert!(!config.is_excluded_dir("src"));
        assert!(config.route_handlers);
        assert_eq!(config.snapshot_format, SnapshotFormat::Objects);
    }

    #[test]
    fn source_file_detection_uses_extensions() {
        let config = ScanConfig::default();
        assert!(config.is_source_file(Path::new("src/a.ts")));
        assert!(config.is_source_file(Path::new("src/App.TSX")));
        assert!(!config.is_source_file(Path::new("src/a.json")));
        assert!(!config.is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let config: ScanConfig = serde_yaml::from_str("exclude_dirs: [vendor]\n").unwrap();
        assert_eq!(config.exclude_dirs, vec!["vendor".to_string()]);
        assert_eq!(config.router_objects, vec!["app".to_string(), "router".to_string()]);
        assert_eq!(config.outputs, OutputFiles::default());
    }

    #[test]
    fn exclude_does_not_duplicate() {
        let mut config = ScanConfig::default();
        config.exclude("node_modules");
        config.exclude("dist");
        assert_eq!(config.exclude_dirs, vec!["node_modules", ".git", "dist"]);
    }
}
