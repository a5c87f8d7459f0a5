//! Source-tree scanning: file enumeration, function extraction, and
//! inventory building.

pub mod builder;
pub mod enumerate;
pub mod extract;
pub mod tags;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub use builder::{BuildError, BuildOutput, InventoryBuilder};
pub use enumerate::FileEnumerator;
pub use extract::{Extraction, FunctionExtractor};

/// Error type for scanning a single path.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory could not be listed, or a file could not be statted or read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed as a whole.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl ScanError {
    /// Path the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::Io { path, .. } | ScanError::Parse { path, .. } => path,
        }
    }
}

/// A syntax node that was skipped during extraction, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    /// 1-based line of the skipped node.
    pub line: usize,
    /// 1-based column of the skipped node.
    pub column: usize,
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.path.display(), self.line, self.column, self.reason)
    }
}
