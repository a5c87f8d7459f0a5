//! JSON persistence for the tracking artifacts.
//!
//! Reading distinguishes three outcomes through [`Prior`]: the file was
//! loaded, it does not exist yet, or it exists but could not be decoded.
//! Only genuine I/O failures are errors. Writes replace the target
//! atomically via a temporary file in the same directory.

mod inventory;
mod json;

pub use inventory::InventoryWriter;
pub use json::{load_json, write_json_atomic};

use std::path::PathBuf;

use thiserror::Error;

/// Error type for reading and writing persisted artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode JSON for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of loading a previously persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prior<T> {
    Found(T),
    /// The file does not exist yet (first run).
    NotFound,
    /// The file exists but is not valid JSON of the expected shape.
    Malformed(String),
}
