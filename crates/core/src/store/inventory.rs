use std::path::{Path, PathBuf};

use crate::config::SnapshotFormat;
use crate::model::Inventory;
use crate::store::{load_json, write_json_atomic, Prior, StoreError};

/// Persists the current inventory snapshot, fully replacing the previous one.
#[derive(Debug, Clone)]
pub struct InventoryWriter {
    path: PathBuf,
    format: SnapshotFormat,
}

impl InventoryWriter {
    pub fn new(path: impl AsRef<Path>, format: SnapshotFormat) -> Self {
        Self { path: path.as_ref().to_path_buf(), format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `inventory` as an alphabetically sorted array.
    pub fn write(&self, inventory: &Inventory) -> Result<(), StoreError> {
        match self.format {
            SnapshotFormat::Objects => write_json_atomic(&self.path, &inventory.to_sorted_vec()),
            SnapshotFormat::Names => {
                let names: Vec<&str> = inventory.names().collect();
                write_json_atomic(&self.path, &names)
            }
        }
    }

    /// Read the persisted snapshot in either format.
    pub fn read(&self) -> Result<Prior<Inventory>, StoreError> {
        load_json(&self.path)
    }
}
