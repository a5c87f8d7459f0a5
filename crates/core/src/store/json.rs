use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::store::{Prior, StoreError};

/// Load and decode a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Prior<T>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Prior::NotFound),
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            return Ok(Prior::Malformed(err.to_string()))
        }
        Err(source) => return Err(StoreError::Read { path: path.to_path_buf(), source }),
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Prior::Found(value)),
        Err(err) => Ok(Prior::Malformed(err.to_string())),
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Missing parent directories are created.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| StoreError::Encode { path: path.to_path_buf(), source })?;
    let write_err = |source| StoreError::Write { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
