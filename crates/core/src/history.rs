//! Change history: diff a fresh inventory against the persisted snapshot and
//! append a timestamped record to the history log.
//!
//! Nothing here locks the files. Two concurrent runs against the same paths
//! can interleave and lose an update.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::layout::TrackerLayout;
use crate::model::{ChangeRecord, Inventory, InventoryDiff};
use crate::store::{load_json, write_json_atomic, Prior, StoreError};

/// What [`HistoryTracker::record`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// The inventory matches the previous snapshot; nothing was written.
    Unchanged,
    /// A record was appended to the log.
    Recorded(ChangeRecord),
}

/// Reads the previous snapshot and appends change records to the history log.
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    current_list_path: PathBuf,
    history_path: PathBuf,
}

impl HistoryTracker {
    pub fn new(current_list_path: impl AsRef<Path>, history_path: impl AsRef<Path>) -> Self {
        Self {
            current_list_path: current_list_path.as_ref().to_path_buf(),
            history_path: history_path.as_ref().to_path_buf(),
        }
    }

    pub fn from_layout(layout: &TrackerLayout) -> Self {
        Self::new(&layout.current_list_path, &layout.history_path)
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// The previous inventory, or an empty one on first run or when the
    /// snapshot cannot be decoded.
    pub fn load_previous(&self) -> Result<Inventory, StoreError> {
        match load_json::<Inventory>(&self.current_list_path)? {
            Prior::Found(inventory) => Ok(inventory),
            Prior::NotFound => {
                tracing::info!("No previous functions list found. Assuming this is the first run.");
                Ok(Inventory::new())
            }
            Prior::Malformed(reason) => {
                tracing::warn!(
                    path = %self.current_list_path.display(),
                    %reason,
                    "Previous functions list is unreadable; treating it as empty."
                );
                Ok(Inventory::new())
            }
        }
    }

    /// Load the history log as raw JSON entries.
    ///
    /// Entries are kept as written so that records in another shape survive
    /// an append untouched.
    pub fn read_raw_log(&self) -> Result<Prior<Vec<Value>>, StoreError> {
        load_json(&self.history_path)
    }

    /// Load the history log, skipping entries that are not change records.
    pub fn read_log(&self) -> Result<Prior<Vec<ChangeRecord>>, StoreError> {
        let entries = match self.read_raw_log()? {
            Prior::Found(entries) => entries,
            Prior::NotFound => return Ok(Prior::NotFound),
            Prior::Malformed(reason) => return Ok(Prior::Malformed(reason)),
        };
        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::debug!(index, error = %err, "history entry is not a change record");
                    None
                }
            })
            .collect();
        Ok(Prior::Found(records))
    }

    /// Diff `current` against the previous snapshot and append a record if
    /// anything was added or removed.
    ///
    /// Existing entries are never rewritten or dropped, whatever their shape.
    /// Only a log that is not a JSON array is replaced.
    pub fn record(
        &self,
        current: &Inventory,
        now: DateTime<Utc>,
    ) -> Result<HistoryOutcome, StoreError> {
        let previous = self.load_previous()?;
        let diff = InventoryDiff::between(&previous, current);
        if diff.is_empty() {
            tracing::info!("No changes in named functions detected.");
            return Ok(HistoryOutcome::Unchanged);
        }

        let record = ChangeRecord {
            timestamp: format_timestamp(now),
            added: diff.added,
            removed: diff.removed,
        };

        let mut history = match self.read_raw_log()? {
            Prior::Found(history) => history,
            Prior::NotFound => {
                tracing::info!("Creating a new history file.");
                Vec::new()
            }
            Prior::Malformed(reason) => {
                tracing::warn!(
                    path = %self.history_path.display(),
                    %reason,
                    "History file is not a JSON array; starting a new one."
                );
                Vec::new()
            }
        };

        tracing::info!(
            added = record.added.len(),
            removed = record.removed.len(),
            "recording function changes"
        );
        let entry = serde_json::to_value(&record).map_err(|source| StoreError::Encode {
            path: self.history_path.clone(),
            source,
        })?;
        history.push(entry);
        write_json_atomic(&self.history_path, &history)?;
        Ok(HistoryOutcome::Recorded(record))
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
