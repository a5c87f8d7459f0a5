use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::context::TrackerContext;
use crate::functionality::{FunctionalityTracker, StitchOutcome};
use crate::history::{HistoryOutcome, HistoryTracker};
use crate::scan::builder::FailedFile;
use crate::scan::{BuildError, InventoryBuilder};
use crate::store::{InventoryWriter, StoreError};

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one tracking pass.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingSummary {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub failed_files: Vec<FailedFile>,
    pub skipped_nodes: usize,
    pub functions: usize,
    /// Timestamp of the appended change record, if one was written.
    pub recorded_at: Option<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub tracker: StitchOutcome,
}

/// Coordinator for a complete tracking pass over one codebase.
///
/// Order: build the inventory, append history (reads the old snapshot),
/// overwrite the snapshot, then link ID-tagged functions into the
/// functionality tracker.
pub struct TrackingRunner<'a> {
    pub ctx: &'a TrackerContext,
}

impl<'a> TrackingRunner<'a> {
    pub fn new(ctx: &'a TrackerContext) -> Self {
        Self { ctx }
    }

    pub fn run(&self, now: DateTime<Utc>) -> Result<TrackingSummary, TrackingError> {
        let layout = &self.ctx.layout;
        let build = InventoryBuilder::new(&self.ctx.config).build(&layout.root)?;

        let history = HistoryTracker::from_layout(layout).record(&build.inventory, now)?;
        InventoryWriter::new(&layout.current_list_path, self.ctx.config.snapshot_format)
            .write(&build.inventory)?;
        let tracker = FunctionalityTracker::from_layout(layout).stitch(&build.inventory)?;

        tracing::info!("Named functions list and history updated.");

        let (recorded_at, added, removed) = match history {
            HistoryOutcome::Unchanged => (None, Vec::new(), Vec::new()),
            HistoryOutcome::Recorded(record) => (
                Some(record.timestamp),
                record.added.into_iter().map(|f| f.name).collect(),
                record.removed.into_iter().map(|f| f.name).collect(),
            ),
        };

        Ok(TrackingSummary {
            root: layout.root.clone(),
            files_scanned: build.files_scanned,
            failed_files: build.failed_files,
            skipped_nodes: build.diagnostics.len(),
            functions: build.inventory.len(),
            recorded_at,
            added,
            removed,
            tracker,
        })
    }
}
