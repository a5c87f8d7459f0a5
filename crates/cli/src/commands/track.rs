use anyhow::{Context, Result};
use chrono::Utc;
use fntrack_core::functionality::StitchOutcome;
use fntrack_core::layout::TrackerLayout;
use fntrack_core::services::{TrackingRunner, TrackingSummary};

use crate::commands::{load_context, print_json, ScanOverrides};

/// Run a full tracking pass over `root`: rebuild the inventory, append to the
/// history log, rewrite the snapshot and update the functionality tracker.
pub fn track_command(root: &str, overrides: &ScanOverrides, json: bool) -> Result<()> {
    let ctx = load_context(root, overrides)?;
    let summary = TrackingRunner::new(&ctx)
        .run(Utc::now())
        .with_context(|| format!("Tracking failed for {}", ctx.layout.root.display()))?;

    if json {
        print_json(&summary)?;
    } else {
        print_summary(&summary, &ctx.layout);
    }
    Ok(())
}

fn print_summary(summary: &TrackingSummary, layout: &TrackerLayout) {
    println!("Tracked {} named functions under {}", summary.functions, summary.root.display());
    println!("  Files scanned: {}", summary.files_scanned);
    match &summary.recorded_at {
        Some(at) => {
            println!("  Recorded at: {at}");
            println!("  Added ({}):", summary.added.len());
            for name in &summary.added {
                println!("    + {name}");
            }
            println!("  Removed ({}):", summary.removed.len());
            for name in &summary.removed {
                println!("    - {name}");
            }
        }
        None => println!("  No changes since the last run."),
    }
    if summary.skipped_nodes > 0 {
        println!("  Skipped syntax nodes: {}", summary.skipped_nodes);
    }
    if !summary.failed_files.is_empty() {
        println!("  Unparsable files ({}):", summary.failed_files.len());
        for failed in &summary.failed_files {
            println!("    {}: {}", failed.path.display(), failed.reason);
        }
    }
    let tracker = match summary.tracker {
        StitchOutcome::NoIds => "no functionality IDs found".to_string(),
        StitchOutcome::UpToDate => "up to date".to_string(),
        StitchOutcome::Updated { linked } => format!("linked {linked} function(s)"),
        StitchOutcome::SkippedMalformed => "unreadable, left untouched".to_string(),
    };
    println!("  Functionality tracker: {tracker}");
    println!("  Snapshot: {}", layout.relative_string(&layout.current_list_path));
    println!("  History: {}", layout.relative_string(&layout.history_path));
}
