use anyhow::{bail, Result};
use fntrack_core::config::SnapshotFormat;
use fntrack_core::functionality::{audit_coverage, FunctionalityTracker, TrackerDocument};
use fntrack_core::store::{InventoryWriter, Prior};

use crate::commands::{load_context, print_json, ScanOverrides};

/// Audit that every function carries a functionality ID and that each ID has
/// tests. Fails when anything is missing.
///
/// Reads the function list written by the last tracking pass; the source tree
/// is not rescanned. A names-only list carries no tags and is refused.
pub fn check_command(root: &str, overrides: &ScanOverrides, json: bool) -> Result<()> {
    let ctx = load_context(root, overrides)?;
    if ctx.config.snapshot_format == SnapshotFormat::Names {
        bail!("The function list is written as bare names, which carry no tags to check");
    }

    let snapshot = InventoryWriter::new(&ctx.layout.current_list_path, ctx.config.snapshot_format);
    let inventory = match snapshot.read()? {
        Prior::Found(inventory) => inventory,
        Prior::NotFound => bail!(
            "No function list at {}; run `fntrack track` first",
            snapshot.path().display()
        ),
        Prior::Malformed(reason) => bail!(
            "Function list {} is unreadable ({reason}); run `fntrack track` first",
            snapshot.path().display()
        ),
    };

    let tracker = FunctionalityTracker::from_layout(&ctx.layout);
    let document = match tracker.load()? {
        Prior::Found(document) => document,
        Prior::NotFound => TrackerDocument::new(),
        Prior::Malformed(reason) => {
            bail!("Functionality tracker {} is unreadable: {reason}", tracker.path().display())
        }
    };

    let report = audit_coverage(&inventory, &document);
    if json {
        print_json(&report)?;
    } else {
        if !report.missing_functionality_ids.is_empty() {
            println!("Functions without a functionality ID:");
            for name in &report.missing_functionality_ids {
                println!("  {name}");
            }
        }
        if !report.missing_tests.is_empty() {
            println!("Functions without tests:");
            for name in &report.missing_tests {
                println!("  {name}");
            }
        }
        if report.success {
            println!("All {} named functions are tracked and tested.", inventory.len());
        }
    }

    if !report.success {
        bail!(
            "Coverage check failed: {} without functionality ID, {} without tests",
            report.missing_functionality_ids.len(),
            report.missing_tests.len()
        );
    }
    Ok(())
}
