use anyhow::{bail, Result};
use fntrack_core::history::HistoryTracker;
use fntrack_core::model::ChangeRecord;
use fntrack_core::store::Prior;

use crate::commands::{load_context, print_json, ScanOverrides};

/// Print the change log for `root`, most recent `limit` records when given.
pub fn history_command(
    root: &str,
    overrides: &ScanOverrides,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let ctx = load_context(root, overrides)?;
    let tracker = HistoryTracker::from_layout(&ctx.layout);

    let records = match tracker.read_log()? {
        Prior::Found(records) => records,
        Prior::NotFound => Vec::new(),
        Prior::Malformed(reason) => {
            bail!("History file {} is unreadable: {reason}", tracker.history_path().display())
        }
    };
    let records = tail(&records, limit);

    if json {
        return print_json(records);
    }

    if records.is_empty() {
        println!("No history recorded at {}", tracker.history_path().display());
        return Ok(());
    }
    for record in records {
        println!("{} (+{} / -{})", record.timestamp, record.added.len(), record.removed.len());
        for function in &record.added {
            println!("  + {}", function.name);
        }
        for function in &record.removed {
            println!("  - {}", function.name);
        }
    }
    Ok(())
}

fn tail(records: &[ChangeRecord], limit: Option<usize>) -> &[ChangeRecord] {
    match limit {
        Some(n) if n < records.len() => &records[records.len() - n..],
        _ => records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str) -> ChangeRecord {
        ChangeRecord { timestamp: ts.to_string(), added: Vec::new(), removed: Vec::new() }
    }

    #[test]
    fn tail_keeps_most_recent_records() {
        let records = vec![record("1"), record("2"), record("3")];
        assert_eq!(tail(&records, Some(2)), &records[1..]);
        assert_eq!(tail(&records, Some(10)).len(), 3);
        assert_eq!(tail(&records, None).len(), 3);
        assert!(tail(&records, Some(0)).is_empty());
    }
}
