use std::fs;

use chrono::{TimeZone, Utc};
use fntrack_core::history::{HistoryOutcome, HistoryTracker};
use fntrack_core::model::{ChangeRecord, Inventory, NamedFunction};
use fntrack_core::store::{load_json, Prior};
use tempfile::tempdir;

fn inventory(names: &[&str]) -> Inventory {
    names.iter().map(|n| NamedFunction::new(*n)).collect()
}

fn names(functions: &[NamedFunction]) -> Vec<&str> {
    functions.iter().map(|f| f.name.as_str()).collect()
}

fn read_log(tracker: &HistoryTracker) -> Vec<ChangeRecord> {
    match tracker.read_log().unwrap() {
        Prior::Found(records) => records,
        other => panic!("expected a history log, got {other:?}"),
    }
}

#[test]
fn records_added_and_removed_names() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("currentFunctionsList.json");
    let history = tmp.path().join("functionsListHistory.json");
    fs::write(&current, r#"[{"name":"a"},{"name":"b"}]"#).unwrap();

    let tracker = HistoryTracker::new(&current, &history);
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let outcome = tracker.record(&inventory(&["b", "c"]), now).unwrap();

    let HistoryOutcome::Recorded(record) = outcome else {
        panic!("expected a record");
    };
    assert_eq!(record.timestamp, "2024-01-02T03:04:05.000Z");
    assert_eq!(names(&record.added), vec!["c"]);
    assert_eq!(names(&record.removed), vec!["a"]);
    assert_eq!(read_log(&tracker), vec![record]);
}

#[test]
fn unchanged_inventory_writes_nothing() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("current.json");
    let history = tmp.path().join("history.json");
    fs::write(&current, r#"["a", "b"]"#).unwrap();

    let tracker = HistoryTracker::new(&current, &history);
    let outcome = tracker.record(&inventory(&["a", "b"]), Utc::now()).unwrap();
    assert_eq!(outcome, HistoryOutcome::Unchanged);
    assert!(!history.exists());
}

#[test]
fn metadata_changes_alone_are_not_recorded() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("current.json");
    let history = tmp.path().join("history.json");
    fs::write(&current, r#"[{"name":"a","functionalityID":"OLD"}]"#).unwrap();

    let tagged: Inventory =
        vec![NamedFunction::new("a").with_functionality_id(Some("NEW".into()))].into();
    let tracker = HistoryTracker::new(&current, &history);
    assert_eq!(tracker.record(&tagged, Utc::now()).unwrap(), HistoryOutcome::Unchanged);
}

#[test]
fn first_run_records_everything_as_added() {
    let tmp = tempdir().unwrap();
    let tracker =
        HistoryTracker::new(tmp.path().join("current.json"), tmp.path().join("history.json"));

    let HistoryOutcome::Recorded(record) =
        tracker.record(&inventory(&["x", "y"]), Utc::now()).unwrap()
    else {
        panic!("expected a record");
    };
    assert_eq!(names(&record.added), vec!["x", "y"]);
    assert!(record.removed.is_empty());
}

#[test]
fn appends_to_existing_log() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("current.json");
    let history = tmp.path().join("history.json");
    fs::write(&current, r#"["a"]"#).unwrap();
    fs::write(
        &history,
        r#"[{"timestamp":"2023-12-31T00:00:00.000Z","added":[{"name":"a"}],"removed":[]}]"#,
    )
    .unwrap();

    let tracker = HistoryTracker::new(&current, &history);
    tracker.record(&inventory(&["a", "b"]), Utc::now()).unwrap();

    let log = read_log(&tracker);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].timestamp, "2023-12-31T00:00:00.000Z");
    assert_eq!(names(&log[1].added), vec!["b"]);
}

#[test]
fn malformed_artifacts_are_treated_as_empty() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("current.json");
    let history = tmp.path().join("history.json");
    fs::write(&current, "not json at all").unwrap();
    fs::write(&history, "{ \"truncated\": ").unwrap();

    let tracker = HistoryTracker::new(&current, &history);
    let HistoryOutcome::Recorded(record) = tracker.record(&inventory(&["a"]), Utc::now()).unwrap()
    else {
        panic!("expected a record");
    };
    assert_eq!(names(&record.added), vec!["a"]);

    let log: Prior<Vec<ChangeRecord>> = load_json(&history).unwrap();
    assert_eq!(log, Prior::Found(vec![record]));
}

#[test]
fn foreign_shaped_entries_survive_an_append() {
    let tmp = tempdir().unwrap();
    let current = tmp.path().join("current.json");
    let history = tmp.path().join("history.json");
    fs::write(&current, r#"["a"]"#).unwrap();
    fs::write(
        &history,
        r#"[
            {"timestamp":"2023-12-31T00:00:00.000Z","added":[{"name":"a"}],"removed":[]},
            {"timestamp":1700000000,"added":["z"],"removed":[]}
        ]"#,
    )
    .unwrap();

    let tracker = HistoryTracker::new(&current, &history);
    tracker.record(&inventory(&["a", "b"]), Utc::now()).unwrap();

    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&history).unwrap()).unwrap();
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0]["timestamp"], serde_json::json!("2023-12-31T00:00:00.000Z"));
    assert_eq!(raw[1], serde_json::json!({"timestamp":1700000000,"added":["z"],"removed":[]}));
    assert_eq!(raw[2]["added"], serde_json::json!([{ "name": "b" }]));

    let typed = read_log(&tracker);
    assert_eq!(typed.len(), 2);
    assert_eq!(names(&typed[1].added), vec!["b"]);
}

#[test]
fn non_array_log_is_replaced() {
    let tmp = tempdir().unwrap();
    let history = tmp.path().join("history.json");
    fs::write(&history, r#"{"not": "an array"}"#).unwrap();

    let tracker = HistoryTracker::new(tmp.path().join("current.json"), &history);
    tracker.record(&inventory(&["a"]), Utc::now()).unwrap();
    assert_eq!(read_log(&tracker).len(), 1);
}
