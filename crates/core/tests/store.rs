use std::fs;

use fntrack_core::config::SnapshotFormat;
use fntrack_core::model::{Inventory, NamedFunction};
use fntrack_core::store::{load_json, write_json_atomic, InventoryWriter, Prior};
use serde_json::{json, Value};
use tempfile::tempdir;

fn sample() -> Inventory {
    vec![
        NamedFunction::new("zeta"),
        NamedFunction::new("alpha")
            .with_functionality_id(Some("F1".into()))
            .with_test_file(Some("alpha.spec.ts".into())),
    ]
    .into()
}

#[test]
fn writes_sorted_objects_and_reads_them_back() {
    let tmp = tempdir().unwrap();
    let writer = InventoryWriter::new(tmp.path().join("current.json"), SnapshotFormat::Objects);
    writer.write(&sample()).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(writer.path()).unwrap()).unwrap();
    assert_eq!(
        raw,
        json!([
            { "name": "alpha", "testFile": "alpha.spec.ts", "functionalityID": "F1" },
            { "name": "zeta" }
        ])
    );
    assert_eq!(writer.read().unwrap(), Prior::Found(sample()));
}

#[test]
fn names_format_writes_bare_strings() {
    let tmp = tempdir().unwrap();
    let writer = InventoryWriter::new(tmp.path().join("current.json"), SnapshotFormat::Names);
    writer.write(&sample()).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(writer.path()).unwrap()).unwrap();
    assert_eq!(raw, json!(["alpha", "zeta"]));

    let Prior::Found(read) = writer.read().unwrap() else {
        panic!("snapshot should load");
    };
    assert_eq!(read.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
}

#[test]
fn atomic_write_creates_parent_directories_and_replaces_content() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested/dir/out.json");
    write_json_atomic(&path, &json!({ "v": 1 })).unwrap();
    write_json_atomic(&path, &json!({ "v": 2 })).unwrap();

    let loaded: Prior<Value> = load_json(&path).unwrap();
    assert_eq!(loaded, Prior::Found(json!({ "v": 2 })));
    let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn load_distinguishes_missing_and_malformed() {
    let tmp = tempdir().unwrap();
    let missing: Prior<Value> = load_json(&tmp.path().join("absent.json")).unwrap();
    assert_eq!(missing, Prior::NotFound);

    let broken = tmp.path().join("broken.json");
    fs::write(&broken, "[1, 2").unwrap();
    let malformed: Prior<Vec<u32>> = load_json(&broken).unwrap();
    assert!(matches!(malformed, Prior::Malformed(_)));
}
