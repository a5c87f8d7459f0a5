use std::fs;

use fntrack::canonicalize_or_current;
use tempfile::tempdir;

// Both cases change the process cwd, so they run in one test to avoid racing.
#[test]
fn canonicalize_or_current_resolves_relative_paths() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let dot = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    assert_eq!(dot, tmp.path().canonicalize().expect("canon tmp"));

    let nested = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(nested, subdir.canonicalize().expect("canonicalize subdir"));

    let missing = canonicalize_or_current("not-there").expect("fallback");
    assert!(missing.is_absolute());
    assert!(missing.ends_with("not-there"));

    std::env::set_current_dir(original).expect("restore cwd");
}
