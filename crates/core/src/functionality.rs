//! Links inventory entries to the externally maintained functionality
//! tracker (`functionalityTracker.json`) and audits tracker coverage.
//!
//! The tracker maps a functionality ID to a free-form entry object. This
//! module only ever appends to an entry's `affectedNamedFunctions` array (or
//! creates the entry); it never removes entries or rewrites other fields.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::layout::TrackerLayout;
use crate::model::Inventory;
use crate::store::{load_json, write_json_atomic, Prior, StoreError};

const AFFECTED_FUNCTIONS_KEY: &str = "affectedNamedFunctions";

/// Parsed contents of the functionality tracker.
pub type TrackerDocument = Map<String, Value>;

/// What [`FunctionalityTracker::stitch`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StitchOutcome {
    /// No inventory entry carries a functionality ID.
    NoIds,
    /// Every ID-tagged function was already linked.
    UpToDate,
    /// `linked` function names were appended and the tracker was rewritten.
    Updated { linked: usize },
    /// The tracker exists but is not a JSON object; it was left untouched.
    SkippedMalformed,
}

/// Read/modify/write access to the functionality tracker file.
#[derive(Debug, Clone)]
pub struct FunctionalityTracker {
    path: PathBuf,
}

impl FunctionalityTracker {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn from_layout(layout: &TrackerLayout) -> Self {
        Self::new(&layout.functionality_tracker_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Prior<TrackerDocument>, StoreError> {
        load_json(&self.path)
    }

    /// Ensure every ID-tagged function is listed under its tracker entry.
    ///
    /// A missing tracker is created; a malformed one is never overwritten.
    pub fn stitch(&self, inventory: &Inventory) -> Result<StitchOutcome, StoreError> {
        if !inventory.iter().any(|f| f.functionality_id.is_some()) {
            return Ok(StitchOutcome::NoIds);
        }

        let mut document = match self.load()? {
            Prior::Found(document) => document,
            Prior::NotFound => {
                tracing::info!(path = %self.path.display(), "Creating a new functionality tracker.");
                TrackerDocument::new()
            }
            Prior::Malformed(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Functionality tracker is unreadable; not linking functions."
                );
                return Ok(StitchOutcome::SkippedMalformed);
            }
        };

        let linked = link_functions(&mut document, inventory);
        if linked == 0 {
            return Ok(StitchOutcome::UpToDate);
        }
        write_json_atomic(&self.path, &document)?;
        tracing::info!(linked, "linked functions to functionality tracker");
        Ok(StitchOutcome::Updated { linked })
    }
}

/// Append each ID-tagged function's name to its entry's
/// `affectedNamedFunctions`, creating entries as needed.
///
/// Returns the number of names appended.
pub fn link_functions(document: &mut TrackerDocument, inventory: &Inventory) -> usize {
    let mut linked = 0;
    for function in inventory.iter() {
        let Some(id) = function.functionality_id.as_deref() else {
            continue;
        };

        let entry = document
            .entry(id.to_string())
            .or_insert_with(|| serde_json::json!({ "FunctionalityID": id }));
        let Some(entry) = entry.as_object_mut() else {
            tracing::warn!(functionality_id = id, "tracker entry is not an object; skipping");
            continue;
        };
        let affected = entry
            .entry(AFFECTED_FUNCTIONS_KEY.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(affected) = affected.as_array_mut() else {
            tracing::warn!(
                functionality_id = id,
                "`affectedNamedFunctions` is not an array; skipping"
            );
            continue;
        };

        if !affected.iter().any(|v| v.as_str() == Some(function.name.as_str())) {
            affected.push(Value::String(function.name.clone()));
            linked += 1;
        }
    }
    linked
}

/// Functions lacking a functionality ID or test coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub success: bool,
    #[serde(rename = "missingFunctionalityIDs")]
    pub missing_functionality_ids: Vec<String>,
    #[serde(rename = "missingTests")]
    pub missing_tests: Vec<String>,
}

/// Check that every function has a functionality ID and that each ID has
/// tests, either via the function's own `@tests:` tag or a non-empty `tests`
/// array on its tracker entry.
pub fn audit_coverage(inventory: &Inventory, tracker: &TrackerDocument) -> CoverageReport {
    let mut report = CoverageReport::default();
    for function in inventory.iter() {
        let Some(id) = function.functionality_id.as_deref() else {
            report.missing_functionality_ids.push(function.name.clone());
            continue;
        };
        if function.test_file.is_some() {
            continue;
        }
        let has_tests = tracker
            .get(id)
            .and_then(|entry| entry.get("tests"))
            .and_then(Value::as_array)
            .is_some_and(|tests| !tests.is_empty());
        if !has_tests {
            report.missing_tests.push(function.name.clone());
        }
    }
    report.success = report.missing_functionality_ids.is_empty() && report.missing_tests.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamedFunction;
    use serde_json::json;

    fn tagged(name: &str, id: &str) -> NamedFunction {
        NamedFunction::new(name).with_functionality_id(Some(id.to_string()))
    }

    #[test]
    fn link_creates_entries_and_skips_existing_names() {
        let mut document: TrackerDocument = serde_json::from_value(json!({
            "F1": { "FunctionalityID": "F1", "affectedNamedFunctions": ["login"], "Notes": "keep" }
        }))
        .unwrap();
        let inventory: Inventory =
            vec![tagged("login", "F1"), tagged("logout", "F1"), tagged("signup", "F2")].into();

        assert_eq!(link_functions(&mut document, &inventory), 2);
        assert_eq!(document["F1"]["affectedNamedFunctions"], json!(["login", "logout"]));
        assert_eq!(document["F1"]["Notes"], json!("keep"));
        assert_eq!(
            document["F2"],
            json!({ "FunctionalityID": "F2", "affectedNamedFunctions": ["signup"] })
        );

        assert_eq!(link_functions(&mut document, &inventory), 0);
    }

    #[test]
    fn link_leaves_non_array_values_alone() {
        let mut document: TrackerDocument =
            serde_json::from_value(json!({ "F1": { "affectedNamedFunctions": "oops" } })).unwrap();
        let inventory: Inventory = vec![tagged("a", "F1")].into();
        assert_eq!(link_functions(&mut document, &inventory), 0);
        assert_eq!(document["F1"]["affectedNamedFunctions"], json!("oops"));
    }

    #[test]
    fn audit_flags_missing_ids_and_tests() {
        let tracker: TrackerDocument = serde_json::from_value(json!({
            "F1": { "tests": ["auth.spec.ts"] },
            "F2": { "tests": [] }
        }))
        .unwrap();
        let inventory: Inventory = vec![
            tagged("covered", "F1"),
            tagged("emptyTests", "F2"),
            tagged("unknownId", "F9"),
            tagged("selfTested", "F9").with_test_file(Some("self.spec.ts".into())),
            NamedFunction::new("untagged"),
        ]
        .into();

        let report = audit_coverage(&inventory, &tracker);
        assert!(!report.success);
        assert_eq!(report.missing_functionality_ids, vec!["untagged"]);
        assert_eq!(report.missing_tests, vec!["emptyTests", "unknownId"]);
    }

    #[test]
    fn audit_succeeds_on_full_coverage() {
        let tracker: TrackerDocument =
            serde_json::from_value(json!({ "F1": { "tests": ["a.spec.ts"] } })).unwrap();
        let inventory: Inventory = vec![tagged("a", "F1")].into();
        assert!(audit_coverage(&inventory, &tracker).success);
    }
}
