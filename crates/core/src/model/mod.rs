//! Core data model: named functions, inventories, and change records.
//!
//! Identity is by `name` only. Two functions with the same name in different
//! files collapse into one inventory entry; no scoping or namespace
//! disambiguation is attempted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A detected function-like declaration.
///
/// Serializes as `{"name", "testFile"?, "functionalityID"?}`. Deserializes
/// from that object form or from a bare name string, which is how the
/// name-only snapshot variant stores entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NamedFunctionRepr")]
pub struct NamedFunction {
    pub name: String,
    /// Path of an associated test file, mined from an `@tests:` comment tag.
    #[serde(rename = "testFile", default, skip_serializing_if = "Option::is_none")]
    pub test_file: Option<String>,
    /// External tracking identifier, mined from an `@functionalityID:` tag.
    #[serde(rename = "functionalityID", default, skip_serializing_if = "Option::is_none")]
    pub functionality_id: Option<String>,
}

impl NamedFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), test_file: None, functionality_id: None }
    }

    pub fn with_test_file(mut self, test_file: Option<String>) -> Self {
        self.test_file = test_file;
        self
    }

    pub fn with_functionality_id(mut self, functionality_id: Option<String>) -> Self {
        self.functionality_id = functionality_id;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NamedFunctionRepr {
    Name(String),
    Full {
        name: String,
        #[serde(rename = "testFile", default)]
        test_file: Option<String>,
        #[serde(rename = "functionalityID", default)]
        functionality_id: Option<String>,
    },
}

impl From<NamedFunctionRepr> for NamedFunction {
    fn from(repr: NamedFunctionRepr) -> Self {
        match repr {
            NamedFunctionRepr::Name(name) => NamedFunction::new(name),
            NamedFunctionRepr::Full { name, test_file, functionality_id } => {
                NamedFunction { name, test_file, functionality_id }
            }
        }
    }
}

/// A set of named functions, unique by name and kept in name order.
///
/// Persisted as an alphabetically sorted JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NamedFunction>", into = "Vec<NamedFunction>")]
pub struct Inventory {
    functions: BTreeMap<String, NamedFunction>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function, replacing (and returning) any entry with the same name.
    pub fn insert(&mut self, function: NamedFunction) -> Option<NamedFunction> {
        self.functions.insert(function.name.clone(), function)
    }

    pub fn get(&self, name: &str) -> Option<&NamedFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Function names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Functions in alphabetical name order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedFunction> {
        self.functions.values()
    }

    pub fn to_sorted_vec(&self) -> Vec<NamedFunction> {
        self.functions.values().cloned().collect()
    }
}

impl FromIterator<NamedFunction> for Inventory {
    fn from_iter<I: IntoIterator<Item = NamedFunction>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for function in iter {
            inventory.insert(function);
        }
        inventory
    }
}

impl Extend<NamedFunction> for Inventory {
    fn extend<I: IntoIterator<Item = NamedFunction>>(&mut self, iter: I) {
        for function in iter {
            self.insert(function);
        }
    }
}

impl From<Vec<NamedFunction>> for Inventory {
    fn from(functions: Vec<NamedFunction>) -> Self {
        functions.into_iter().collect()
    }
}

impl From<Inventory> for Vec<NamedFunction> {
    fn from(inventory: Inventory) -> Self {
        inventory.functions.into_values().collect()
    }
}

/// Names added and removed between two inventories.
///
/// Entries present in both are ignored even when their metadata differs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryDiff {
    pub added: Vec<NamedFunction>,
    pub removed: Vec<NamedFunction>,
}

impl InventoryDiff {
    /// Compare `previous` against `current`, keyed by name.
    pub fn between(previous: &Inventory, current: &Inventory) -> Self {
        let added = current.iter().filter(|f| !previous.contains(&f.name)).cloned().collect();
        let removed = previous.iter().filter(|f| !current.contains(&f.name)).cloned().collect();
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// One timestamped entry of the append-only history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// ISO-8601 creation time.
    pub timestamp: String,
    #[serde(default)]
    pub added: Vec<NamedFunction>,
    #[serde(default)]
    pub removed: Vec<NamedFunction>,
}
