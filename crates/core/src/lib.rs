//! fntrack-core
//!
//! Core library for tracking the named functions of a JavaScript/TypeScript
//! codebase over time.
//!
//! A tracking pass walks a source tree, extracts named function declarations
//! from every source file, diffs the result against the last persisted
//! inventory and appends a timestamped change record to a history log.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (the `fntrack` CLI, editor integrations, etc.).

pub mod config;
pub mod context;
pub mod functionality;
pub mod history;
pub mod layout;
pub mod model;
pub mod scan;
pub mod services;
pub mod store;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
