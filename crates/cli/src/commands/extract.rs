use std::path::Path;

use anyhow::{Context, Result};
use fntrack_core::scan::extract::ExtractOptions;
use fntrack_core::scan::FunctionExtractor;

use crate::commands::list::describe;
use crate::commands::{print_json, ScanOverrides};

/// Extract named functions from a single file and print them with any
/// skipped-node diagnostics.
pub fn extract_command(file: &str, overrides: &ScanOverrides, json: bool) -> Result<()> {
    let config = overrides.scan_config()?;
    let mut extractor = FunctionExtractor::new(ExtractOptions::from(&config))
        .context("Failed to load the TSX grammar")?;
    let path = Path::new(file);
    let extraction =
        extractor.extract_file(path).with_context(|| format!("Failed to extract {file}"))?;

    if json {
        return print_json(&extraction);
    }

    println!("{}: {} named function(s)", path.display(), extraction.functions.len());
    for function in &extraction.functions {
        println!("  {}", describe(function));
    }
    if !extraction.diagnostics.is_empty() {
        println!("Skipped nodes:");
        for diagnostic in &extraction.diagnostics {
            println!("  {diagnostic}");
        }
    }
    Ok(())
}
