use anyhow::{Context, Result};
use fntrack_core::model::NamedFunction;
use fntrack_core::scan::InventoryBuilder;

use crate::commands::{load_context, print_json, ScanOverrides};

/// Build the inventory for `root` and print it without touching any files.
pub fn list_command(root: &str, overrides: &ScanOverrides, json: bool) -> Result<()> {
    let ctx = load_context(root, overrides)?;
    let output = InventoryBuilder::new(&ctx.config)
        .build(&ctx.layout.root)
        .with_context(|| format!("Failed to scan {}", ctx.layout.root.display()))?;

    if json {
        return print_json(&output.inventory.to_sorted_vec());
    }

    if output.inventory.is_empty() {
        println!("No named functions found under {}", ctx.layout.root.display());
        return Ok(());
    }
    for function in output.inventory.iter() {
        println!("{}", describe(function));
    }
    Ok(())
}

/// One-line rendering: the name followed by any tags.
pub fn describe(function: &NamedFunction) -> String {
    let mut line = function.name.clone();
    if let Some(id) = &function.functionality_id {
        line.push_str(&format!("  [{id}]"));
    }
    if let Some(test_file) = &function.test_file {
        line.push_str(&format!("  tests: {test_file}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_tags_when_present() {
        assert_eq!(describe(&NamedFunction::new("plain")), "plain");
        let tagged = NamedFunction::new("login")
            .with_functionality_id(Some("AUTH".into()))
            .with_test_file(Some("login.spec.ts".into()));
        assert_eq!(describe(&tagged), "login  [AUTH]  tests: login.spec.ts");
    }
}
