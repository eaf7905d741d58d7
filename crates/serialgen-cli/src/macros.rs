//! `serialgen macros`

use anyhow::{Context, Result};
use serialgen_core::{GeneratorConfig, MacroRegistry, WalkDirLister};

pub fn run(config: &GeneratorConfig, json: bool) -> Result<()> {
    let registry = MacroRegistry::discover_with(&WalkDirLister::from_config(config), config)
        .context("Failed to discover validation macros")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("No validation macros found");
        return Ok(());
    }

    println!("Discovered {} validation macro(s):", registry.len());
    for entry in registry.iter() {
        println!(
            "  {} -> {} ({}:{})",
            entry.macro_name,
            entry.qualified_function_name,
            entry.source.display(),
            entry.line
        );
    }

    Ok(())
}
