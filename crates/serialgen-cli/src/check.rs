//! `serialgen check`

use anyhow::{Context, Result};
use serialgen_core::{CONFIG_FILE_NAME, GeneratorConfig};
use std::path::{Path, PathBuf};

pub fn check_file(path: &Path) -> Result<GeneratorConfig> {
    let config = GeneratorConfig::from_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    println!("Checking configuration: {}", path.display());

    let config = check_file(&path)?;

    println!("✓ Annotation: //@{}", config.annotation_keywords().join(", //@"));
    println!("✓ Header extensions: {}", config.header_extensions.join(", "));
    println!("✓ Excluded directories: {}", config.excluded_dirs.len());
    println!("✓ Validation namespace: {}", config.validation_namespace);
    if let Some(dir) = &config.project_dir {
        println!("✓ Project: {}", dir.display());
    }
    if let Some(dir) = &config.library_dir {
        println!("✓ Library: {}", dir.display());
    }
    println!("\nConfiguration is valid!");

    Ok(())
}

#[cfg(test)]
#[path = "check/check_tests.rs"]
mod check_tests;
