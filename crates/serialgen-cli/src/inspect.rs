//! `serialgen inspect`

use anyhow::{Context, Result};
use serialgen_core::{
    AnnotationScanner, FieldExtractor, GeneratorConfig, MacroRegistry, MethodSynthesizer,
    SourceFile, ValidationFieldExtractor, WalkDirLister,
};
use std::path::Path;

pub fn run(file: &Path, config: &GeneratorConfig) -> Result<()> {
    let source =
        SourceFile::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let registry = MacroRegistry::discover_with(&WalkDirLister::from_config(config), config)
        .context("Failed to discover validation macros")?;

    let scanner = AnnotationScanner::new(config);
    let mut cursor = 0;
    let mut found = 0;

    while let Some(annotation) = scanner.find_from(&source, cursor) {
        cursor = annotation.annotation_line;
        found += 1;

        println!(
            "Class {} (//@{} at line {}, class at line {})",
            annotation.class_name,
            annotation.keyword,
            annotation.annotation_line,
            annotation.class_declaration_line
        );

        let fields = FieldExtractor::new().extract(&source, &annotation.class_name)?;
        if fields.is_empty() {
            println!("  ⚠ no fields found, class would be skipped\n");
            continue;
        }

        println!("  Fields:");
        for field in &fields {
            let class = field.classification();
            println!(
                "    {} {} (access: {}, {:?})",
                field.declared_type, field.name, field.access, class.category
            );
        }

        let validation =
            ValidationFieldExtractor::new(&registry).extract(&source, &annotation.class_name)?;
        if !validation.is_empty() {
            println!("  Validation:");
            for (macro_name, field) in validation.pairs() {
                println!(
                    "    {} -> {} ({})",
                    macro_name,
                    field.name,
                    registry.function_for(macro_name).unwrap_or("unregistered")
                );
            }
        }
        if let Err(err) = validation.check_orphans(&annotation.class_name, &fields) {
            println!("  ⚠ {err}");
        }

        let methods = MethodSynthesizer::new(&registry).synthesize(
            &annotation.class_name,
            &fields,
            &validation,
        );
        println!("{}", "=".repeat(70));
        println!("{methods}");
        println!("{}\n", "=".repeat(70));
    }

    if found == 0 {
        println!("No pending annotations in {}", file.display());
    }

    Ok(())
}
