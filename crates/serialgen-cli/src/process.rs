//! `serialgen process`

use anyhow::{Context, Result};
use serialgen_core::{GeneratorConfig, Pipeline, ProcessReport, WalkDirLister};

pub fn run(config: GeneratorConfig, json: bool) -> Result<()> {
    let lister = WalkDirLister::from_config(&config);
    let pipeline = Pipeline::new(config, lister).context("Failed to prepare generator")?;
    let report = pipeline.run().context("Generation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &ProcessReport) {
    for class in &report.processed {
        let status = if class.already_present {
            "already generated"
        } else if report.dry_run {
            "would generate"
        } else {
            "generated"
        };
        println!(
            "✓ {} ({}): {} [{} field(s), {} optional, {} validated]",
            class.class_name,
            class.path.display(),
            status,
            class.field_count,
            class.optional_field_count,
            class.validated_field_count
        );

        if report.dry_run && !class.already_present {
            println!("{}", "=".repeat(70));
            println!("{}", class.methods);
            println!("{}", "=".repeat(70));
        }
    }

    for failure in &report.failures {
        println!("✗ {}: {}", failure.path.display(), failure.message);
    }

    println!(
        "\n{} file(s) scanned, {} class(es) processed, {} file(s) {}, {} failure(s)",
        report.files_scanned,
        report.processed.len(),
        report.files_modified.len(),
        if report.dry_run { "would change" } else { "modified" },
        report.failures.len()
    );
}
