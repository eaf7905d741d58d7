//! One generator run over a project tree.
//!
//! The validation macro registry is discovered once when the pipeline is built.
//! Each header is then read into memory, every pending annotation in it is
//! processed, and the file is written back once. A failure abandons only the
//! file it happened in; nothing from that file is written.

use crate::annotation::{AnnotationKind, AnnotationMatch, AnnotationScanner};
use crate::config::GeneratorConfig;
use crate::error::{ErrorCategory, GenError, GenResult};
use crate::fields::FieldExtractor;
use crate::files::SourceLister;
use crate::inject::{InjectOutcome, Injector};
use crate::registry::MacroRegistry;
use crate::source::SourceFile;
use crate::synth::MethodSynthesizer;
use crate::validation::ValidationFieldExtractor;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A class handled during a run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedClass {
    pub path: PathBuf,
    pub class_name: String,
    pub kind: AnnotationKind,
    /// 1-based line of the annotation.
    pub annotation_line: usize,
    /// The class already had generated methods; only the annotation was flipped.
    pub already_present: bool,
    pub field_count: usize,
    pub optional_field_count: usize,
    pub validated_field_count: usize,
    /// Generated method text, before indentation.
    #[serde(skip)]
    pub methods: String,
}

/// A file whose processing was abandoned.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub category: ErrorCategory,
    pub message: String,
}

/// Summary of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessReport {
    pub files_scanned: usize,
    pub files_modified: Vec<PathBuf>,
    pub processed: Vec<ProcessedClass>,
    pub failures: Vec<FileFailure>,
    pub dry_run: bool,
}

impl ProcessReport {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Outcome of processing a single file.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub classes: Vec<ProcessedClass>,
    /// Content changed (and was written, unless this is a dry run).
    pub modified: bool,
}

pub struct Pipeline<L> {
    config: GeneratorConfig,
    lister: L,
    registry: MacroRegistry,
}

impl<L: SourceLister> Pipeline<L> {
    /// Build a pipeline, discovering validation macros from the project and library trees.
    pub fn new(config: GeneratorConfig, lister: L) -> GenResult<Self> {
        config.validate()?;
        let registry = MacroRegistry::discover_with(&lister, &config)?;
        tracing::info!(macros = registry.len(), "validation macro registry ready");
        Ok(Self::with_registry(config, lister, registry))
    }

    /// Build a pipeline around an already discovered registry.
    pub fn with_registry(config: GeneratorConfig, lister: L, registry: MacroRegistry) -> Self {
        Self {
            config,
            lister,
            registry,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    /// Process every header under the configured project directory.
    pub fn run(&self) -> GenResult<ProcessReport> {
        let root = self
            .config
            .project_dir
            .as_deref()
            .ok_or_else(|| GenError::Config("project_dir is not set".to_string()))?;

        let files = self
            .lister
            .list_files(root, &self.config.header_extensions, false)?;
        Ok(self.process_files(&files))
    }

    /// Process the given files in order, recovering from per-file failures.
    pub fn process_files(&self, files: &[PathBuf]) -> ProcessReport {
        let mut report = ProcessReport {
            dry_run: self.config.dry_run,
            ..ProcessReport::default()
        };

        for path in files {
            report.files_scanned += 1;
            match self.process_file(path) {
                Ok(outcome) => {
                    if outcome.modified {
                        report.files_modified.push(path.clone());
                    }
                    report.processed.extend(outcome.classes);
                }
                Err(err) => {
                    log_failure(path, &err);
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        category: err.category(),
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            files = report.files_scanned,
            classes = report.processed_count(),
            modified = report.files_modified.len(),
            failures = report.failures.len(),
            dry_run = report.dry_run,
            "generation finished"
        );
        report
    }

    /// Read, transform and (outside dry runs) write back one file.
    pub fn process_file(&self, path: &Path) -> GenResult<FileOutcome> {
        let mut file = SourceFile::read(path)?;
        let before = file.render();

        let classes = self.process_source(&mut file)?;
        let modified = file.render() != before;

        if modified && !self.config.dry_run {
            file.persist()?;
        }

        Ok(FileOutcome { classes, modified })
    }

    /// Apply every pending annotation in `file` to the in-memory document.
    ///
    /// On error the document may be partially edited; callers must discard it.
    pub fn process_source(&self, file: &mut SourceFile) -> GenResult<Vec<ProcessedClass>> {
        let scanner = AnnotationScanner::new(&self.config);
        let injector = Injector::new();
        let mut classes = Vec::new();
        let mut cursor = 0;

        while let Some(annotation) = scanner.find_from(file, cursor) {
            cursor = annotation.annotation_line;
            let class = self.process_class(file, &annotation, &injector)?;
            classes.push(class);
        }

        if classes.iter().any(|c| c.optional_field_count > 0) {
            injector.ensure_include(file, &self.config.optional_include);
        }

        Ok(classes)
    }

    fn process_class(
        &self,
        file: &mut SourceFile,
        annotation: &AnnotationMatch,
        injector: &Injector,
    ) -> GenResult<ProcessedClass> {
        let class_name = annotation.class_name.as_str();

        let fields = FieldExtractor::new().extract(file, class_name)?;
        if fields.is_empty() {
            return Err(GenError::NoFields {
                class: class_name.to_string(),
                path: file.path().to_path_buf(),
            });
        }

        let validation = ValidationFieldExtractor::new(&self.registry).extract(file, class_name)?;
        validation.check_orphans(class_name, &fields)?;

        let methods =
            MethodSynthesizer::new(&self.registry).synthesize(class_name, &fields, &validation);
        let outcome = injector.inject(file, class_name, &methods)?;
        if !injector.mark_processed(file, annotation) {
            tracing::warn!(
                path = %file.path().display(),
                class = class_name,
                line = annotation.annotation_line,
                "annotation line no longer holds the pending marker; left unchanged"
            );
        }

        let optional_field_count = fields.iter().filter(|f| f.is_optional()).count();
        let already_present = outcome == InjectOutcome::AlreadyPresent;
        if !already_present {
            tracing::info!(
                path = %file.path().display(),
                class = class_name,
                fields = fields.len(),
                optional = optional_field_count,
                validated = validation.field_count(),
                "generated serialization methods"
            );
        }

        Ok(ProcessedClass {
            path: file.path().to_path_buf(),
            class_name: class_name.to_string(),
            kind: annotation.annotation_kind,
            annotation_line: annotation.annotation_line,
            already_present,
            field_count: fields.len(),
            optional_field_count,
            validated_field_count: validation.field_count(),
            methods,
        })
    }
}

fn log_failure(path: &Path, err: &GenError) {
    match err.category() {
        ErrorCategory::StructuralMismatch => {
            tracing::warn!(path = %path.display(), error = %err, "skipping file");
        }
        ErrorCategory::LookupFailure | ErrorCategory::Configuration => {
            tracing::error!(path = %path.display(), error = %err, "skipping file");
        }
    }
}

#[cfg(test)]
#[path = "pipeline/pipeline_tests.rs"]
mod pipeline_tests;
