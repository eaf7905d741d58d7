//! Validation macro discovery.
//!
//! A validation macro is declared in a header with a documented comment:
//!
//! ```text
//! #define NotNull /* Validation Function -> DtoValidationUtility::ValidateNotNull */
//! ```
//!
//! The registry maps each macro name to the fully-qualified function the
//! generated `ValidateFields` calls.

use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::files::SourceLister;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static DEFINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)#define\s+([A-Za-z_][A-Za-z0-9_]*)\s+/\*\s*Validation\s+Function\s*->\s*([^*]+?)\s*\*/",
    )
    .unwrap()
});

/// One discovered macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMacroEntry {
    pub macro_name: String,
    /// Function name as written in the comment.
    pub function_name: String,
    /// `function_name` qualified with the configured validation namespace.
    pub qualified_function_name: String,
    /// Where the winning definition was found.
    pub source: PathBuf,
    /// 1-based line of the winning definition.
    pub line: usize,
}

/// Macro name to validation function mapping, built once per run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MacroRegistry {
    entries: BTreeMap<String, ValidationMacroEntry>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the given files. Files that cannot be read are skipped with a warning.
    pub fn discover(files: &[PathBuf], config: &GeneratorConfig) -> GenResult<Self> {
        let mut registry = Self::new();

        for path in files {
            match std::fs::read_to_string(path) {
                Ok(content) => registry.scan_text(path, &content, config)?,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable header"
                    );
                }
            }
        }

        tracing::debug!(count = registry.len(), "discovered validation macros");
        Ok(registry)
    }

    /// Ask the lister for project and library headers, then scan them.
    ///
    /// Library headers are listed without exclusions so vendored copies under
    /// build directories are still seen.
    pub fn discover_with(lister: &dyn SourceLister, config: &GeneratorConfig) -> GenResult<Self> {
        let mut files = Vec::new();
        if let Some(project) = &config.project_dir {
            files.extend(lister.list_files(project, &config.header_extensions, false)?);
        }
        if let Some(library) = &config.library_dir {
            for file in lister.list_files(library, &config.header_extensions, true)? {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }
        Self::discover(&files, config)
    }

    /// Scan one file's text. Later definitions overwrite earlier ones unless
    /// `strict_macros` is set and the function differs.
    pub fn scan_text(
        &mut self,
        path: &Path,
        content: &str,
        config: &GeneratorConfig,
    ) -> GenResult<()> {
        for (index, line) in content.lines().enumerate() {
            let Some((macro_name, function_name)) = parse_definition(line) else {
                continue;
            };

            let entry = ValidationMacroEntry {
                qualified_function_name: config.qualify_function(&function_name),
                macro_name: macro_name.clone(),
                function_name,
                source: path.to_path_buf(),
                line: index + 1,
            };
            self.insert(entry, config.strict_macros)?;
        }
        Ok(())
    }

    fn insert(&mut self, entry: ValidationMacroEntry, strict: bool) -> GenResult<()> {
        if let Some(previous) = self.entries.get(&entry.macro_name) {
            if previous.function_name != entry.function_name {
                if strict {
                    return Err(GenError::MacroConflict {
                        macro_name: entry.macro_name,
                        first: previous.function_name.clone(),
                        second: entry.function_name,
                    });
                }
                tracing::warn!(
                    macro_name = %entry.macro_name,
                    previous = %previous.function_name,
                    replacement = %entry.function_name,
                    source = %entry.source.display(),
                    "validation macro redefined, last definition wins"
                );
            }
        }
        self.entries.insert(entry.macro_name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, macro_name: &str) -> Option<&ValidationMacroEntry> {
        self.entries.get(macro_name)
    }

    /// Qualified function for a macro.
    pub fn function_for(&self, macro_name: &str) -> Option<&str> {
        self.get(macro_name).map(|e| e.qualified_function_name.as_str())
    }

    pub fn contains(&self, macro_name: &str) -> bool {
        self.entries.contains_key(macro_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationMacroEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a macro definition line into `(macro, function)`.
///
/// Whole-line comments are skipped, as are lines where `//` or `/*` occurs
/// before `#define`.
pub fn parse_definition(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
        return None;
    }

    let define_pos = line.to_ascii_lowercase().find("#define")?;
    let commented_first = [line.find("//"), line.find("/*")]
        .into_iter()
        .flatten()
        .any(|pos| pos < define_pos);
    if commented_first {
        return None;
    }

    let caps = DEFINE_RE.captures(&line[define_pos..])?;
    let function = caps[2].trim();
    if function.is_empty() {
        return None;
    }
    Some((caps[1].to_string(), function.to_string()))
}
