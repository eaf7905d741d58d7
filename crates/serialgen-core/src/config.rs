//! Generator configuration
//!
//! A [`GeneratorConfig`] is resolved once at the entry point (defaults, then an
//! optional `serialgen.toml`, then environment, then command-line flags) and
//! passed down to every stage. Stages never consult the environment themselves.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "serialgen.toml";

/// Hard-coded keyword recognised alongside the configurable one.
pub const ENTITY_KEYWORD: &str = "Entity";

/// Configuration for one generator run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Client project root whose headers are scanned for annotations
    pub project_dir: Option<PathBuf>,

    /// Library root; its headers are scanned (without exclusions) for validation macros
    pub library_dir: Option<PathBuf>,

    /// Annotation keyword, matched as `//@<keyword>`
    pub annotation: String,

    /// Also accept `//@Entity` annotations
    pub entity_annotation: bool,

    /// Header-like file extensions, including the leading dot
    pub header_extensions: Vec<String>,

    /// Directory names pruned during enumeration (`*` suffix acts as a prefix match)
    pub excluded_dirs: Vec<String>,

    /// Namespace prepended to validation functions that are not already rooted in it
    pub validation_namespace: String,

    /// Include line added to files whose processed classes have optional fields
    pub optional_include: String,

    /// Treat conflicting validation macro redefinitions as an error
    pub strict_macros: bool,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Compute everything but never write files
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_dir: None,
            library_dir: None,
            annotation: "Serializable".to_string(),
            entity_annotation: false,
            header_extensions: vec![".h".to_string(), ".hpp".to_string()],
            excluded_dirs: [
                "build",
                ".git",
                ".pio",
                ".vscode",
                ".idea",
                "tempcode",
                "node_modules",
                "cmake-build-*",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            validation_namespace: "nayan::validation".to_string(),
            optional_include: "<optional>".to_string(),
            strict_macros: false,
            log_level: "info".to_string(),
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> GenResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides.
    ///
    /// `lookup` is normally `|k| std::env::var(k).ok()`; tests pass a closure over a map.
    /// `PROJECT_DIR` wins over `CMAKE_PROJECT_DIR`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(annotation) = non_empty("SERIALIZABLE_MACRO") {
            self.annotation = annotation.trim().to_string();
        }
        if let Some(dir) = non_empty("PROJECT_DIR").or_else(|| non_empty("CMAKE_PROJECT_DIR")) {
            self.project_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = non_empty("LIBRARY_DIR") {
            self.library_dir = Some(PathBuf::from(dir));
        }
    }

    /// Keywords that trigger processing, configurable one first.
    pub fn annotation_keywords(&self) -> Vec<&str> {
        let mut keywords = vec![self.annotation.as_str()];
        if self.entity_annotation && self.annotation != ENTITY_KEYWORD {
            keywords.push(ENTITY_KEYWORD);
        }
        keywords
    }

    /// Whether `path` has one of the configured header extensions.
    pub fn is_header(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.header_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Qualify a validation function name with [`Self::validation_namespace`].
    ///
    /// Names already rooted in the namespace's first segment are left alone, so
    /// `DtoValidationUtility::ValidateNotNull` becomes
    /// `nayan::validation::DtoValidationUtility::ValidateNotNull` while
    /// `nayan::other::Check` is kept.
    pub fn qualify_function(&self, function: &str) -> String {
        let namespace = self.validation_namespace.trim_end_matches("::");
        if namespace.is_empty() {
            return function.to_string();
        }
        let root = namespace.split("::").next().unwrap_or(namespace);
        if function.starts_with(&format!("{root}::")) || function.starts_with("::") {
            function.to_string()
        } else {
            format!("{namespace}::{function}")
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> GenResult<()> {
        if !is_identifier(&self.annotation) {
            return Err(GenError::Config(format!(
                "annotation keyword must be an identifier, got '{}'",
                self.annotation
            )));
        }

        if self.header_extensions.is_empty() {
            return Err(GenError::Config(
                "at least one header extension is required".to_string(),
            ));
        }

        for ext in &self.header_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(GenError::Config(format!(
                    "header extension '{ext}' must start with '.'"
                )));
            }
        }

        let include = self.optional_include.as_str();
        let bracketed = include.len() > 2
            && ((include.starts_with('<') && include.ends_with('>'))
                || (include.starts_with('"') && include.ends_with('"')));
        if !bracketed {
            return Err(GenError::Config(format!(
                "optional include '{include}' must be written as <header> or \"header\""
            )));
        }

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
