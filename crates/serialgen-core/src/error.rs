//! Error types for generation passes

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// Coarse classification used by the pipeline to decide how to log and recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// File missing, unreadable or unwritable.
    LookupFailure,
    /// The text does not have the structure the generator expects.
    StructuralMismatch,
    /// The generator itself is misconfigured.
    Configuration,
}

/// Error type for generation operations
#[derive(Error, Debug)]
pub enum GenError {
    /// I/O error while reading or writing a source file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory enumeration failed
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// The class declaration or its closing brace could not be located
    #[error("class '{class}' not found in {}", path.display())]
    ClassNotFound { class: String, path: PathBuf },

    /// The class has no recognizable member fields
    #[error("no fields found in class '{class}' ({})", path.display())]
    NoFields { class: String, path: PathBuf },

    /// The class span exists but has no body lines to splice into
    #[error("class '{class}' in {} is malformed: {reason}", path.display())]
    MalformedClass {
        class: String,
        path: PathBuf,
        reason: String,
    },

    /// A validation macro governs a field that is not in the class field list
    #[error("validation macro '{macro_name}' refers to unknown field '{field}' in class '{class}'")]
    OrphanedValidationField {
        macro_name: String,
        field: String,
        class: String,
    },

    /// A validation macro was defined twice with different functions (strict mode only)
    #[error("validation macro '{macro_name}' defined as both '{first}' and '{second}'")]
    MacroConflict {
        macro_name: String,
        first: String,
        second: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// Build an I/O error tagged with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    /// Category used for per-file recovery decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenError::Io { .. } | GenError::Walk(_) => ErrorCategory::LookupFailure,
            GenError::ClassNotFound { .. }
            | GenError::NoFields { .. }
            | GenError::MalformedClass { .. }
            | GenError::OrphanedValidationField { .. } => ErrorCategory::StructuralMismatch,
            GenError::MacroConflict { .. } | GenError::Config(_) => ErrorCategory::Configuration,
        }
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::Config(err.to_string())
    }
}
