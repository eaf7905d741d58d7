//! serialgen-core - Annotation-driven serialization code generation for C++ headers
//!
//! A class marked with `//@Serializable` gets `Serialize`, `ValidateFields` and
//! `Deserialize` methods spliced into its body, and the marker is rewritten to
//! `/*@Serializable*/` so that later runs leave it alone.
//!
//! The stages are usable on their own:
//! - [`AnnotationScanner`] finds pending annotations
//! - [`FieldExtractor`] and [`ValidationFieldExtractor`] read class members
//! - [`MacroRegistry`] discovers validation macros
//! - [`MethodSynthesizer`] produces method text
//! - [`Injector`] edits the in-memory [`SourceFile`]
//!
//! [`Pipeline`] wires them together for a whole project.

pub mod annotation;
pub mod config;
pub mod error;
pub mod fields;
pub mod files;
pub mod inject;
pub mod lexer;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod synth;
pub mod types;
pub mod validation;

pub use annotation::{AnnotationKind, AnnotationMatch, AnnotationScanner};
pub use config::{CONFIG_FILE_NAME, GeneratorConfig};
pub use error::{ErrorCategory, GenError, GenResult};
pub use fields::{Access, ClassSpan, FieldDescriptor, FieldExtractor, find_class_span};
pub use files::{SourceLister, WalkDirLister};
pub use inject::{InjectOutcome, Injector};
pub use pipeline::{FileFailure, FileOutcome, Pipeline, ProcessReport, ProcessedClass};
pub use registry::{MacroRegistry, ValidationMacroEntry};
pub use source::SourceFile;
pub use synth::MethodSynthesizer;
pub use types::{TypeCategory, TypeClassification, classify};
pub use validation::{ValidationFieldExtractor, ValidationFieldMap};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnnotationScanner, FieldExtractor, GenError, GenResult, GeneratorConfig, Injector,
        MacroRegistry, MethodSynthesizer, Pipeline, ProcessReport, SourceFile, SourceLister,
        ValidationFieldExtractor, WalkDirLister,
    };
}
