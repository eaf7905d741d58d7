//! Association of validation macros with the field declared after them.
//!
//! ```text
//! class User {
//!     NotNull
//!     optional<StdString> name;
//! };
//! ```
//!
//! yields `NotNull -> [name]`. A macro line must be the macro name alone. The
//! field is searched for in the next [`MACRO_LOOKAHEAD_LINES`] lines; an access
//! specifier or another macro in between ends the search, so a macro directly
//! followed by another macro is dropped.

use crate::error::{GenError, GenResult};
use crate::fields::{
    Access, FieldDescriptor, MemberLine, MemberWalker, find_class_span_with, is_member_level,
    looks_like_declaration,
};
use crate::lexer::{LineInfo, is_comment_line, scan_lines};
use crate::registry::MacroRegistry;
use crate::source::SourceFile;
use indexmap::IndexMap;
use serde::Serialize;

/// Lines searched after a macro name for its field.
pub const MACRO_LOOKAHEAD_LINES: usize = 5;

/// Names that end a lookahead even when they are not registered validation macros.
const STOP_MARKERS: &[&str] = &["Dto", "Serializable", "COMPONENT", "SCOPE", "VALIDATE"];

/// Macro name to governed fields, both in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFieldMap {
    entries: IndexMap<String, Vec<FieldDescriptor>>,
}

impl ValidationFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, macro_name: impl Into<String>, field: FieldDescriptor) {
        self.entries.entry(macro_name.into()).or_default().push(field);
    }

    pub fn get(&self, macro_name: &str) -> Option<&[FieldDescriptor]> {
        self.entries.get(macro_name).map(Vec::as_slice)
    }

    /// `(macro, field)` pairs, grouped by macro in first-seen order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries
            .iter()
            .flat_map(|(m, fields)| fields.iter().map(move |f| (m.as_str(), f)))
    }

    /// Macros governing the named field.
    pub fn macros_for(&self, field_name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, fields)| fields.iter().any(|f| f.name == field_name))
            .map(|(m, _)| m.as_str())
            .collect()
    }

    pub fn is_validated(&self, field_name: &str) -> bool {
        self.entries
            .values()
            .any(|fields| fields.iter().any(|f| f.name == field_name))
    }

    /// Number of macro/field pairs.
    pub fn field_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every validated field must be one of the class's extracted fields.
    pub fn check_orphans(&self, class_name: &str, fields: &[FieldDescriptor]) -> GenResult<()> {
        for (macro_name, field) in self.pairs() {
            if !fields.iter().any(|f| f.name == field.name) {
                return Err(GenError::OrphanedValidationField {
                    macro_name: macro_name.to_string(),
                    field: field.name.clone(),
                    class: class_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Finds validation-macro annotated fields in a class.
#[derive(Debug, Clone, Copy)]
pub struct ValidationFieldExtractor<'r> {
    registry: &'r MacroRegistry,
}

impl<'r> ValidationFieldExtractor<'r> {
    pub fn new(registry: &'r MacroRegistry) -> Self {
        Self { registry }
    }

    pub fn extract(&self, file: &SourceFile, class_name: &str) -> GenResult<ValidationFieldMap> {
        let mut map = ValidationFieldMap::new();
        if self.registry.is_empty() {
            return Ok(map);
        }

        let lines = file.lines();
        let infos = scan_lines(lines);
        let span = find_class_span_with(lines, &infos, class_name).ok_or_else(|| {
            GenError::ClassNotFound {
                class: class_name.to_string(),
                path: file.path().to_path_buf(),
            }
        })?;

        let mut walker = MemberWalker::new();
        for index in span.body() {
            if !is_member_level(&infos[index], span.body_depth) {
                continue;
            }
            let trimmed = lines[index].trim();
            if self.registry.contains(trimmed) {
                let window = (index + 1)..(index + 1 + MACRO_LOOKAHEAD_LINES).min(span.end);
                if let Some(field) =
                    self.field_after(lines, &infos, window, span.body_depth, walker.access)
                {
                    map.push(trimmed, field);
                } else {
                    tracing::debug!(
                        class = class_name,
                        macro_name = trimmed,
                        line = index + 1,
                        "validation macro is not followed by a field"
                    );
                }
                continue;
            }
            walker.classify_line(&lines[index]);
        }

        tracing::debug!(
            class = class_name,
            count = map.field_count(),
            "extracted validation fields"
        );
        Ok(map)
    }

    fn field_after(
        &self,
        lines: &[String],
        infos: &[LineInfo],
        window: std::ops::Range<usize>,
        body_depth: usize,
        access: Access,
    ) -> Option<FieldDescriptor> {
        // Local copy; the caller's access level is unaffected.
        let mut walker = MemberWalker { access };

        for index in window {
            if !is_member_level(&infos[index], body_depth) {
                continue;
            }
            let trimmed = lines[index].trim();
            if trimmed.is_empty() || is_comment_line(trimmed) {
                continue;
            }
            if self.is_stop_marker(trimmed) {
                return None;
            }
            match walker.classify_line(trimmed) {
                MemberLine::Field(field) => return Some(field),
                MemberLine::AccessSpecifier => return None,
                _ if looks_like_declaration(trimmed) => return None,
                _ => {}
            }
        }

        None
    }

    fn is_stop_marker(&self, trimmed: &str) -> bool {
        self.registry.contains(trimmed) || STOP_MARKERS.contains(&trimmed)
    }
}

#[cfg(test)]
#[path = "validation/validation_tests.rs"]
mod validation_tests;
