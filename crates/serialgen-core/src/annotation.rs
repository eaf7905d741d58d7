//! Annotation detection.
//!
//! An annotation is a line reading exactly `//@<keyword>` (surrounding
//! whitespace ignored). Once its class has been generated the line is rewritten
//! to `/*@<keyword>*/`, which the scanner skips.

use crate::config::{ENTITY_KEYWORD, GeneratorConfig};
use crate::lexer::is_comment_line;
use crate::source::SourceFile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// How many lines after an annotation may hold its class declaration.
pub const LOOKAHEAD_LINES: usize = 10;

/// Line prefixes of macros that may sit between an annotation and its class.
const KNOWN_MARKERS: &[&str] = &["COMPONENT", "SCOPE", "VALIDATE", "Dto", "template"];

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:final\s*)?(?:[:{]|$)").unwrap()
});

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static MACRO_LIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9_]*\s*(?:\(|$)").unwrap()
});

/// Which keyword triggered a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationKind {
    /// The configurable keyword (`Serializable` by default).
    Serializable,
    /// The hard-coded `Entity` keyword.
    Entity,
}

/// A pending annotation and the class it decorates. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationMatch {
    pub class_name: String,
    pub annotation_line: usize,
    pub class_declaration_line: usize,
    pub annotation_kind: AnnotationKind,
    /// The keyword text as written, used to produce the processed marker.
    pub keyword: String,
}

impl AnnotationMatch {
    /// `/*@<keyword>*/`
    pub fn processed_marker(&self) -> String {
        processed_marker(&self.keyword)
    }
}

pub fn pending_marker(keyword: &str) -> String {
    format!("//@{keyword}")
}

pub fn processed_marker(keyword: &str) -> String {
    format!("/*@{keyword}*/")
}

/// Finds pending annotations for the configured keywords.
#[derive(Debug, Clone)]
pub struct AnnotationScanner {
    keywords: Vec<(String, AnnotationKind)>,
}

impl AnnotationScanner {
    pub fn new(config: &GeneratorConfig) -> Self {
        let keywords = config
            .annotation_keywords()
            .into_iter()
            .map(|kw| {
                let kind = if kw == ENTITY_KEYWORD && kw != config.annotation {
                    AnnotationKind::Entity
                } else {
                    AnnotationKind::Serializable
                };
                (kw.to_string(), kind)
            })
            .collect();
        Self { keywords }
    }

    /// First pending annotation in the file.
    pub fn find(&self, file: &SourceFile) -> Option<AnnotationMatch> {
        self.find_from(file, 0)
    }

    /// First pending annotation at or after the 0-based line `start`.
    pub fn find_from(&self, file: &SourceFile, start: usize) -> Option<AnnotationMatch> {
        let lines = file.lines();

        for index in start..lines.len() {
            let trimmed = lines[index].trim();

            if self.processed_keyword(trimmed).is_some() {
                continue;
            }
            let Some((keyword, kind)) = self.pending_keyword(trimmed) else {
                continue;
            };

            if let Some((class_name, class_index)) = self.lookahead(lines, index) {
                return Some(AnnotationMatch {
                    class_name,
                    annotation_line: index + 1,
                    class_declaration_line: class_index + 1,
                    annotation_kind: kind,
                    keyword: keyword.to_string(),
                });
            }

            tracing::debug!(
                path = %file.path().display(),
                line = index + 1,
                "annotation //@{keyword} is not followed by a class declaration"
            );
        }

        None
    }

    fn pending_keyword(&self, trimmed: &str) -> Option<(&str, AnnotationKind)> {
        self.keywords
            .iter()
            .find(|(kw, _)| trimmed == pending_marker(kw))
            .map(|(kw, kind)| (kw.as_str(), *kind))
    }

    fn processed_keyword(&self, trimmed: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(kw, _)| trimmed == processed_marker(kw))
            .map(|(kw, _)| kw.as_str())
    }

    /// Look for the class declaration following the annotation at `index`.
    fn lookahead(&self, lines: &[String], index: usize) -> Option<(String, usize)> {
        let end = (index + 1 + LOOKAHEAD_LINES).min(lines.len());

        for (offset, line) in lines[index + 1..end].iter().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || is_comment_line(trimmed) {
                continue;
            }

            if let Some(caps) = CLASS_RE.captures(trimmed) {
                return Some((caps[1].to_string(), index + 1 + offset));
            }

            let is_marker = KNOWN_MARKERS.iter().any(|m| trimmed.starts_with(m))
                || MACRO_LIKE_RE.is_match(trimmed);
            if !is_marker {
                break;
            }
        }

        None
    }
}
