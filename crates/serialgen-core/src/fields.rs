//! Class span location and member field extraction.

use crate::error::{GenError, GenResult};
use crate::lexer::{LineInfo, is_comment_line, scan_lines};
use crate::source::SourceFile;
use crate::types::{TypeClassification, classify};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static ACCESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(public|private|protected)\s*:").unwrap()
});

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(Public|Private|Protected)\s+)?([A-Za-z_][A-Za-z0-9_<>*&,:\s]*?)\s*\b([A-Za-z_][A-Za-z0-9_]*)\s*[;={]",
    )
    .unwrap()
});

/// Leading words that make a matching line something other than a member field.
const NON_FIELD_KEYWORDS: &[&str] = &[
    "using", "typedef", "friend", "return", "class", "struct", "enum", "union", "namespace",
    "template", "delete", "goto", "throw",
];

/// Access level of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Private,
    Protected,
    None,
}

impl Access {
    /// Parse a specifier keyword, case-insensitively.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "public" => Some(Access::Public),
            "private" => Some(Access::Private),
            "protected" => Some(Access::Protected),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Public => write!(f, "public"),
            Access::Private => write!(f, "private"),
            Access::Protected => write!(f, "protected"),
            Access::None => write!(f, "none"),
        }
    }
}

/// One member variable, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Declared type, raw.
    pub declared_type: String,
    pub name: String,
    pub access: Access,
}

impl FieldDescriptor {
    pub fn new(declared_type: impl Into<String>, name: impl Into<String>, access: Access) -> Self {
        Self {
            declared_type: declared_type.into(),
            name: name.into(),
            access,
        }
    }

    pub fn classification(&self) -> TypeClassification {
        classify(&self.declared_type)
    }

    pub fn is_optional(&self) -> bool {
        self.classification().is_optional()
    }
}

/// Textual extent of a class: 0-based declaration and closing-brace lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSpan {
    pub start: usize,
    pub end: usize,
    /// Depth of the class body (declaration depth + 1).
    pub body_depth: usize,
}

impl ClassSpan {
    /// Indices of lines strictly inside the braces.
    pub fn body(&self) -> std::ops::Range<usize> {
        (self.start + 1)..self.end
    }
}

/// Locate the span of `class_name`.
///
/// Forward declarations are skipped. The span ends on the line where the
/// brace depth comes back to the declaration's depth.
pub fn find_class_span(file: &SourceFile, class_name: &str) -> Option<ClassSpan> {
    find_class_span_with(file.lines(), &scan_lines(file.lines()), class_name)
}

pub(crate) fn find_class_span_with(
    lines: &[String],
    infos: &[LineInfo],
    class_name: &str,
) -> Option<ClassSpan> {
    let decl = Regex::new(&format!(
        r"\bclass\s+{}\s*(?:final\s*)?(?:[:{{]|$)",
        regex::escape(class_name)
    ))
    .ok()?;

    let mut index = 0;
    while index < lines.len() {
        if infos[index].starts_in_comment || !decl.is_match(strip_line_comment(&lines[index])) {
            index += 1;
            continue;
        }

        let base = infos[index].depth_start;
        let mut opened = false;
        for j in index..lines.len() {
            if infos[j].peak > base {
                opened = true;
            }
            if !opened && lines[j].contains(';') {
                break;
            }
            if opened && infos[j].depth_end <= base {
                return Some(ClassSpan {
                    start: index,
                    end: j,
                    body_depth: base + 1,
                });
            }
        }
        index += 1;
    }

    None
}

fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// A member line seen while walking a class body at body depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MemberLine {
    Blank,
    Comment,
    AccessSpecifier,
    Field(FieldDescriptor),
    Other,
}

/// Walks a class body, tracking the active access level.
pub(crate) struct MemberWalker {
    pub(crate) access: Access,
}

impl MemberWalker {
    pub(crate) fn new() -> Self {
        Self {
            access: Access::None,
        }
    }

    /// Interpret one body line and update the active access level.
    pub(crate) fn classify_line(&mut self, line: &str) -> MemberLine {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return MemberLine::Blank;
        }
        if is_comment_line(trimmed) {
            return MemberLine::Comment;
        }
        if let Some(caps) = ACCESS_RE.captures(trimmed) {
            if let Some(access) = Access::parse(&caps[1]) {
                self.access = access;
                let rest = trimmed[caps.get(0).map_or(0, |m| m.end())..].trim();
                return match parse_field(rest, access) {
                    Some(field) => MemberLine::Field(field),
                    None => MemberLine::AccessSpecifier,
                };
            }
        }
        match parse_field(trimmed, self.access) {
            Some(field) => {
                // `Public` and friends expand to `private: public:` and stay in effect.
                self.access = field.access;
                MemberLine::Field(field)
            }
            None => MemberLine::Other,
        }
    }
}

/// Match a single field declaration, using `current` when no inline qualifier is present.
pub fn parse_field(trimmed: &str, current: Access) -> Option<FieldDescriptor> {
    if trimmed.contains('(') || trimmed.contains(')') || trimmed.starts_with('#') {
        return None;
    }

    let caps = FIELD_RE.captures(trimmed)?;
    let declared_type = caps.get(2)?.as_str().trim();
    let name = caps.get(3)?.as_str();

    if declared_type.is_empty() || Access::parse(name).is_some() {
        return None;
    }
    let first_word = declared_type.split_whitespace().next().unwrap_or_default();
    if NON_FIELD_KEYWORDS.contains(&first_word) {
        return None;
    }

    let access = caps
        .get(1)
        .and_then(|m| Access::parse(m.as_str()))
        .unwrap_or(current);

    Some(FieldDescriptor::new(declared_type, name, access))
}

/// The line has the shape of a declaration, even if [`parse_field`] rejects it.
pub(crate) fn looks_like_declaration(trimmed: &str) -> bool {
    FIELD_RE.is_match(trimmed)
}

/// Extracts member fields of a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every member field of `class_name`, in declaration order.
    pub fn extract(&self, file: &SourceFile, class_name: &str) -> GenResult<Vec<FieldDescriptor>> {
        let infos = scan_lines(file.lines());
        let span = find_class_span_with(file.lines(), &infos, class_name).ok_or_else(|| {
            GenError::ClassNotFound {
                class: class_name.to_string(),
                path: file.path().to_path_buf(),
            }
        })?;

        let mut walker = MemberWalker::new();
        let mut fields = Vec::new();

        for index in span.body() {
            if !is_member_level(&infos[index], span.body_depth) {
                continue;
            }
            if let MemberLine::Field(field) = walker.classify_line(&file.lines()[index]) {
                fields.push(field);
            }
        }

        // `optional<int> y; };` declares a member on the closing-brace line.
        if span.end > span.start && is_member_level(&infos[span.end], span.body_depth) {
            let line = &file.lines()[span.end];
            let before_brace = line.rfind('}').map_or("", |pos| &line[..pos]);
            if let MemberLine::Field(field) = walker.classify_line(before_brace) {
                tracing::debug!(
                    class = class_name,
                    field = %field.name,
                    line = span.end + 1,
                    "field declared on the closing-brace line"
                );
                fields.push(field);
            }
        }

        tracing::debug!(class = class_name, count = fields.len(), "extracted fields");
        Ok(fields)
    }
}

/// A line belongs to the class body itself, not to a nested scope or comment.
pub(crate) fn is_member_level(info: &LineInfo, body_depth: usize) -> bool {
    info.depth_start == body_depth && !info.starts_in_comment
}
