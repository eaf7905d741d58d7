//! Splicing generated methods into a class and marking annotations processed.
//!
//! All edits happen on the in-memory [`SourceFile`]; the caller decides
//! whether to persist.

use crate::annotation::{AnnotationMatch, pending_marker};
use crate::error::{GenError, GenResult};
use crate::fields::find_class_span;
use crate::source::SourceFile;
use crate::synth::{DESERIALIZE_SIGNATURE, SERIALIZE_SIGNATURE};
use serde::Serialize;

/// Indentation used when the line before the insertion point has none.
const DEFAULT_INDENT: &str = "    ";

/// Result of [`Injector::inject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InjectOutcome {
    /// Methods were inserted starting at the 0-based line `at` (the leading blank line).
    Injected { at: usize, lines: usize },
    /// The class already has both serialize and deserialize signatures.
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Injector;

impl Injector {
    pub fn new() -> Self {
        Self
    }

    /// Insert `methods` before the closing brace of `class_name`.
    ///
    /// The text is placed after the last line that is neither blank nor a
    /// comment, preceded by one blank line and indented like that line.
    pub fn inject(
        &self,
        file: &mut SourceFile,
        class_name: &str,
        methods: &str,
    ) -> GenResult<InjectOutcome> {
        let span = find_class_span(file, class_name).ok_or_else(|| GenError::ClassNotFound {
            class: class_name.to_string(),
            path: file.path().to_path_buf(),
        })?;

        if span.start == span.end {
            return Err(GenError::MalformedClass {
                class: class_name.to_string(),
                path: file.path().to_path_buf(),
                reason: "class body opens and closes on its declaration line".to_string(),
            });
        }

        let class_lines = &file.lines()[span.start..=span.end];
        let has_serialize = class_lines.iter().any(|l| l.contains(SERIALIZE_SIGNATURE));
        let has_deserialize = class_lines.iter().any(|l| l.contains(DESERIALIZE_SIGNATURE));
        if has_serialize && has_deserialize {
            tracing::info!(class = class_name, "serialization methods already present");
            return Ok(InjectOutcome::AlreadyPresent);
        }

        let insert_at = (span.start..span.end)
            .rev()
            .find(|&i| {
                let trimmed = file.lines()[i].trim();
                !trimmed.is_empty() && !trimmed.starts_with("//") && !trimmed.starts_with("/*")
            })
            .map_or(span.end, |i| i + 1);

        let indent = match leading_whitespace(&file.lines()[insert_at - 1]) {
            "" => DEFAULT_INDENT.to_string(),
            ws => ws.to_string(),
        };

        let mut block = vec![String::new()];
        block.extend(methods.lines().map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        }));
        let count = block.len();
        file.insert_lines(insert_at, block);

        tracing::debug!(class = class_name, line = insert_at + 1, count, "injected methods");
        Ok(InjectOutcome::Injected {
            at: insert_at,
            lines: count,
        })
    }

    /// Rewrite the matched annotation line from `//@kw` to `/*@kw*/`.
    ///
    /// Returns false when that line no longer holds the pending marker.
    pub fn mark_processed(&self, file: &mut SourceFile, annotation: &AnnotationMatch) -> bool {
        let index = annotation.annotation_line.saturating_sub(1);
        let Some(line) = file.line(index) else {
            return false;
        };
        if line.trim() != pending_marker(&annotation.keyword) {
            return false;
        }

        let replacement = format!("{}{}", leading_whitespace(line), annotation.processed_marker());
        file.replace_line(index, replacement)
    }

    /// Add `#include <include>` unless an equivalent include exists.
    ///
    /// The line goes after the last `#include`, else after the header guard,
    /// else at the top. Returns true when a line was added.
    pub fn ensure_include(&self, file: &mut SourceFile, include: &str) -> bool {
        let bare = include.trim_matches(|c| matches!(c, '<' | '>' | '"'));
        let mut last_include = None;

        for (index, line) in file.lines().iter().enumerate() {
            let Some(target) = include_target(line) else {
                continue;
            };
            if target.trim_matches(|c| matches!(c, '<' | '>' | '"')) == bare {
                return false;
            }
            last_include = Some(index);
        }

        let position = last_include
            .or_else(|| header_guard_line(file.lines()))
            .map_or(0, |i| i + 1);

        file.insert_lines(position, [format!("#include {include}")]);
        tracing::debug!(
            path = %file.path().display(),
            include,
            line = position + 1,
            "added include"
        );
        true
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// The `<...>` or `"..."` part of an `#include` line.
fn include_target(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('#')?.trim_start();
    let target = rest.strip_prefix("include")?.trim();
    Some(target.split("//").next().unwrap_or(target).trim())
}

/// Index of `#pragma once`, or of the `#define X` right after `#ifndef X`.
fn header_guard_line(lines: &[String]) -> Option<usize> {
    for (index, line) in lines.iter().enumerate() {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("#pragma"), Some("once")) => return Some(index),
            (Some("#ifndef"), Some(guard)) => {
                if let Some(next) = lines.get(index + 1) {
                    let mut next = next.split_whitespace();
                    if next.next() == Some("#define") && next.next() == Some(guard) {
                        return Some(index + 1);
                    }
                }
            }
            _ => {}
        }
    }
    None
}
