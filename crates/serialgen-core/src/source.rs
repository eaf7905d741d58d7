//! In-memory source documents
//!
//! A header is read once into a [`SourceFile`], inspected and edited by the
//! stages, and written back in one step. Writes go through a temporary file in
//! the same directory and an atomic rename, so an interrupted run leaves either
//! the old or the new content on disk.

use crate::error::{GenError, GenResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A source file held as lines without terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl SourceFile {
    /// Read a file from disk.
    pub fn read(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Ok(Self::from_text(path, &content))
    }

    /// Build a document from text; `path` is only used for messages and writing.
    pub fn from_text(path: impl Into<PathBuf>, content: &str) -> Self {
        let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = content.ends_with('\n');

        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect()
        };

        Self {
            path: path.into(),
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line by 0-based index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace the line at a 0-based index. Returns false when out of range.
    pub fn replace_line(&mut self, index: usize, line: impl Into<String>) -> bool {
        match self.lines.get_mut(index) {
            Some(slot) => {
                *slot = line.into();
                true
            }
            None => false,
        }
    }

    /// Insert lines before the 0-based index (clamped to the end).
    pub fn insert_lines<I>(&mut self, index: usize, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let index = index.min(self.lines.len());
        self.lines.splice(index..index, lines);
    }

    /// Render the document with its original line ending style.
    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    /// Write the document back to its path via temp file + rename.
    pub fn persist(&self) -> GenResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| GenError::io(&self.path, e))?;
        temp.write_all(self.render().as_bytes())
            .map_err(|e| GenError::io(&self.path, e))?;
        temp.flush().map_err(|e| GenError::io(&self.path, e))?;
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| GenError::io(&self.path, e))?;
        }
        temp.persist(&self.path)
            .map_err(|e| GenError::io(&self.path, e.error))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "source/source_tests.rs"]
mod source_tests;
