//! Source file enumeration.

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lists candidate files under a root.
///
/// Implementations return paths joined onto `root`, sorted. An empty
/// `extensions` slice accepts every file.
pub trait SourceLister {
    fn list_files(
        &self,
        root: &Path,
        extensions: &[String],
        skip_exclusions: bool,
    ) -> GenResult<Vec<PathBuf>>;
}

/// Recursive directory walk that prunes build, VCS and IDE directories.
#[derive(Debug, Clone)]
pub struct WalkDirLister {
    excluded_dirs: Vec<String>,
}

impl WalkDirLister {
    pub fn new(excluded_dirs: Vec<String>) -> Self {
        Self { excluded_dirs }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.excluded_dirs.clone())
    }

    /// Whether a directory name is excluded. A trailing `*` matches by prefix.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => name == pattern,
        })
    }

    fn keep(&self, entry: &DirEntry, skip_exclusions: bool) -> bool {
        if skip_exclusions || entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        !self.is_excluded(&entry.file_name().to_string_lossy())
    }
}

impl Default for WalkDirLister {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl SourceLister for WalkDirLister {
    fn list_files(
        &self,
        root: &Path,
        extensions: &[String],
        skip_exclusions: bool,
    ) -> GenResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.keep(entry, skip_exclusions));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if extensions.is_empty() || extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!(root = %root.display(), count = files.len(), "listed files");
        Ok(files)
    }
}

#[cfg(test)]
#[path = "files/files_tests.rs"]
mod files_tests;
