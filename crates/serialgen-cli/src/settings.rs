//! Layered configuration: defaults, serialgen.toml, environment, flags.

use anyhow::{Context, Result};
use clap::Args;
use serialgen_core::{CONFIG_FILE_NAME, GeneratorConfig};
use std::path::{Path, PathBuf};

/// Flags shared by the commands that need a resolved configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Client project root (default: PROJECT_DIR, CMAKE_PROJECT_DIR, then the current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Library root scanned for validation macros
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    /// Annotation keyword (default: SERIALIZABLE_MACRO or "Serializable")
    #[arg(short, long)]
    pub annotation: Option<String>,

    /// Also process //@Entity annotations
    #[arg(long)]
    pub entity: bool,

    /// Configuration file (default: <project>/serialgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// Resolve against the process environment and current directory.
    pub fn resolve(&self) -> Result<GeneratorConfig> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        self.resolve_with(|key| std::env::var(key).ok(), &cwd)
    }

    /// Resolve with an explicit environment lookup and working directory.
    pub fn resolve_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<GeneratorConfig> {
        let mut config = match self.config_file(&env, cwd) {
            Some(path) => GeneratorConfig::from_file(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        config.apply_env(&env);

        if let Some(project) = &self.project {
            config.project_dir = Some(project.clone());
        }
        if let Some(library) = &self.library {
            config.library_dir = Some(library.clone());
        }
        if let Some(annotation) = &self.annotation {
            config.annotation = annotation.clone();
        }
        if self.entity {
            config.entity_annotation = true;
        }
        if config.project_dir.is_none() {
            config.project_dir = Some(cwd.to_path_buf());
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// The explicit `--config`, else `serialgen.toml` in the project root if it exists.
    fn config_file(&self, env: &impl Fn(&str) -> Option<String>, cwd: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }

        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let root = self
            .project
            .clone()
            .or_else(|| non_empty("PROJECT_DIR"))
            .or_else(|| non_empty("CMAKE_PROJECT_DIR"))
            .unwrap_or_else(|| cwd.to_path_buf());

        let candidate = root.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }
}
